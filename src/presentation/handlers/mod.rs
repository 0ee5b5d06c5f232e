mod callback;
mod cancel_job;
mod create_job;
mod download;
mod health;
mod job_status;
mod responses;

pub use callback::callback_handler;
pub use cancel_job::cancel_job_handler;
pub use create_job::{create_job_handler, CreateJobRequest};
pub use download::download_caption_handler;
pub use health::health_handler;
pub use job_status::{get_job_handler, refresh_job_handler};
pub use responses::{ErrorResponse, JobResponse};
