mod dispatcher;
mod reconciler;
mod registry;
mod retrieval;

pub use dispatcher::{DispatchError, Dispatcher, JobSpec};
pub use reconciler::{
    CallbackReconciler, DeadLetter, DeadLetterSink, ReconcileError, RetryPolicy,
};
pub use registry::ProviderRegistry;
pub use retrieval::{CaptionRetrieval, RetrievalError};
