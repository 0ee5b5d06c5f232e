mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AmaraSettings, CallbackSettings, LoggingSettings, ServerSettings, Settings, StorageSettings,
};
