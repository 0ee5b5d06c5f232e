use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    pub level: String,
}

impl TracingConfig {
    pub fn new(logging: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment,
            json_format: logging.enable_json,
            level: logging.level.clone(),
        }
    }
}
