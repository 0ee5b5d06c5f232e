use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub amara: AmaraSettings,
    pub storage: StorageSettings,
    pub callbacks: CallbackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Amara vendor credentials. Validity is only checked on first use.
#[derive(Debug, Clone, Deserialize)]
pub struct AmaraSettings {
    pub base_url: String,
    pub username: String,
    pub team: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub artifact_dir: String,
}

/// Retry behavior for the callback reconciler.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackSettings {
    pub max_attempts: u32,
    pub base_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Assemble settings from environment variables, with local-development
    /// defaults everywhere but the vendor credentials.
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parsed("SERVER_PORT", 3000),
            },
            amara: AmaraSettings {
                base_url: env_or("AMARA_BASE_URL", "https://amara.org"),
                username: env_or("AMARA_USERNAME", ""),
                team: env_or("AMARA_TEAM", ""),
                api_key: env_or("AMARA_TOKEN", ""),
            },
            storage: StorageSettings {
                artifact_dir: env_or("ARTIFACT_DIR", "./captions"),
            },
            callbacks: CallbackSettings {
                max_attempts: env_parsed("CALLBACK_MAX_ATTEMPTS", 3),
                base_backoff_ms: env_parsed("CALLBACK_BASE_BACKOFF_MS", 100),
            },
            logging: LoggingSettings {
                level: env_or("LOG_LEVEL", "info"),
                enable_json: env_or("LOG_FORMAT", "").to_lowercase() == "json",
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
