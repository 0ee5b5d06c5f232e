use captiond::infrastructure::observability::TracingConfig;
use captiond::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_logging_settings_then_tracing_config_carries_them() {
    let logging = LoggingSettings {
        level: "warn".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::new(&logging, Environment::Prod);

    assert_eq!(config.level, "warn");
    assert!(config.json_format);
    assert_eq!(config.environment, Environment::Prod);
}

#[test]
fn given_environment_aliases_then_they_parse() {
    assert_eq!(
        Environment::try_from("production".to_string()).unwrap(),
        Environment::Prod
    );
    assert_eq!(
        Environment::try_from("LOCAL".to_string()).unwrap(),
        Environment::Local
    );
    assert!(Environment::try_from("staging".to_string()).is_err());
}
