use crate::error::ConfigError;
use crate::settings::EnvSettings;
use std::path::PathBuf;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
#[cfg(feature = "clap")]
pub use settings::ServerOverrides;
pub use settings::{DatabaseSettings, LogSettings, ServerSettings, Settings};

/// Loads `.env.<GO_ENV>` (default `development`), falling back to `.env`.
///
/// Returns the file that was loaded, if any. A missing file is not an error:
/// the variables may already be present in the process environment.
pub fn load_env_files() -> Option<PathBuf> {
    let environment = std::env::var("GO_ENV").unwrap_or_else(|_| "development".to_string());
    dotenvy::from_filename(format!(".env.{environment}"))
        .or_else(|_| dotenvy::dotenv())
        .ok()
}

/// Loads the application configuration from the process environment.
///
/// Fails fast when a required variable is absent (or empty) or a numeric one
/// does not parse.
pub fn load_settings() -> Result<Settings, ConfigError> {
    build(config::Environment::default())
}

/// Same as [`load_settings`], but reads the given variables instead of the
/// process environment.
pub fn load_settings_from<I, K, V>(vars: I) -> Result<Settings, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let source = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    build(config::Environment::default().source(Some(source)))
}

fn build(environment: config::Environment) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(environment.ignore_empty(true))
        .build()?;

    let env = builder.try_deserialize::<EnvSettings>()?;
    Settings::try_from(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5432"),
            ("DB_USER", "pepper"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "peppers"),
            ("DB_SSLMODE", "disable"),
            ("DB_MAX_OPEN_CONNS", "25"),
            ("DB_MAX_IDLE_CONNS", "5"),
            ("DB_CONN_MAX_LIFETIME_MINUTES", "5"),
            ("DB_MAX_RETRIES", "3"),
            ("DB_RETRY_DELAY_SECONDS", "2"),
        ]
    }

    fn with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut vars = required();
        vars.retain(|(k, _)| !overrides.iter().any(|(o, _)| o == k));
        vars.extend_from_slice(overrides);
        vars
    }

    #[test]
    fn loads_required_variables_with_defaults() {
        let settings = load_settings_from(required()).unwrap();

        assert_eq!(settings.database.host, "localhost");
        assert_eq!(settings.database.port, 5432);
        assert_eq!(settings.database.max_open_conns, 25);
        assert_eq!(settings.database.conn_max_lifetime, Duration::from_secs(300));
        assert_eq!(settings.database.retry_delay, Duration::from_secs(2));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.environment, "development");
        assert_eq!(settings.server.upload_dir, PathBuf::from("uploads"));
        assert!(settings.logging.log_dir.is_none());
    }

    #[test]
    fn optional_variables_override_defaults() {
        let settings =
            load_settings_from(with(&[("PORT", "3000"), ("GIN_MODE", "release"), ("GO_ENV", "production")]))
                .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.mode.as_deref(), Some("release"));
        assert_eq!(settings.server.environment, "production");
    }

    #[test]
    fn missing_variable_fails() {
        let mut vars = required();
        vars.retain(|(k, _)| *k != "DB_HOST");

        let err = load_settings_from(vars).unwrap_err();
        assert!(err.to_string().contains("db_host"), "{err}");
    }

    #[test]
    fn empty_variable_counts_as_missing() {
        let err = load_settings_from(with(&[("DB_NAME", "")])).unwrap_err();
        assert!(err.to_string().contains("db_name"), "{err}");
    }

    #[test]
    fn non_numeric_variable_fails() {
        let err = load_settings_from(with(&[("DB_PORT", "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)), "{err}");
    }

    #[test]
    fn zero_retries_is_rejected() {
        let err = load_settings_from(with(&[("DB_MAX_RETRIES", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn debug_output_hides_the_password() {
        let settings = load_settings_from(required()).unwrap();
        let rendered = format!("{:?}", settings.database);
        assert!(!rendered.contains("secret"));
    }
}
