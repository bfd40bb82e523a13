use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub logging: LogSettings,
}

/// Everything needed to open and size the Postgres connection pool.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// One of libpq's `sslmode` values (`disable`, `prefer`, `require`, ...).
    pub ssl_mode: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    pub conn_max_lifetime: Duration,
    /// Total number of connection attempts made at startup.
    pub max_retries: u32,
    /// Fixed pause between two connection attempts.
    pub retry_delay: Duration,
}

// Hand-written so the password never ends up in a log line.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_open_conns", &self.max_open_conns)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// HTTP listener and filesystem locations.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    /// Informational run mode (`GIN_MODE`), logged at startup.
    pub mode: Option<String>,
    /// Deployment environment (`GO_ENV`), defaults to `development`.
    pub environment: String,
    /// Root directory for uploaded images, served under `/uploads`.
    pub upload_dir: PathBuf,
    /// Directory holding the `css`, `js` and `img` asset folders.
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// When set, logs are also written to a daily rolling file in this directory.
    pub log_dir: Option<PathBuf>,
}

/// The flat view of the environment, one field per variable (lowercased).
#[derive(Debug, Deserialize)]
pub(crate) struct EnvSettings {
    db_host: String,
    db_port: u16,
    db_user: String,
    db_password: String,
    db_name: String,
    db_sslmode: String,
    db_max_open_conns: u32,
    db_max_idle_conns: u32,
    db_conn_max_lifetime_minutes: u64,
    db_max_retries: u32,
    db_retry_delay_seconds: u64,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    gin_mode: Option<String>,
    #[serde(default)]
    go_env: Option<String>,
    #[serde(default = "default_upload_dir")]
    upload_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    static_dir: PathBuf,
    #[serde(default)]
    log_dir: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl TryFrom<EnvSettings> for Settings {
    type Error = ConfigError;

    fn try_from(env: EnvSettings) -> Result<Self, Self::Error> {
        if env.db_max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "DB_MAX_RETRIES must be at least 1".to_string(),
            ));
        }
        if env.db_max_open_conns == 0 {
            return Err(ConfigError::ValidationError(
                "DB_MAX_OPEN_CONNS must be at least 1".to_string(),
            ));
        }

        Ok(Settings {
            database: DatabaseSettings {
                host: env.db_host,
                port: env.db_port,
                user: env.db_user,
                password: env.db_password,
                name: env.db_name,
                ssl_mode: env.db_sslmode,
                max_open_conns: env.db_max_open_conns,
                max_idle_conns: env.db_max_idle_conns,
                conn_max_lifetime: Duration::from_secs(env.db_conn_max_lifetime_minutes * 60),
                max_retries: env.db_max_retries,
                retry_delay: Duration::from_secs(env.db_retry_delay_seconds),
            },
            server: ServerSettings {
                port: env.port,
                mode: env.gin_mode,
                environment: env.go_env.unwrap_or_else(|| "development".to_string()),
                upload_dir: env.upload_dir,
                static_dir: env.static_dir,
            },
            logging: LogSettings { log_dir: env.log_dir },
        })
    }
}

/// Command-line overrides layered on top of the environment.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ServerOverrides {
    /// Port to listen on (overrides `PORT`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for uploaded images (overrides `UPLOAD_DIR`).
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,
}

#[cfg(feature = "clap")]
impl ServerOverrides {
    pub fn apply(self, server: &mut ServerSettings) {
        if let Some(port) = self.port {
            server.port = port;
        }
        if let Some(upload_dir) = self.upload_dir {
            server.upload_dir = upload_dir;
        }
    }
}
