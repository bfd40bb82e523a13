use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

/// How long a request waits for a free pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Establishes a connection pool to the PostgreSQL database.
///
/// Up to `max_retries` attempts are made, `retry_delay` apart. Once a pool is
/// open its liveness is checked with a trivial query before it is handed out.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;
    let attempts = settings.max_retries.max(1);

    let pool = with_retries(attempts, settings.retry_delay, || {
        pool_options(settings).connect_with(options.clone())
    })
    .await
    .map_err(|source| DbError::RetriesExhausted { attempts, source })?;

    sqlx::query("SELECT 1").execute(&pool).await.map_err(DbError::Liveness)?;

    tracing::info!(
        max_open = settings.max_open_conns,
        max_idle = settings.max_idle_conns,
        lifetime_minutes = settings.conn_max_lifetime.as_secs() / 60,
        "Database pool configured."
    );

    Ok(pool)
}

/// Applies the migrations embedded from `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Runs `op` until it succeeds or `max_attempts` attempts have failed, sleeping
/// a fixed `delay` between attempts. Returns the last error on exhaustion.
///
/// A `max_attempts` of zero still makes one attempt.
pub async fn with_retries<T, E, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "Database connection attempt failed.");
                if attempt >= max_attempts {
                    return Err(e);
                }
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    let ssl_mode = PgSslMode::from_str(&settings.ssl_mode).map_err(|_| {
        DbError::ConnectionConfigError(format!("unsupported DB_SSLMODE: {}", settings.ssl_mode))
    })?;

    Ok(PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode))
}

// sqlx has no idle-connection cap; the idle setting becomes the number of
// connections the pool keeps warm.
fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_open_conns)
        .min_connections(settings.max_idle_conns.min(settings.max_open_conns))
        .max_lifetime(settings.conn_max_lifetime)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}
