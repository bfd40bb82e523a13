use clap::{Parser, Subcommand};
use configuration::{ServerOverrides, Settings};
use database::{connect, run_migrations, DbRepository};

/// The main entry point for the pepper journal application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let env_file = configuration::load_env_files();
    let mut settings = configuration::load_settings()?;
    // Held for the life of the process so buffered file logs are flushed on exit.
    let _log_guard = configuration::init_tracing(&settings.logging);

    match &env_file {
        Some(path) => tracing::info!(path = %path.display(), "Loaded environment file."),
        None => tracing::info!("No environment file found, using the process environment."),
    }
    tracing::info!(
        environment = %settings.server.environment,
        mode = settings.server.mode.as_deref().unwrap_or("debug"),
        "Starting pepper journal."
    );

    // Execute the appropriate command
    match cli.command.unwrap_or_default() {
        Commands::Serve(overrides) => {
            overrides.apply(&mut settings.server);
            handle_serve(settings).await
        }
        Commands::Migrate => handle_migrate(settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A journal for pepper plants and their care.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Defaults to `serve`.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, apply migrations and serve the web application.
    Serve(ServerOverrides),
    /// Connect, apply migrations and exit.
    Migrate,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve(ServerOverrides::default())
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(settings: Settings) -> anyhow::Result<()> {
    let pool = connect(&settings.database).await?;
    run_migrations(&pool).await?;
    web_server::run_server(&settings.server, DbRepository::new(pool)).await
}

async fn handle_migrate(settings: Settings) -> anyhow::Result<()> {
    let pool = connect(&settings.database).await?;
    run_migrations(&pool).await?;
    tracing::info!("Migrations are up to date.");
    pool.close().await;
    Ok(())
}
