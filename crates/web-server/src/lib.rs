use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use configuration::ServerSettings;
use database::{JournalRepository, PlantRepository};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod form;
pub mod handlers;
pub mod storage;
pub mod views;

use storage::{FileStore, UPLOADS_URL_PREFIX};

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub plants: Arc<dyn PlantRepository>,
    pub journal: Arc<dyn JournalRepository>,
    pub files: FileStore,
}

impl AppState {
    /// Uses one repository value for both plants and journal entries.
    pub fn new<R>(repo: R, files: FileStore) -> Self
    where
        R: PlantRepository + JournalRepository + 'static,
    {
        let repo = Arc::new(repo);
        Self { plants: repo.clone(), journal: repo, files }
    }
}

/// Builds the application router: pages and fragments, static assets and
/// uploaded images.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let uploads = ServeDir::new(state.files.root());

    // A known path with the wrong method is treated like an unknown path.
    let unmatched = handlers::plants::fallback;

    Router::new()
        .route("/", get(handlers::plants::list).fallback(unmatched))
        .route("/plants/new", get(handlers::plants::new_form).fallback(unmatched))
        .route("/plants/create", post(handlers::plants::create).fallback(unmatched))
        .route("/plants/:id/edit", get(handlers::plants::edit_form).fallback(unmatched))
        .route(
            "/plants/:id",
            put(handlers::plants::update)
                .delete(handlers::plants::delete)
                .fallback(unmatched),
        )
        .route(
            "/plants/:id/journal",
            get(handlers::journal::page)
                .post(handlers::journal::create)
                .fallback(unmatched),
        )
        .route(
            "/plants/:id/journal/:entry_id/edit",
            get(handlers::journal::edit_form).fallback(unmatched),
        )
        .route(
            "/plants/:id/journal/:entry_id",
            put(handlers::journal::update)
                .delete(handlers::journal::delete)
                .fallback(unmatched),
        )
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .nest_service("/img", ServeDir::new(static_dir.join("img")))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .route_service("/favicon.svg", ServeFile::new(static_dir.join("img/favicon.svg")))
        .fallback(handlers::plants::fallback)
        .with_state(state)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 50)) // Set a 50MB body limit
}

/// Serves the application until Ctrl-C.
pub async fn run_server<R>(settings: &ServerSettings, repo: R) -> anyhow::Result<()>
where
    R: PlantRepository + JournalRepository + 'static,
{
    tokio::fs::create_dir_all(&settings.upload_dir).await?;

    let state = Arc::new(AppState::new(repo, FileStore::new(&settings.upload_dir)));
    let app = build_router(state, &settings.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        upload_dir = %settings.upload_dir.display(),
        static_dir = %settings.static_dir.display(),
        "Web server listening."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
