pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    llm::{CompletionClient, GeminiClient},
    upload::{LocalUploadStorage, UploadStager},
};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Routes for both entry points. `max_upload_bytes` caps the image upload
/// body; `None` lifts the cap.
pub fn router(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let upload_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/ask", post(handlers::ask))
        .route("/api/image", post(handlers::image).layer(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let llm = GeminiClient::new(config.llm.clone())?;
    let completion = CompletionClient::new(
        Arc::new(llm),
        Duration::from_secs(config.llm.timeout_secs),
    );
    let stager = UploadStager::new(Arc::new(LocalUploadStorage::new(
        &config.server.upload_dir,
    )));

    Ok(AppState { completion, stager })
}

pub async fn run(config: Config) -> Result<()> {
    let app_state = build_state(&config)?;
    let app = router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (model: {}, uploads: {})",
        addr, config.llm.model, config.server.upload_dir
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
