use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::ExplorerConfig;
use crate::providers::HttpProviders;

pub async fn run(config: ExplorerConfig) -> anyhow::Result<()> {
    let providers = HttpProviders::from_config(&config.upstream)?;
    let state = Arc::new(AppState::new(providers));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Web server running at http://localhost:{}",
        config.server.port
    );
    axum::serve(listener, app).await?;
    Ok(())
}
