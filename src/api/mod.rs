mod handlers;
mod types;
mod state;
pub use handlers::*;
pub use types::*;
pub use state::*;

use tokio::net::TcpListener;
use axum::{
    Router,
    routing::get
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use std::sync::Arc;
use std::net::SocketAddr;
use tracing::info;
use anyhow::Result;
use std::time::Duration;
use crate::api::handlers::common::panic_response;

pub fn router(state: Arc<AppState>) -> Router {
    let environment = state.config.environment;

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        // Core endpoints
        .route("/health", get(health_check))

        // Assessment endpoints
        .route("/api/vo2max", get(get_assessment).post(post_assessment))
        .route("/api/reference/{sex}", get(get_reference))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn std::any::Any + Send + 'static>| {
            panic_response(panic, environment)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(host: String, port: u16, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));

    // Create socket address
    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr).await?;

    info!("API server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
