//! HTTP server assembly.

pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use state::AppState;

pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn build_router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health))
            .nest("/api", routes::api_router(self.state.clone()))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    pub async fn start(&self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.state.config().server.host,
            self.state.config().server.port
        );
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::internal(format!("failed to bind {}: {}", addr, e)))?;
        info!(%addr, "server listening");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::internal(format!("server error: {}", e)))
    }
}

async fn health() -> &'static str {
    "ok"
}
