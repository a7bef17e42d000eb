//! # HTTP Function
//!
//! Axum server exposing the analysis as an HTTP-triggered function. When
//! hosted as an Azure Functions custom handler the listen port comes from
//! `FUNCTIONS_CUSTOMHANDLER_PORT` (see `config`).

mod handlers;
mod routes;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::ReportAssembler;

pub use handlers::AppState;
pub use routes::create_router;

/// Build the full application: routes, CORS and request tracing
pub fn app(assembler: Arc<ReportAssembler>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    create_router(AppState { assembler })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the analysis function
pub struct HttpServer {
    listen_addr: String,
    assembler: Arc<ReportAssembler>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(listen_addr: impl Into<String>, assembler: Arc<ReportAssembler>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            assembler,
        }
    }

    /// Run until the process receives Ctrl-C
    pub async fn run(&self) -> crate::Result<()> {
        let addr: SocketAddr = self.listen_addr.parse().map_err(|e| {
            crate::Error::Config(format!("Invalid listen address '{}': {}", self.listen_addr, e))
        })?;

        let listener = TcpListener::bind(&addr).await?;
        info!("HTTP function listening on http://{}", addr);

        axum::serve(listener, app(self.assembler.clone()))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("HTTP server shutting down");
            })
            .await?;

        Ok(())
    }
}
