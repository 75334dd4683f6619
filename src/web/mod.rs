//! Web layer module
//!
//! Thin axum handlers over [`ListingService`]. Path ids are validated by
//! [`extractors::IdPath`], errors are rendered by the `IntoResponse`
//! implementation in [`responses`], and cross-origin access is limited to
//! the configured front-end URL.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Config, errors::AppError, services::ListingService};

pub mod extractors;
pub mod handlers;
pub mod responses;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, listing: ListingService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = Self::create_router(AppState { config, listing })?;

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Result<Router, AppError> {
        let cors = Self::cors_layer(&state.config.web.front_url)?;
        let body_limit = DefaultBodyLimit::max(state.config.web.max_upload_size);

        Ok(Router::new()
            .route("/", get(handlers::index::index))
            .route("/health", get(handlers::health::health_check))
            // Items
            .route(
                "/items",
                get(handlers::items::list_items).post(handlers::items::create_item),
            )
            .route("/items/:id", get(handlers::items::get_item))
            .route("/search", get(handlers::items::search_items))
            // Categories
            .route(
                "/categories",
                get(handlers::categories::list_categories)
                    .post(handlers::categories::create_category),
            )
            .route("/categories/:id", get(handlers::categories::get_category))
            // Images
            .route("/image/:filename", get(handlers::images::get_image))
            // Middleware (applied in reverse order)
            .layer(body_limit)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state))
    }

    fn cors_layer(front_url: &str) -> Result<CorsLayer, AppError> {
        let origin = HeaderValue::from_str(front_url.trim_end_matches('/')).map_err(|e| {
            AppError::configuration(format!("invalid front_url '{}': {}", front_url, e))
        })?;

        Ok(CorsLayer::new().allow_origin(origin).allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
        ]))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;

        info!("Listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C only on non-Unix platforms)
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!("Failed to install signal handlers: {}", e);
                    return std::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            return std::future::pending().await;
        }
        info!("Received Ctrl+C, shutting down gracefully");
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub listing: ListingService,
}
