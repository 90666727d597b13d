//! # wordswap: Find-and-Replace Service for Documents
//!
//! `wordswap` is a stateless HTTP service that applies a textual find/replace
//! to uploaded documents while preserving their structural validity. It
//! currently understands PDF and CSV, and ships a minimal embedded web form
//! for interactive use.
//!
//! ## Overview
//!
//! A client uploads a document together with a find word and a replace word in
//! a single multipart request to `POST /api/replace`. The service detects the
//! document's format, rewrites every occurrence of the find word in a way
//! appropriate to that format's structure, and returns the modified bytes as a
//! download. Each request is processed independently; nothing is persisted.
//!
//! PDF documents are rewritten at the content-stream level, so object and page
//! structure, fonts, and layout are preserved (see [`engine::pdf`]). CSV
//! documents are rewritten per field with quoting resolved, so separators and
//! quoted fields survive the edit (see [`engine::csv`]).
//!
//! Failures are classified: uploads that are neither PDF nor CSV, inputs that
//! fail to parse, and replacements that cannot be encoded in place each map to
//! a distinct error kind and HTTP status (see [`errors`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use wordswap::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = wordswap::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     wordswap::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
mod openapi;
mod static_assets;
pub mod telemetry;

#[cfg(test)]
mod test;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use bon::Builder;
pub use config::Config;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// The service is stateless by design, so this carries only the configuration.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    // A wildcard origin cannot appear in an origin list; it must become
    // `AllowOrigin::any()`. Config validation already rejects pairing the
    // wildcard with credentials.
    let allow_origin = if config.security.cors.allowed_origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.security.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(config.security.cors.allow_credentials)
        // Browser clients read the substitution count off the response
        .expose_headers(vec![HeaderName::from_static("x-replacement-count")]);

    if let Some(max_age) = config.security.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// - `POST /api/replace`: the find/replace operation (body limit from config)
/// - `GET /api/formats`: supported formats
/// - `GET /health`: liveness probe
/// - `GET /docs`: OpenAPI documentation
/// - everything else: embedded static assets (the client form)
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let cors = create_cors_layer(&state.config)?;

    // Allow headroom above the file limit for the multipart framing and the
    // find/replace fields, so oversized files hit the streaming check (413)
    // instead of the transport limit
    let body_limit = state.config.limits.max_file_size as usize + state.config.limits.max_term_length * 2 + 64 * 1024;

    let router = Router::new()
        .route(
            "/api/replace",
            post(api::handlers::replace::replace_document).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/formats", get(api::handlers::formats::list_formats))
        .route("/health", get(api::handlers::status::health))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(api::handlers::static_assets::serve_embedded_asset)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state.clone());

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting wordswap with configuration: {:#?}", config);

        let state = AppState::builder().config(config.clone()).build();
        let router = build_router(&state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "wordswap listening on http://{}, form available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutdown complete");
        Ok(())
    }
}
