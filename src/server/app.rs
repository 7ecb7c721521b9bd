// axum application setup and server startup

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, middleware, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::utils::{ProcessWorkingSet, StaticWorkingSet, WorkingSetProbe};

use super::handlers::{report_upload_length, unmatched};
use super::middleware::stream_uploads_if_multipart;

/// shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub working_set: Arc<dyn WorkingSetProbe>,
}

impl AppState {
    pub fn new(config: AppConfig, working_set: Arc<dyn WorkingSetProbe>) -> Self {
        Self {
            config: Arc::new(config),
            working_set,
        }
    }
}

/// create the axum application with all routes and middleware
pub fn create_app(config: AppConfig) -> Router {
    create_app_with_probe(config, Arc::new(ProcessWorkingSet))
}

/// create app for testing (fixed working-set probe, no procfs reads)
pub fn create_test_app(config: AppConfig) -> Router {
    create_app_with_probe(config, Arc::new(StaticWorkingSet(None)))
}

/// create app with an injected working-set probe
pub fn create_app_with_probe(config: AppConfig, working_set: Arc<dyn WorkingSetProbe>) -> Router {
    let buffered_body_limit = config.upload.buffered_body_limit;
    let app_state = AppState::new(config, working_set);

    // everything no route claims falls through to the streaming pipeline;
    // the pipeline itself reads the raw body, so the default extractor
    // body limit is lifted on this branch
    let fallthrough = Router::new()
        .fallback(unmatched)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            stream_uploads_if_multipart,
        ))
        .layer(DefaultBodyLimit::disable());

    Router::new()
        // buffered single-file endpoint, bound through axum's multipart
        .route(
            "/File",
            post(report_upload_length).layer(DefaultBodyLimit::max(buffered_body_limit)),
        )
        .merge(fallthrough)
        // middleware stack
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// start the http server
pub async fn start_server(config: AppConfig) -> Result<()> {
    let app = create_app(config.clone());

    // create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid host/port combination")?;

    // log startup information
    info!(
        "starting upsink v{} at http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    info!("upload dir: {}", config.server.upload_dir.display());
    warn!("uploads are unauthenticated - filenames come from clients");

    // start the server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind to address")?;

    info!("server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
