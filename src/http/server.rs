//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, session auth)
//! - Bind server to listener
//! - Apply hot-reloaded configuration

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::fraud::{HeaderBuilder, Platform, VendorInfo};
use crate::http::auth::session_auth_middleware;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::signals::shutdown_signal;

pub const HEADERS_PATH: &str = "/api/fraud-prevention/headers";
pub const FEEDBACK_PATH: &str = "/api/fraud-prevention/feedback";
pub const HEALTH_PATH: &str = "/health";

/// Configuration snapshot and the header builder derived from it.
pub struct InnerState {
    pub config: AppConfig,
    pub builder: HeaderBuilder,
}

impl InnerState {
    pub fn new(config: AppConfig, platform: Platform) -> Self {
        let builder = HeaderBuilder::new(VendorInfo::new(&config.vendor, platform));
        Self { config, builder }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub platform: Platform,
}

impl AppState {
    pub fn new(config: AppConfig, platform: Platform) -> Self {
        let inner = InnerState::new(config, platform.clone());
        Self {
            inner: Arc::new(ArcSwap::from_pointee(inner)),
            platform,
        }
    }

    /// Swap in a new configuration for subsequent requests.
    pub fn apply_config(&self, config: AppConfig) {
        self.inner
            .store(Arc::new(InnerState::new(config, self.platform.clone())));
    }
}

/// HTTP server for the fraud prevention header service.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server for the detected host platform.
    pub fn new(config: AppConfig) -> Self {
        Self::with_platform(config, Platform::detect())
    }

    pub fn with_platform(config: AppConfig, platform: Platform) -> Self {
        let state = AppState::new(config.clone(), platform);
        let router = build_router(&config, state.clone());
        Self {
            router,
            state,
            config,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let startup_config = self.config.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                for field in restart_required(&startup_config, &new_config) {
                    tracing::warn!(field, "Setting changed; restart required to apply");
                }
                state.apply_config(new_config);
                tracing::info!("Configuration reloaded");
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Settings baked into the listener or the middleware stack at startup.
///
/// Everything else is read from the swapped state on each request.
pub fn restart_required(running: &AppConfig, new: &AppConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if running.listener.bind_address != new.listener.bind_address {
        fields.push("listener.bind_address");
    }
    if running.security.max_body_size != new.security.max_body_size {
        fields.push("security.max_body_size");
    }
    if running.timeouts.request_secs != new.timeouts.request_secs {
        fields.push("timeouts.request_secs");
    }
    if running.observability.log_level != new.observability.log_level {
        fields.push("observability.log_level");
    }
    if running.observability.metrics_enabled != new.observability.metrics_enabled
        || running.observability.metrics_address != new.observability.metrics_address
    {
        fields.push("observability.metrics");
    }
    fields
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    let authenticated = Router::new()
        .route(HEADERS_PATH, post(handlers::build_headers))
        .route(FEEDBACK_PATH, get(handlers::header_feedback))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .merge(authenticated)
        .route(HEALTH_PATH, get(handlers::health))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id(request),
            )
        }))
        .layer(set_request_id_layer())
}
