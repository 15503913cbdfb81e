//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header::CONTENT_TYPE, Request},
    Router,
};
use mtd_fraud_headers::config::AppConfig;
use mtd_fraud_headers::fraud::Platform;
use mtd_fraud_headers::http::{build_router, AppState};

pub const TELEMETRY: &str = r#"{"UA":"Mozilla/5.0 (X11; Linux x86_64)","TimezoneOffsetMinutes":-60,"WindowWidth":1256,"WindowHeight":803,"ScreenWidth":1920,"ScreenHeight":1080,"ScreenScalingFactor":1,"ScreenColorDepth":24}"#;

pub fn platform() -> Platform {
    Platform {
        name: "Linux".into(),
        release: "6.1.0".into(),
    }
}

/// Config with a complete HMRC setup.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.hmrc.installation_guid = Some("4c1f0e2e-7b1a-4d7e-9a53-0f6b8c9d2e11".into());
    config.hmrc.public_ip = Some("203.0.113.6".into());
    config
}

/// Router as served, with a fixed peer address.
#[allow(dead_code)]
pub fn test_app(config: AppConfig, peer: SocketAddr) -> (Router, AppState) {
    let state = AppState::new(config.clone(), platform());
    let router = build_router(&config, state.clone()).layer(MockConnectInfo(peer));
    (router, state)
}

/// URL-encoded form body carrying the telemetry payload.
pub fn form_body(telemetry: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("fraud_prevention", telemetry)
        .finish()
}

/// POST to the headers endpoint as `user`, without a body yet.
#[allow(dead_code)]
pub fn headers_request(user: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/fraud-prevention/headers")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(user) = user {
        builder = builder.header("x-session-user", user);
    }
    builder
}

/// Attach the telemetry form body.
#[allow(dead_code)]
pub fn with_form(builder: axum::http::request::Builder, telemetry: &str) -> Request<Body> {
    builder.body(Body::from(form_body(telemetry))).unwrap()
}
