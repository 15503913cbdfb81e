//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, header names and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - A missing installation GUID is not an error here; it fails header builds instead

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::{AppConfig, MAX_COOKIE_AGE_DAYS};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(ip) = config.hmrc.public_ip.as_deref().filter(|ip| !ip.is_empty()) {
        if ip.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::new(
                "hmrc.public_ip",
                format!("`{}` is not an IP address", ip),
            ));
        }
    }

    if config.vendor.vendor_name.is_empty() {
        errors.push(ValidationError::new("vendor.vendor_name", "must not be empty"));
    }
    if config.vendor.product_name.is_empty() {
        errors.push(ValidationError::new("vendor.product_name", "must not be empty"));
    }

    if HeaderName::from_bytes(config.session.user_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "session.user_header",
            format!("`{}` is not a valid header name", config.session.user_header),
        ));
    }

    if let Some(days) = config.device_cookie.max_age_days {
        if days <= 0 {
            errors.push(ValidationError::new(
                "device_cookie.max_age_days",
                "must be positive when set",
            ));
        } else if days > MAX_COOKIE_AGE_DAYS {
            errors.push(ValidationError::new(
                "device_cookie.max_age_days",
                format!("must be at most {}", MAX_COOKIE_AGE_DAYS),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level `{}`", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
