//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the fraud prevention header service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// HMRC API settings.
    pub hmrc: HmrcSettings,

    /// Vendor identity reported to HMRC.
    pub vendor: VendorConfig,

    /// Device ID cookie attributes.
    pub device_cookie: DeviceCookieConfig,

    /// Session identity forwarded by the fronting application.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// HMRC API settings, set once at installation time.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HmrcSettings {
    /// Installation GUID, hashed into `Gov-Vendor-License-IDs`.
    pub installation_guid: Option<String>,

    /// Public IP of this server, sent as `Gov-Vendor-Public-IP`.
    pub public_ip: Option<String>,

    /// Accept `Gov-*` network headers supplied by the reverse proxy.
    pub gov_ip_headers: bool,
}

/// Vendor identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Licence issuer name in `Gov-Vendor-License-IDs`.
    pub vendor_name: String,

    /// `Gov-Vendor-Product-Name` value.
    pub product_name: String,

    /// Leading `name=version` pair of `Gov-Vendor-Version`.
    pub module_version: String,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            vendor_name: "ERPNext".to_string(),
            product_name: "ERPNext-MTD-VAT-Module".to_string(),
            module_version: "erpnext-mtd-module=1.0".to_string(),
        }
    }
}

/// Upper bound for the device cookie lifetime; browsers cap cookies at 400 days.
pub const MAX_COOKIE_AGE_DAYS: i64 = 400;

/// Device ID cookie attributes.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeviceCookieConfig {
    /// Only send the cookie over HTTPS.
    pub secure: bool,

    /// Hide the cookie from client-side script.
    pub http_only: bool,

    /// Cookie lifetime in days, at most [`MAX_COOKIE_AGE_DAYS`].
    /// Unset means a browser-session cookie.
    pub max_age_days: Option<i64>,
}

/// Session identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Trusted header carrying the authenticated user.
    pub user_header: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_header: "x-session-user".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
