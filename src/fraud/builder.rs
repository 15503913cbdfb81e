//! Fraud prevention header assembly.
//!
//! # Data Flow
//! ```text
//! RequestContext (headers, remote addr, session user, telemetry form, device ID)
//!     + HmrcSettings (installation GUID, public IP override, proxy passthrough flag)
//!     → HeaderBuilder::build
//!     → FraudHeaders (ordered, ready for the outbound HMRC call)
//! ```
//!
//! # Design Decisions
//! - Pure: the clock and the device ID are inputs, nothing is read from ambient state
//! - Any missing mandatory input fails the whole build
//! - Proxy-supplied headers never override computed ones

use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::schema::HmrcSettings;
use crate::fraud::error::{FraudHeaderError, FraudHeaderResult};
use crate::fraud::headers::FraudHeaders;
use crate::fraud::ip::{encode_ip, encode_optional_ip, resolve_client_ip};
use crate::fraud::names::*;
use crate::fraud::telemetry::ClientTelemetry;
use crate::fraud::vendor::VendorInfo;

/// URL quoting for the session user: unreserved characters and `/` pass through.
const USER_ID: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Everything the builder needs to know about the current request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Incoming request headers (proxy headers, passthrough headers).
    pub headers: HeaderMap,
    /// Transport-level peer address.
    pub remote_addr: Option<IpAddr>,
    /// Authenticated session user.
    pub session_user: String,
    /// Raw `fraud_prevention` form field.
    pub telemetry: Option<String>,
    /// Device ID resolved by the cookie layer.
    pub device_id: String,
}

/// Builds the header set for one outbound HMRC call.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    vendor: VendorInfo,
}

impl HeaderBuilder {
    pub fn new(vendor: VendorInfo) -> Self {
        Self { vendor }
    }

    /// Build headers using the current time.
    pub fn build_now(
        &self,
        ctx: &RequestContext,
        settings: &HmrcSettings,
    ) -> FraudHeaderResult<FraudHeaders> {
        self.build(ctx, settings, Utc::now())
    }

    /// Build headers for `ctx` as of `now`.
    pub fn build(
        &self,
        ctx: &RequestContext,
        settings: &HmrcSettings,
        now: DateTime<Utc>,
    ) -> FraudHeaderResult<FraudHeaders> {
        let timestamp = format_timestamp(now);
        let guid = non_empty(settings.installation_guid.as_deref())
            .ok_or(FraudHeaderError::MissingConfig("installation_guid"))?;

        let mut h = FraudHeaders::new();
        h.insert(GOV_CLIENT_CONNECTION_METHOD, WEB_APP_VIA_SERVER);
        h.insert(GOV_VENDOR_LICENSE_IDS, self.vendor.license_ids(guid));
        h.insert(GOV_VENDOR_PRODUCT_NAME, self.vendor.product_name.as_str());
        h.insert(GOV_VENDOR_VERSION, self.vendor.version());

        h.insert(GOV_CLIENT_DEVICE_ID, ctx.device_id.as_str());
        h.insert(GOV_CLIENT_USER_IDS, user_ids(&ctx.session_user));

        let raw = ctx
            .telemetry
            .as_deref()
            .ok_or(FraudHeaderError::MissingTelemetry(TELEMETRY_FORM_FIELD))?;
        let telemetry = ClientTelemetry::parse(raw)?;
        if let Some(ua) = &telemetry.user_agent {
            h.insert(GOV_CLIENT_BROWSER_JS_USER_AGENT, ua.as_str());
        }
        if let Some(tz) = telemetry.timezone() {
            h.insert(GOV_CLIENT_TIMEZONE, tz);
        }
        h.insert(GOV_CLIENT_WINDOW_SIZE, telemetry.window_size());
        h.insert(GOV_CLIENT_SCREENS, telemetry.screens());

        let client_ip = resolve_client_ip(&ctx.headers, ctx.remote_addr)?;
        let vendor_ip = non_empty(settings.public_ip.as_deref());
        h.insert(GOV_CLIENT_PUBLIC_IP, client_ip.as_str());
        h.insert(GOV_CLIENT_PUBLIC_IP_TIMESTAMP, timestamp);
        if let Some(ip) = vendor_ip {
            h.insert(GOV_VENDOR_PUBLIC_IP, ip);
        }
        h.insert(
            GOV_VENDOR_FORWARDED,
            format!(
                "by={}&for={}",
                encode_optional_ip(vendor_ip),
                encode_ip(&client_ip)
            ),
        );

        if settings.gov_ip_headers {
            copy_proxy_headers(&ctx.headers, &mut h);
        }

        Ok(h)
    }
}

/// Copy proxy-supplied `Gov-*` network headers that were not computed locally.
fn copy_proxy_headers(incoming: &HeaderMap, h: &mut FraudHeaders) {
    for name in PROXY_PASSTHROUGH {
        if let Some(value) = incoming.get(name).and_then(|v| v.to_str().ok()) {
            if h.insert_if_absent(name, value) {
                tracing::debug!(header = name, "Using proxy-supplied header");
            }
        }
    }
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `Gov-Client-User-IDs` value for a session user.
pub fn user_ids(session_user: &str) -> String {
    format!(
        "{}={}",
        USER_ID_SOURCE,
        utf8_percent_encode(session_user, USER_ID)
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::VendorConfig;
    use crate::fraud::vendor::{hash_guid, Platform};
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    const TELEMETRY: &str = r#"{"UA":"Mozilla/5.0","TimezoneOffsetMinutes":60,"WindowWidth":1200,"WindowHeight":800,"ScreenWidth":1920,"ScreenHeight":1080,"ScreenScalingFactor":1,"ScreenColorDepth":24}"#;

    fn builder() -> HeaderBuilder {
        HeaderBuilder::new(VendorInfo::new(
            &VendorConfig::default(),
            Platform {
                name: "Linux".into(),
                release: "6.1.0".into(),
            },
        ))
    }

    fn settings() -> HmrcSettings {
        HmrcSettings {
            installation_guid: Some("G".into()),
            public_ip: Some("203.0.113.6".into()),
            gov_ip_headers: false,
        }
    }

    fn context() -> RequestContext {
        RequestContext {
            headers: HeaderMap::new(),
            remote_addr: Some("198.51.100.0".parse().unwrap()),
            session_user: "jane@example.com".into(),
            telemetry: Some(TELEMETRY.into()),
            device_id: "abc-123".into(),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_full_build() {
        let h = builder().build(&context(), &settings(), noon()).unwrap();

        assert_eq!(h.get(GOV_CLIENT_CONNECTION_METHOD), Some("WEB_APP_VIA_SERVER"));
        assert_eq!(
            h.get(GOV_VENDOR_LICENSE_IDS),
            Some(format!("ERPNext={}", hash_guid("G")).as_str())
        );
        assert_eq!(h.get(GOV_VENDOR_PRODUCT_NAME), Some("ERPNext-MTD-VAT-Module"));
        assert_eq!(
            h.get(GOV_VENDOR_VERSION),
            Some("erpnext-mtd-module=1.0&Linux=6.1.0")
        );
        assert_eq!(h.get(GOV_CLIENT_DEVICE_ID), Some("abc-123"));
        assert_eq!(h.get(GOV_CLIENT_USER_IDS), Some("frappe=jane%40example.com"));
        assert_eq!(h.get(GOV_CLIENT_BROWSER_JS_USER_AGENT), Some("Mozilla/5.0"));
        assert_eq!(h.get(GOV_CLIENT_TIMEZONE), Some("UTC-01:00"));
        assert_eq!(h.get(GOV_CLIENT_WINDOW_SIZE), Some("width=1200&height=800"));
        assert_eq!(h.get(GOV_CLIENT_PUBLIC_IP), Some("198.51.100.0"));
        assert_eq!(
            h.get(GOV_CLIENT_PUBLIC_IP_TIMESTAMP),
            Some("2021-03-04T12:00:00.000Z")
        );
        assert_eq!(h.get(GOV_VENDOR_PUBLIC_IP), Some("203.0.113.6"));
        assert_eq!(
            h.get(GOV_VENDOR_FORWARDED),
            Some("by=203.0.113.6&for=198.51.100.0")
        );
        assert!(!h.contains(GOV_CLIENT_PUBLIC_PORT));
    }

    #[test]
    fn test_header_order() {
        let h = builder().build(&context(), &settings(), noon()).unwrap();
        let names: Vec<&str> = h.names().collect();
        assert_eq!(names.first(), Some(&GOV_CLIENT_CONNECTION_METHOD));
        assert_eq!(names.last(), Some(&GOV_VENDOR_FORWARDED));
    }

    #[test]
    fn test_timestamp_millis() {
        let ts = Utc
            .with_ymd_and_hms(2021, 3, 4, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        let formatted = format_timestamp(ts);
        assert_eq!(formatted, "2021-03-04T12:00:00.123Z");
        assert_eq!(formatted.len(), 24);
    }

    #[test]
    fn test_ipv6_client_forwarded_encoding() {
        let mut ctx = context();
        ctx.remote_addr = Some("2001:db8::1".parse().unwrap());
        let h = builder().build(&ctx, &settings(), noon()).unwrap();
        assert_eq!(
            h.get(GOV_VENDOR_FORWARDED),
            Some("by=203.0.113.6&for=2001%3Adb8%3A%3A1")
        );
        assert_eq!(h.get(GOV_CLIENT_PUBLIC_IP), Some("2001:db8::1"));
    }

    #[test]
    fn test_unset_vendor_ip() {
        let mut s = settings();
        s.public_ip = None;
        let h = builder().build(&context(), &s, noon()).unwrap();
        assert!(!h.contains(GOV_VENDOR_PUBLIC_IP));
        assert_eq!(h.get(GOV_VENDOR_FORWARDED), Some("by=&for=198.51.100.0"));
    }

    #[test]
    fn test_proxy_passthrough_fills_only_gaps() {
        let mut ctx = context();
        ctx.headers.insert(GOV_CLIENT_PUBLIC_PORT, HeaderValue::from_static("51234"));
        ctx.headers.insert(GOV_VENDOR_PUBLIC_IP, HeaderValue::from_static("192.0.2.10"));
        ctx.headers.insert(GOV_CLIENT_PUBLIC_IP, HeaderValue::from_static("192.0.2.99"));

        let mut s = settings();
        s.public_ip = None;
        s.gov_ip_headers = true;
        let h = builder().build(&ctx, &s, noon()).unwrap();

        assert_eq!(h.get(GOV_CLIENT_PUBLIC_PORT), Some("51234"));
        assert_eq!(h.get(GOV_VENDOR_PUBLIC_IP), Some("192.0.2.10"));
        assert_eq!(h.get(GOV_CLIENT_PUBLIC_IP), Some("198.51.100.0"));
    }

    #[test]
    fn test_passthrough_disabled() {
        let mut ctx = context();
        ctx.headers.insert(GOV_CLIENT_PUBLIC_PORT, HeaderValue::from_static("51234"));
        let h = builder().build(&ctx, &settings(), noon()).unwrap();
        assert!(!h.contains(GOV_CLIENT_PUBLIC_PORT));
    }

    #[test]
    fn test_missing_guid() {
        let mut s = settings();
        s.installation_guid = Some("  ".into());
        assert!(matches!(
            builder().build(&context(), &s, noon()),
            Err(FraudHeaderError::MissingConfig("installation_guid"))
        ));
    }

    #[test]
    fn test_missing_telemetry() {
        let mut ctx = context();
        ctx.telemetry = None;
        assert!(matches!(
            builder().build(&ctx, &settings(), noon()),
            Err(FraudHeaderError::MissingTelemetry("fraud_prevention"))
        ));
    }

    #[test]
    fn test_missing_window_width_fails_whole_build() {
        let mut ctx = context();
        ctx.telemetry = Some(TELEMETRY.replace(r#""WindowWidth":1200,"#, ""));
        match builder().build(&ctx, &settings(), noon()) {
            Err(FraudHeaderError::MissingTelemetryField(f)) => assert_eq!(f, "WindowWidth"),
            other => panic!("expected missing field error, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_ip() {
        let mut ctx = context();
        ctx.remote_addr = None;
        assert!(matches!(
            builder().build(&ctx, &settings(), noon()),
            Err(FraudHeaderError::UnresolvedClientIp)
        ));
    }

    #[test]
    fn test_user_ids_quoting() {
        assert_eq!(user_ids("Administrator"), "frappe=Administrator");
        assert_eq!(user_ids("a b/c~d"), "frappe=a%20b/c~d");
    }
}
