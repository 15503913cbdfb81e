//! Device identifier cookie handling.
//!
//! The device ID lives in the browser. This layer reads it from the request,
//! issues a fresh UUID when there is none, and hands back the `Set-Cookie`
//! directive for the response. Header assembly only ever sees the resolved value.

use axum::http::{header::COOKIE, HeaderMap};
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::config::schema::{DeviceCookieConfig, MAX_COOKIE_AGE_DAYS};
use crate::fraud::names::DEVICE_ID_COOKIE;

/// Device identifier resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId {
    pub value: String,
    /// `Set-Cookie` value to attach to the response when the ID was just issued.
    pub set_cookie: Option<String>,
}

impl DeviceId {
    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }
}

/// Read the device cookie, or issue a new ID.
pub fn resolve_device_id(headers: &HeaderMap, config: &DeviceCookieConfig) -> DeviceId {
    if let Some(existing) = device_id_from_cookies(headers) {
        return DeviceId {
            value: existing,
            set_cookie: None,
        };
    }

    let value = Uuid::new_v4().to_string();
    let set_cookie = device_cookie(&value, config);
    DeviceId {
        value,
        set_cookie: Some(set_cookie),
    }
}

/// Existing non-empty device ID from the `Cookie` header(s).
pub fn device_id_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == DEVICE_ID_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

fn device_cookie(value: &str, config: &DeviceCookieConfig) -> String {
    let mut builder = Cookie::build((DEVICE_ID_COOKIE, value.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .http_only(config.http_only);

    if let Some(days) = config.max_age_days.filter(|d| *d > 0) {
        let days = days.min(MAX_COOKIE_AGE_DAYS);
        builder = builder.max_age(cookie::time::Duration::days(days));
    }

    builder.build().to_string()
}
