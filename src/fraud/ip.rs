//! Client public IP resolution and IP literal encoding.

use std::net::IpAddr;

use axum::http::HeaderMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::fraud::error::{FraudHeaderError, FraudHeaderResult};
use crate::fraud::names::{X_FORWARDED_FOR, X_REAL_IP};

/// Everything except RFC 3986 unreserved characters is escaped.
const STRICT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Identify the originating client IP behind the reverse proxy.
///
/// Priority: first entry of `X-Forwarded-For`, then `X-Real-Ip`, then the
/// transport remote address.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    remote_addr: Option<IpAddr>,
) -> FraudHeaderResult<String> {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return Ok(ip.to_string());
    }

    let real_ip = headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = real_ip {
        return Ok(ip.to_string());
    }

    remote_addr
        .map(|ip| ip.to_string())
        .ok_or(FraudHeaderError::UnresolvedClientIp)
}

/// Percent-encode an IP literal for the `for=`/`by=` parameters.
///
/// IPv4 literals come out unchanged; IPv6 colons become `%3A`.
pub fn encode_ip(ip: &str) -> String {
    utf8_percent_encode(ip, STRICT).to_string()
}

/// Like [`encode_ip`], with an unset address encoded as the empty string.
pub fn encode_optional_ip(ip: Option<&str>) -> String {
    ip.map(encode_ip).unwrap_or_default()
}
