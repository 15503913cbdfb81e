//! Header and cookie names dictated by the HMRC fraud prevention specification.
//!
//! These strings are contractual and must be sent exactly as written.

pub const GOV_CLIENT_CONNECTION_METHOD: &str = "Gov-Client-Connection-Method";
pub const GOV_CLIENT_DEVICE_ID: &str = "Gov-Client-Device-ID";
pub const GOV_CLIENT_USER_IDS: &str = "Gov-Client-User-IDs";
pub const GOV_CLIENT_BROWSER_JS_USER_AGENT: &str = "Gov-Client-Browser-JS-User-Agent";
pub const GOV_CLIENT_TIMEZONE: &str = "Gov-Client-Timezone";
pub const GOV_CLIENT_WINDOW_SIZE: &str = "Gov-Client-Window-Size";
pub const GOV_CLIENT_SCREENS: &str = "Gov-Client-Screens";
pub const GOV_CLIENT_PUBLIC_IP: &str = "Gov-Client-Public-IP";
pub const GOV_CLIENT_PUBLIC_IP_TIMESTAMP: &str = "Gov-Client-Public-IP-Timestamp";
pub const GOV_CLIENT_PUBLIC_PORT: &str = "Gov-Client-Public-Port";
pub const GOV_VENDOR_LICENSE_IDS: &str = "Gov-Vendor-License-IDs";
pub const GOV_VENDOR_PRODUCT_NAME: &str = "Gov-Vendor-Product-Name";
pub const GOV_VENDOR_VERSION: &str = "Gov-Vendor-Version";
pub const GOV_VENDOR_PUBLIC_IP: &str = "Gov-Vendor-Public-IP";
pub const GOV_VENDOR_FORWARDED: &str = "Gov-Vendor-Forwarded";

/// Cookie carrying the per-browser device identifier. Same name as the header.
pub const DEVICE_ID_COOKIE: &str = GOV_CLIENT_DEVICE_ID;

/// Connection method for a browser talking to our server, which talks to HMRC.
pub const WEB_APP_VIA_SERVER: &str = "WEB_APP_VIA_SERVER";

/// Source system prefix used in `Gov-Client-User-IDs`.
pub const USER_ID_SOURCE: &str = "frappe";

/// Form field carrying the browser telemetry JSON.
pub const TELEMETRY_FORM_FIELD: &str = "fraud_prevention";

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Headers a reverse proxy may supply when `gov_ip_headers` is enabled.
pub const PROXY_PASSTHROUGH: [&str; 5] = [
    GOV_CLIENT_PUBLIC_IP,
    GOV_CLIENT_PUBLIC_IP_TIMESTAMP,
    GOV_CLIENT_PUBLIC_PORT,
    GOV_VENDOR_PUBLIC_IP,
    GOV_VENDOR_FORWARDED,
];

/// Headers every submission has to carry.
pub const MANDATORY: [&str; 14] = [
    GOV_CLIENT_CONNECTION_METHOD,
    GOV_CLIENT_DEVICE_ID,
    GOV_CLIENT_USER_IDS,
    GOV_CLIENT_TIMEZONE,
    GOV_CLIENT_WINDOW_SIZE,
    GOV_CLIENT_SCREENS,
    GOV_CLIENT_PUBLIC_IP,
    GOV_CLIENT_PUBLIC_IP_TIMESTAMP,
    GOV_VENDOR_LICENSE_IDS,
    GOV_VENDOR_PRODUCT_NAME,
    GOV_VENDOR_VERSION,
    GOV_VENDOR_PUBLIC_IP,
    GOV_VENDOR_FORWARDED,
    GOV_CLIENT_PUBLIC_PORT,
];
