//! Request handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fraud::{resolve_device_id, DeviceId, FraudHeaderError, FraudHeaderResult, RequestContext};
use crate::http::auth::SessionUser;
use crate::http::request::ClientAddr;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Form posted by the browser before an HMRC submission.
#[derive(Debug, Default, Deserialize)]
pub struct FraudPreventionForm {
    pub fraud_prevention: Option<String>,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Assemble the fraud prevention headers for the calling browser.
pub async fn build_headers(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    ClientAddr(remote_addr): ClientAddr,
    headers: HeaderMap,
    form: Result<Form<FraudPreventionForm>, FormRejection>,
) -> Response {
    let start = Instant::now();
    let inner = state.inner.load_full();

    let device = resolve_device_id(&headers, &inner.config.device_cookie);
    if device.is_new() {
        metrics::record_device_id_issued();
    }

    if let Err(rejection) = &form {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            let error = ApiError::payload_too_large(rejection.body_text());
            return with_device_cookie(error.into_response(), &device);
        }
    }

    let built = form_telemetry(form).and_then(|telemetry| {
        let ctx = RequestContext {
            headers,
            remote_addr,
            session_user: user.0,
            telemetry,
            device_id: device.value.clone(),
        };
        inner.builder.build_now(&ctx, &inner.config.hmrc)
    });

    let response = match built {
        Ok(fraud_headers) => {
            metrics::record_build("ok", start);
            tracing::info!(
                headers = fraud_headers.len(),
                device_id_issued = device.is_new(),
                "Fraud prevention headers built"
            );
            Json(fraud_headers).into_response()
        }
        Err(e) => {
            metrics::record_build(e.kind(), start);
            tracing::warn!(error = %e, kind = e.kind(), "Fraud prevention headers incomplete");
            ApiError::from(e).into_response()
        }
    };

    // Issued even on failure so a retry presents the same device ID.
    with_device_cookie(response, &device)
}

/// Telemetry form field, if the body was a form at all.
///
/// A body that is not form-encoded carries no `fraud_prevention` field; the
/// builder reports that as missing telemetry.
fn form_telemetry(
    form: Result<Form<FraudPreventionForm>, FormRejection>,
) -> FraudHeaderResult<Option<String>> {
    match form {
        Ok(Form(form)) => Ok(form.fraud_prevention),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(None),
        Err(rejection) => Err(FraudHeaderError::MalformedTelemetry(rejection.body_text())),
    }
}

fn with_device_cookie(mut response: Response, device: &DeviceId) -> Response {
    if let Some(cookie) = &device.set_cookie {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Device ID cookie is not a valid header value"),
        }
    }
    response
}

/// Echo back the request headers as received, for debugging proxy setups.
pub async fn header_feedback(headers: HeaderMap) -> Json<Map<String, Value>> {
    metrics::record_feedback_request();
    Json(echo_headers(&headers))
}

/// Header map as a JSON object, repeated headers joined with `, `.
pub fn echo_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut echoed = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        echoed.insert(name.as_str().to_string(), Value::String(joined));
    }
    echoed
}
