//! Error definitions for header assembly.

use thiserror::Error;

/// Errors that abort header assembly.
///
/// HMRC rejects submissions with missing mandatory headers, so none of these
/// degrade to a partial header set.
#[derive(Debug, Error)]
pub enum FraudHeaderError {
    /// The `fraud_prevention` form field was not submitted.
    #[error("missing client telemetry form field `{0}`")]
    MissingTelemetry(&'static str),

    /// The telemetry payload is not valid JSON or has wrong-typed fields.
    #[error("malformed client telemetry: {0}")]
    MalformedTelemetry(String),

    /// A required telemetry field is absent.
    #[error("client telemetry is missing required field `{0}`")]
    MissingTelemetryField(String),

    /// A required setting has not been configured.
    #[error("required setting `{0}` is not configured")]
    MissingConfig(&'static str),

    /// No forwarding headers and no transport address to derive the client IP from.
    #[error("unable to resolve client public IP")]
    UnresolvedClientIp,

    /// A computed value cannot be carried in an HTTP header.
    #[error("invalid value for header {name}: {reason}")]
    InvalidHeaderValue { name: String, reason: String },
}

impl FraudHeaderError {
    /// Stable identifier used in API error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FraudHeaderError::MissingTelemetry(_) => "missing_telemetry",
            FraudHeaderError::MalformedTelemetry(_) => "malformed_telemetry",
            FraudHeaderError::MissingTelemetryField(_) => "missing_telemetry_field",
            FraudHeaderError::MissingConfig(_) => "missing_config",
            FraudHeaderError::UnresolvedClientIp => "unresolved_client_ip",
            FraudHeaderError::InvalidHeaderValue { .. } => "invalid_header_value",
        }
    }

    /// True when the fault lies with what the browser sent rather than with our setup.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FraudHeaderError::MissingTelemetry(_)
                | FraudHeaderError::MalformedTelemetry(_)
                | FraudHeaderError::MissingTelemetryField(_)
                | FraudHeaderError::UnresolvedClientIp
        )
    }
}

/// Result type for header assembly.
pub type FraudHeaderResult<T> = Result<T, FraudHeaderError>;
