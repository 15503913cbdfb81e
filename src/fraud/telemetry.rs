//! Browser telemetry submitted alongside each request.
//!
//! # Responsibilities
//! - Parse the `fraud_prevention` form field into a typed structure
//! - Report the first missing geometry field by name
//! - Render the telemetry-derived header values
//!
//! # Design Decisions
//! - Geometry fields are required; a payload without them fails the whole build
//! - `UA` and `TimezoneOffsetMinutes` are optional and their headers are omitted when absent
//! - The scaling factor keeps its JSON textual form (`1` stays `1`, `1.25` stays `1.25`)

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::fraud::error::{FraudHeaderError, FraudHeaderResult};

/// Fields without which `Gov-Client-Window-Size` / `Gov-Client-Screens` cannot be sent.
const REQUIRED_FIELDS: [&str; 6] = [
    "WindowWidth",
    "WindowHeight",
    "ScreenWidth",
    "ScreenHeight",
    "ScreenScalingFactor",
    "ScreenColorDepth",
];

/// Telemetry gathered by the client-side script.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientTelemetry {
    #[serde(rename = "UA", default)]
    pub user_agent: Option<String>,

    /// Minutes as reported by the browser's `Date.getTimezoneOffset()`.
    #[serde(rename = "TimezoneOffsetMinutes", default)]
    pub timezone_offset_minutes: Option<i32>,

    #[serde(rename = "WindowWidth")]
    pub window_width: u32,

    #[serde(rename = "WindowHeight")]
    pub window_height: u32,

    #[serde(rename = "ScreenWidth")]
    pub screen_width: u32,

    #[serde(rename = "ScreenHeight")]
    pub screen_height: u32,

    #[serde(rename = "ScreenScalingFactor")]
    pub screen_scaling_factor: Number,

    #[serde(rename = "ScreenColorDepth")]
    pub screen_colour_depth: u32,
}

impl ClientTelemetry {
    /// Parse the raw JSON form value.
    pub fn parse(raw: &str) -> FraudHeaderResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| FraudHeaderError::MalformedTelemetry(e.to_string()))?;

        let fields = value.as_object().ok_or_else(|| {
            FraudHeaderError::MalformedTelemetry("expected a JSON object".to_string())
        })?;

        for field in REQUIRED_FIELDS {
            if fields.get(field).map_or(true, Value::is_null) {
                return Err(FraudHeaderError::MissingTelemetryField(field.to_string()));
            }
        }

        serde_json::from_value(value)
            .map_err(|e| FraudHeaderError::MalformedTelemetry(e.to_string()))
    }

    /// `Gov-Client-Timezone` value, if the browser reported an offset.
    pub fn timezone(&self) -> Option<String> {
        self.timezone_offset_minutes.map(format_timezone)
    }

    /// `Gov-Client-Window-Size` value.
    pub fn window_size(&self) -> String {
        format!("width={}&height={}", self.window_width, self.window_height)
    }

    /// `Gov-Client-Screens` value.
    pub fn screens(&self) -> String {
        format!(
            "width={}&height={}&scaling-factor={}&colour-depth={}",
            self.screen_width, self.screen_height, self.screen_scaling_factor, self.screen_colour_depth
        )
    }
}

/// Format a browser timezone offset as `UTC±hh:mm`.
///
/// The sign is `-` for offsets >= 0 and `+` otherwise. `getTimezoneOffset()`
/// is positive west of UTC, so this maps 60 to `UTC-01:00`.
pub fn format_timezone(offset_minutes: i32) -> String {
    let sign = if offset_minutes >= 0 { '-' } else { '+' };
    let minutes = offset_minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "UA": "Mozilla/5.0 (X11; Linux x86_64)",
        "TimezoneOffsetMinutes": -60,
        "WindowWidth": 1256,
        "WindowHeight": 803,
        "ScreenWidth": 1920,
        "ScreenHeight": 1080,
        "ScreenScalingFactor": 1.25,
        "ScreenColorDepth": 24,
        "Plugins": ["pdf"]
    }"#;

    #[test]
    fn test_parse_full_payload() {
        let t = ClientTelemetry::parse(FULL).unwrap();
        assert_eq!(t.user_agent.as_deref(), Some("Mozilla/5.0 (X11; Linux x86_64)"));
        assert_eq!(t.timezone().as_deref(), Some("UTC+01:00"));
        assert_eq!(t.window_size(), "width=1256&height=803");
        assert_eq!(
            t.screens(),
            "width=1920&height=1080&scaling-factor=1.25&colour-depth=24"
        );
    }

    #[test]
    fn test_integer_scaling_factor_kept_as_is() {
        let raw = r#"{"WindowWidth":1,"WindowHeight":2,"ScreenWidth":3,"ScreenHeight":4,"ScreenScalingFactor":1,"ScreenColorDepth":24}"#;
        let t = ClientTelemetry::parse(raw).unwrap();
        assert_eq!(t.screens(), "width=3&height=4&scaling-factor=1&colour-depth=24");
        assert!(t.user_agent.is_none());
        assert!(t.timezone().is_none());
    }

    #[test]
    fn test_timezone_sign_convention() {
        assert_eq!(format_timezone(60), "UTC-01:00");
        assert_eq!(format_timezone(-90), "UTC+01:30");
        assert_eq!(format_timezone(0), "UTC-00:00");
        assert_eq!(format_timezone(-330), "UTC+05:30");
    }

    #[test]
    fn test_missing_field_is_named() {
        let raw = r#"{"WindowHeight":2,"ScreenWidth":3,"ScreenHeight":4,"ScreenScalingFactor":1,"ScreenColorDepth":24}"#;
        match ClientTelemetry::parse(raw) {
            Err(FraudHeaderError::MissingTelemetryField(f)) => assert_eq!(f, "WindowWidth"),
            other => panic!("unexpected result: {:?}", other),
        }

        let raw = r#"{"WindowWidth":1,"WindowHeight":2,"ScreenWidth":3,"ScreenHeight":4,"ScreenScalingFactor":null,"ScreenColorDepth":24}"#;
        assert!(matches!(
            ClientTelemetry::parse(raw),
            Err(FraudHeaderError::MissingTelemetryField(f)) if f == "ScreenScalingFactor"
        ));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            ClientTelemetry::parse("{not json"),
            Err(FraudHeaderError::MalformedTelemetry(_))
        ));
        assert!(matches!(
            ClientTelemetry::parse("[1, 2]"),
            Err(FraudHeaderError::MalformedTelemetry(_))
        ));

        let wrong_type = r#"{"WindowWidth":"wide","WindowHeight":2,"ScreenWidth":3,"ScreenHeight":4,"ScreenScalingFactor":1,"ScreenColorDepth":24}"#;
        assert!(matches!(
            ClientTelemetry::parse(wrong_type),
            Err(FraudHeaderError::MalformedTelemetry(_))
        ));
    }
}
