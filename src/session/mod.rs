//! Session launch: the `/start` wire format and the client-side controller.
//!
//! A session is a conversation created upstream and referenced by the URL
//! that `POST /start` returns. Nothing is stored server-side.
//!
//! # Architecture
//!
//! - [`SessionResponse`]: JSON body of `POST /start`, success or error
//! - [`LaunchView`]: the page state a launch mutates (status, frame, link)
//! - [`SessionLauncher`]: performs one launch against a running server
//!
//! # Example
//!
//! ```rust
//! use coach_launcher::session::{LaunchPhase, LaunchView, SessionResponse};
//!
//! let mut view = LaunchView::default();
//! view.begin();
//! view.settle(Ok(SessionResponse::failed("bad")));
//!
//! assert_eq!(view.status(), "Error: bad");
//! assert_eq!(view.phase(), LaunchPhase::Failed);
//! ```

mod launch;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use launch::{
    ERROR_PREFIX, LaunchError, LaunchPhase, LaunchView, STATUS_CREATING, STATUS_READY,
    STATUS_UNEXPECTED, SessionLauncher,
};

/// Body of a `POST /start` response.
///
/// Any JSON object decodes. A truthy `error` value (not null, `false`, `0`
/// or `""`) marks a failure; everything else is a ready session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl SessionResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(error.into())),
            ..Self::default()
        }
    }

    pub fn ready(
        conversation_id: impl Into<String>,
        conversation_url: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: Some(conversation_id.into()),
            conversation_url: Some(conversation_url.into()),
            status: Some(status.into()),
            error: None,
        }
    }

    /// The error text to show, if the `error` field is truthy.
    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .filter(|value| is_truthy(value))
            .map(display_value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form used when the value is concatenated into the status text.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> SessionResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn error_field_wins_over_url() {
        let parsed = parse(json!({ "error": "bad", "conversation_url": "https://x/y" }));
        assert_eq!(parsed.error_message().as_deref(), Some("bad"));
    }

    #[test]
    fn bare_url_is_ready() {
        let parsed = parse(json!({ "conversation_url": "https://x/y" }));
        assert_eq!(parsed.error_message(), None);
        assert_eq!(parsed.conversation_url.as_deref(), Some("https://x/y"));
    }

    #[test]
    fn falsy_errors_are_ignored() {
        for error in [json!(null), json!(""), json!(false), json!(0)] {
            let parsed = parse(json!({ "error": error, "conversation_url": "u" }));
            assert_eq!(parsed.error_message(), None, "error = {error}");
        }
    }

    #[test]
    fn non_string_errors_are_rendered() {
        assert_eq!(parse(json!({ "error": 42 })).error_message().as_deref(), Some("42"));
        assert_eq!(parse(json!({ "error": true })).error_message().as_deref(), Some("true"));
        assert_eq!(
            parse(json!({ "error": ["a", null, 1] })).error_message().as_deref(),
            Some("a,,1")
        );
        assert_eq!(
            parse(json!({ "error": { "code": 1 } })).error_message().as_deref(),
            Some("[object Object]")
        );
    }

    #[test]
    fn body_without_either_field_decodes() {
        let parsed = parse(json!({ "status": "active" }));
        assert_eq!(parsed.error_message(), None);
        assert_eq!(parsed.conversation_url, None);
        assert_eq!(parse(json!({})), SessionResponse::default());
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(serde_json::from_value::<SessionResponse>(json!("oops")).is_err());
        assert!(serde_json::from_value::<SessionResponse>(json!(null)).is_err());
    }

    #[test]
    fn ready_serializes_all_fields() {
        let value = serde_json::to_value(SessionResponse::ready("c1", "https://x/y", "active"))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "conversation_id": "c1",
                "conversation_url": "https://x/y",
                "status": "active",
            })
        );
    }

    #[test]
    fn failed_serializes_only_error() {
        let value = serde_json::to_value(SessionResponse::failed("bad")).unwrap();
        assert_eq!(value, json!({ "error": "bad" }));
    }
}
