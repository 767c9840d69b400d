//! Normalized transport outcome delivered for every dispatched request.
//!
//! # Design
//! One sum type, one variant per observable result. There are no partial or
//! streaming states: a dispatched request resolves to exactly one of these.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::{SyncError, SyncResult};

/// Status string as reported to the data-model layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// HTTP 200.
    Ok,
    /// Any other successful HTTP status.
    Code(u16),
    Offline,
    Error,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Ok => f.write_str("ok"),
            OutcomeStatus::Code(code) => write!(f, "{code}"),
            OutcomeStatus::Offline => f.write_str("offline"),
            OutcomeStatus::Error => f.write_str("error"),
        }
    }
}

/// Result of one request, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// The server answered with a non-error status.
    Loaded {
        code: u16,
        response_text: Option<String>,
        response_data: Option<Vec<u8>>,
    },

    /// Connectivity precheck failed; nothing was sent.
    Offline,

    /// Network failure, timeout, or an error HTTP status.
    Failed {
        code: Option<u16>,
        data: String,
        response_text: Option<String>,
    },
}

impl TransportOutcome {
    pub fn success(&self) -> bool {
        matches!(self, TransportOutcome::Loaded { .. })
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            TransportOutcome::Loaded { code: 200, .. } => OutcomeStatus::Ok,
            TransportOutcome::Loaded { code, .. } => OutcomeStatus::Code(*code),
            TransportOutcome::Offline => OutcomeStatus::Offline,
            TransportOutcome::Failed { .. } => OutcomeStatus::Error,
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            TransportOutcome::Loaded { code, .. } => Some(*code),
            TransportOutcome::Offline => None,
            TransportOutcome::Failed { code, .. } => *code,
        }
    }

    pub fn response_text(&self) -> Option<&str> {
        match self {
            TransportOutcome::Loaded { response_text, .. } | TransportOutcome::Failed { response_text, .. } => {
                response_text.as_deref()
            }
            TransportOutcome::Offline => None,
        }
    }

    pub fn response_data(&self) -> Option<&[u8]> {
        match self {
            TransportOutcome::Loaded { response_data, .. } => response_data.as_deref(),
            _ => None,
        }
    }

    /// Error detail, only present on `Failed`.
    pub fn error_detail(&self) -> Option<&str> {
        match self {
            TransportOutcome::Failed { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Decode the response text as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SyncResult<T> {
        let text = self.response_text().ok_or(SyncError::EmptyResponse)?;
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(code: u16, body: &str) -> TransportOutcome {
        TransportOutcome::Loaded {
            code,
            response_text: Some(body.to_string()),
            response_data: Some(body.as_bytes().to_vec()),
        }
    }

    #[test]
    fn status_200_is_ok() {
        let outcome = loaded(200, "{}");
        assert!(outcome.success());
        assert_eq!(outcome.status(), OutcomeStatus::Ok);
        assert_eq!(outcome.status().to_string(), "ok");
        assert_eq!(outcome.code(), Some(200));
    }

    #[test]
    fn other_success_status_reports_code() {
        let outcome = loaded(201, "{}");
        assert_eq!(outcome.status(), OutcomeStatus::Code(201));
        assert_eq!(outcome.status().to_string(), "201");
    }

    #[test]
    fn offline_has_no_payload() {
        let outcome = TransportOutcome::Offline;
        assert!(!outcome.success());
        assert_eq!(outcome.status().to_string(), "offline");
        assert!(outcome.response_text().is_none());
        assert!(outcome.code().is_none());
        assert!(outcome.error_detail().is_none());
    }

    #[test]
    fn failed_carries_code_and_detail() {
        let outcome = TransportOutcome::Failed {
            code: Some(500),
            data: "HTTP 500".to_string(),
            response_text: Some("boom".to_string()),
        };
        assert!(!outcome.success());
        assert_eq!(outcome.status().to_string(), "error");
        assert_eq!(outcome.code(), Some(500));
        assert_eq!(outcome.error_detail(), Some("HTTP 500"));
        assert_eq!(outcome.response_text(), Some("boom"));
        assert!(outcome.response_data().is_none());
    }

    #[test]
    fn json_decodes_response_text() {
        let outcome = loaded(200, r#"{"id":"1","name":"a"}"#);
        let value: serde_json::Value = outcome.json().unwrap();
        assert_eq!(value["name"], "a");
    }

    #[test]
    fn json_without_text_is_empty_response() {
        let err = TransportOutcome::Offline.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, SyncError::EmptyResponse));

        let err = loaded(200, "not json").json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, SyncError::Deserialization(_)));
    }
}
