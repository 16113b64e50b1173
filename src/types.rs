//! Common types and data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Successful classifier response.
///
/// `blood_group` is the only field the backend guarantees. `name` is the
/// registered subject the fingerprint matched, and `confidences` (some
/// backends spell it `confidence`) maps category codes to scores in [0,1].
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationResult {
    pub blood_group: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "confidence")]
    pub confidences: Option<HashMap<String, f64>>,
}

impl ClassificationResult {
    /// Subject line shown under the detected group.
    pub fn subject_line(&self) -> String {
        match &self.name {
            Some(name) => format!("For: {}", name),
            None => "For: Registered User".to_string(),
        }
    }
}

/// Error payload non-success responses may carry.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Terminal outcome of one submission.
#[derive(Debug, Clone)]
pub enum PredictOutcome {
    Success(ClassificationResult),
    /// The server answered but reported a failure (or an unusable body).
    ServerError(String),
    /// The request never completed.
    Transport(String),
}

/// State shared between the UI thread and the in-flight request task.
#[derive(Default)]
pub struct SubmissionState {
    pub in_flight: bool,
    pub outcome: Option<PredictOutcome>,
}

impl SubmissionState {
    /// Marks a submission as started. Returns false if one is already
    /// running (the disabled Detect button should make this unreachable).
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.outcome = None;
        true
    }

    pub fn finish(&mut self, outcome: PredictOutcome) {
        self.in_flight = false;
        self.outcome = Some(outcome);
    }

    pub fn take_outcome(&mut self) -> Option<PredictOutcome> {
        self.outcome.take()
    }
}

/// Maps an HTTP status + body to a submission outcome.
///
/// Mirrors the backend contract: non-success responses may carry an
/// `error` string; success responses must carry a non-empty `blood_group`.
pub fn interpret_response(status: reqwest::StatusCode, body: &str) -> PredictOutcome {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Server returned {}", status.as_u16()));
        return PredictOutcome::ServerError(message);
    }

    match serde_json::from_str::<ClassificationResult>(body) {
        Ok(result) if !result.blood_group.is_empty() => PredictOutcome::Success(result),
        _ => PredictOutcome::ServerError(
            "Server returned no blood group. Check backend logs.".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn success_with_confidences() {
        let body = r#"{"blood_group":"O+","name":"Alice","confidences":{"O+":0.9,"A+":0.05}}"#;
        match interpret_response(StatusCode::OK, body) {
            PredictOutcome::Success(result) => {
                assert_eq!(result.blood_group, "O+");
                assert_eq!(result.subject_line(), "For: Alice");
                let confidences = result.confidences.unwrap();
                assert_eq!(confidences["O+"], 0.9);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn success_without_name_uses_placeholder() {
        let body = r#"{"blood_group":"AB-"}"#;
        match interpret_response(StatusCode::OK, body) {
            PredictOutcome::Success(result) => {
                assert_eq!(result.subject_line(), "For: Registered User");
                assert!(result.confidences.is_none());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn confidence_singular_alias_accepted() {
        let body = r#"{"blood_group":"B+","confidence":{"B+":0.72}}"#;
        match interpret_response(StatusCode::OK, body) {
            PredictOutcome::Success(result) => {
                assert_eq!(result.confidences.unwrap()["B+"], 0.72);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn server_error_message_passed_through() {
        let body = r#"{"error":"bad image"}"#;
        match interpret_response(StatusCode::NOT_FOUND, body) {
            PredictOutcome::ServerError(msg) => assert_eq!(msg, "bad image"),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn server_error_without_body_reports_status() {
        match interpret_response(StatusCode::INTERNAL_SERVER_ERROR, "") {
            PredictOutcome::ServerError(msg) => assert_eq!(msg, "Server returned 500"),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn success_status_without_label_is_rejected() {
        for body in [r#"{}"#, r#"{"blood_group":""}"#, "not json"] {
            match interpret_response(StatusCode::OK, body) {
                PredictOutcome::ServerError(msg) => {
                    assert!(msg.contains("no blood group"), "body {:?} → {}", body, msg)
                }
                other => panic!("expected server error for {:?}, got {:?}", body, other),
            }
        }
    }

    #[test]
    fn submission_state_round_trip() {
        let mut state = SubmissionState::default();
        assert!(state.begin());
        assert!(state.in_flight);
        // A second begin while in flight is refused.
        assert!(!state.begin());

        state.finish(PredictOutcome::Transport("timeout".into()));
        assert!(!state.in_flight);
        assert!(matches!(
            state.take_outcome(),
            Some(PredictOutcome::Transport(_))
        ));
        assert!(state.take_outcome().is_none());
    }
}
