use serde_json::Value;

use crate::CommuteError;

#[derive(Debug)]
pub enum CommuteOutcome {
    /// The maps server answered with JSON.
    Matrix(Value),
    /// The maps server answered with text that is not JSON, kept verbatim.
    Passthrough(String),
    Failed(CommuteError),
}

impl CommuteOutcome {
    /// Classifies a raw maps response.
    pub fn from_raw(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Self::Matrix(value),
            Err(_) => Self::Passthrough(raw),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Passthrough(_) => "passthrough",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Text handed downstream: minified JSON, the raw text, or an error line.
    pub fn payload(&self) -> String {
        match self {
            Self::Matrix(value) => value.to_string(),
            Self::Passthrough(raw) => raw.clone(),
            Self::Failed(error) => format!("Error connecting to Maps MCP: {error}"),
        }
    }
}

impl From<CommuteError> for CommuteOutcome {
    fn from(error: CommuteError) -> Self {
        Self::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::CommuteOutcome;
    use crate::CommuteError;

    const PRETTY_MATRIX: &str = r#"{
  "origin_addresses": ["30.2672,-97.7431"],
  "destination_addresses": ["3600 Presidential Blvd, Austin, TX 78719, USA"],
  "results": [
    {
      "elements": [
        {
          "status": "OK",
          "duration": { "text": "14 mins", "value": 840 },
          "distance": { "text": "12.1 km", "value": 12100 }
        }
      ]
    }
  ]
}"#;

    #[test]
    fn json_response_is_minified_without_losing_content() {
        let outcome = CommuteOutcome::from_raw(PRETTY_MATRIX.to_string());
        assert_eq!(outcome.kind(), "matrix");

        let payload = outcome.payload();
        assert!(!payload.contains('\n'));
        assert!(!payload.contains(": "));
        assert!(payload.len() < PRETTY_MATRIX.len());

        let original: Value = serde_json::from_str(PRETTY_MATRIX).expect("fixture is JSON");
        let reparsed: Value = serde_json::from_str(&payload).expect("payload is JSON");
        assert_eq!(original, reparsed);
    }

    #[test]
    fn non_json_response_passes_through_verbatim() {
        let raw = "Distance matrix failed: REQUEST_DENIED\n  (check billing)";
        let outcome = CommuteOutcome::from_raw(raw.to_string());

        assert_eq!(outcome.kind(), "passthrough");
        assert_eq!(outcome.payload(), raw);
        assert!(serde_json::from_str::<Value>(&outcome.payload()).is_err());
    }

    #[test]
    fn failure_payload_describes_the_error() {
        let outcome = CommuteOutcome::from(CommuteError::MissingCredential);

        assert!(outcome.is_failure());
        assert!(outcome.payload().starts_with("Error connecting to Maps MCP: "));
        assert!(outcome.payload().contains("API key"));
    }

    #[test]
    fn minified_payload_keeps_server_key_order() {
        let raw = "{\n  \"status\": \"OK\",\n  \"results\": [],\n  \"origin_addresses\": []\n}";
        let outcome = CommuteOutcome::from_raw(raw.to_string());

        assert_eq!(outcome.payload(), r#"{"status":"OK","results":[],"origin_addresses":[]}"#);
    }

    #[test]
    fn any_json_value_counts_as_matrix() {
        let outcome = CommuteOutcome::from_raw("  [1, 2]  ".to_string());
        assert!(matches!(outcome, CommuteOutcome::Matrix(ref value) if *value == json!([1, 2])));
        assert_eq!(outcome.payload(), "[1,2]");
    }
}
