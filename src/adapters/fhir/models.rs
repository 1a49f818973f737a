//! FHIR server response models

use serde::Deserialize;

/// Minimal shape of a resource-creation response body
///
/// The store returns the full created resource; only the assigned id is
/// needed downstream.
#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    /// Store-assigned resource id
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_response_extracts_id() {
        let response: CreateResponse =
            serde_json::from_str(r#"{"resourceType":"Patient","id":"42","active":true}"#).unwrap();
        assert_eq!(response.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_create_response_tolerates_missing_id() {
        let response: CreateResponse = serde_json::from_str(r#"{"resourceType":"Patient"}"#).unwrap();
        assert!(response.id.is_none());
    }
}
