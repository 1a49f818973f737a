//! FHIR REST client
//!
//! The store is an opaque resource-creation endpoint: `POST {base}/Patient`
//! and `POST {base}/Condition`, where HTTP 200/201 is success and anything
//! else is a typed failure. No reads, no updates, no retries.

use crate::adapters::fhir::models::CreateResponse;
use crate::config::FhirConfig;
use crate::domain::{
    ConditionResource, CreatedPatient, FhirError, PatientResource, Result,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Store client seam
///
/// The consumer pipeline talks to the store exclusively through this trait,
/// so tests can substitute a recording double for the HTTP client.
#[async_trait]
pub trait FhirStore: Send + Sync {
    /// Submit a patient for creation
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server rejects the
    /// resource, or the response carries no assigned id.
    async fn create_patient(&self, patient: &PatientResource) -> Result<CreatedPatient>;

    /// Submit a condition for creation
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the
    /// resource.
    async fn create_condition(&self, condition: &ConditionResource) -> Result<()>;
}

/// REST implementation of [`FhirStore`]
pub struct RestFhirClient {
    base_url: String,
    client: Client,
    auth_header: Option<String>,
}

impl RestFhirClient {
    /// Create a new client from configuration
    ///
    /// Basic-auth credentials are optional; the reference deployment allows
    /// anonymous access.
    pub fn new(config: &FhirConfig) -> Self {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().expect("Failed to build HTTP client");

        let auth_header = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let credentials = format!("{username}:{}", password.expose_secret());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            _ => None,
        };

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            auth_header,
        }
    }

    /// Base URL of the FHIR server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_header {
            Some(auth) => request.header("Authorization", auth),
            None => request,
        }
    }

    fn map_send_error(e: reqwest::Error) -> FhirError {
        if e.is_timeout() {
            FhirError::Timeout(e.to_string())
        } else {
            FhirError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl FhirStore for RestFhirClient {
    async fn create_patient(&self, patient: &PatientResource) -> Result<CreatedPatient> {
        let url = format!("{}/Patient", self.base_url);

        let response = self
            .with_auth(self.client.post(&url).json(patient))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body: CreateResponse = response
                    .json()
                    .await
                    .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;

                let id = body.id.ok_or_else(|| {
                    FhirError::InvalidResponse(
                        "Patient creation response carried no resource id".to_string(),
                    )
                })?;

                tracing::debug!(patient_id = %id, "Patient created");
                Ok(CreatedPatient::new(id))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(FhirError::ResourceRejected {
                    resource_type: "Patient",
                    status: status.as_u16(),
                    body,
                }
                .into())
            }
        }
    }

    async fn create_condition(&self, condition: &ConditionResource) -> Result<()> {
        let url = format!("{}/Condition", self.base_url);

        let response = self
            .with_auth(self.client.post(&url).json(condition))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                tracing::debug!(
                    subject = %condition.subject.reference,
                    code = %condition.code.coding[0].code,
                    "Condition created"
                );
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(FhirError::ResourceRejected {
                    resource_type: "Condition",
                    status: status.as_u16(),
                    body,
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::core::build::{build_conditions, build_patient, PatientProfile};
    use crate::core::terminology::ConditionMap;
    use crate::domain::{CanonicalMessage, Gender, TabulaError};
    use chrono::NaiveDate;

    fn config(base_url: &str) -> FhirConfig {
        FhirConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    fn patient() -> PatientResource {
        let message = CanonicalMessage {
            id: "12345678900".to_string(),
            name: "Maria Silva".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 5),
            observation: Some("Gestante".to_string()),
        };
        let profile = PatientProfile {
            profile_url: "https://example.org/StructureDefinition/p".to_string(),
            identifier_system: "https://example.org/ids".to_string(),
        };
        build_patient(&message, &profile)
    }

    #[tokio::test]
    async fn test_create_patient_returns_assigned_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/Patient")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "resourceType": "Patient",
                "gender": "female",
                "birthDate": "1990-03-05",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"resourceType":"Patient","id":"42"}"#)
            .create_async()
            .await;

        let client = RestFhirClient::new(&config(&server.url()));
        let created = client.create_patient(&patient()).await.unwrap();

        assert_eq!(created.id(), "42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_patient_rejection_is_typed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/Patient")
            .with_status(422)
            .with_body("validation failed")
            .create_async()
            .await;

        let client = RestFhirClient::new(&config(&server.url()));
        let err = client.create_patient(&patient()).await.unwrap_err();

        match err {
            TabulaError::Fhir(FhirError::ResourceRejected {
                resource_type,
                status,
                body,
            }) => {
                assert_eq!(resource_type, "Patient");
                assert_eq!(status, 422);
                assert_eq!(body, "validation failed");
            }
            other => panic!("Expected ResourceRejected, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_patient_without_id_in_response_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/Patient")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"resourceType":"Patient"}"#)
            .create_async()
            .await;

        let client = RestFhirClient::new(&config(&server.url()));
        let err = client.create_patient(&patient()).await.unwrap_err();

        assert!(matches!(
            err,
            TabulaError::Fhir(FhirError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_create_condition_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/Condition")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "resourceType": "Condition",
                "subject": {"reference": "Patient/42"},
            })))
            .with_status(201)
            .create_async()
            .await;

        let message = CanonicalMessage {
            id: "1".to_string(),
            name: "Maria Silva".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 5),
            observation: Some("Gestante".to_string()),
        };
        let conditions = build_conditions(
            &message,
            &CreatedPatient::new("42"),
            &ConditionMap::standard(),
        );

        let client = RestFhirClient::new(&config(&server.url()));
        client.create_condition(&conditions[0]).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_basic_auth_header_from_credentials() {
        let config = FhirConfig {
            base_url: "http://localhost:8080/fhir".to_string(),
            username: Some("importer".to_string()),
            password: Some(secret_string("s3cret".to_string())),
            ..Default::default()
        };

        let client = RestFhirClient::new(&config);
        let expected = general_purpose::STANDARD.encode(b"importer:s3cret");
        assert_eq!(client.auth_header, Some(format!("Basic {expected}")));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RestFhirClient::new(&config("http://localhost:8080/fhir/"));
        assert_eq!(client.base_url(), "http://localhost:8080/fhir");
    }
}
