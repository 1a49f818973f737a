//! FHIR store adapter
//!
//! External collaborator boundary: resource-creation requests over REST,
//! per-request success/failure, nothing else.

pub mod client;
pub mod models;

pub use client::{FhirStore, RestFhirClient};
pub use models::CreateResponse;
