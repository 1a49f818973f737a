//! Domain models and types for Tabula.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Queue payload types** ([`RawRow`], [`CanonicalMessage`], [`Gender`])
//! - **FHIR resource shapes** ([`PatientResource`], [`ConditionResource`])
//! - **The two-phase creation token** ([`CreatedPatient`])
//! - **Error types** ([`TabulaError`], [`QueueError`], [`FhirError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TabulaError>`]:
//!
//! ```rust
//! use tabula::domain::{Result, TabulaError};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = tabula::config::load_config("tabula.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! # The patient-before-conditions invariant
//!
//! A Condition's subject reference must name a patient the store has already
//! acknowledged. [`CreatedPatient`] can only be obtained from a successful
//! patient creation, and condition construction requires a reference to one,
//! so the dependency is enforced by the type system rather than by control
//! flow.

pub mod errors;
pub mod message;
pub mod resources;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FhirError, QueueError, TabulaError};
pub use message::{CanonicalMessage, Gender, RawRow, UNKNOWN_NAME};
pub use resources::{
    CodeableConcept, Coding, ConditionResource, CreatedPatient, HumanName, Identifier, Meta,
    PatientResource, Reference,
};
pub use result::Result;
