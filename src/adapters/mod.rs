//! External integrations
//!
//! Adapters for the three collaborator boundaries: the tabular source file,
//! the queue broker, and the FHIR store.

pub mod fhir;
pub mod queue;
pub mod source;
