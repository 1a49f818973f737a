//! Core pipeline logic
//!
//! Field normalization, terminology lookup, resource construction and the
//! two pipeline stages (produce and consume).

pub mod build;
pub mod consume;
pub mod normalize;
pub mod produce;
pub mod summary;
pub mod terminology;

pub use build::{build_conditions, build_patient, PatientProfile};
pub use consume::ConsumerPipeline;
pub use normalize::normalize;
pub use produce::ProducerPipeline;
pub use summary::{DrainSummary, MessageOutcome, ProduceSummary, RowOutcome};
pub use terminology::{ConditionEntry, ConditionMap, SNOMED_SYSTEM_URL};
