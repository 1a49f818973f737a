//! FHIR resource shapes submitted to the clinical store
//!
//! These are the wire shapes for `POST {base}/Patient` and
//! `POST {base}/Condition`. They are owned by the store beyond construction,
//! so only the elements this pipeline populates are modeled.

use crate::domain::message::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Clinical-status system URL for Condition resources
pub const CONDITION_CLINICAL_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/condition-clinical";

/// Resource metadata carrying the profile reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// StructureDefinition URLs this resource claims conformance to
    pub profile: Vec<String>,
}

/// An official identifier attached to a Patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Identifier use code (always `official` here)
    pub r#use: String,

    /// Identifier system URL
    pub system: String,

    /// Identifier value (the canonical message id)
    pub value: String,
}

/// A human name split into family and given parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    /// Name use code (always `official` here)
    pub r#use: String,

    /// Full display text
    pub text: String,

    /// Family name (last whitespace token of the display name)
    pub family: String,

    /// Given names (all tokens preceding the family name)
    pub given: Vec<String>,
}

/// A single coding within a CodeableConcept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    /// Terminology system URL
    pub system: String,

    /// Code within the system
    pub code: String,

    /// Human-readable display text for the code
    pub display: String,
}

/// A concept expressed as codings plus optional free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    /// Codings for the concept
    pub coding: Vec<Coding>,

    /// Free-text rendering of the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A literal reference to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Relative reference, e.g. `Patient/42`
    pub reference: String,
}

/// Patient resource shape sent to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientResource {
    /// Always `Patient`
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    /// Profile reference metadata
    pub meta: Meta,

    /// Official identifiers
    pub identifier: Vec<Identifier>,

    /// Name structure derived from the display name
    pub name: Vec<HumanName>,

    /// Administrative gender
    pub gender: Gender,

    /// Birth date; omitted only under the `accept` missing-birth-date policy
    #[serde(rename = "birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

/// Condition resource shape sent to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResource {
    /// Always `Condition`
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    /// Clinical status, fixed to `active`
    #[serde(rename = "clinicalStatus")]
    pub clinical_status: CodeableConcept,

    /// Terminology coding plus capitalized label text
    pub code: CodeableConcept,

    /// Reference to the patient this condition belongs to
    pub subject: Reference,
}

impl CodeableConcept {
    /// The fixed `active` clinical status used on every Condition
    pub fn active_clinical_status() -> Self {
        Self {
            coding: vec![Coding {
                system: CONDITION_CLINICAL_SYSTEM.to_string(),
                code: "active".to_string(),
                display: "Active".to_string(),
            }],
            text: None,
        }
    }
}

/// A patient the store has acknowledged, carrying its store-assigned id.
///
/// Condition construction requires a `&CreatedPatient`, so a Condition can
/// only ever reference a patient whose creation already succeeded. This is
/// the two-phase dependency of the pipeline made into a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPatient {
    id: String,
}

impl CreatedPatient {
    /// Wrap a store-assigned patient id
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The store-assigned id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Relative reference to this patient, e.g. `Patient/42`
    pub fn reference(&self) -> Reference {
        Reference {
            reference: format!("Patient/{}", self.id),
        }
    }
}
