//! Resource builder - canonical messages to FHIR resources
//!
//! Converts a canonical message into a [`PatientResource`] and, from its
//! free-text observation field, zero or more [`ConditionResource`]s via the
//! fixed terminology mapping. Condition construction requires the
//! [`CreatedPatient`] returned by a successful patient creation, so the
//! patient-before-conditions dependency is enforced at the type level.

use crate::core::terminology::{ConditionMap, SNOMED_SYSTEM_URL};
use crate::domain::{
    CanonicalMessage, CodeableConcept, Coding, ConditionResource, CreatedPatient, HumanName,
    Identifier, Meta, PatientResource,
};

/// Delimiter between condition labels in the observation field
const OBSERVATION_DELIMITER: char = '|';

/// Fixed URLs stamped onto every patient resource
#[derive(Debug, Clone)]
pub struct PatientProfile {
    /// StructureDefinition URL the patient claims conformance to
    pub profile_url: String,

    /// System URL for the official identifier
    pub identifier_system: String,
}

/// Split a display name into family and given parts
///
/// Tokenizes on whitespace: with more than one token the last token is the
/// family name and all preceding tokens are given names; with a single token
/// that token is the family name with an empty given list.
pub fn split_name(full_name: &str) -> (String, Vec<String>) {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();

    match tokens.as_slice() {
        [] => (full_name.to_string(), Vec::new()),
        [only] => ((*only).to_string(), Vec::new()),
        [given @ .., family] => (
            (*family).to_string(),
            given.iter().map(|t| (*t).to_string()).collect(),
        ),
    }
}

/// Build a patient resource from a canonical message
pub fn build_patient(message: &CanonicalMessage, profile: &PatientProfile) -> PatientResource {
    let (family, given) = split_name(&message.name);

    PatientResource {
        resource_type: "Patient".to_string(),
        meta: Meta {
            profile: vec![profile.profile_url.clone()],
        },
        identifier: vec![Identifier {
            r#use: "official".to_string(),
            system: profile.identifier_system.clone(),
            value: message.id.clone(),
        }],
        name: vec![HumanName {
            r#use: "official".to_string(),
            text: message.name.clone(),
            family,
            given,
        }],
        gender: message.gender,
        birth_date: message.birth_date,
    }
}

/// Build condition resources from a message's observation field
///
/// Splits the observation on `|`, trims and lower-cases each segment and
/// looks it up in the terminology map. Unmatched segments are silently
/// skipped. Every resulting condition carries a fixed `active` clinical
/// status and a subject reference to the created patient.
pub fn build_conditions(
    message: &CanonicalMessage,
    patient: &CreatedPatient,
    conditions: &ConditionMap,
) -> Vec<ConditionResource> {
    let Some(observation) = message.observation.as_deref() else {
        return Vec::new();
    };

    observation
        .split(OBSERVATION_DELIMITER)
        .filter_map(|segment| {
            let label = segment.trim().to_lowercase();
            let entry = conditions.lookup(&label)?;

            Some(ConditionResource {
                resource_type: "Condition".to_string(),
                clinical_status: CodeableConcept::active_clinical_status(),
                code: CodeableConcept {
                    coding: vec![Coding {
                        system: SNOMED_SYSTEM_URL.to_string(),
                        code: entry.code.clone(),
                        display: entry.display.clone(),
                    }],
                    text: Some(capitalize(&label)),
                },
                subject: patient.reference(),
            })
        })
        .collect()
}

/// Upper-case the first character, lower-case the rest
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
