//! Domain error types
//!
//! This module defines the error hierarchy for Tabula. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Tabula error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tabular source errors (file missing, unreadable, malformed rows)
    #[error("Source error: {0}")]
    Source(String),

    /// Queue-related errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// FHIR store errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Queue-specific errors
///
/// Errors that occur when appending to or draining a queue topic.
/// These errors don't expose the underlying transport types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Failed to open the topic for reading or writing
    #[error("Failed to open topic '{topic}': {message}")]
    OpenFailed { topic: String, message: String },

    /// Failed to append a message to the topic
    #[error("Failed to append message to topic '{topic}': {message}")]
    AppendFailed { topic: String, message: String },

    /// Failed to flush appended messages to durable storage
    #[error("Failed to flush topic '{topic}': {message}")]
    FlushFailed { topic: String, message: String },

    /// Failed to read the next message from the topic
    #[error("Failed to read from topic '{topic}': {message}")]
    ReadFailed { topic: String, message: String },

    /// Failed to commit the consumer group offset
    #[error("Failed to commit offset for topic '{topic}': {message}")]
    CommitFailed { topic: String, message: String },
}

/// FHIR store-specific errors
///
/// Errors that occur when submitting resources to the FHIR server.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FhirError {
    /// Failed to connect to the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// The server rejected a resource creation request
    #[error("{resource_type} creation rejected with status {status}: {body}")]
    ResourceRejected {
        resource_type: &'static str,
        status: u16,
        body: String,
    },

    /// The server response could not be interpreted
    #[error("Invalid response from FHIR server: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TabulaError {
    fn from(err: std::io::Error) -> Self {
        TabulaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TabulaError {
    fn from(err: toml::de::Error) -> Self {
        TabulaError::Configuration(format!("TOML parse error: {err}"))
    }
}
