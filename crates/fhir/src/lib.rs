//! FHIR wire/boundary support for order translation.
//!
//! This crate provides **domain carriers** and **strict wire models** for the FHIR resources
//! that order translation produces or consumes:
//! - `ServiceRequest` (output of translation)
//! - `Task` (execution tasks supplied by an external task index)
//!
//! This crate focuses on:
//! - FHIR semantic alignment (R4 field names and code sets)
//! - serialisation/deserialisation to FHIR-shaped JSON and YAML
//! - translation between domain carriers and wire structs
//!
//! It holds no decision logic: statuses, occurrence windows and links are computed by
//! `orderbridge-core` and handed here fully formed.

pub mod constants;
pub mod datatypes;
pub mod service_request;
pub mod task;

// Re-export facades
pub use service_request::ServiceRequest;
pub use task::Task;

// Re-export public domain-level types
pub use datatypes::{CodeableConcept, Coding, Identifier, Period, Reference};
pub use service_request::{ServiceRequestData, ServiceRequestIntent, ServiceRequestStatus};
pub use task::{TaskData, TaskStatus};

pub use orderbridge_types::{FhirId, NonEmptyText};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;

/// Formats a `serde_path_to_error` failure as a [`FhirError::Translation`].
///
/// `what` names the document being parsed (e.g. "ServiceRequest").
pub(crate) fn schema_mismatch<E: std::fmt::Display>(
    what: &str,
    err: serde_path_to_error::Error<E>,
) -> FhirError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() {
        "<root>"
    } else {
        path.as_str()
    };
    FhirError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
