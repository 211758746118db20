//! Contracts for the collaborators translation depends on.
//!
//! The core owns none of these concerns: task storage, terminology and reference building are
//! supplied by the caller. Each trait is object-safe and `Send + Sync` so a translator can hold
//! them as `Arc<dyn ...>` and be shared across threads.
//!
//! Errors returned by a collaborator are propagated unchanged as the failure of the whole
//! translation; use [`CoreError::collaborator`](crate::CoreError::collaborator) to build them.

use crate::order::{ConceptRef, EntityRef};
use crate::CoreResult;
use fhir::{CodeableConcept, Reference, TaskData};

/// Read-only view of an external task index.
///
/// Implementations should return a point-in-time snapshot; the core issues at most one query
/// of each kind per order and does not retry.
pub trait TaskLookup: Send + Sync {
    /// Tasks whose `basedOn` contains `reference` (e.g. `ServiceRequest/{uuid}`).
    fn search_by_based_on(&self, reference: &str) -> CoreResult<Vec<TaskData>>;

    /// Tasks carrying out the order identified by `order_reference`.
    fn search_by_owner_target(&self, order_reference: &str) -> CoreResult<Vec<TaskData>>;
}

pub trait ConceptTranslator: Send + Sync {
    fn to_codeable_concept(&self, concept: &ConceptRef) -> CoreResult<CodeableConcept>;
}

pub trait PatientReferenceTranslator: Send + Sync {
    fn to_reference(&self, patient: &EntityRef) -> CoreResult<Reference>;
}

pub trait EncounterReferenceTranslator: Send + Sync {
    fn to_reference(&self, encounter: &EntityRef) -> CoreResult<Reference>;
}

pub trait PractitionerReferenceTranslator: Send + Sync {
    fn to_reference(&self, practitioner: &EntityRef) -> CoreResult<Reference>;
}
