//! # Orderbridge Core
//!
//! Translation of EHR order records into FHIR `ServiceRequest` resources.
//!
//! This crate contains the order model and the translation logic:
//! - Status, occurrence, relationship and performer resolution
//! - [`ServiceRequestTranslator`], which assembles the resource from the resolvers and the
//!   injected collaborators
//! - Default collaborators: an in-memory task index, a mapping-table concept translator and a
//!   typed reference translator
//!
//! **No I/O concerns beyond file loading helpers**: the core never reads the environment or
//! talks to a FHIR server. Callers resolve a [`CoreConfig`] at startup and supply the
//! collaborators.

pub mod collaborators;
pub mod concept;
pub mod config;
pub mod constants;
pub mod error;
pub mod occurrence;
pub mod order;
pub mod performer;
pub mod references;
pub mod relationship;
pub mod status;
pub mod task_index;
pub mod translator;

#[cfg(test)]
mod test_support;

pub use collaborators::{
    ConceptTranslator, EncounterReferenceTranslator, PatientReferenceTranslator,
    PractitionerReferenceTranslator, TaskLookup,
};
pub use concept::MappedConceptTranslator;
pub use config::{ClockPolicy, CoreConfig};
pub use error::{CoreError, CoreResult};
pub use occurrence::OccurrenceResolver;
pub use order::{
    ConceptMapping, ConceptRef, EntityRef, OrderAction, OrderRecord, PreviousOrder, Urgency,
};
pub use performer::PerformerResolver;
pub use references::TypedReferenceTranslator;
pub use relationship::{RelationshipResolver, Relationships};
pub use status::StatusResolver;
pub use task_index::InMemoryTaskIndex;
pub use translator::{Collaborators, ServiceRequestTranslator};
