//! Order to ServiceRequest translation.
//!
//! [`ServiceRequestTranslator`] assembles a [`ServiceRequestData`] from an [`OrderRecord`]:
//! reference fields come from the injected collaborators, status, occurrence, links and
//! performer from the resolvers. Translation is synchronous and holds no mutable state, so a
//! translator can be cloned freely and shared across threads.
//!
//! Missing optional order fields become absent output fields. Collaborator failures abort
//! the translation of that order and are returned unchanged.

use crate::collaborators::{
    ConceptTranslator, EncounterReferenceTranslator, PatientReferenceTranslator,
    PractitionerReferenceTranslator, TaskLookup,
};
use crate::concept::MappedConceptTranslator;
use crate::config::{ClockPolicy, CoreConfig};
use crate::occurrence::OccurrenceResolver;
use crate::order::OrderRecord;
use crate::performer::PerformerResolver;
use crate::references::TypedReferenceTranslator;
use crate::relationship::RelationshipResolver;
use crate::status::StatusResolver;
use crate::CoreResult;
use chrono::{DateTime, Utc};
use fhir::{FhirId, Identifier, ServiceRequestData, ServiceRequestIntent};
use std::sync::Arc;

/// The collaborators a translator delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub task_lookup: Arc<dyn TaskLookup>,
    pub concepts: Arc<dyn ConceptTranslator>,
    pub patients: Arc<dyn PatientReferenceTranslator>,
    pub encounters: Arc<dyn EncounterReferenceTranslator>,
    pub practitioners: Arc<dyn PractitionerReferenceTranslator>,
}

impl Collaborators {
    /// Wires `task_lookup` with the default concept and reference translators.
    pub fn with_defaults(cfg: Arc<CoreConfig>, task_lookup: Arc<dyn TaskLookup>) -> Self {
        Self {
            task_lookup,
            concepts: Arc::new(MappedConceptTranslator::new(cfg)),
            patients: Arc::new(TypedReferenceTranslator),
            encounters: Arc::new(TypedReferenceTranslator),
            practitioners: Arc::new(TypedReferenceTranslator),
        }
    }
}

/// Translates EHR orders into FHIR service requests.
#[derive(Clone)]
pub struct ServiceRequestTranslator {
    cfg: Arc<CoreConfig>,
    collaborators: Collaborators,
}

impl ServiceRequestTranslator {
    pub fn new(cfg: Arc<CoreConfig>, collaborators: Collaborators) -> Self {
        Self { cfg, collaborators }
    }

    /// Translate `order`, capturing "now" at the moment of the call.
    pub fn translate(&self, order: &OrderRecord) -> CoreResult<ServiceRequestData> {
        self.translate_at(order, Utc::now())
    }

    /// Translate `order` with statuses evaluated as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator error encountered; no partial resource is produced.
    pub fn translate_at(
        &self,
        order: &OrderRecord,
        now: DateTime<Utc>,
    ) -> CoreResult<ServiceRequestData> {
        let c = &self.collaborators;

        let code = order
            .concept
            .as_ref()
            .map(|concept| c.concepts.to_codeable_concept(concept))
            .transpose()?;
        let subject = order
            .patient
            .as_ref()
            .map(|patient| c.patients.to_reference(patient))
            .transpose()?;
        let encounter = order
            .encounter
            .as_ref()
            .map(|encounter| c.encounters.to_reference(encounter))
            .transpose()?;
        let requester = order
            .orderer
            .as_ref()
            .map(|orderer| c.practitioners.to_reference(orderer))
            .transpose()?;

        let status = StatusResolver::resolve(order, now);
        let occurrence = OccurrenceResolver::resolve(order);
        let links = RelationshipResolver::resolve(order, c.task_lookup.as_ref())?;
        let performer = PerformerResolver::resolve(order, c.task_lookup.as_ref())?;

        tracing::debug!(order_id = %order.id, status = %status, "translated order");

        Ok(ServiceRequestData {
            id: FhirId::from(order.id),
            identifier: order
                .order_number
                .as_ref()
                .map(|number| Identifier::placer(number.as_str())),
            status,
            intent: ServiceRequestIntent::Order,
            code,
            occurrence,
            subject,
            encounter,
            requester,
            performer,
            based_on: links.based_on,
            replaces: links.replaces,
            last_updated: order.date_changed.or(order.date_created),
        })
    }

    /// Translate a batch of orders, stopping at the first failure.
    ///
    /// Under [`ClockPolicy::PerBatch`] every order is evaluated against one shared instant;
    /// under [`ClockPolicy::PerOrder`] each captures its own.
    pub fn translate_batch(&self, orders: &[OrderRecord]) -> CoreResult<Vec<ServiceRequestData>> {
        match self.cfg.clock_policy() {
            ClockPolicy::PerBatch => self.translate_batch_at(orders, Utc::now()),
            ClockPolicy::PerOrder => orders.iter().map(|order| self.translate(order)).collect(),
        }
    }

    /// Translate a batch of orders against a caller-supplied instant.
    pub fn translate_batch_at(
        &self,
        orders: &[OrderRecord],
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<ServiceRequestData>> {
        orders
            .iter()
            .map(|order| self.translate_at(order, now))
            .collect()
    }
}
