//! Default concept translator.
//!
//! Turns an EHR concept into a `CodeableConcept`: the concept's own uuid becomes a system-less
//! coding, and each mapping whose source has a configured coding system becomes a coding in
//! that system. Mappings from unconfigured sources are dropped.

use crate::collaborators::ConceptTranslator;
use crate::config::CoreConfig;
use crate::order::ConceptRef;
use crate::CoreResult;
use fhir::{CodeableConcept, Coding};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct MappedConceptTranslator {
    cfg: Arc<CoreConfig>,
}

impl MappedConceptTranslator {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }
}

impl ConceptTranslator for MappedConceptTranslator {
    fn to_codeable_concept(&self, concept: &ConceptRef) -> CoreResult<CodeableConcept> {
        let display = concept.display.as_deref();
        let uuid = concept.uuid.hyphenated().to_string();

        let mut coding = vec![Coding::new(None, &uuid, display)];
        for mapping in &concept.mappings {
            match self.cfg.system_for_source(&mapping.source) {
                Some(system) => coding.push(Coding::new(Some(system), &mapping.code, None)),
                None => tracing::debug!(
                    concept = %uuid,
                    source = %mapping.source,
                    "no coding system configured for concept source"
                ),
            }
        }

        Ok(CodeableConcept {
            coding,
            text: display.map(str::to_owned),
        })
    }
}
