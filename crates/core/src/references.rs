//! Default reference translator for patients, encounters and practitioners.

use crate::collaborators::{
    EncounterReferenceTranslator, PatientReferenceTranslator, PractitionerReferenceTranslator,
};
use crate::order::EntityRef;
use crate::CoreResult;
use fhir::constants::{ENCOUNTER, PATIENT, PRACTITIONER};
use fhir::Reference;

/// Builds typed relative references (`Patient/{uuid}` and so on), carrying the display
/// name when the EHR supplied one.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypedReferenceTranslator;

impl TypedReferenceTranslator {
    fn typed(resource_type: &str, entity: &EntityRef) -> Reference {
        let reference = Reference::to_resource(resource_type, entity.uuid.hyphenated());
        match &entity.display {
            Some(display) => reference.with_display(display.as_str()),
            None => reference,
        }
    }
}

impl PatientReferenceTranslator for TypedReferenceTranslator {
    fn to_reference(&self, patient: &EntityRef) -> CoreResult<Reference> {
        Ok(Self::typed(PATIENT, patient))
    }
}

impl EncounterReferenceTranslator for TypedReferenceTranslator {
    fn to_reference(&self, encounter: &EntityRef) -> CoreResult<Reference> {
        Ok(Self::typed(ENCOUNTER, encounter))
    }
}

impl PractitionerReferenceTranslator for TypedReferenceTranslator {
    fn to_reference(&self, practitioner: &EntityRef) -> CoreResult<Reference> {
        Ok(Self::typed(PRACTITIONER, practitioner))
    }
}
