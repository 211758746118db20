//! FHIR resource type names and code-system URLs used across translation.

pub const SERVICE_REQUEST: &str = "ServiceRequest";
pub const TASK: &str = "Task";
pub const PATIENT: &str = "Patient";
pub const ENCOUNTER: &str = "Encounter";
pub const PRACTITIONER: &str = "Practitioner";
pub const ORGANIZATION: &str = "Organization";

/// HL7 v2 table 0203 (identifier type).
pub const IDENTIFIER_TYPE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";

/// Placer identifier code from table 0203.
pub const PLACER_IDENTIFIER_CODE: &str = "PLAC";

pub const PLACER_IDENTIFIER_DISPLAY: &str = "Placer Identifier";

pub const LOINC_SYSTEM_URL: &str = "http://loinc.org";
pub const SNOMED_SYSTEM_URL: &str = "http://snomed.info/sct";
pub const CIEL_SYSTEM_URL: &str = "https://openconceptlab.org/orgs/CIEL/sources/CIEL";
