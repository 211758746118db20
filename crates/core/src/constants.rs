//! Constants used throughout the orderbridge core crate.
//!
//! Environment variable names are only read by the binary; they live here so the names and
//! their defaults are documented next to each other.

use fhir::constants::{CIEL_SYSTEM_URL, LOINC_SYSTEM_URL, SNOMED_SYSTEM_URL};

/// Environment variable holding `SOURCE=URL` pairs for concept mapping sources.
pub const CONCEPT_SYSTEMS_ENV: &str = "ORDERBRIDGE_CONCEPT_SYSTEMS";

/// Environment variable selecting the clock policy (`per-order` or `per-batch`).
pub const CLOCK_POLICY_ENV: &str = "ORDERBRIDGE_CLOCK";

/// Concept mapping sources known out of the box, and the coding systems they map to.
pub const DEFAULT_CONCEPT_SYSTEMS: &[(&str, &str)] = &[
    ("LOINC", LOINC_SYSTEM_URL),
    ("SNOMED CT", SNOMED_SYSTEM_URL),
    ("CIEL", CIEL_SYSTEM_URL),
];
