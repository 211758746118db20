//! FHIR general-purpose datatypes.
//!
//! These are small enough that the domain carrier and the wire shape coincide, so each type
//! derives serde directly with FHIR's camelCase field names. Resources that embed them
//! (`ServiceRequest`, `Task`) still keep a separate wire struct of their own.

use crate::constants::{
    IDENTIFIER_TYPE_SYSTEM, PLACER_IDENTIFIER_CODE, PLACER_IDENTIFIER_DISPLAY,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single code from a code system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: Option<&str>, code: &str, display: Option<&str>) -> Self {
        Self {
            system: system.map(str::to_owned),
            code: Some(code.to_owned()),
            display: display.map(str::to_owned),
        }
    }
}

/// A concept expressed as zero or more codings plus optional plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Returns true if any coding matches `system` and `code`.
    pub fn has_coding(&self, system: Option<&str>, code: &str) -> bool {
        self.coding
            .iter()
            .any(|c| c.system.as_deref() == system && c.code.as_deref() == Some(code))
    }
}

/// A business identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Identifier {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<CodeableConcept>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Identifier {
    /// Builds a placer identifier (v2-0203 `PLAC`) carrying `value`.
    ///
    /// Orders are identified to other systems by their order number, which the placing
    /// system assigns and which stays stable across revisions.
    pub fn placer(value: impl Into<String>) -> Self {
        Self {
            identifier_type: Some(CodeableConcept {
                coding: vec![Coding::new(
                    Some(IDENTIFIER_TYPE_SYSTEM),
                    PLACER_IDENTIFIER_CODE,
                    Some(PLACER_IDENTIFIER_DISPLAY),
                )],
                text: None,
            }),
            system: None,
            value: Some(value.into()),
        }
    }
}

/// A reference from one resource to another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Reference {
    /// Relative literal reference, e.g. `ServiceRequest/4e48...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Target resource type, e.g. `ServiceRequest`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Builds a typed relative reference `{resource_type}/{id}`.
    pub fn to_resource(resource_type: &str, id: impl std::fmt::Display) -> Self {
        Self {
            reference: Some(format!("{resource_type}/{id}")),
            resource_type: Some(resource_type.to_owned()),
            identifier: None,
            display: None,
        }
    }

    /// Attaches a business identifier to this reference.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Returns true if the literal reference equals `reference`.
    pub fn points_to(&self, reference: &str) -> bool {
        self.reference.as_deref() == Some(reference)
    }
}

/// A time range; either bound may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Period {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}
