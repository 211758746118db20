//! FHIR-aligned ServiceRequest domain carrier, wire model and rendering helpers.
//!
//! This module provides the output side of order translation.
//!
//! Responsibilities:
//! - Define the public domain-level [`ServiceRequestData`] carrier
//! - Define a strict wire model matching the FHIR R4 JSON shape
//! - Render single resources and collection bundles as JSON or YAML
//! - Parse a rendered resource back, enforcing the single-valued links the carrier models
//!
//! Notes:
//! - The carrier models `performer`, `basedOn`, `replaces` and `identifier` as at most one
//!   value; on the wire they are FHIR arrays.
//! - `subject` is optional here even though FHIR requires it: an order without a patient
//!   still translates, the absence is simply carried through.

use crate::constants::SERVICE_REQUEST;
use crate::datatypes::{CodeableConcept, Identifier, Period, Reference};
use crate::{schema_mismatch, FhirError, FhirResult};
use chrono::{DateTime, Utc};
use orderbridge_types::FhirId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// FHIR `request-status` code set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceRequestStatus {
    Draft,
    Active,
    OnHold,
    Revoked,
    Completed,
    EnteredInError,
    Unknown,
}

impl ServiceRequestStatus {
    /// Returns the FHIR code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::OnHold => "on-hold",
            Self::Revoked => "revoked",
            Self::Completed => "completed",
            Self::EnteredInError => "entered-in-error",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a FHIR status code (exact, lowercase).
    pub fn parse(s: &str) -> Result<Self, FhirError> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "on-hold" => Ok(Self::OnHold),
            "revoked" => Ok(Self::Revoked),
            "completed" => Ok(Self::Completed),
            "entered-in-error" => Ok(Self::EnteredInError),
            "unknown" => Ok(Self::Unknown),
            _ => Err(FhirError::InvalidInput(format!(
                "Invalid ServiceRequest status: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for ServiceRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FHIR `request-intent` code set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceRequestIntent {
    Proposal,
    Plan,
    Directive,
    Order,
    OriginalOrder,
    ReflexOrder,
    FillerOrder,
    InstanceOrder,
    #[serde(rename = "option")]
    OptionIntent,
}

/// Domain-level carrier for a translated service request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRequestData {
    /// Logical id, equal to the source order's uuid.
    pub id: FhirId,

    /// Placer identifier carrying the order number.
    pub identifier: Option<Identifier>,

    pub status: ServiceRequestStatus,

    pub intent: ServiceRequestIntent,

    /// Coded concept of what is being requested.
    pub code: Option<CodeableConcept>,

    /// Window in which the request is to be carried out.
    pub occurrence: Period,

    pub subject: Option<Reference>,

    pub encounter: Option<Reference>,

    pub requester: Option<Reference>,

    /// The actor expected to fulfil the request.
    pub performer: Option<Reference>,

    /// The request this one renews.
    pub based_on: Option<Reference>,

    /// The request this one revises or discontinues.
    pub replaces: Option<Reference>,

    pub last_updated: Option<DateTime<Utc>>,
}

// ============================================================================
// Public ServiceRequest operations
// ============================================================================

/// ServiceRequest resource operations.
///
/// This is a zero-sized type used for namespacing ServiceRequest-related operations.
/// All methods are associated functions.
pub struct ServiceRequest;

impl ServiceRequest {
    /// Render a service request as pretty-printed FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if serialisation fails.
    pub fn render_json(data: &ServiceRequestData) -> FhirResult<String> {
        serde_json::to_string_pretty(&domain_to_wire(data)).map_err(|e| {
            FhirError::Translation(format!("Failed to serialize ServiceRequest: {e}"))
        })
    }

    /// Render a service request as YAML using the same field layout as the JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if serialisation fails.
    pub fn render_yaml(data: &ServiceRequestData) -> FhirResult<String> {
        serde_yaml::to_string(&domain_to_wire(data)).map_err(|e| {
            FhirError::Translation(format!("Failed to serialize ServiceRequest: {e}"))
        })
    }

    /// Render many service requests as a FHIR `collection` Bundle in JSON.
    pub fn render_bundle_json(data: &[ServiceRequestData]) -> FhirResult<String> {
        serde_json::to_string_pretty(&BundleWire::collection(data))
            .map_err(|e| FhirError::Translation(format!("Failed to serialize Bundle: {e}")))
    }

    /// Render many service requests as a FHIR `collection` Bundle in YAML.
    pub fn render_bundle_yaml(data: &[ServiceRequestData]) -> FhirResult<String> {
        serde_yaml::to_string(&BundleWire::collection(data))
            .map_err(|e| FhirError::Translation(format!("Failed to serialize Bundle: {e}")))
    }

    /// Parse a service request from FHIR JSON.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g. `performer[0].type`)
    /// to the failing field when the JSON does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the JSON does not match the wire schema or contains unknown keys,
    /// - `resourceType` is not "ServiceRequest",
    /// - more than one `identifier`, `performer`, `basedOn` or `replaces` entry is present.
    pub fn parse_json(json_text: &str) -> FhirResult<ServiceRequestData> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire = serde_path_to_error::deserialize::<_, ServiceRequestWire>(&mut deserializer)
            .map_err(|err| schema_mismatch(SERVICE_REQUEST, err))?;
        wire_to_domain(wire)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of a ServiceRequest, field order following the FHIR R4 resource.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ServiceRequestWire {
    resource_type: String,
    id: FhirId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<MetaWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    based_on: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    replaces: Vec<Reference>,
    status: ServiceRequestStatus,
    intent: ServiceRequestIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encounter: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    occurrence_period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requester: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    performer: Vec<Reference>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct MetaWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleWire {
    resource_type: &'static str,
    #[serde(rename = "type")]
    bundle_type: &'static str,
    total: usize,
    entry: Vec<BundleEntryWire>,
}

#[derive(Serialize)]
struct BundleEntryWire {
    resource: ServiceRequestWire,
}

impl BundleWire {
    fn collection(data: &[ServiceRequestData]) -> Self {
        Self {
            resource_type: "Bundle",
            bundle_type: "collection",
            total: data.len(),
            entry: data
                .iter()
                .map(|d| BundleEntryWire {
                    resource: domain_to_wire(d),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Takes the sole element of a wire array, rejecting more than one.
fn at_most_one<T>(field: &str, mut values: Vec<T>) -> FhirResult<Option<T>> {
    if values.len() > 1 {
        return Err(FhirError::InvalidInput(format!(
            "ServiceRequest.{field} supports at most one entry, got {}",
            values.len()
        )));
    }
    Ok(values.pop())
}

fn wire_to_domain(wire: ServiceRequestWire) -> FhirResult<ServiceRequestData> {
    if wire.resource_type != SERVICE_REQUEST {
        return Err(FhirError::InvalidInput(format!(
            "Expected resourceType '{SERVICE_REQUEST}', got '{}'",
            wire.resource_type
        )));
    }

    Ok(ServiceRequestData {
        id: wire.id,
        identifier: at_most_one("identifier", wire.identifier)?,
        status: wire.status,
        intent: wire.intent,
        code: wire.code,
        occurrence: wire.occurrence_period.unwrap_or_default(),
        subject: wire.subject,
        encounter: wire.encounter,
        requester: wire.requester,
        performer: at_most_one("performer", wire.performer)?,
        based_on: at_most_one("basedOn", wire.based_on)?,
        replaces: at_most_one("replaces", wire.replaces)?,
        last_updated: wire.meta.and_then(|m| m.last_updated),
    })
}

fn domain_to_wire(data: &ServiceRequestData) -> ServiceRequestWire {
    ServiceRequestWire {
        resource_type: SERVICE_REQUEST.to_owned(),
        id: data.id.clone(),
        meta: data.last_updated.map(|last_updated| MetaWire {
            last_updated: Some(last_updated),
        }),
        identifier: data.identifier.iter().cloned().collect(),
        based_on: data.based_on.iter().cloned().collect(),
        replaces: data.replaces.iter().cloned().collect(),
        status: data.status,
        intent: data.intent,
        code: data.code.clone(),
        subject: data.subject.clone(),
        encounter: data.encounter.clone(),
        occurrence_period: (!data.occurrence.is_empty()).then(|| data.occurrence.clone()),
        requester: data.requester.clone(),
        performer: data.performer.iter().cloned().collect(),
    }
}
