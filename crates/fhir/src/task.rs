//! FHIR-aligned Task domain carrier and parse helpers.
//!
//! Tasks track the execution of a service request by a fulfilling party (a lab, a
//! radiology department). Order translation only reads them: a task's `basedOn` confirms that
//! a request exists in the task system, and its `owner` names the performer.
//!
//! Responsibilities:
//! - Define the public domain-level [`TaskData`] carrier
//! - Parse task lists from YAML (the format the in-memory task index is seeded from)
//! - Parse a single task from FHIR JSON
//!
//! Notes:
//! - Only the fields translation reads are modelled. `intent` is accepted and ignored so that
//!   well-formed FHIR tasks parse under strict validation.

use crate::constants::TASK;
use crate::datatypes::Reference;
use crate::{schema_mismatch, FhirError, FhirResult};
use orderbridge_types::FhirId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// FHIR `task-status` code set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Draft,
    Requested,
    Received,
    Accepted,
    Rejected,
    Ready,
    Cancelled,
    InProgress,
    OnHold,
    Failed,
    Completed,
    EnteredInError,
}

/// Domain-level carrier for a task record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskData {
    pub id: Option<FhirId>,

    /// Execution status of the task.
    pub status: TaskStatus,

    /// Requests this task fulfils.
    pub based_on: Vec<Reference>,

    /// The party responsible for carrying the task out.
    pub owner: Option<Reference>,
}

impl TaskData {
    /// Returns true if any `basedOn` entry is the literal `reference`.
    pub fn is_based_on(&self, reference: &str) -> bool {
        self.based_on.iter().any(|r| r.points_to(reference))
    }
}

// ============================================================================
// Public Task operations
// ============================================================================

/// Task resource operations.
///
/// This is a zero-sized type used for namespacing task-related operations.
/// All methods are associated functions.
pub struct Task;

impl Task {
    /// Parse a YAML sequence of tasks.
    ///
    /// Each element must be a Task resource. The path reported on schema errors includes the
    /// sequence index (e.g. `[2].owner.reference`).
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the YAML is not a sequence of task mappings,
    /// - any field has an unexpected type or unknown keys are present,
    /// - any element has a `resourceType` other than "Task".
    pub fn parse_list_yaml(yaml_text: &str) -> FhirResult<Vec<TaskData>> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wires = serde_path_to_error::deserialize::<_, Vec<TaskWire>>(deserializer)
            .map_err(|err| schema_mismatch("Task list", err))?;

        wires.into_iter().map(wire_to_domain).collect()
    }

    /// Parse a single task from FHIR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] on schema mismatch or a `resourceType` other than "Task".
    pub fn parse_json(json_text: &str) -> FhirResult<TaskData> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire = serde_path_to_error::deserialize::<_, TaskWire>(&mut deserializer)
            .map_err(|err| schema_mismatch(TASK, err))?;
        wire_to_domain(wire)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct TaskWire {
    resource_type: String,
    #[serde(default)]
    id: Option<FhirId>,
    status: TaskStatus,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    based_on: Vec<Reference>,
    #[serde(default)]
    owner: Option<Reference>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: TaskWire) -> FhirResult<TaskData> {
    if wire.resource_type != TASK {
        return Err(FhirError::InvalidInput(format!(
            "Expected resourceType '{TASK}', got '{}'",
            wire.resource_type
        )));
    }

    Ok(TaskData {
        id: wire.id,
        status: wire.status,
        based_on: wire.based_on,
        owner: wire.owner,
    })
}
