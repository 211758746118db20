//! Shared fakes for unit tests.

use crate::collaborators::TaskLookup;
use crate::{CoreError, CoreResult};
use fhir::{Reference, TaskData, TaskStatus};
use std::sync::Mutex;

/// Which lookup method was called, and with what reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupCall {
    BasedOn(String),
    OwnerTarget(String),
}

/// Returns the same tasks for every query and records the queries it receives.
#[derive(Default)]
pub struct RecordingLookup {
    tasks: Vec<TaskData>,
    calls: Mutex<Vec<LookupCall>>,
}

impl RecordingLookup {
    pub fn new(tasks: Vec<TaskData>) -> Self {
        Self {
            tasks,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TaskLookup for RecordingLookup {
    fn search_by_based_on(&self, reference: &str) -> CoreResult<Vec<TaskData>> {
        self.calls
            .lock()
            .unwrap()
            .push(LookupCall::BasedOn(reference.to_owned()));
        Ok(self.tasks.clone())
    }

    fn search_by_owner_target(&self, order_reference: &str) -> CoreResult<Vec<TaskData>> {
        self.calls
            .lock()
            .unwrap()
            .push(LookupCall::OwnerTarget(order_reference.to_owned()));
        Ok(self.tasks.clone())
    }
}

/// Fails every query.
pub struct FailingLookup;

impl TaskLookup for FailingLookup {
    fn search_by_based_on(&self, _reference: &str) -> CoreResult<Vec<TaskData>> {
        Err(CoreError::collaborator("task lookup", "index unavailable"))
    }

    fn search_by_owner_target(&self, _order_reference: &str) -> CoreResult<Vec<TaskData>> {
        Err(CoreError::collaborator("task lookup", "index unavailable"))
    }
}

/// A task based on `ServiceRequest/{based_on}` with the given status and no owner.
pub fn based_on_task(status: TaskStatus, based_on: &str) -> TaskData {
    TaskData {
        id: None,
        status,
        based_on: vec![Reference::to_resource("ServiceRequest", based_on)],
        owner: None,
    }
}

/// A requested task based on `ServiceRequest/{based_on}`, owned by `Organization/{org}`.
pub fn owned_task(based_on: &str, org: &str) -> TaskData {
    TaskData {
        owner: Some(Reference::to_resource("Organization", org)),
        ..based_on_task(TaskStatus::Requested, based_on)
    }
}
