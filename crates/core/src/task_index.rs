//! In-memory task index.
//!
//! A [`TaskLookup`] over a fixed set of tasks, for batch translation from files and for
//! callers that already hold a task snapshot. The index is immutable once built, so it can be
//! shared across threads without locking.

use crate::collaborators::TaskLookup;
use crate::{CoreError, CoreResult};
use fhir::{Task, TaskData};
use std::collections::HashMap;
use std::path::Path;

/// Immutable index of tasks keyed by their `basedOn` references.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTaskIndex {
    tasks: Vec<TaskData>,
    by_based_on: HashMap<String, Vec<usize>>,
}

impl InMemoryTaskIndex {
    pub fn new(tasks: Vec<TaskData>) -> Self {
        let mut by_based_on: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, task) in tasks.iter().enumerate() {
            for reference in task.based_on.iter().filter_map(|r| r.reference.as_deref()) {
                let slots = by_based_on.entry(reference.to_owned()).or_default();
                // A task listing the same request twice is indexed once.
                if slots.last() != Some(&idx) {
                    slots.push(idx);
                }
            }
        }

        Self { tasks, by_based_on }
    }

    /// Build an index from a YAML task list file (see [`Task::parse_list_yaml`]).
    pub fn from_yaml_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
        let tasks = Task::parse_list_yaml(&text)?;
        tracing::debug!(count = tasks.len(), path = %path.display(), "loaded task index");
        Ok(Self::new(tasks))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn tasks_based_on(&self, reference: &str) -> Vec<TaskData> {
        self.by_based_on
            .get(reference)
            .map(|slots| slots.iter().map(|&idx| self.tasks[idx].clone()).collect())
            .unwrap_or_default()
    }
}

impl TaskLookup for InMemoryTaskIndex {
    fn search_by_based_on(&self, reference: &str) -> CoreResult<Vec<TaskData>> {
        Ok(self.tasks_based_on(reference))
    }

    /// A task targets the order it is based on, so this is the same `basedOn` lookup keyed by
    /// the current order.
    fn search_by_owner_target(&self, order_reference: &str) -> CoreResult<Vec<TaskData>> {
        Ok(self.tasks_based_on(order_reference))
    }
}
