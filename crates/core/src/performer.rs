//! Performer of an order, taken from the owner of a task carrying it out.

use crate::collaborators::TaskLookup;
use crate::order::OrderRecord;
use crate::CoreResult;
use fhir::Reference;

pub struct PerformerResolver;

impl PerformerResolver {
    /// Resolve the performer of `order` from the tasks targeting it.
    ///
    /// Returns the owner of the first task that has one. Further owners are not aggregated.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `lookup`.
    pub fn resolve(order: &OrderRecord, lookup: &dyn TaskLookup) -> CoreResult<Option<Reference>> {
        let tasks = lookup.search_by_owner_target(&order.reference())?;
        Ok(tasks.into_iter().find_map(|task| task.owner))
    }
}
