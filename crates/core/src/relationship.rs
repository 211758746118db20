//! `replaces` / `basedOn` links between service requests.
//!
//! An order that revises, discontinues or renews another one points back at it through
//! `previous_order`. The link is only emitted when the task index knows the previous request:
//! at least one task must be based on it. Task status is not consulted.
//!
//! - `DISCONTINUE`, `REVISE`: `replaces`
//! - `RENEW`: `basedOn`
//! - `NEW`: none

use crate::collaborators::TaskLookup;
use crate::order::{OrderAction, OrderRecord, PreviousOrder};
use crate::CoreResult;
use fhir::constants::SERVICE_REQUEST;
use fhir::{Identifier, Reference};

/// Links resolved for one order. At most one of the two is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    pub replaces: Option<Reference>,
    pub based_on: Option<Reference>,
}

/// Resolves the request an order replaces or is based on.
pub struct RelationshipResolver;

impl RelationshipResolver {
    /// Resolve the links of `order`, consulting `lookup` for the previous order's tasks.
    ///
    /// An order without `previous_order` yields no links and performs no lookup, even when its
    /// action implies a predecessor.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `lookup`.
    pub fn resolve(order: &OrderRecord, lookup: &dyn TaskLookup) -> CoreResult<Relationships> {
        let Some(previous) = order.previous_order.as_ref() else {
            if order.action.expects_previous_order() {
                tracing::warn!(
                    order_id = %order.id,
                    action = ?order.action,
                    "order has no previous order; no relationship link emitted"
                );
            }
            return Ok(Relationships::default());
        };

        let previous_reference = previous.reference();
        let tasks = lookup.search_by_based_on(&previous_reference)?;
        if tasks.is_empty() {
            tracing::debug!(
                order_id = %order.id,
                previous = %previous_reference,
                "no task based on previous order; no relationship link emitted"
            );
            return Ok(Relationships::default());
        }

        let relationships = match order.action {
            OrderAction::Discontinue | OrderAction::Revise => Relationships {
                replaces: Some(link_to(previous)),
                based_on: None,
            },
            OrderAction::Renew => Relationships {
                replaces: None,
                based_on: Some(link_to(previous)),
            },
            OrderAction::New => Relationships::default(),
        };
        Ok(relationships)
    }
}

/// Reference to the previous request, identified by its order number.
///
/// Built from the previous order itself, never from the task that confirmed it.
fn link_to(previous: &PreviousOrder) -> Reference {
    Reference::to_resource(SERVICE_REQUEST, previous.id.hyphenated())
        .with_identifier(Identifier::placer(previous.order_number.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        based_on_task, owned_task, FailingLookup, LookupCall, RecordingLookup,
    };
    use crate::task_index::InMemoryTaskIndex;
    use crate::CoreError;
    use fhir::TaskStatus;
    use uuid::Uuid;

    const SERVICE_REQUEST_UUID: &str = "4e4851c3-c265-400e-acc9-1f1b0ac7f9c4";
    const DISCONTINUED_ORDER_UUID: &str = "efca4077-493c-496b-8312-856ee5d1cc27";
    const PRIOR_REFERENCE: &str = "ServiceRequest/4e4851c3-c265-400e-acc9-1f1b0ac7f9c4";

    fn follow_up(action: OrderAction) -> OrderRecord {
        let prior = OrderRecord::new(Uuid::parse_str(SERVICE_REQUEST_UUID).unwrap())
            .with_order_number("ORD-1")
            .unwrap();
        let mut order = OrderRecord::new(Uuid::parse_str(DISCONTINUED_ORDER_UUID).unwrap())
            .with_order_number("ORD-2")
            .unwrap();
        order.action = action;
        order.previous_order = prior.as_previous();
        order
    }

    fn assert_link(link: Option<&Reference>) {
        let link = link.expect("link should be set");
        assert_eq!(link.reference.as_deref(), Some(PRIOR_REFERENCE));
        assert_eq!(link.resource_type.as_deref(), Some("ServiceRequest"));
        let identifier = link.identifier.as_ref().expect("identifier should be set");
        assert_eq!(identifier.value.as_deref(), Some("ORD-1"));
    }

    #[test]
    fn discontinued_order_replaces_previous() {
        let lookup = RecordingLookup::new(vec![based_on_task(
            TaskStatus::Rejected,
            SERVICE_REQUEST_UUID,
        )]);
        let links = RelationshipResolver::resolve(&follow_up(OrderAction::Discontinue), &lookup)
            .expect("resolve");

        assert_link(links.replaces.as_ref());
        assert!(links.based_on.is_none());
        assert_eq!(
            lookup.calls(),
            vec![LookupCall::BasedOn(PRIOR_REFERENCE.to_owned())]
        );
    }

    #[test]
    fn revised_order_replaces_previous() {
        let lookup = RecordingLookup::new(vec![based_on_task(
            TaskStatus::Accepted,
            SERVICE_REQUEST_UUID,
        )]);
        let links =
            RelationshipResolver::resolve(&follow_up(OrderAction::Revise), &lookup).expect("resolve");

        assert_link(links.replaces.as_ref());
        assert!(links.based_on.is_none());
    }

    #[test]
    fn renewed_order_is_based_on_previous() {
        let lookup = RecordingLookup::new(vec![based_on_task(
            TaskStatus::Accepted,
            SERVICE_REQUEST_UUID,
        )]);
        let links =
            RelationshipResolver::resolve(&follow_up(OrderAction::Renew), &lookup).expect("resolve");

        assert_link(links.based_on.as_ref());
        assert!(links.replaces.is_none());
    }

    #[test]
    fn new_order_has_no_links() {
        let lookup = RecordingLookup::new(vec![based_on_task(
            TaskStatus::Accepted,
            SERVICE_REQUEST_UUID,
        )]);
        let links =
            RelationshipResolver::resolve(&follow_up(OrderAction::New), &lookup).expect("resolve");
        assert_eq!(links, Relationships::default());
    }

    #[test]
    fn task_status_does_not_matter() {
        for status in [
            TaskStatus::Rejected,
            TaskStatus::Cancelled,
            TaskStatus::Completed,
            TaskStatus::Draft,
        ] {
            let lookup = RecordingLookup::new(vec![based_on_task(status, SERVICE_REQUEST_UUID)]);
            let links = RelationshipResolver::resolve(&follow_up(OrderAction::Revise), &lookup)
                .expect("resolve");
            assert_link(links.replaces.as_ref());
        }
    }

    #[test]
    fn link_comes_from_previous_order_not_task() {
        // The task's basedOn is unrelated; the link is still built from previous_order.
        let lookup = RecordingLookup::new(vec![owned_task("some-other-request", "org-1")]);
        let links = RelationshipResolver::resolve(&follow_up(OrderAction::Discontinue), &lookup)
            .expect("resolve");
        assert_link(links.replaces.as_ref());
    }

    #[test]
    fn no_matching_task_gives_no_links() {
        let index = InMemoryTaskIndex::new(vec![based_on_task(
            TaskStatus::Accepted,
            "someone-else",
        )]);
        for action in [
            OrderAction::Discontinue,
            OrderAction::Revise,
            OrderAction::Renew,
        ] {
            let links = RelationshipResolver::resolve(&follow_up(action), &index).expect("resolve");
            assert_eq!(links, Relationships::default());
        }
    }

    #[test]
    fn missing_previous_order_skips_lookup() {
        let lookup = RecordingLookup::new(vec![based_on_task(
            TaskStatus::Accepted,
            SERVICE_REQUEST_UUID,
        )]);
        let mut order = follow_up(OrderAction::Discontinue);
        order.previous_order = None;

        let links = RelationshipResolver::resolve(&order, &lookup).expect("resolve");
        assert_eq!(links, Relationships::default());
        assert!(lookup.calls().is_empty());
    }

    #[test]
    fn lookup_failure_propagates() {
        let err = RelationshipResolver::resolve(&follow_up(OrderAction::Renew), &FailingLookup)
            .expect_err("lookup failure");
        assert!(matches!(err, CoreError::Collaborator { .. }));
    }
}
