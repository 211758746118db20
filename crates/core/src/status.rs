//! Administrative status of an order.
//!
//! The status is derived from the order's stop point (the explicit stop date, falling back to
//! the auto-expire date) compared against a single instant `now`. Discontinuing orders are
//! then overridden: they report `revoked` when the stop cut the order short, and `unknown`
//! when the order had already expired naturally, because then the data cannot tell whether
//! the stop or the expiry ended it.

use crate::order::{OrderAction, OrderRecord};
use chrono::{DateTime, Utc};
use fhir::ServiceRequestStatus;

/// Maps an order's lifecycle dates and action to a [`ServiceRequestStatus`].
pub struct StatusResolver;

impl StatusResolver {
    /// Resolve the status of `order` as of `now`.
    ///
    /// Only `active`, `completed`, `revoked` and `unknown` are ever produced. Callers must
    /// capture `now` once per translation (or once per batch) and pass the same value to
    /// every check.
    pub fn resolve(order: &OrderRecord, now: DateTime<Utc>) -> ServiceRequestStatus {
        let base = Self::base_status(order, now);

        if order.action != OrderAction::Discontinue {
            return base;
        }

        let status = match order.auto_expire_date {
            Some(expiry) if expiry <= now => ServiceRequestStatus::Unknown,
            _ => ServiceRequestStatus::Revoked,
        };
        tracing::debug!(
            order_id = %order.id,
            base = %base,
            status = %status,
            "discontinue order status overridden"
        );
        status
    }

    /// Status from the stop point alone, ignoring the action.
    fn base_status(order: &OrderRecord, now: DateTime<Utc>) -> ServiceRequestStatus {
        match order.date_stopped.or(order.auto_expire_date) {
            Some(stop_point) if stop_point <= now => ServiceRequestStatus::Completed,
            _ => ServiceRequestStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        date(2026, 10, 18)
    }

    fn order(
        action: OrderAction,
        activated: Option<DateTime<Utc>>,
        expires: Option<DateTime<Utc>>,
        stopped: Option<DateTime<Utc>>,
    ) -> OrderRecord {
        let mut order = OrderRecord::new(Uuid::new_v4());
        order.action = action;
        order.date_activated = activated;
        order.auto_expire_date = expires;
        order.date_stopped = stopped;
        order
    }

    #[test]
    fn no_dates_is_active() {
        let order = order(OrderAction::New, None, None, None);
        assert_eq!(StatusResolver::resolve(&order, now()), ServiceRequestStatus::Active);
    }

    #[test]
    fn only_activation_date_is_active() {
        let order = order(OrderAction::New, Some(date(2000, 4, 16)), None, None);
        assert_eq!(StatusResolver::resolve(&order, now()), ServiceRequestStatus::Active);
    }

    #[test]
    fn past_stop_with_future_expiry_is_completed() {
        let order = order(
            OrderAction::New,
            Some(date(2000, 4, 16)),
            Some(date(2070, 4, 16)),
            Some(date(2010, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Completed
        );
    }

    #[test]
    fn future_stop_is_active() {
        let order = order(
            OrderAction::New,
            Some(date(2000, 4, 16)),
            Some(date(2070, 4, 16)),
            Some(date(2069, 4, 16)),
        );
        assert_eq!(StatusResolver::resolve(&order, now()), ServiceRequestStatus::Active);
    }

    #[test]
    fn stop_and_expiry_both_past_is_completed() {
        let order = order(
            OrderAction::New,
            Some(date(2000, 4, 16)),
            Some(date(2011, 4, 16)),
            Some(date(2010, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Completed
        );
    }

    #[test]
    fn only_past_expiry_is_completed() {
        let order = order(
            OrderAction::New,
            Some(date(2000, 4, 16)),
            Some(date(2015, 4, 16)),
            None,
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Completed
        );
    }

    #[test]
    fn only_past_stop_is_completed() {
        let order = order(
            OrderAction::New,
            Some(date(2000, 4, 16)),
            None,
            Some(date(2015, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Completed
        );
    }

    #[test]
    fn stop_point_equal_to_now_is_completed() {
        let order = order(OrderAction::New, None, None, Some(now()));
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Completed
        );
    }

    #[test]
    fn stop_date_takes_precedence_over_expiry() {
        // Stopped in the future, expired in the past: the stop point is the stop date.
        let order = order(
            OrderAction::Revise,
            None,
            Some(date(2015, 4, 16)),
            Some(date(2069, 4, 16)),
        );
        assert_eq!(StatusResolver::resolve(&order, now()), ServiceRequestStatus::Active);
    }

    #[test]
    fn revise_and_renew_use_base_rule() {
        for action in [OrderAction::Revise, OrderAction::Renew] {
            let completed = order(action, None, None, Some(date(2010, 4, 16)));
            assert_eq!(
                StatusResolver::resolve(&completed, now()),
                ServiceRequestStatus::Completed
            );

            let active = order(action, None, Some(date(2070, 4, 16)), None);
            assert_eq!(
                StatusResolver::resolve(&active, now()),
                ServiceRequestStatus::Active
            );
        }
    }

    #[test]
    fn discontinue_before_expiry_is_revoked() {
        let order = order(
            OrderAction::Discontinue,
            Some(date(2000, 4, 16)),
            Some(date(2070, 4, 16)),
            Some(date(2069, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Revoked
        );
    }

    #[test]
    fn discontinue_without_expiry_is_revoked() {
        let stopped = order(
            OrderAction::Discontinue,
            Some(date(2000, 4, 16)),
            None,
            Some(date(2010, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&stopped, now()),
            ServiceRequestStatus::Revoked
        );

        let undated = order(OrderAction::Discontinue, None, None, None);
        assert_eq!(
            StatusResolver::resolve(&undated, now()),
            ServiceRequestStatus::Revoked
        );
    }

    #[test]
    fn discontinue_after_natural_expiry_is_unknown() {
        let order = order(
            OrderAction::Discontinue,
            Some(date(2000, 4, 16)),
            Some(date(2015, 4, 16)),
            Some(date(2010, 4, 16)),
        );
        assert_eq!(
            StatusResolver::resolve(&order, now()),
            ServiceRequestStatus::Unknown
        );
    }

    #[test]
    fn same_now_gives_same_answer_on_either_side_of_expiry() {
        let expiry = date(2026, 10, 18);
        let order = order(OrderAction::Discontinue, None, Some(expiry), None);

        let before = expiry - chrono::Duration::seconds(1);
        assert_eq!(
            StatusResolver::resolve(&order, before),
            ServiceRequestStatus::Revoked
        );
        assert_eq!(
            StatusResolver::resolve(&order, expiry),
            ServiceRequestStatus::Unknown
        );
    }
}
