//! Occurrence window of an order.

use crate::order::{OrderRecord, Urgency};
use fhir::Period;

/// Computes the window in which an order is to be carried out.
pub struct OccurrenceResolver;

impl OccurrenceResolver {
    /// Resolve the occurrence period of `order`.
    ///
    /// - `end` is the auto-expire date, if any.
    /// - `start` is the scheduled date for orders placed `ON_SCHEDULED_DATE` that carry one,
    ///   otherwise the activation date, if any.
    ///
    /// Either bound may be absent; this never fails.
    pub fn resolve(order: &OrderRecord) -> Period {
        let scheduled = match order.urgency {
            Urgency::OnScheduledDate => order.scheduled_date,
            _ => None,
        };

        Period {
            start: scheduled.or(order.date_activated),
            end: order.auto_expire_date,
        }
    }
}
