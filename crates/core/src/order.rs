//! EHR order records: the input side of translation.
//!
//! An [`OrderRecord`] is owned by the EHR and read-only here. Lifecycle timestamps are
//! optional and their absence is meaningful: an order with no stop or expiry is open-ended,
//! an order with no activation date has not started.
//!
//! Records can be built in code (`OrderRecord::new` plus field assignment) or loaded from a
//! YAML sequence via [`parse_orders_yaml`].

use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use fhir::constants::SERVICE_REQUEST;
use orderbridge_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// What an order does relative to the order it follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    #[default]
    New,
    Revise,
    Discontinue,
    Renew,
}

impl OrderAction {
    /// Revise, discontinue and renew all act on a previous order.
    pub fn expects_previous_order(&self) -> bool {
        !matches!(self, Self::New)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Routine,
    Stat,
    OnScheduledDate,
}

/// Weak reference to the order this one revises, discontinues or renews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreviousOrder {
    pub id: Uuid,
    pub order_number: NonEmptyText,
}

impl PreviousOrder {
    /// Relative `ServiceRequest/{id}` reference of the previous order.
    pub fn reference(&self) -> String {
        service_request_reference(self.id)
    }
}

/// Source vocabulary code attached to a concept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConceptMapping {
    /// Name of the source vocabulary, e.g. `LOINC`.
    pub source: String,
    pub code: String,
}

/// Weak reference to the concept being ordered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConceptRef {
    pub uuid: Uuid,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub mappings: Vec<ConceptMapping>,
}

/// Weak reference to a patient, encounter or provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRef {
    pub uuid: Uuid,
    #[serde(default)]
    pub display: Option<String>,
}

impl EntityRef {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            display: None,
        }
    }
}

/// An EHR order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderRecord {
    pub id: Uuid,

    /// Human-readable number, stable across revision chains.
    #[serde(default)]
    pub order_number: Option<NonEmptyText>,

    #[serde(default)]
    pub action: OrderAction,

    #[serde(default)]
    pub urgency: Urgency,

    #[serde(default)]
    pub date_activated: Option<DateTime<Utc>>,

    /// Only meaningful when `urgency` is [`Urgency::OnScheduledDate`].
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub auto_expire_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub date_stopped: Option<DateTime<Utc>>,

    #[serde(default)]
    pub previous_order: Option<PreviousOrder>,

    #[serde(default)]
    pub concept: Option<ConceptRef>,

    #[serde(default)]
    pub patient: Option<EntityRef>,

    #[serde(default)]
    pub encounter: Option<EntityRef>,

    #[serde(default)]
    pub orderer: Option<EntityRef>,

    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,

    #[serde(default)]
    pub date_changed: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// A `NEW`, routine order with no dates, links or references.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            order_number: None,
            action: OrderAction::New,
            urgency: Urgency::Routine,
            date_activated: None,
            scheduled_date: None,
            auto_expire_date: None,
            date_stopped: None,
            previous_order: None,
            concept: None,
            patient: None,
            encounter: None,
            orderer: None,
            date_created: None,
            date_changed: None,
        }
    }

    /// Sets the order number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Text`] if `order_number` is blank.
    pub fn with_order_number(mut self, order_number: &str) -> CoreResult<Self> {
        self.order_number = Some(NonEmptyText::new(order_number)?);
        Ok(self)
    }

    /// Weak reference to this order, as a later order would hold it.
    ///
    /// Returns `None` if this order has no number.
    pub fn as_previous(&self) -> Option<PreviousOrder> {
        self.order_number.as_ref().map(|order_number| PreviousOrder {
            id: self.id,
            order_number: order_number.clone(),
        })
    }

    /// Relative `ServiceRequest/{id}` reference of this order.
    pub fn reference(&self) -> String {
        service_request_reference(self.id)
    }
}

fn service_request_reference(id: Uuid) -> String {
    format!("{SERVICE_REQUEST}/{}", id.hyphenated())
}

/// Parse a YAML sequence of order records.
///
/// Field names are snake_case; enums use their upper-case EHR names (`DISCONTINUE`,
/// `ON_SCHEDULED_DATE`). Schema errors carry the failing path, e.g.
/// `[1].previous_order.order_number`.
///
/// # Errors
///
/// Returns [`CoreError::OrderSchema`] if the YAML does not match the record schema.
pub fn parse_orders_yaml(yaml_text: &str) -> CoreResult<Vec<OrderRecord>> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    serde_path_to_error::deserialize::<_, Vec<OrderRecord>>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() {
            "<root>"
        } else {
            path.as_str()
        };
        CoreError::OrderSchema(format!("at {path}: {source}"))
    })
}

/// Read and parse an order records file.
pub fn load_orders_file(path: &Path) -> CoreResult<Vec<OrderRecord>> {
    let text = std::fs::read_to_string(path).map_err(CoreError::FileRead)?;
    parse_orders_yaml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    const ORDERS: &str = r#"- id: 4e4851c3-c265-400e-acc9-1f1b0ac7f9c4
  order_number: ORD-1
  date_activated: 2000-04-16T00:00:00Z
- id: efca4077-493c-496b-8312-856ee5d1cc27
  order_number: ORD-2
  action: DISCONTINUE
  urgency: ON_SCHEDULED_DATE
  scheduled_date: 2000-05-01T09:30:00Z
  previous_order:
    id: 4e4851c3-c265-400e-acc9-1f1b0ac7f9c4
    order_number: ORD-1
  patient:
    uuid: 14d4f066-15f5-102d-96e4-000c29c2a5d7
    display: Jane Doe
"#;

    #[test]
    fn parses_orders_with_defaults() {
        let orders = parse_orders_yaml(ORDERS).expect("parse orders");
        assert_eq!(orders.len(), 2);

        let first = &orders[0];
        assert_eq!(first.action, OrderAction::New);
        assert_eq!(first.urgency, Urgency::Routine);
        assert_eq!(
            first.date_activated,
            Some(Utc.with_ymd_and_hms(2000, 4, 16, 0, 0, 0).unwrap())
        );
        assert!(first.previous_order.is_none());

        let second = &orders[1];
        assert_eq!(second.action, OrderAction::Discontinue);
        assert_eq!(second.urgency, Urgency::OnScheduledDate);
        let previous = second.previous_order.as_ref().expect("previous order");
        assert_eq!(previous.order_number.as_str(), "ORD-1");
        assert_eq!(
            previous.reference(),
            "ServiceRequest/4e4851c3-c265-400e-acc9-1f1b0ac7f9c4"
        );
        assert_eq!(
            second.patient.as_ref().and_then(|p| p.display.as_deref()),
            Some("Jane Doe")
        );
    }

    #[test]
    fn schema_error_names_the_path() {
        let input = ORDERS.replace("    order_number: ORD-1", "    order_number: \"  \"");
        let err = parse_orders_yaml(&input).expect_err("blank previous order number");
        match err {
            CoreError::OrderSchema(msg) => assert!(msg.contains("previous_order")),
            other => panic!("expected OrderSchema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_action() {
        let input = ORDERS.replace("DISCONTINUE", "CANCEL");
        assert!(matches!(
            parse_orders_yaml(&input),
            Err(CoreError::OrderSchema(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ORDERS.as_bytes()).expect("write orders");

        let orders = load_orders_file(file.path()).expect("load orders");
        assert_eq!(orders.len(), 2);

        let missing = load_orders_file(Path::new("/nonexistent/orders.yaml"));
        assert!(matches!(missing, Err(CoreError::FileRead(_))));
    }

    #[test]
    fn as_previous_needs_an_order_number() {
        let id = Uuid::new_v4();
        assert!(OrderRecord::new(id).as_previous().is_none());

        let order = OrderRecord::new(id)
            .with_order_number("ORD-9")
            .expect("valid number");
        let previous = order.as_previous().expect("numbered order");
        assert_eq!(previous.id, id);
        assert_eq!(previous.reference(), order.reference());
    }
}
