//! Domain entities for behavioral analytics
//!
//! This module defines the core domain models: the immutable behavioral Event,
//! the per-user SegmentRecord, the CrossSellRule reference data, and the
//! caller-facing CrossSellOffer projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::ids::{EventId, UserId};

/// The implicit segment assigned at resolution time to users without a stored
/// segment record. It is never persisted.
pub(crate) const DEFAULT_SEGMENT: &str = "new_user";

/// A behavioral event recorded for a banking-app user
///
/// Events are:
/// - **Immutable**: Once created, an event never changes
/// - **Owned**: Every event carries a valid owning-user identifier
/// - **Bounded**: The store retains events for 365 days, after which they are
///   eligible for automatic expiry (a passive store policy, not core logic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for this event
    id: EventId,

    /// Identifier of the user the event belongs to
    user_id: UserId,

    /// Name of the event (e.g., "fd_created", "upi_payment")
    event_name: String,

    /// Free-form, untyped key-value payload supplied by the caller
    properties: Option<serde_json::Value>,

    /// Server-assigned creation timestamp
    created_at: DateTime<Utc>,
}

impl Event {
    /// Create a new Event with a server-assigned timestamp
    ///
    /// This is a pure domain constructor - it doesn't perform any I/O.
    pub fn new(user_id: UserId, event_name: String, properties: Option<serde_json::Value>) -> Self {
        Self {
            id: EventId::new(),
            user_id,
            event_name,
            properties,
            created_at: Utc::now(),
        }
    }

    /// Create an Event with explicit values (used for reconstruction)
    pub fn from_parts(
        id: EventId,
        user_id: UserId,
        event_name: String,
        properties: Option<serde_json::Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            event_name,
            properties,
            created_at,
        }
    }

    /// Get the event's unique identifier
    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// Get the owning user's identifier
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the event name
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Get the free-form properties payload (if any)
    pub fn properties(&self) -> Option<&serde_json::Value> {
        self.properties.as_ref()
    }

    /// Get the creation timestamp
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

/// The stored segment membership record for a single user
///
/// Exactly one record exists per user. It is created lazily on the first
/// qualifying event and mutated only by appending new labels. There is no
/// policy for removing labels or expiring the record - label sets only grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    user_id: UserId,
    labels: Vec<String>,
    updated_at: DateTime<Utc>,
}

impl SegmentRecord {
    /// Create a record with explicit values (used for reconstruction)
    pub fn from_parts(user_id: UserId, labels: Vec<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            labels,
            updated_at,
        }
    }

    /// Get the owning user's identifier
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the segment labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Get the last-updated timestamp
    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    /// Check whether a label is already present
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Append a label if absent, keeping the set duplicate-free
    ///
    /// Returns `true` if the label was added, `false` if it was already
    /// present.
    pub fn add_label(&mut self, label: &str) -> bool {
        if self.contains(label) {
            return false;
        }
        self.labels.push(label.to_string());
        self.updated_at = Utc::now();
        true
    }
}

/// The resolved segment view for a user
///
/// Keeps the store's "no record" case and the resolution-time default cleanly
/// separated: a missing `SegmentRecord` resolves to the single implicit
/// `new_user` segment, which is never written back to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentView {
    user_id: UserId,
    segments: Vec<String>,
    /// True when the view was synthesized from the default, not a stored record
    is_default: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl SegmentView {
    /// Resolve the view for a user from an optional stored record
    pub fn resolve(user_id: UserId, record: Option<SegmentRecord>) -> Self {
        match record {
            Some(record) => Self {
                user_id,
                segments: record.labels,
                is_default: false,
                updated_at: Some(record.updated_at),
            },
            None => Self {
                user_id,
                segments: vec![DEFAULT_SEGMENT.to_string()],
                is_default: true,
                updated_at: None,
            },
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn updated_at(&self) -> Option<&DateTime<Utc>> {
        self.updated_at.as_ref()
    }
}

/// A cross-sell rule mapping a segment to a promotable product offer
///
/// Rules are reference data maintained outside this core; the core only reads
/// active rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossSellRule {
    pub id: uuid::Uuid,
    pub segment: String,
    pub product_type: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
}

/// The caller-facing projection of a cross-sell rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossSellOffer {
    pub product_type: String,
    pub title: String,
    pub description: String,
}

impl CrossSellOffer {
    /// The deduplication key for an offer
    ///
    /// Two rules sharing (product type, title) yield a single offer in a
    /// resolution result, regardless of which segment triggered them.
    pub fn dedup_key(&self) -> (String, String) {
        (self.product_type.clone(), self.title.clone())
    }
}

impl From<&CrossSellRule> for CrossSellOffer {
    fn from(rule: &CrossSellRule) -> Self {
        Self {
            product_type: rule.product_type.clone(),
            title: rule.title.clone(),
            description: rule.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::from_uuid(uuid::Uuid::new_v4())
    }

    #[test]
    fn test_event_creation() {
        let uid = user();
        let event = Event::new(uid, "fd_created".to_string(), None);

        assert_eq!(event.user_id(), &uid);
        assert_eq!(event.event_name(), "fd_created");
        assert!(event.properties().is_none());
    }

    #[test]
    fn test_event_from_parts() {
        let id = EventId::new();
        let uid = user();
        let now = Utc::now();
        let props = Some(serde_json::json!({"amount": 125000}));

        let event = Event::from_parts(id, uid, "high_value_transaction".into(), props.clone(), now);

        assert_eq!(event.id(), &id);
        assert_eq!(event.properties(), props.as_ref());
        assert_eq!(event.created_at(), &now);
    }

    #[test]
    fn test_segment_record_add_label_dedup() {
        let mut record = SegmentRecord::from_parts(user(), vec![], Utc::now());

        assert!(record.add_label("fd_holder"));
        assert!(!record.add_label("fd_holder"), "duplicate add must be a no-op");
        assert_eq!(record.labels(), ["fd_holder"]);
    }

    #[test]
    fn test_segment_view_from_record() {
        let uid = user();
        let record = SegmentRecord::from_parts(uid, vec!["upi_active".into()], Utc::now());
        let view = SegmentView::resolve(uid, Some(record));

        assert_eq!(view.segments(), ["upi_active"]);
        assert!(!view.is_default());
        assert!(view.updated_at().is_some());
    }

    #[test]
    fn test_segment_view_default() {
        let view = SegmentView::resolve(user(), None);

        assert_eq!(view.segments(), [DEFAULT_SEGMENT]);
        assert!(view.is_default());
        assert!(view.updated_at().is_none());
    }

    #[test]
    fn test_offer_from_rule() {
        let rule = CrossSellRule {
            id: uuid::Uuid::new_v4(),
            segment: "fd_holder".into(),
            product_type: "FD".into(),
            title: "Open a new FD".into(),
            description: "Lock in today's rates".into(),
            is_active: true,
        };

        let offer = CrossSellOffer::from(&rule);
        assert_eq!(offer.product_type, "FD");
        assert_eq!(offer.dedup_key(), ("FD".to_string(), "Open a new FD".to_string()));
    }
}
