//! Analytics service - Business logic orchestration
//!
//! This module contains the core business logic for the analytics pipeline:
//! recording behavioral events, deriving segment membership from them, and
//! resolving cross-sell offers against the active rule table.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::{label_for_event, AnalyticsError, CrossSellOffer, Event, SegmentView, UserId};
use crate::ports::{EventStore, RuleStore, SegmentStore, SegmentUpdateJob, SegmentUpdateQueue};

/// Number of events returned when the caller does not ask for a limit
pub const DEFAULT_EVENT_LIMIT: i64 = 50;

/// Upper bound on the number of events a single listing may return
pub const MAX_EVENT_LIMIT: i64 = 200;

/// Service for behavioral analytics and cross-sell resolution
///
/// This service encapsulates the business rules of the pipeline:
/// - Gates every entry point on the caller-supplied user identifier
/// - Persists immutable events and hands segment recomputation to a
///   non-blocking background queue
/// - Applies the closed event-to-segment mapping table
/// - Resolves offers with first-seen-wins deduplication and the
///   all-active-rules fallback
///
/// ## Static Dispatch
///
/// The service is generic over its four ports. The compiler generates
/// specialized versions for each concrete combination, resulting in zero-cost
/// abstractions.
pub struct AnalyticsService<E, S, R, Q> {
    events: E,
    segments: S,
    rules: R,
    queue: Q,
}

impl<E, S, R, Q> AnalyticsService<E, S, R, Q>
where
    E: EventStore,
    S: SegmentStore,
    R: RuleStore,
    Q: SegmentUpdateQueue,
{
    /// Create a new AnalyticsService over the given ports
    pub fn new(events: E, segments: S, rules: R, queue: Q) -> Self {
        Self {
            events,
            segments,
            rules,
            queue,
        }
    }

    /// Parse the caller-supplied user identifier
    ///
    /// Every entry point runs this gate before touching any store. A
    /// malformed identifier is an `Unauthorized` failure, since the
    /// identifier doubles as the (externally supplied) proof of identity.
    fn parse_user(user_id: &str) -> Result<UserId, AnalyticsError> {
        user_id.parse().map_err(|_| AnalyticsError::Unauthorized)
    }

    /// Record a behavioral event for a user
    ///
    /// The event is persisted synchronously; on success a segment-update job
    /// is enqueued for the background workers and the call returns without
    /// waiting for recomputation. Enqueueing is best-effort: a full or closed
    /// queue drops the job with a warning, never failing the request.
    ///
    /// # Errors
    ///
    /// - `AnalyticsError::Unauthorized` if the user identifier is malformed
    /// - `AnalyticsError::StoreFailure` if the event write fails
    pub async fn record_event(
        &self,
        user_id: &str,
        event_name: &str,
        properties: Option<Value>,
    ) -> Result<Event, AnalyticsError> {
        let uid = Self::parse_user(user_id)?;

        let event = Event::new(uid, event_name.to_string(), properties);
        self.events.append(&event).await?;

        let accepted = self.queue.enqueue(SegmentUpdateJob {
            user_id: uid,
            event_name: event_name.to_string(),
        });
        if !accepted {
            // Best-effort contract: the stored event is the source of truth,
            // membership may lag until a later qualifying event
            warn!(
                user_id = %uid,
                event_name = %event_name,
                "segment update queue rejected job, dropping"
            );
        }

        Ok(event)
    }

    /// Get the resolved segment view for a user
    ///
    /// A user without a stored record resolves to the implicit `new_user`
    /// default segment; the absence of a record is never an error.
    pub async fn segment_view(&self, user_id: &str) -> Result<SegmentView, AnalyticsError> {
        let uid = Self::parse_user(user_id)?;
        let record = self.segments.find_by_user(&uid).await?;
        Ok(SegmentView::resolve(uid, record))
    }

    /// Resolve the cross-sell offers for a user
    ///
    /// Offers are accumulated per segment label in the view's iteration
    /// order, deduplicated by (product type, title) with first-seen-wins
    /// semantics. If no segment yields an offer, all active rules
    /// system-wide are used as the fallback, under the same dedup policy.
    ///
    /// Error asymmetry, by contract: a failed rule lookup for an individual
    /// segment is swallowed (that segment contributes nothing), because other
    /// segments may still resolve; a failed fallback lookup propagates,
    /// because at that point resolution has genuinely failed.
    pub async fn cross_sell_offers(
        &self,
        user_id: &str,
    ) -> Result<Vec<CrossSellOffer>, AnalyticsError> {
        let uid = Self::parse_user(user_id)?;

        let record = self.segments.find_by_user(&uid).await?;
        let view = SegmentView::resolve(uid, record);

        let mut offers: Vec<CrossSellOffer> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for segment in view.segments() {
            match self.rules.find_by_segment(segment).await {
                Ok(rules) => {
                    for rule in &rules {
                        let offer = CrossSellOffer::from(rule);
                        if seen.insert(offer.dedup_key()) {
                            offers.push(offer);
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        user_id = %uid,
                        segment = %segment,
                        error = %err,
                        "rule lookup failed for segment, skipping"
                    );
                }
            }
        }

        if offers.is_empty() {
            let rules = self.rules.find_all_active().await?;
            for rule in &rules {
                let offer = CrossSellOffer::from(rule);
                if seen.insert(offer.dedup_key()) {
                    offers.push(offer);
                }
            }
        }

        Ok(offers)
    }

    /// Update a user's segment membership from an event name
    ///
    /// This is the background half of ingestion, driven by the worker pool.
    /// Unmapped event names are a no-op with no store access. Mapped names
    /// are written through the store's atomic add-label primitive, so two
    /// concurrent updates for the same user cannot lose a label.
    ///
    /// # Returns
    ///
    /// `true` if a label was added, `false` for unmapped names or labels
    /// already present
    pub async fn update_segment(
        &self,
        user_id: &UserId,
        event_name: &str,
    ) -> Result<bool, AnalyticsError> {
        let Some(label) = label_for_event(event_name) else {
            return Ok(false);
        };

        let updated = self.segments.add_label(user_id, label).await?;
        if updated {
            debug!(user_id = %user_id, label = %label, "segment label added");
        }
        Ok(updated)
    }

    /// List a user's most recent events
    ///
    /// The limit defaults to [`DEFAULT_EVENT_LIMIT`] and is capped at
    /// [`MAX_EVENT_LIMIT`].
    pub async fn recent_events(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, AnalyticsError> {
        let uid = Self::parse_user(user_id)?;

        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_EVENT_LIMIT),
            _ => DEFAULT_EVENT_LIMIT,
        };

        self.events.list_by_user(&uid, limit).await
    }
}
