//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that external adapters must
//! implement. Following hexagonal architecture, the domain defines what it
//! needs, and the infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to ensure zero-cost abstractions and static dispatch.

use std::future::Future;

use crate::analytics::{AnalyticsError, CrossSellRule, Event, SegmentRecord, UserId};

/// Port for the append-only behavioral event log
///
/// Implementations must handle:
/// - Durably appending immutable events
/// - Listing a user's events most-recent-first
/// - Converting infrastructure errors to `AnalyticsError::StoreFailure`
///
/// Retention is the store's concern: events older than the retention window
/// are eligible for automatic removal, and the core never relies on their
/// continued existence.
pub trait EventStore: Send + Sync {
    /// Append an event to the log
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::StoreFailure` if the write fails
    fn append(&self, event: &Event) -> impl Future<Output = Result<(), AnalyticsError>> + Send;

    /// List a user's events, most recent first
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning user
    /// * `limit` - Maximum number of events to return (already clamped by the
    ///   caller)
    fn list_by_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Event>, AnalyticsError>> + Send;
}

/// Port for the per-user segment membership store
///
/// An absent record is represented as `Ok(None)`, never as an error: the
/// `new_user` default is a resolution-time concern of the domain, not of the
/// store.
pub trait SegmentStore: Send + Sync {
    /// Fetch the segment record for a user, if one exists
    fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<SegmentRecord>, AnalyticsError>> + Send;

    /// Atomically add a label to a user's segment set
    ///
    /// This is a single set-union upsert: it creates the record if absent and
    /// appends the label only when it is not already present. Two concurrent
    /// calls for the same user must not lose either label.
    ///
    /// # Returns
    ///
    /// `true` if the label was written, `false` if it was already present
    fn add_label(
        &self,
        user_id: &UserId,
        label: &str,
    ) -> impl Future<Output = Result<bool, AnalyticsError>> + Send;
}

/// Port for the cross-sell rule table
///
/// Rules are reference data maintained externally; both queries return only
/// active rules.
pub trait RuleStore: Send + Sync {
    /// Fetch the active rules for one segment label
    fn find_by_segment(
        &self,
        segment: &str,
    ) -> impl Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send;

    /// Fetch all active rules system-wide (the fallback path)
    fn find_all_active(
        &self,
    ) -> impl Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send;
}

/// A queued request to recompute one user's segments from one event name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentUpdateJob {
    pub user_id: UserId,
    pub event_name: String,
}

/// Port for the background segment-update queue
///
/// The producer side is called on the synchronous ingestion path and must
/// never block: enqueueing is explicitly best-effort, and a full or closed
/// queue drops the job. Consumers run detached from the originating request's
/// lifetime, so cancellation of the request never reaches a queued job.
pub trait SegmentUpdateQueue: Send + Sync {
    /// Hand a job to the background workers without blocking
    ///
    /// # Returns
    ///
    /// `true` if the job was accepted, `false` if it was dropped
    fn enqueue(&self, job: SegmentUpdateJob) -> bool;
}
