//! Analytics domain module
//!
//! This module contains the core business logic and entities for behavioral
//! analytics: recording user events, deriving segment membership from them,
//! and resolving cross-sell offers against the active rule table.

mod entity;
mod error;
mod ids;
mod segmentation;
mod service;

pub use entity::{CrossSellOffer, CrossSellRule, Event, SegmentRecord, SegmentView};
pub use error::{AnalyticsError, Result};
pub use ids::{EventId, UserId};
pub use segmentation::label_for_event;
pub use service::{AnalyticsService, DEFAULT_EVENT_LIMIT, MAX_EVENT_LIMIT};
