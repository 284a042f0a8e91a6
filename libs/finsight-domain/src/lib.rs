//! # FinSight Domain Layer
//!
//! This crate contains the pure business logic and domain models for the
//! FinSight banking analytics service: behavioral event ingestion, rule-based
//! user segmentation, and cross-sell offer resolution. It follows hexagonal
//! architecture principles:
//!
//! - **Entities**: Core domain models (Event, SegmentRecord, CrossSellRule)
//! - **Ports**: Trait definitions for external dependencies (EventStore,
//!   SegmentStore, RuleStore, SegmentUpdateQueue)
//! - **Services**: Business logic orchestration (AnalyticsService)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (Postgres, HTTP,
//! task queues, etc.). All external dependencies are expressed as traits
//! (ports) that are implemented by adapter layers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use finsight_domain::analytics::AnalyticsService;
//!
//! // The service is generic over the store and queue ports
//! async fn example(service: AnalyticsService<impl EventStore, impl SegmentStore, impl RuleStore, impl SegmentUpdateQueue>) {
//!     let offers = service.cross_sell_offers("7f2c1a90-1db8-4a4e-8f0a-1c2d3e4f5a6b").await.unwrap();
//!     println!("Resolved {} offers", offers.len());
//! }
//! ```

pub mod analytics;
pub mod ports;

// Re-export commonly used types
pub use analytics::{
    AnalyticsError, AnalyticsService, CrossSellOffer, CrossSellRule, Event, EventId,
    SegmentRecord, SegmentView, UserId,
};
pub use ports::{EventStore, RuleStore, SegmentStore, SegmentUpdateJob, SegmentUpdateQueue};
