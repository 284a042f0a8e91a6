//! # FinSight PostgreSQL Adapter
//!
//! This crate implements the domain's store ports (`EventStore`,
//! `SegmentStore`, `RuleStore`) against PostgreSQL via `sqlx`, and owns the
//! schema provisioning and event-retention sweep. All sqlx errors are
//! converted to domain errors at this boundary - nothing infrastructure-shaped
//! leaks upward.

pub mod infrastructure;
pub mod schema;

pub use infrastructure::{PgEventStore, PgRuleStore, PgSegmentStore};

use sqlx::postgres::PgPoolOptions;

/// Re-exported so the application layer does not need a direct sqlx dependency
pub use sqlx::PgPool;

/// Connect to PostgreSQL with a bounded connection pool
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` if the pool cannot be established;
/// connection failures at startup are fatal and handled by the binary.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
