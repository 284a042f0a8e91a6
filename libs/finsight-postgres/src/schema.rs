//! Schema provisioning and retention sweep
//!
//! The original index layout is preserved: events are indexed for
//! per-user recency listing and by name, segment records are unique per user,
//! and rules are indexed for the (segment, is_active) lookup. PostgreSQL has
//! no TTL indexes, so the 365-day event retention window is enforced by a
//! periodic sweep instead; the core logic never depends on expired events.

use chrono::{Duration, Utc};
use finsight_domain::analytics::AnalyticsError;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Retention window for behavioral events, in days
pub const EVENT_RETENTION_DAYS: i64 = 365;

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS events (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        event_name TEXT NOT NULL,
        properties JSONB,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_events_user_recency
        ON events (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_events_event_name
        ON events (event_name)",
    "CREATE INDEX IF NOT EXISTS idx_events_created_at
        ON events (created_at)",
    "CREATE TABLE IF NOT EXISTS segments (
        user_id UUID PRIMARY KEY,
        labels TEXT[] NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS crosssell_rules (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        segment TEXT NOT NULL,
        product_type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )",
    "CREATE INDEX IF NOT EXISTS idx_crosssell_rules_segment_active
        ON crosssell_rules (segment, is_active)",
];

/// Create tables and indexes if they do not exist
///
/// Run once at startup, before the service accepts traffic.
#[instrument(skip(pool))]
pub async fn provision(pool: &PgPool) -> Result<(), AnalyticsError> {
    for statement in DDL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|err| AnalyticsError::store_failure(format!("schema provisioning: {err}")))?;
    }
    info!("database schema provisioned");
    Ok(())
}

/// Delete events older than the retention window
///
/// # Returns
///
/// The number of events removed
#[instrument(skip(pool))]
pub async fn purge_expired_events(pool: &PgPool) -> Result<u64, AnalyticsError> {
    let cutoff = Utc::now() - Duration::days(EVENT_RETENTION_DAYS);

    let result = sqlx::query("DELETE FROM events WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await
        .map_err(|err| AnalyticsError::store_failure(format!("retention sweep: {err}")))?;

    let purged = result.rows_affected();
    if purged > 0 {
        info!(purged, "expired events removed");
    }
    Ok(purged)
}
