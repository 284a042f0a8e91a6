//! SegmentStore implementation backed by PostgreSQL
//!
//! This module implements the `SegmentStore` trait against the `segments`
//! table. The label-add path is a single conditional upsert so that two
//! concurrent updates for the same user cannot lose a label.

use chrono::{DateTime, Utc};
use finsight_domain::analytics::{AnalyticsError, SegmentRecord, UserId};
use finsight_domain::ports::SegmentStore;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL-backed implementation of the SegmentStore port
#[derive(Clone)]
pub struct PgSegmentStore {
    pool: PgPool,
}

impl PgSegmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SegmentRow {
    user_id: Uuid,
    labels: Vec<String>,
    updated_at: DateTime<Utc>,
}

impl From<SegmentRow> for SegmentRecord {
    fn from(row: SegmentRow) -> Self {
        SegmentRecord::from_parts(UserId::from_uuid(row.user_id), row.labels, row.updated_at)
    }
}

impl SegmentStore for PgSegmentStore {
    #[instrument(skip(self), fields(user_id = %user_id))]
    fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<SegmentRecord>, AnalyticsError>> + Send
    {
        let pool = self.pool.clone();
        let user_id = *user_id.as_uuid();

        async move {
            let row = sqlx::query_as::<_, SegmentRow>(
                "SELECT user_id, labels, updated_at FROM segments WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&pool)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to fetch segment record");
                AnalyticsError::store_failure(format!("fetch segment: {err}"))
            })?;

            Ok(row.map(SegmentRecord::from))
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id, label = %label))]
    fn add_label(
        &self,
        user_id: &UserId,
        label: &str,
    ) -> impl std::future::Future<Output = Result<bool, AnalyticsError>> + Send {
        let pool = self.pool.clone();
        let user_id = *user_id.as_uuid();
        let label = label.to_string();

        async move {
            // Atomic set-union upsert: creates the record when absent, appends
            // the label only when not already present. The WHERE clause turns
            // a duplicate add into zero affected rows.
            let result = sqlx::query(
                "INSERT INTO segments (user_id, labels, updated_at)
                 VALUES ($1, ARRAY[$2], NOW())
                 ON CONFLICT (user_id) DO UPDATE
                 SET labels = array_append(segments.labels, $2), updated_at = NOW()
                 WHERE NOT segments.labels @> ARRAY[$2]",
            )
            .bind(user_id)
            .bind(&label)
            .execute(&pool)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to add segment label");
                AnalyticsError::store_failure(format!("add label: {err}"))
            })?;

            let updated = result.rows_affected() > 0;
            if updated {
                debug!("segment label persisted");
            }
            Ok(updated)
        }
    }
}
