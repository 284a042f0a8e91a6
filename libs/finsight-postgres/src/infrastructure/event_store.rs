//! EventStore implementation backed by PostgreSQL
//!
//! This module implements the `EventStore` trait against the `events` table.
//! It handles all SQL and converts sqlx errors to domain errors.

use chrono::{DateTime, Utc};
use finsight_domain::analytics::{AnalyticsError, Event, EventId, UserId};
use finsight_domain::ports::EventStore;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL-backed implementation of the EventStore port
///
/// The event log is append-only: rows are inserted once and never updated.
/// Expiry is handled outside the port by the retention sweep in
/// [`crate::schema`].
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    user_id: Uuid,
    event_name: String,
    properties: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event::from_parts(
            EventId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.event_name,
            row.properties,
            row.created_at,
        )
    }
}

impl EventStore for PgEventStore {
    #[instrument(skip(self, event), fields(event_id = %event.id(), user_id = %event.user_id()))]
    fn append(
        &self,
        event: &Event,
    ) -> impl std::future::Future<Output = Result<(), AnalyticsError>> + Send {
        let pool = self.pool.clone();
        let id = *event.id().as_uuid();
        let user_id = *event.user_id().as_uuid();
        let event_name = event.event_name().to_string();
        let properties = event.properties().cloned();
        let created_at = *event.created_at();

        async move {
            let result = sqlx::query(
                "INSERT INTO events (id, user_id, event_name, properties, created_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(user_id)
            .bind(&event_name)
            .bind(properties)
            .bind(created_at)
            .execute(&pool)
            .await;

            match result {
                Ok(_) => {
                    debug!("event appended");
                    Ok(())
                }
                Err(err) => {
                    error!(error = %err, "failed to append event");
                    Err(AnalyticsError::store_failure(format!(
                        "insert event: {err}"
                    )))
                }
            }
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    fn list_by_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Event>, AnalyticsError>> + Send {
        let pool = self.pool.clone();
        let user_id = *user_id.as_uuid();

        async move {
            let rows = sqlx::query_as::<_, EventRow>(
                "SELECT id, user_id, event_name, properties, created_at
                 FROM events
                 WHERE user_id = $1
                 ORDER BY created_at DESC
                 LIMIT $2",
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&pool)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to list events");
                AnalyticsError::store_failure(format!("list events: {err}"))
            })?;

            Ok(rows.into_iter().map(Event::from).collect())
        }
    }
}
