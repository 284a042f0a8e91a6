//! FinSight API - Behavioral Analytics Service
//!
//! HTTP service for the FinSight banking platform: records behavioral events,
//! derives rule-based user segmentation in the background, and resolves
//! cross-sell offers against the active rule table.

mod dto;
mod handlers;
mod routes;
mod worker;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use finsight_domain::analytics::AnalyticsService;
use finsight_postgres::{schema, PgEventStore, PgPool, PgRuleStore, PgSegmentStore};
use worker::UpdateQueue;

/// Concrete service type for the Postgres-backed deployment
pub type Service = AnalyticsService<PgEventStore, PgSegmentStore, PgRuleStore, UpdateQueue>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analytics_service: Arc<Service>,
}

/// Interval between event-retention sweeps
const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting FinSight analytics service");

    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = finsight_postgres::connect(&database_url, 10)
        .await
        .context("failed to connect to PostgreSQL")?;

    schema::provision(&pool).await?;
    spawn_retention_sweeper(pool.clone());

    let capacity = env_usize("FINSIGHT_QUEUE_CAPACITY", worker::DEFAULT_QUEUE_CAPACITY);
    let workers = env_usize("FINSIGHT_WORKERS", worker::DEFAULT_WORKER_COUNT);

    // Background segment-update pipeline: bounded queue, fixed worker pool
    let (queue, rx) = worker::update_queue(capacity);

    let service = Arc::new(AnalyticsService::new(
        PgEventStore::new(pool.clone()),
        PgSegmentStore::new(pool.clone()),
        PgRuleStore::new(pool),
        queue,
    ));

    worker::spawn_workers(service.clone(), rx, workers);
    info!(workers, capacity, "segment update workers started");

    // Create shared application state
    let state = AppState {
        analytics_service: service,
    };

    // Build HTTP router
    let app = routes::create_router(state);

    // Get bind address from environment
    let host = std::env::var("FINSIGHT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("FINSIGHT_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically remove events past the retention window
///
/// The store's passive TTL policy: the core never depends on expired events,
/// so a failed sweep only logs and waits for the next tick.
fn spawn_retention_sweeper(pool: PgPool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(err) = schema::purge_expired_events(&pool).await {
                warn!(error = %err, "retention sweep failed");
            }
        }
    });
}

/// Read a positive integer from the environment, falling back to a default
fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(name, value = %value, default, "invalid value, using default");
            default
        }),
        Err(_) => {
            info!(name, default, "not set, using default");
            default
        }
    }
}
