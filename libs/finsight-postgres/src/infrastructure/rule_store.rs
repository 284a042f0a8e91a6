//! RuleStore implementation backed by PostgreSQL
//!
//! Cross-sell rules are reference data maintained outside this service; only
//! read paths exist here, and both return active rules exclusively.

use finsight_domain::analytics::{AnalyticsError, CrossSellRule};
use finsight_domain::ports::RuleStore;
use sqlx::PgPool;
use tracing::{error, instrument};
use uuid::Uuid;

/// PostgreSQL-backed implementation of the RuleStore port
#[derive(Clone)]
pub struct PgRuleStore {
    pool: PgPool,
}

impl PgRuleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RuleRow {
    id: Uuid,
    segment: String,
    product_type: String,
    title: String,
    description: String,
    is_active: bool,
}

impl From<RuleRow> for CrossSellRule {
    fn from(row: RuleRow) -> Self {
        CrossSellRule {
            id: row.id,
            segment: row.segment,
            product_type: row.product_type,
            title: row.title,
            description: row.description,
            is_active: row.is_active,
        }
    }
}

impl RuleStore for PgRuleStore {
    #[instrument(skip(self), fields(segment = %segment))]
    fn find_by_segment(
        &self,
        segment: &str,
    ) -> impl std::future::Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send {
        let pool = self.pool.clone();
        let segment = segment.to_string();

        async move {
            let rows = sqlx::query_as::<_, RuleRow>(
                "SELECT id, segment, product_type, title, description, is_active
                 FROM crosssell_rules
                 WHERE segment = $1 AND is_active = TRUE
                 ORDER BY id",
            )
            .bind(&segment)
            .fetch_all(&pool)
            .await
            .map_err(|err| {
                error!(error = %err, segment = %segment, "failed to fetch rules for segment");
                AnalyticsError::store_failure(format!("fetch rules for segment: {err}"))
            })?;

            Ok(rows.into_iter().map(CrossSellRule::from).collect())
        }
    }

    #[instrument(skip(self))]
    fn find_all_active(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send {
        let pool = self.pool.clone();

        async move {
            let rows = sqlx::query_as::<_, RuleRow>(
                "SELECT id, segment, product_type, title, description, is_active
                 FROM crosssell_rules
                 WHERE is_active = TRUE
                 ORDER BY id",
            )
            .fetch_all(&pool)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to fetch active rules");
                AnalyticsError::store_failure(format!("fetch active rules: {err}"))
            })?;

            Ok(rows.into_iter().map(CrossSellRule::from).collect())
        }
    }
}
