use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::AlertRow;

/// A pending alert insert
#[derive(Debug)]
pub struct NewAlert {
    pub kind: &'static str,
    pub message: String,
    pub job_id: Option<i32>,
    pub machine_id: Option<i32>,
    pub severity: &'static str,
    /// Collides with the partial unique index when the same alert was already
    /// raised in the current dedup window. None disables deduplication.
    pub dedup_key: Option<String>,
}

/// Repository for alert database operations
pub struct AlertRepository;

impl AlertRepository {
    /// Insert an alert. Returns the number of rows written: 0 means an alert
    /// with the same dedup_key already exists and the insert was a no-op.
    pub async fn create(pool: &Pool<Postgres>, alert: &NewAlert) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO alerts (type, message, job_id, machine_id, severity, dedup_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (dedup_key) WHERE dedup_key IS NOT NULL DO NOTHING
            "#,
        )
        .bind(alert.kind)
        .bind(&alert.message)
        .bind(alert.job_id)
        .bind(alert.machine_id)
        .bind(alert.severity)
        .bind(alert.dedup_key.as_deref())
        .execute(pool)
        .await?;

        let inserted = result.rows_affected();
        if inserted == 0 {
            debug!("Alert suppressed by dedup key: {:?}", alert.dedup_key);
        }
        Ok(inserted)
    }

    /// Latest alerts, optionally filtered by read flag, capped at 100
    pub async fn list(
        pool: &Pool<Postgres>,
        read: Option<bool>,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        match read {
            Some(read) => {
                sqlx::query_as::<_, AlertRow>(
                    "SELECT * FROM alerts WHERE read = $1 ORDER BY created_at DESC LIMIT 100",
                )
                .bind(read)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, AlertRow>(
                    "SELECT * FROM alerts ORDER BY created_at DESC LIMIT 100",
                )
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn mark_read(
        pool: &Pool<Postgres>,
        id: i32,
    ) -> Result<Option<AlertRow>, sqlx::Error> {
        sqlx::query_as::<_, AlertRow>("UPDATE alerts SET read = TRUE WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_all_read(pool: &Pool<Postgres>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE alerts SET read = TRUE WHERE read = FALSE")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
