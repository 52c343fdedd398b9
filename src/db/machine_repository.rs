use sqlx::{Pool, Postgres};

use crate::api::machine::dto::MachineInput;
use crate::db::models::MachineRow;

/// Repository for machine database operations
pub struct MachineRepository;

impl MachineRepository {
    /// All machines in name order. The scheduler relies on this ordering
    /// being stable between runs.
    pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<MachineRow>, sqlx::Error> {
        sqlx::query_as::<_, MachineRow>("SELECT * FROM machines ORDER BY name")
            .fetch_all(pool)
            .await
    }

    pub async fn get(pool: &Pool<Postgres>, id: i32) -> Result<Option<MachineRow>, sqlx::Error> {
        sqlx::query_as::<_, MachineRow>("SELECT * FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &Pool<Postgres>,
        machine: &MachineInput,
    ) -> Result<MachineRow, sqlx::Error> {
        sqlx::query_as::<_, MachineRow>(
            "INSERT INTO machines (name, type, compatibility) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&machine.name)
        .bind(&machine.kind)
        .bind(&machine.compatibility)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        machine: &MachineInput,
    ) -> Result<Option<MachineRow>, sqlx::Error> {
        sqlx::query_as::<_, MachineRow>(
            r#"
            UPDATE machines SET name = $1, type = $2, compatibility = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&machine.name)
        .bind(&machine.kind)
        .bind(&machine.compatibility)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a machine. Jobs referencing it fall back to unassigned
    /// (machine_id SET NULL) at the schema level.
    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
