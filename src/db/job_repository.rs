use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::api::job::dto::{JobListFilter, NewJob, UpdateJob};
use crate::api::job::payment::PaymentUpdate;
use crate::db::models::{JobRow, JobWithMachineRow, ScheduleRow};
use crate::scheduler::planner::Assignment;

const JOB_WITH_MACHINE: &str = r#"
    SELECT j.*, m.name AS machine_name, m.type AS machine_type
    FROM jobs j
    LEFT JOIN machines m ON j.machine_id = m.id
"#;

/// Repository for job database operations
pub struct JobRepository;

impl JobRepository {
    /// List jobs with optional filters, newest due date last
    pub async fn list(
        pool: &Pool<Postgres>,
        filter: &JobListFilter,
    ) -> Result<Vec<JobWithMachineRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(JOB_WITH_MACHINE);
        query.push(" WHERE 1=1");

        if let Some(status) = &filter.status {
            query.push(" AND j.status = ").push_bind(status);
        }
        if let Some(customer) = &filter.customer {
            query
                .push(" AND j.customer_name ILIKE ")
                .push_bind(format!("%{}%", customer));
        }
        if let Some(machine_id) = filter.machine_id {
            query.push(" AND j.machine_id = ").push_bind(machine_id);
        }
        if let Some(start_date) = filter.start_date {
            query.push(" AND j.due_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            query.push(" AND j.due_date <= ").push_bind(end_date);
        }

        query.push(" ORDER BY j.due_date ASC, j.priority DESC");

        query
            .build_query_as::<JobWithMachineRow>()
            .fetch_all(pool)
            .await
    }

    /// Fetch a single job joined with its machine
    pub async fn get(
        pool: &Pool<Postgres>,
        id: i32,
    ) -> Result<Option<JobWithMachineRow>, sqlx::Error> {
        sqlx::query_as::<_, JobWithMachineRow>(&format!("{} WHERE j.id = $1", JOB_WITH_MACHINE))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new job and return the full record
    pub async fn create(pool: &Pool<Postgres>, job: &NewJob) -> Result<JobRow, sqlx::Error> {
        debug!("Creating job: name={}, customer={}", job.job_name, job.customer_name);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                job_name, po_number, customer_name, product_type, quantity,
                substrate, finishing, due_date, due_time, priority, total_cost, deposit_required
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&job.job_name)
        .bind(&job.po_number)
        .bind(&job.customer_name)
        .bind(&job.product_type)
        .bind(job.quantity)
        .bind(&job.substrate)
        .bind(&job.finishing)
        .bind(job.due_date)
        .bind(job.due_time)
        .bind(job.priority.as_str())
        .bind(job.total_cost)
        .bind(job.deposit_required)
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Partial update: absent fields keep their current value
    pub async fn update(
        pool: &Pool<Postgres>,
        id: i32,
        changes: &UpdateJob,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                job_name = COALESCE($1, job_name),
                po_number = COALESCE($2, po_number),
                customer_name = COALESCE($3, customer_name),
                product_type = COALESCE($4, product_type),
                quantity = COALESCE($5, quantity),
                substrate = COALESCE($6, substrate),
                finishing = COALESCE($7, finishing),
                due_date = COALESCE($8, due_date),
                due_time = COALESCE($9, due_time),
                priority = COALESCE($10, priority),
                status = COALESCE($11, status),
                machine_id = COALESCE($12, machine_id),
                scheduled_start = COALESCE($13, scheduled_start),
                scheduled_end = COALESCE($14, scheduled_end),
                total_cost = COALESCE($15, total_cost),
                deposit_required = COALESCE($16, deposit_required),
                deposit_received = COALESCE($17, deposit_received),
                deposit_date = COALESCE($18, deposit_date),
                deposit_status = COALESCE($19, deposit_status),
                final_payment_received = COALESCE($20, final_payment_received),
                final_payment_date = COALESCE($21, final_payment_date),
                payment_status = COALESCE($22, payment_status),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $23
            RETURNING *
            "#,
        )
        .bind(&changes.job_name)
        .bind(&changes.po_number)
        .bind(&changes.customer_name)
        .bind(&changes.product_type)
        .bind(changes.quantity)
        .bind(&changes.substrate)
        .bind(&changes.finishing)
        .bind(changes.due_date)
        .bind(changes.due_time)
        .bind(changes.priority.map(|p| p.as_str()))
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.machine_id)
        .bind(changes.scheduled_start)
        .bind(changes.scheduled_end)
        .bind(changes.total_cost)
        .bind(changes.deposit_required)
        .bind(changes.deposit_received)
        .bind(changes.deposit_date)
        .bind(changes.deposit_status.map(|s| s.as_str()))
        .bind(changes.final_payment_received)
        .bind(changes.final_payment_date)
        .bind(changes.payment_status.map(|s| s.as_str()))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a job; dependent alerts cascade at the schema level
    pub async fn delete(pool: &Pool<Postgres>, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the job status, returning the updated row
    pub async fn set_status(
        pool: &Pool<Postgres>,
        id: i32,
        status: &str,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            "UPDATE jobs SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Persist the outcome of a payment event
    pub async fn record_payment(
        pool: &Pool<Postgres>,
        id: i32,
        update: &PaymentUpdate,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        match update {
            PaymentUpdate::Deposit { received, status, date } => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    UPDATE jobs SET
                        deposit_received = $1,
                        deposit_date = $2,
                        deposit_status = $3,
                        updated_at = CURRENT_TIMESTAMP
                    WHERE id = $4
                    RETURNING *
                    "#,
                )
                .bind(received)
                .bind(date)
                .bind(status.as_str())
                .bind(id)
                .fetch_optional(pool)
                .await
            }
            PaymentUpdate::Final { received, status, date } => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    UPDATE jobs SET
                        final_payment_received = $1,
                        final_payment_date = $2,
                        payment_status = $3,
                        updated_at = CURRENT_TIMESTAMP
                    WHERE id = $4
                    RETURNING *
                    "#,
                )
                .bind(received)
                .bind(date)
                .bind(status.as_str())
                .bind(id)
                .fetch_optional(pool)
                .await
            }
        }
    }

    /// Insert a copy of an existing job with status and payment state reset
    pub async fn duplicate(pool: &Pool<Postgres>, src: &JobRow) -> Result<JobRow, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                job_name, po_number, customer_name, product_type, quantity,
                substrate, finishing, due_date, due_time, priority, total_cost, deposit_required,
                status, deposit_status, payment_status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(format!("{} (Copy)", src.job_name))
        .bind(&src.po_number)
        .bind(&src.customer_name)
        .bind(&src.product_type)
        .bind(src.quantity)
        .bind(&src.substrate)
        .bind(&src.finishing)
        .bind(src.due_date)
        .bind(src.due_time)
        .bind(&src.priority)
        .bind(src.total_cost)
        .bind(src.deposit_required)
        .bind("Not Started")
        .bind("Pending")
        .bind("Pending")
        .fetch_one(pool)
        .await
    }

    /// Load every job in one pass. The planner and the alert checker work
    /// from this snapshot instead of issuing per-row reads.
    pub async fn snapshot(pool: &Pool<Postgres>) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Write a batch of planner assignments in a single transaction
    pub async fn apply_assignments(
        pool: &Pool<Postgres>,
        assignments: &[Assignment],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for assignment in assignments {
            sqlx::query(
                r#"
                UPDATE jobs SET
                    machine_id = $1,
                    scheduled_start = $2,
                    scheduled_end = $3,
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = $4
                "#,
            )
            .bind(assignment.machine_id)
            .bind(assignment.scheduled_start)
            .bind(assignment.scheduled_end)
            .bind(assignment.job_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// Manual schedule override for a single job
    pub async fn update_schedule(
        pool: &Pool<Postgres>,
        id: i32,
        machine_id: Option<i32>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                machine_id = $1,
                scheduled_start = $2,
                scheduled_end = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(machine_id)
        .bind(start)
        .bind(end)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Non-completed jobs with machine info for the schedule board,
    /// optionally windowed on the scheduled times
    pub async fn list_schedule(
        pool: &Pool<Postgres>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<ScheduleRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT j.*, m.name AS machine_name, m.type AS machine_type,
                   m.compatibility AS machine_compatibility
            FROM jobs j
            LEFT JOIN machines m ON j.machine_id = m.id
            WHERE j.status != 'Completed'
            "#,
        );

        if let Some(start) = start {
            query.push(" AND j.scheduled_start >= ").push_bind(start);
        }
        if let Some(end) = end {
            query.push(" AND j.scheduled_end <= ").push_bind(end);
        }

        query.push(" ORDER BY j.scheduled_start ASC, j.priority DESC");

        query.build_query_as::<ScheduleRow>().fetch_all(pool).await
    }
}
