use chrono::Local;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::alerts::rules;
use crate::api::error::ServiceError;
use crate::api::job::models::JobStatus;
use crate::db::alert_repository::{AlertRepository, NewAlert};
use crate::db::job_repository::JobRepository;
use crate::db::machine_repository::MachineRepository;
use crate::db::models::AlertRow;
use crate::scheduler::EngineGate;

/// Alert service: CRUD plus the rule-based check pass
pub struct AlertService {
    pool: Pool<Postgres>,
}

impl AlertService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_alerts(&self, read: Option<bool>) -> Result<Vec<AlertRow>, ServiceError> {
        Ok(AlertRepository::list(&self.pool, read).await?)
    }

    pub async fn mark_read(&self, id: i32) -> Result<AlertRow, ServiceError> {
        AlertRepository::mark_read(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound("Alert", id))
    }

    pub async fn mark_all_read(&self) -> Result<u64, ServiceError> {
        Ok(AlertRepository::mark_all_read(&self.pool).await?)
    }

    /// Scan the current job and machine snapshot and raise at-risk, late and
    /// underutilization alerts. Duplicate alerts within their dedup window
    /// collapse onto the unique dedup_key index, so re-running the check is
    /// harmless.
    pub async fn check_alerts(&self, gate: &EngineGate) -> Result<u64, ServiceError> {
        let _guard = gate.acquire().await;

        let now = Local::now().naive_local();
        let today = now.date();

        let jobs = JobRepository::snapshot(&self.pool).await?;
        let machines = MachineRepository::list(&self.pool).await?;

        let mut created = 0;

        for job in jobs
            .iter()
            .filter(|j| JobStatus::parse(&j.status) != Some(JobStatus::Completed))
        {
            if rules::is_at_risk(job.due_date, today) {
                let alert = NewAlert {
                    kind: "at_risk",
                    message: rules::at_risk_message(job),
                    job_id: Some(job.id),
                    machine_id: None,
                    severity: "warning",
                    dedup_key: Some(rules::job_dedup_key("at_risk", job.id, today)),
                };
                created += AlertRepository::create(&self.pool, &alert).await?;
            }

            if rules::is_late(job.due_date, today) {
                let alert = NewAlert {
                    kind: "late",
                    message: rules::late_message(job),
                    job_id: Some(job.id),
                    machine_id: None,
                    severity: "error",
                    dedup_key: Some(rules::job_dedup_key("late", job.id, today)),
                };
                created += AlertRepository::create(&self.pool, &alert).await?;
            }
        }

        for machine in &machines {
            if rules::machine_is_idle(machine.id, &jobs, now) {
                let alert = NewAlert {
                    kind: "underutilization",
                    message: rules::underutilization_message(&machine.name),
                    job_id: None,
                    machine_id: Some(machine.id),
                    severity: "info",
                    dedup_key: Some(rules::machine_dedup_key(
                        "underutilization",
                        machine.id,
                        now,
                    )),
                };
                created += AlertRepository::create(&self.pool, &alert).await?;
            }
        }

        info!("Alert check completed: {} new alerts", created);
        Ok(created)
    }
}
