use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use crate::api::error::ServiceError;
use crate::db::job_repository::JobRepository;
use crate::db::machine_repository::MachineRepository;
use crate::db::models::{JobRow, ScheduleRow};
use crate::scheduler::planner;
use crate::scheduler::EngineGate;

/// Result of an auto-schedule run
#[derive(Serialize)]
pub struct ScheduleRunResponse {
    pub message: String,
    pub scheduled: usize,
    pub jobs: Vec<planner::Assignment>,
}

/// Schedule service: the schedule board plus the auto-scheduling run
pub struct ScheduleService {
    pool: Pool<Postgres>,
}

impl ScheduleService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_schedule(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<ScheduleRow>, ServiceError> {
        Ok(JobRepository::list_schedule(&self.pool, start, end).await?)
    }

    /// Run the auto-scheduler: snapshot jobs and machines, plan every
    /// assignment in memory, then persist the batch in one transaction.
    /// Serialized behind the engine gate so two runs cannot double-book
    /// a machine.
    pub async fn auto_schedule(&self, gate: &EngineGate) -> Result<ScheduleRunResponse, ServiceError> {
        let _guard = gate.acquire().await;

        let jobs = JobRepository::snapshot(&self.pool).await?;
        if !jobs.iter().any(planner::is_eligible) {
            return Ok(ScheduleRunResponse {
                message: "No jobs to schedule".to_string(),
                scheduled: 0,
                jobs: vec![],
            });
        }

        let machines = MachineRepository::list(&self.pool).await?;
        if machines.is_empty() {
            return Err(ServiceError::ResourceUnavailable(
                "No machines available".to_string(),
            ));
        }

        let now = Local::now().naive_local();
        let plan = planner::plan(&jobs, &machines, now);

        for job_id in &plan.skipped {
            warn!(
                "Could not schedule job {}: no compatible machine available",
                job_id
            );
        }

        JobRepository::apply_assignments(&self.pool, &plan.assignments).await?;

        info!(
            "Auto-schedule run complete: {} scheduled, {} skipped",
            plan.assignments.len(),
            plan.skipped.len()
        );

        Ok(ScheduleRunResponse {
            message: "Jobs scheduled successfully".to_string(),
            scheduled: plan.assignments.len(),
            jobs: plan.assignments,
        })
    }

    /// Manual drag-and-drop style override of a single job's booking
    pub async fn update_schedule(
        &self,
        job_id: i32,
        machine_id: Option<i32>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<JobRow, ServiceError> {
        JobRepository::update_schedule(&self.pool, job_id, machine_id, start, end)
            .await?
            .ok_or(ServiceError::NotFound("Job", job_id))
    }
}
