use sqlx::{Pool, Postgres};
use tracing::{error, info};

use crate::api::error::ServiceError;
use crate::api::job::dto::{JobListFilter, NewJob, PaymentRequest, StatusUpdate, UpdateJob};
use crate::api::job::models::{DepositStatus, Priority};
use crate::api::job::payment;
use crate::db::alert_repository::{AlertRepository, NewAlert};
use crate::db::job_repository::JobRepository;
use crate::db::models::{JobRow, JobWithMachineRow};

/// Job service containing the business logic around job CRUD,
/// status transitions and payment accumulation
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_jobs(
        &self,
        filter: &JobListFilter,
    ) -> Result<Vec<JobWithMachineRow>, ServiceError> {
        Ok(JobRepository::list(&self.pool, filter).await?)
    }

    pub async fn get_job(&self, id: i32) -> Result<JobWithMachineRow, ServiceError> {
        JobRepository::get(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound("Job", id))
    }

    /// Create a job. Rush jobs additionally raise a rush_job alert; a failed
    /// alert insert is logged and does not fail the creation.
    pub async fn create_job(&self, new: &NewJob) -> Result<JobRow, ServiceError> {
        let job = JobRepository::create(&self.pool, new).await?;
        info!("Created job id={} ({})", job.id, job.job_name);

        if new.priority == Priority::Rush {
            let alert = NewAlert {
                kind: "rush_job",
                message: format!(
                    "Rush job \"{}\" has been added with due date {}",
                    job.job_name, job.due_date
                ),
                job_id: Some(job.id),
                machine_id: None,
                severity: "warning",
                dedup_key: None,
            };
            if let Err(e) = AlertRepository::create(&self.pool, &alert).await {
                error!("Failed to create rush alert for job {}: {}", job.id, e);
            }
        }

        Ok(job)
    }

    pub async fn update_job(&self, id: i32, changes: &UpdateJob) -> Result<JobRow, ServiceError> {
        JobRepository::update(&self.pool, id, changes)
            .await?
            .ok_or(ServiceError::NotFound("Job", id))
    }

    pub async fn delete_job(&self, id: i32) -> Result<(), ServiceError> {
        if JobRepository::delete(&self.pool, id).await? {
            info!("Deleted job id={}", id);
            Ok(())
        } else {
            Err(ServiceError::NotFound("Job", id))
        }
    }

    /// Transition the job status, enforcing the deposit gate
    pub async fn set_status(&self, id: i32, update: &StatusUpdate) -> Result<JobRow, ServiceError> {
        let current = self.get_job(id).await?.job;
        let deposit_status =
            DepositStatus::parse(&current.deposit_status).unwrap_or(DepositStatus::Pending);

        payment::check_status_transition(update.status, deposit_status)?;

        JobRepository::set_status(&self.pool, id, update.status.as_str())
            .await?
            .ok_or(ServiceError::NotFound("Job", id))
    }

    /// Apply a deposit or final payment and recompute the derived status
    pub async fn apply_payment(
        &self,
        id: i32,
        request: &PaymentRequest,
    ) -> Result<JobRow, ServiceError> {
        let job = self.get_job(id).await?.job;
        let update = payment::apply_payment(&job, request.kind, request.amount, request.date)?;

        info!(
            "Recording {:?} payment of {} on job id={}",
            request.kind, request.amount, id
        );

        JobRepository::record_payment(&self.pool, id, &update)
            .await?
            .ok_or(ServiceError::NotFound("Job", id))
    }

    /// Copy a job, resetting status, scheduling and payment state
    pub async fn duplicate_job(&self, id: i32) -> Result<JobRow, ServiceError> {
        let src = self.get_job(id).await?.job;
        let copy = JobRepository::duplicate(&self.pool, &src).await?;
        info!("Duplicated job id={} as id={}", id, copy.id);
        Ok(copy)
    }
}
