use actix_web::{
    HttpResponse, delete, get, patch, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::job::dto::{
    JobListFilter, MessageResponse, NewJob, PaymentRequest, StatusUpdate, UpdateJob,
};
use crate::api::job::service::JobService;

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    filter: Query<JobListFilter>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_jobs(&filter).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    job: Json<NewJob>,
) -> Result<HttpResponse, ServiceError> {
    let created = service.create_job(&job).await?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    path: Path<i32>,
    changes: Json<UpdateJob>,
) -> Result<HttpResponse, ServiceError> {
    let updated = service.update_job(path.into_inner(), &changes).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

#[patch("/{id}/status")]
async fn set_status(
    service: Data<JobService>,
    path: Path<i32>,
    update: Json<StatusUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.set_status(path.into_inner(), &update).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[patch("/{id}/payment")]
async fn apply_payment(
    service: Data<JobService>,
    path: Path<i32>,
    request: Json<PaymentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.apply_payment(path.into_inner(), &request).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[post("/{id}/duplicate")]
async fn duplicate_job(
    service: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let copy = service.duplicate_job(path.into_inner()).await?;
    Ok(HttpResponse::Created().json(copy))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job)
            .service(set_status)
            .service(apply_payment)
            .service(duplicate_job),
    );
}
