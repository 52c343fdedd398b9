use actix_web::{
    HttpResponse, get, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use validator::Validate;

use crate::api::error::ServiceError;
use crate::api::schedule::service::ScheduleService;
use crate::scheduler::EngineGate;

#[derive(Debug, Deserialize)]
struct ScheduleWindow {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Manual override payload; omitted fields clear the corresponding column
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleOverride {
    pub machine_id: Option<i32>,
    pub scheduled_start: Option<NaiveDateTime>,
    pub scheduled_end: Option<NaiveDateTime>,
}

#[get("")]
async fn get_schedule(
    service: Data<ScheduleService>,
    window: Query<ScheduleWindow>,
) -> Result<HttpResponse, ServiceError> {
    let start = window.start_date.and_then(|d| d.and_hms_opt(0, 0, 0));
    let end = window.end_date.and_then(|d| d.and_hms_opt(0, 0, 0));
    let schedule = service.list_schedule(start, end).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

#[post("/auto-schedule")]
async fn auto_schedule(
    service: Data<ScheduleService>,
    gate: Data<EngineGate>,
) -> Result<HttpResponse, ServiceError> {
    let run = service.auto_schedule(&gate).await?;
    Ok(HttpResponse::Ok().json(run))
}

#[put("/{job_id}")]
async fn update_schedule(
    service: Data<ScheduleService>,
    path: Path<i32>,
    payload: Json<ScheduleOverride>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .update_schedule(
            path.into_inner(),
            payload.machine_id,
            payload.scheduled_start,
            payload.scheduled_end,
        )
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

pub fn schedule_config(config: &mut ServiceConfig) {
    config.service(
        scope("/schedule")
            .service(get_schedule)
            .service(auto_schedule)
            .service(update_schedule),
    );
}
