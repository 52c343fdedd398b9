use actix_web::{
    HttpResponse, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use serde::{Deserialize, Serialize};

use crate::api::alert::service::AlertService;
use crate::api::error::ServiceError;
use crate::scheduler::EngineGate;

#[derive(Debug, Deserialize)]
struct AlertListFilter {
    read: Option<bool>,
}

#[derive(Serialize)]
struct CheckResponse {
    message: String,
    created: u64,
}

#[get("")]
async fn list_alerts(
    service: Data<AlertService>,
    filter: Query<AlertListFilter>,
) -> Result<HttpResponse, ServiceError> {
    let alerts = service.list_alerts(filter.read).await?;
    Ok(HttpResponse::Ok().json(alerts))
}

#[patch("/read-all")]
async fn mark_all_read(service: Data<AlertService>) -> Result<HttpResponse, ServiceError> {
    service.mark_all_read().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "All alerts marked as read"
    })))
}

#[patch("/{id}/read")]
async fn mark_read(
    service: Data<AlertService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let alert = service.mark_read(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(alert))
}

#[post("/check")]
async fn check_alerts(
    service: Data<AlertService>,
    gate: Data<EngineGate>,
) -> Result<HttpResponse, ServiceError> {
    let created = service.check_alerts(&gate).await?;
    Ok(HttpResponse::Ok().json(CheckResponse {
        message: "Alerts checked successfully".to_string(),
        created,
    }))
}

pub fn alert_config(config: &mut ServiceConfig) {
    // read-all registers before {id}/read so the literal path wins
    config.service(
        scope("/alerts")
            .service(list_alerts)
            .service(mark_all_read)
            .service(mark_read)
            .service(check_alerts),
    );
}
