use actix_web::{
    HttpResponse, get,
    web::{Data, Query, ServiceConfig, scope},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::analytics::service::AnalyticsService;
use crate::api::error::ServiceError;

#[derive(Debug, Deserialize)]
struct AnalyticsWindow {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[get("")]
async fn get_analytics(
    service: Data<AnalyticsService>,
    window: Query<AnalyticsWindow>,
) -> Result<HttpResponse, ServiceError> {
    let overview = service.overview(window.start_date, window.end_date).await?;
    Ok(HttpResponse::Ok().json(overview))
}

pub fn analytics_config(config: &mut ServiceConfig) {
    config.service(scope("/analytics").service(get_analytics));
}
