use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::api::job::dto::MessageResponse;
use crate::api::machine::dto::MachineInput;
use crate::api::machine::service::MachineService;

#[get("")]
async fn list_machines(service: Data<MachineService>) -> Result<HttpResponse, ServiceError> {
    let machines = service.list_machines().await?;
    Ok(HttpResponse::Ok().json(machines))
}

#[get("/{id}")]
async fn get_machine(
    service: Data<MachineService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let machine = service.get_machine(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(machine))
}

#[post("")]
async fn create_machine(
    service: Data<MachineService>,
    input: Json<MachineInput>,
) -> Result<HttpResponse, ServiceError> {
    let machine = service.create_machine(&input).await?;
    Ok(HttpResponse::Created().json(machine))
}

#[put("/{id}")]
async fn update_machine(
    service: Data<MachineService>,
    path: Path<i32>,
    input: Json<MachineInput>,
) -> Result<HttpResponse, ServiceError> {
    let machine = service.update_machine(path.into_inner(), &input).await?;
    Ok(HttpResponse::Ok().json(machine))
}

#[delete("/{id}")]
async fn delete_machine(
    service: Data<MachineService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    service.delete_machine(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Machine deleted successfully".to_string(),
    }))
}

pub fn machine_config(config: &mut ServiceConfig) {
    config.service(
        scope("/machines")
            .service(list_machines)
            .service(create_machine)
            .service(get_machine)
            .service(update_machine)
            .service(delete_machine),
    );
}
