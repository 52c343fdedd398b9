use sqlx::{Pool, Postgres};
use tracing::info;

use crate::api::error::ServiceError;
use crate::api::machine::dto::MachineInput;
use crate::db::machine_repository::MachineRepository;
use crate::db::models::MachineRow;

/// Machine service: plain CRUD over the machine pool
pub struct MachineService {
    pool: Pool<Postgres>,
}

impl MachineService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_machines(&self) -> Result<Vec<MachineRow>, ServiceError> {
        Ok(MachineRepository::list(&self.pool).await?)
    }

    pub async fn get_machine(&self, id: i32) -> Result<MachineRow, ServiceError> {
        MachineRepository::get(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound("Machine", id))
    }

    pub async fn create_machine(&self, input: &MachineInput) -> Result<MachineRow, ServiceError> {
        let machine = MachineRepository::create(&self.pool, input).await?;
        info!("Created machine id={} ({})", machine.id, machine.name);
        Ok(machine)
    }

    pub async fn update_machine(
        &self,
        id: i32,
        input: &MachineInput,
    ) -> Result<MachineRow, ServiceError> {
        MachineRepository::update(&self.pool, id, input)
            .await?
            .ok_or(ServiceError::NotFound("Machine", id))
    }

    /// Delete a machine; jobs assigned to it become unassigned again
    pub async fn delete_machine(&self, id: i32) -> Result<(), ServiceError> {
        if MachineRepository::delete(&self.pool, id).await? {
            info!("Deleted machine id={}", id);
            Ok(())
        } else {
            Err(ServiceError::NotFound("Machine", id))
        }
    }
}
