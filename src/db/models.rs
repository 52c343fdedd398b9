use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a print job with all fields
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRow {
    pub id: i32,
    pub job_name: String,
    pub po_number: Option<String>,
    pub customer_name: String,
    pub product_type: String,
    pub quantity: i32,
    pub substrate: String,
    pub finishing: Vec<String>,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: String,
    pub status: String,
    pub machine_id: Option<i32>,
    pub scheduled_start: Option<NaiveDateTime>,
    pub scheduled_end: Option<NaiveDateTime>,
    pub total_cost: f64,
    pub deposit_required: f64,
    pub deposit_received: f64,
    pub deposit_date: Option<NaiveDate>,
    pub deposit_status: String,
    pub final_payment_received: f64,
    pub final_payment_date: Option<NaiveDate>,
    pub payment_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Job joined with the name/type of its assigned machine, if any
#[derive(Debug, FromRow, Serialize)]
pub struct JobWithMachineRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub machine_name: Option<String>,
    pub machine_type: Option<String>,
}

/// Schedule board entry: job plus assigned-machine details
#[derive(Debug, FromRow, Serialize)]
pub struct ScheduleRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub machine_name: Option<String>,
    pub machine_type: Option<String>,
    pub machine_compatibility: Option<Vec<String>>,
}

/// Database representation of a machine
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MachineRow {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub compatibility: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of an alert
#[derive(Debug, FromRow, Serialize)]
pub struct AlertRow {
    pub id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub job_id: Option<i32>,
    pub machine_id: Option<i32>,
    pub severity: String,
    pub read: bool,
    #[serde(skip_serializing)]
    pub dedup_key: Option<String>,
    pub created_at: NaiveDateTime,
}
