use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::job::models::{
    DepositStatus, JobStatus, PaymentKind, PaymentStatus, Priority,
};

/// Payload for creating a job
#[derive(Debug, Deserialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, max = 255, message = "Job name is required"))]
    pub job_name: String,
    pub po_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 100, message = "Product type is required"))]
    pub product_type: String,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 255, message = "Substrate is required"))]
    pub substrate: String,
    #[serde(default)]
    pub finishing: Vec<String>,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Total cost cannot be negative"))]
    pub total_cost: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Deposit required cannot be negative"))]
    pub deposit_required: f64,
}

/// Payload for a partial job update; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateJob {
    #[validate(length(min = 1, max = 255))]
    pub job_name: Option<String>,
    pub po_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub product_type: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub substrate: Option<String>,
    pub finishing: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: Option<Priority>,
    pub status: Option<JobStatus>,
    pub machine_id: Option<i32>,
    pub scheduled_start: Option<NaiveDateTime>,
    pub scheduled_end: Option<NaiveDateTime>,
    #[validate(range(min = 0.0))]
    pub total_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deposit_required: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deposit_received: Option<f64>,
    pub deposit_date: Option<NaiveDate>,
    pub deposit_status: Option<DepositStatus>,
    #[validate(range(min = 0.0))]
    pub final_payment_received: Option<f64>,
    pub final_payment_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
}

/// Payload for the status transition endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    pub status: JobStatus,
}

/// Payload for recording a payment event
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentRequest {
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,
    pub date: NaiveDate,
}

/// Query-string filters for the job list
#[derive(Debug, Default, Deserialize)]
pub struct JobListFilter {
    pub status: Option<String>,
    pub customer: Option<String>,
    pub machine_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Generic confirmation body for deletes and bulk updates
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
