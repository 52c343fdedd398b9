use serde::Serialize;
use sqlx::FromRow;

use crate::db::models::JobWithMachineRow;

/// On-time vs late counts over completed jobs
#[derive(Debug, FromRow, Serialize)]
pub struct CompletionRate {
    pub total: i64,
    pub on_time: i64,
    pub late: i64,
}

/// Open workload per machine
#[derive(Debug, FromRow, Serialize)]
pub struct MachineUtilization {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub job_count: i64,
    /// Sum of scheduled hours across non-completed jobs; null when none
    pub total_hours: Option<f64>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Shop-wide revenue aggregates
#[derive(Debug, FromRow, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub paid_revenue: f64,
    pub deposit_revenue: f64,
    pub collected_revenue: f64,
    pub pending_revenue: f64,
    pub total_jobs: i64,
    pub avg_job_value: f64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct CustomerRevenue {
    pub customer_name: String,
    pub job_count: i64,
    pub total_revenue: f64,
    pub paid_revenue: f64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct ProductRevenue {
    pub product_type: String,
    pub job_count: i64,
    pub total_revenue: f64,
    pub avg_revenue: f64,
}

#[derive(Debug, FromRow, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub job_count: i64,
    pub total_revenue: f64,
    pub paid_revenue: f64,
}

/// Everything the dashboard needs in one response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub completion_rate: CompletionRate,
    pub utilization: Vec<MachineUtilization>,
    pub late_jobs: Vec<JobWithMachineRow>,
    pub status_breakdown: Vec<StatusCount>,
    pub revenue: RevenueSummary,
    pub revenue_by_customer: Vec<CustomerRevenue>,
    pub revenue_by_product: Vec<ProductRevenue>,
    pub revenue_by_month: Vec<MonthlyRevenue>,
}
