use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::api::analytics::dto::{
    AnalyticsResponse, CompletionRate, CustomerRevenue, MachineUtilization, MonthlyRevenue,
    ProductRevenue, RevenueSummary, StatusCount,
};
use crate::api::error::ServiceError;
use crate::db::models::JobWithMachineRow;

/// Analytics service: read-only aggregates for the dashboard.
/// All queries run against the jobs/machines tables directly; an optional
/// due-date window narrows the job-based aggregates.
pub struct AnalyticsService {
    pool: Pool<Postgres>,
}

type DateWindow = Option<(NaiveDate, NaiveDate)>;

fn push_due_window(query: &mut QueryBuilder<'_, Postgres>, window: DateWindow) {
    if let Some((start, end)) = window {
        query
            .push(" WHERE due_date BETWEEN ")
            .push_bind(start)
            .push(" AND ")
            .push_bind(end);
    }
}

impl AnalyticsService {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn overview(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<AnalyticsResponse, ServiceError> {
        let window = start_date.zip(end_date);

        Ok(AnalyticsResponse {
            completion_rate: self.completion_rate(window).await?,
            utilization: self.utilization().await?,
            late_jobs: self.late_jobs().await?,
            status_breakdown: self.status_breakdown(window).await?,
            revenue: self.revenue_summary(window).await?,
            revenue_by_customer: self.revenue_by_customer(window).await?,
            revenue_by_product: self.revenue_by_product(window).await?,
            revenue_by_month: self.revenue_by_month().await?,
        })
    }

    async fn completion_rate(&self, window: DateWindow) -> Result<CompletionRate, ServiceError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'Completed' AND due_date >= CURRENT_DATE THEN 1 ELSE 0 END), 0) AS on_time,
                COALESCE(SUM(CASE WHEN status = 'Completed' AND due_date < CURRENT_DATE THEN 1 ELSE 0 END), 0) AS late
            FROM jobs
            "#,
        );
        push_due_window(&mut query, window);

        Ok(query
            .build_query_as::<CompletionRate>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn utilization(&self) -> Result<Vec<MachineUtilization>, ServiceError> {
        Ok(sqlx::query_as::<_, MachineUtilization>(
            r#"
            SELECT
                m.id,
                m.name,
                m.type,
                COUNT(j.id) AS job_count,
                (SUM(EXTRACT(EPOCH FROM (j.scheduled_end - j.scheduled_start)) / 3600.0))::double precision AS total_hours
            FROM machines m
            LEFT JOIN jobs j ON m.id = j.machine_id AND j.status != 'Completed'
            GROUP BY m.id, m.name, m.type
            ORDER BY m.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn late_jobs(&self) -> Result<Vec<JobWithMachineRow>, ServiceError> {
        Ok(sqlx::query_as::<_, JobWithMachineRow>(
            r#"
            SELECT j.*, m.name AS machine_name, m.type AS machine_type
            FROM jobs j
            LEFT JOIN machines m ON j.machine_id = m.id
            WHERE j.due_date < CURRENT_DATE AND j.status != 'Completed'
            ORDER BY j.due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn status_breakdown(&self, window: DateWindow) -> Result<Vec<StatusCount>, ServiceError> {
        let mut query = QueryBuilder::new("SELECT status, COUNT(*) AS count FROM jobs");
        push_due_window(&mut query, window);
        query.push(" GROUP BY status");

        Ok(query
            .build_query_as::<StatusCount>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn revenue_summary(&self, window: DateWindow) -> Result<RevenueSummary, ServiceError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                COALESCE(SUM(total_cost), 0) AS total_revenue,
                COALESCE(SUM(CASE WHEN payment_status = 'Paid' THEN total_cost ELSE 0 END), 0) AS paid_revenue,
                COALESCE(SUM(CASE WHEN deposit_status = 'Received' THEN deposit_received ELSE 0 END), 0) AS deposit_revenue,
                COALESCE(SUM(CASE WHEN payment_status = 'Paid' THEN total_cost ELSE deposit_received END), 0) AS collected_revenue,
                COALESCE(SUM(CASE WHEN payment_status != 'Paid' AND deposit_status = 'Received' THEN (total_cost - deposit_received) ELSE 0 END), 0) AS pending_revenue,
                COUNT(*) AS total_jobs,
                COALESCE(AVG(total_cost), 0) AS avg_job_value
            FROM jobs
            "#,
        );
        push_due_window(&mut query, window);

        Ok(query
            .build_query_as::<RevenueSummary>()
            .fetch_one(&self.pool)
            .await?)
    }

    async fn revenue_by_customer(
        &self,
        window: DateWindow,
    ) -> Result<Vec<CustomerRevenue>, ServiceError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                customer_name,
                COUNT(*) AS job_count,
                COALESCE(SUM(total_cost), 0) AS total_revenue,
                COALESCE(SUM(CASE WHEN payment_status = 'Paid' THEN total_cost ELSE 0 END), 0) AS paid_revenue
            FROM jobs
            "#,
        );
        push_due_window(&mut query, window);
        query.push(" GROUP BY customer_name ORDER BY total_revenue DESC LIMIT 10");

        Ok(query
            .build_query_as::<CustomerRevenue>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn revenue_by_product(
        &self,
        window: DateWindow,
    ) -> Result<Vec<ProductRevenue>, ServiceError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                product_type,
                COUNT(*) AS job_count,
                COALESCE(SUM(total_cost), 0) AS total_revenue,
                COALESCE(AVG(total_cost), 0) AS avg_revenue
            FROM jobs
            "#,
        );
        push_due_window(&mut query, window);
        query.push(" GROUP BY product_type ORDER BY total_revenue DESC");

        Ok(query
            .build_query_as::<ProductRevenue>()
            .fetch_all(&self.pool)
            .await?)
    }

    /// Revenue per calendar month over the trailing half year
    async fn revenue_by_month(&self) -> Result<Vec<MonthlyRevenue>, ServiceError> {
        Ok(sqlx::query_as::<_, MonthlyRevenue>(
            r#"
            SELECT
                TO_CHAR(created_at, 'YYYY-MM') AS month,
                COUNT(*) AS job_count,
                COALESCE(SUM(total_cost), 0) AS total_revenue,
                COALESCE(SUM(CASE WHEN payment_status = 'Paid' THEN total_cost ELSE 0 END), 0) AS paid_revenue
            FROM jobs
            WHERE created_at >= CURRENT_DATE - INTERVAL '6 months'
            GROUP BY TO_CHAR(created_at, 'YYYY-MM')
            ORDER BY month DESC
            LIMIT 6
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
