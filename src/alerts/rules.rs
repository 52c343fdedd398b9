use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::api::job::models::JobStatus;
use crate::db::models::JobRow;

/// Due within the next day (today or tomorrow) and not yet late
pub fn is_at_risk(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date >= today && due_date <= today + Duration::days(1)
}

/// Due date already passed
pub fn is_late(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

/// A machine is underutilized when none of its non-completed jobs start
/// within the next two hours
pub fn machine_is_idle(machine_id: i32, jobs: &[JobRow], now: NaiveDateTime) -> bool {
    let horizon = now + Duration::hours(2);
    !jobs.iter().any(|job| {
        job.machine_id == Some(machine_id)
            && JobStatus::parse(&job.status) != Some(JobStatus::Completed)
            && job
                .scheduled_start
                .map(|start| start >= now && start <= horizon)
                .unwrap_or(false)
    })
}

/// Dedup key for per-job alerts, bucketed by calendar day: at most one alert
/// of a kind per job per day
pub fn job_dedup_key(kind: &str, job_id: i32, today: NaiveDate) -> String {
    format!("{}:job:{}:{}", kind, job_id, today)
}

/// Dedup key for per-machine alerts, bucketed into two-hour windows
pub fn machine_dedup_key(kind: &str, machine_id: i32, now: NaiveDateTime) -> String {
    format!(
        "{}:machine:{}:{}-w{:02}",
        kind,
        machine_id,
        now.date(),
        now.hour() / 2
    )
}

pub fn at_risk_message(job: &JobRow) -> String {
    format!(
        "Job \"{}\" is at risk of missing its due date ({})",
        job.job_name, job.due_date
    )
}

pub fn late_message(job: &JobRow) -> String {
    format!(
        "Job \"{}\" is past its due date ({})",
        job.job_name, job.due_date
    )
}

pub fn underutilization_message(machine_name: &str) -> String {
    format!(
        "Machine \"{}\" has no jobs scheduled for the next 2 hours",
        machine_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn at(d: u32, hour: u32, min: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, min, 0).unwrap()
    }

    fn scheduled_job(id: i32, machine_id: i32, start: NaiveDateTime, status: &str) -> JobRow {
        JobRow {
            id,
            job_name: format!("Job {}", id),
            po_number: None,
            customer_name: "Acme".to_string(),
            product_type: "Flyer".to_string(),
            quantity: 500,
            substrate: "Vinyl".to_string(),
            finishing: vec![],
            due_date: day(10),
            due_time: None,
            priority: "Medium".to_string(),
            status: status.to_string(),
            machine_id: Some(machine_id),
            scheduled_start: Some(start),
            scheduled_end: Some(start + Duration::hours(1)),
            total_cost: 100.0,
            deposit_required: 0.0,
            deposit_received: 0.0,
            deposit_date: None,
            deposit_status: "Received".to_string(),
            final_payment_received: 0.0,
            final_payment_date: None,
            payment_status: "Pending".to_string(),
            created_at: at(1, 0, 0),
            updated_at: at(1, 0, 0),
        }
    }

    #[test]
    fn at_risk_covers_today_and_tomorrow_only() {
        let today = day(5);
        assert!(is_at_risk(day(5), today));
        assert!(is_at_risk(day(6), today));
        assert!(!is_at_risk(day(7), today));
        assert!(!is_at_risk(day(4), today));
    }

    #[test]
    fn late_means_due_date_in_the_past() {
        let today = day(5);
        assert!(is_late(day(4), today));
        assert!(!is_late(day(5), today));
        assert!(!is_late(day(6), today));
    }

    #[test]
    fn job_dedup_key_repeats_within_a_day_and_rolls_over() {
        // Two checks on the same day produce the same key, so the unique
        // index suppresses the second insert.
        let first = job_dedup_key("late", 42, day(5));
        let second = job_dedup_key("late", 42, day(5));
        assert_eq!(first, second);

        assert_ne!(first, job_dedup_key("late", 42, day(6)));
        assert_ne!(first, job_dedup_key("at_risk", 42, day(5)));
        assert_ne!(first, job_dedup_key("late", 43, day(5)));
    }

    #[test]
    fn machine_dedup_key_uses_two_hour_windows() {
        let first = machine_dedup_key("underutilization", 7, at(5, 10, 0));
        let same_window = machine_dedup_key("underutilization", 7, at(5, 11, 59));
        let next_window = machine_dedup_key("underutilization", 7, at(5, 12, 0));

        assert_eq!(first, same_window);
        assert_ne!(first, next_window);
    }

    #[test]
    fn machine_with_upcoming_job_is_not_idle() {
        let now = at(5, 10, 0);
        let jobs = vec![scheduled_job(1, 7, at(5, 11, 0), "Ready")];
        assert!(!machine_is_idle(7, &jobs, now));
    }

    #[test]
    fn machine_is_idle_when_next_job_is_beyond_two_hours() {
        let now = at(5, 10, 0);
        let jobs = vec![scheduled_job(1, 7, at(5, 13, 0), "Ready")];
        assert!(machine_is_idle(7, &jobs, now));
    }

    #[test]
    fn completed_jobs_do_not_count_as_utilization() {
        let now = at(5, 10, 0);
        let jobs = vec![scheduled_job(1, 7, at(5, 11, 0), "Completed")];
        assert!(machine_is_idle(7, &jobs, now));
    }

    #[test]
    fn other_machines_jobs_do_not_count() {
        let now = at(5, 10, 0);
        let jobs = vec![scheduled_job(1, 3, at(5, 11, 0), "Ready")];
        assert!(machine_is_idle(7, &jobs, now));
    }

    #[test]
    fn jobs_already_started_do_not_count_as_upcoming() {
        let now = at(5, 10, 0);
        let jobs = vec![scheduled_job(1, 7, at(5, 9, 0), "In Progress")];
        assert!(machine_is_idle(7, &jobs, now));
    }
}
