use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::job::models::{DepositStatus, JobStatus, Priority};
use crate::db::models::{JobRow, MachineRow};

/// One planned job-to-machine booking
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub job_id: i32,
    pub job_name: String,
    pub machine_id: i32,
    pub machine_name: String,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
}

/// Outcome of a planning pass over one snapshot
#[derive(Debug, Default)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
    /// Jobs that found no compatible machine
    pub skipped: Vec<i32>,
}

/// Estimated run time in hours: a per-product base plus half an hour
/// per thousand units
pub fn estimate_duration_hours(product_type: &str, quantity: i32) -> f64 {
    let base = match product_type.to_lowercase().as_str() {
        "business card" => 0.5,
        "brochure" => 1.0,
        "poster" => 1.5,
        "booklet" => 2.0,
        "flyer" => 0.5,
        "banner" => 2.0,
        "label" => 1.0,
        _ => 1.0,
    };
    base + (quantity as f64 / 1000.0) * 0.5
}

/// A machine with an empty compatibility list takes anything. Otherwise the
/// match is a case-insensitive substring test in either direction, so a
/// machine listing "Gloss" accepts a "100# Gloss" job and vice versa.
/// Intentionally fuzzy.
pub fn is_compatible(compatibility: &[String], substrate: &str) -> bool {
    if compatibility.is_empty() {
        return true;
    }
    let substrate = substrate.to_lowercase();
    compatibility.iter().any(|entry| {
        let entry = entry.to_lowercase();
        substrate.contains(&entry) || entry.contains(&substrate)
    })
}

/// A job qualifies for auto-scheduling when it is unstarted or ready, its
/// deposit has cleared, and no machine has been assigned yet
pub fn is_eligible(job: &JobRow) -> bool {
    matches!(
        JobStatus::parse(&job.status),
        Some(JobStatus::NotStarted) | Some(JobStatus::Ready)
    ) && DepositStatus::parse(&job.deposit_status) == Some(DepositStatus::Received)
        && job.machine_id.is_none()
}

/// Jobs sharing a substrate and finishing setup run together to keep
/// changeovers down. The finishing list is sorted before keying so that the
/// same set of operations always lands in the same group regardless of the
/// order it was entered in.
fn changeover_key(job: &JobRow) -> (String, Vec<String>) {
    let mut finishing = job.finishing.clone();
    finishing.sort();
    (job.substrate.clone(), finishing)
}

fn priority_rank(priority: &str) -> u8 {
    Priority::parse(priority).map(Priority::rank).unwrap_or(5)
}

/// Start of the work day used when a machine has no live backlog
fn work_day_anchor(now: NaiveDateTime) -> NaiveDateTime {
    let eight = NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time");
    let anchor = now.date().and_time(eight);
    if anchor < now { now } else { anchor }
}

/// Where the next booking on a machine can begin: directly after its current
/// backlog, or at the work-day anchor when the backlog is empty or stale
fn next_start(last_end: Option<NaiveDateTime>, now: NaiveDateTime) -> NaiveDateTime {
    match last_end {
        Some(end) if end >= now => end,
        _ => work_day_anchor(now),
    }
}

/// Plan assignments for every eligible job in the snapshot.
///
/// Greedy single pass: group by changeover key, sort each group by priority
/// then due date, and hand each job to the first compatible machine in name
/// order, booking it directly after that machine's latest scheduled end.
/// Already-assigned jobs are never touched; jobs with no compatible machine
/// are recorded as skipped and the pass continues.
pub fn plan(jobs: &[JobRow], machines: &[MachineRow], now: NaiveDateTime) -> Plan {
    let mut machines: Vec<&MachineRow> = machines.iter().collect();
    machines.sort_by(|a, b| a.name.cmp(&b.name));

    // Seed per-machine availability from existing non-completed bookings,
    // so this run stacks on top of what is already on the floor.
    let mut machine_free: HashMap<i32, NaiveDateTime> = HashMap::new();
    for job in jobs {
        if JobStatus::parse(&job.status) == Some(JobStatus::Completed) {
            continue;
        }
        if let (Some(machine_id), Some(end)) = (job.machine_id, job.scheduled_end) {
            let latest = machine_free.entry(machine_id).or_insert(end);
            if end > *latest {
                *latest = end;
            }
        }
    }

    // Group eligible jobs by changeover key, preserving first-seen order.
    let mut groups: Vec<((String, Vec<String>), Vec<&JobRow>)> = Vec::new();
    for job in jobs.iter().filter(|j| is_eligible(j)) {
        let key = changeover_key(job);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(job),
            None => groups.push((key, vec![job])),
        }
    }

    let mut plan = Plan::default();

    for (_, group) in groups.iter_mut() {
        group.sort_by(|a, b| {
            priority_rank(&a.priority)
                .cmp(&priority_rank(&b.priority))
                .then(a.due_date.cmp(&b.due_date))
        });

        for job in group.iter() {
            let Some(machine) = machines
                .iter()
                .find(|m| is_compatible(&m.compatibility, &job.substrate))
            else {
                plan.skipped.push(job.id);
                continue;
            };

            let duration = estimate_duration_hours(&job.product_type, job.quantity);
            let start = next_start(machine_free.get(&machine.id).copied(), now);
            let end = start + Duration::seconds((duration * 3600.0).round() as i64);
            machine_free.insert(machine.id, end);

            plan.assignments.push(Assignment {
                job_id: job.id,
                job_name: job.job_name.clone(),
                machine_id: machine.id,
                machine_name: machine.name.clone(),
                scheduled_start: start,
                scheduled_end: end,
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 5)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn job(id: i32) -> JobRow {
        JobRow {
            id,
            job_name: format!("Job {}", id),
            po_number: None,
            customer_name: "Acme".to_string(),
            product_type: "Flyer".to_string(),
            quantity: 1000,
            substrate: "Vinyl".to_string(),
            finishing: vec![],
            due_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            due_time: None,
            priority: "Medium".to_string(),
            status: "Not Started".to_string(),
            machine_id: None,
            scheduled_start: None,
            scheduled_end: None,
            total_cost: 100.0,
            deposit_required: 0.0,
            deposit_received: 0.0,
            deposit_date: None,
            deposit_status: "Received".to_string(),
            final_payment_received: 0.0,
            final_payment_date: None,
            payment_status: "Pending".to_string(),
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    fn machine(id: i32, name: &str, compatibility: &[&str]) -> MachineRow {
        MachineRow {
            id,
            name: name.to_string(),
            kind: "Digital Press".to_string(),
            compatibility: compatibility.iter().map(|s| s.to_string()).collect(),
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    #[test]
    fn duration_adds_half_hour_per_thousand_units() {
        assert_eq!(estimate_duration_hours("Poster", 2000), 2.5);
        assert_eq!(estimate_duration_hours("Unknown Type", 0), 1.0);
        assert_eq!(estimate_duration_hours("BUSINESS CARD", 1000), 1.0);
    }

    #[test]
    fn empty_compatibility_accepts_anything() {
        assert!(is_compatible(&[], "Vinyl"));
        assert!(is_compatible(&[], "100# Gloss"));
    }

    #[test]
    fn compatibility_is_bidirectional_substring_case_insensitive() {
        let gloss = vec!["Gloss".to_string()];
        assert!(is_compatible(&gloss, "100# Gloss"));

        let full = vec!["100# Gloss".to_string()];
        assert!(is_compatible(&full, "gloss"));

        let vinyl = vec!["VINYL".to_string()];
        assert!(is_compatible(&vinyl, "vinyl"));

        assert!(!is_compatible(&gloss, "Canvas"));
    }

    #[test]
    fn two_rush_jobs_stack_back_to_back_on_one_machine() {
        let mut a = job(1);
        a.priority = "Rush".to_string();
        let mut b = job(2);
        b.priority = "Rush".to_string();
        b.due_date = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();

        let machines = vec![machine(1, "Press A", &["Vinyl"])];
        let plan = plan(&[a, b], &machines, at(10, 0));

        assert_eq!(plan.assignments.len(), 2);
        assert_eq!(plan.assignments[0].job_id, 1);
        assert_eq!(plan.assignments[1].job_id, 2);
        assert_eq!(
            plan.assignments[1].scheduled_start,
            plan.assignments[0].scheduled_end
        );
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn incompatible_machine_is_never_assigned() {
        let mut a = job(1);
        a.substrate = "Canvas".to_string();

        let machines = vec![machine(1, "Labeler", &["Vinyl", "Photo Paper"])];
        let plan = plan(&[a], &machines, at(10, 0));

        assert!(plan.assignments.is_empty());
        assert_eq!(plan.skipped, vec![1]);
    }

    #[test]
    fn skipped_job_does_not_abort_the_batch() {
        let mut a = job(1);
        a.substrate = "Canvas".to_string();
        let b = job(2);

        let machines = vec![machine(1, "Press A", &["Vinyl"])];
        let plan = plan(&[a, b], &machines, at(10, 0));

        assert_eq!(plan.skipped, vec![1]);
        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].job_id, 2);
    }

    #[test]
    fn assigned_jobs_are_left_alone() {
        let mut a = job(1);
        a.machine_id = Some(1);
        a.scheduled_start = Some(at(9, 0));
        a.scheduled_end = Some(at(11, 0));

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[a], &machines, at(10, 0));

        assert!(plan.assignments.is_empty());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn pending_deposit_is_not_eligible() {
        let mut a = job(1);
        a.deposit_status = "Pending".to_string();

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[a], &machines, at(10, 0));

        assert!(plan.assignments.is_empty());
    }

    #[test]
    fn in_progress_and_completed_are_not_eligible() {
        let mut a = job(1);
        a.status = "In Progress".to_string();
        let mut b = job(2);
        b.status = "Completed".to_string();
        let mut c = job(3);
        c.status = "Ready".to_string();

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[a, b, c], &machines, at(10, 0));

        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].job_id, 3);
    }

    #[test]
    fn new_bookings_stack_after_existing_backlog() {
        let mut booked = job(1);
        booked.machine_id = Some(1);
        booked.status = "In Progress".to_string();
        booked.scheduled_start = Some(at(10, 0));
        booked.scheduled_end = Some(at(14, 0));

        let fresh = job(2);

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[booked, fresh], &machines, at(10, 0));

        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].scheduled_start, at(14, 0));
    }

    #[test]
    fn stale_backlog_falls_back_to_work_day_anchor() {
        // Backlog ended before "now": start over at the anchor, clamped to now.
        let mut booked = job(1);
        booked.machine_id = Some(1);
        booked.status = "In Progress".to_string();
        booked.scheduled_start = Some(at(6, 0));
        booked.scheduled_end = Some(at(7, 0));

        let fresh = job(2);

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[booked, fresh], &machines, at(10, 0));

        assert_eq!(plan.assignments[0].scheduled_start, at(10, 0));
    }

    #[test]
    fn idle_machine_starts_at_eight_before_the_work_day_opens() {
        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[job(1)], &machines, at(6, 30));

        assert_eq!(plan.assignments[0].scheduled_start, at(8, 0));
    }

    #[test]
    fn idle_machine_starts_now_once_past_eight() {
        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[job(1)], &machines, at(13, 45));

        assert_eq!(plan.assignments[0].scheduled_start, at(13, 45));
    }

    #[test]
    fn rush_jobs_run_before_lower_priorities_in_a_group() {
        let mut low = job(1);
        low.priority = "Low".to_string();
        let mut high = job(2);
        high.priority = "High".to_string();
        let mut rush = job(3);
        rush.priority = "Rush".to_string();

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[low, high, rush], &machines, at(10, 0));

        let order: Vec<i32> = plan.assignments.iter().map(|a| a.job_id).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn due_date_breaks_priority_ties() {
        let mut later = job(1);
        later.due_date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let mut sooner = job(2);
        sooner.due_date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[later, sooner], &machines, at(10, 0));

        let order: Vec<i32> = plan.assignments.iter().map(|a| a.job_id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn machines_are_scanned_in_name_order() {
        let machines = vec![
            machine(7, "Zeta Press", &["Vinyl"]),
            machine(3, "Alpha Press", &["Vinyl"]),
        ];
        let plan = plan(&[job(1)], &machines, at(10, 0));

        assert_eq!(plan.assignments[0].machine_name, "Alpha Press");
        assert_eq!(plan.assignments[0].machine_id, 3);
    }

    #[test]
    fn finishing_order_does_not_split_changeover_groups() {
        // Same finishing set entered in different orders must land in one
        // group, so the Rush job wins the group-internal sort even though the
        // Low job was seen first.
        let mut low = job(1);
        low.priority = "Low".to_string();
        low.finishing = vec!["Folding".to_string(), "UV Coating".to_string()];
        let mut rush = job(2);
        rush.priority = "Rush".to_string();
        rush.finishing = vec!["UV Coating".to_string(), "Folding".to_string()];

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[low, rush], &machines, at(10, 0));

        let order: Vec<i32> = plan.assignments.iter().map(|a| a.job_id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn different_finishing_sets_are_separate_groups() {
        // Distinct setups keep first-seen group order, so the Low job's group
        // schedules before the Rush job's group.
        let mut low = job(1);
        low.priority = "Low".to_string();
        low.finishing = vec!["Folding".to_string()];
        let mut rush = job(2);
        rush.priority = "Rush".to_string();
        rush.finishing = vec!["Die Cutting".to_string()];

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[low, rush], &machines, at(10, 0));

        let order: Vec<i32> = plan.assignments.iter().map(|a| a.job_id).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn no_machines_means_nothing_gets_scheduled() {
        let plan = plan(&[job(1), job(2)], &[], at(10, 0));
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.skipped, vec![1, 2]);
    }

    #[test]
    fn no_eligible_jobs_yields_an_empty_plan() {
        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[], &machines, at(10, 0));

        assert!(plan.assignments.is_empty());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn duration_feeds_the_booked_window() {
        // Poster, 2000 units: 1.5 + 1.0 = 2.5 hours.
        let mut a = job(1);
        a.product_type = "Poster".to_string();
        a.quantity = 2000;

        let machines = vec![machine(1, "Press A", &[])];
        let plan = plan(&[a], &machines, at(10, 0));

        assert_eq!(plan.assignments[0].scheduled_start, at(10, 0));
        assert_eq!(plan.assignments[0].scheduled_end, at(12, 30));
    }
}
