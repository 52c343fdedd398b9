use chrono::NaiveDate;

use crate::api::error::ServiceError;
use crate::api::job::models::{DepositStatus, JobStatus, PaymentKind, PaymentStatus};
use crate::db::models::JobRow;

/// Field changes produced by a payment event, ready to persist
#[derive(Debug, PartialEq)]
pub enum PaymentUpdate {
    Deposit {
        received: f64,
        status: DepositStatus,
        date: NaiveDate,
    },
    Final {
        received: f64,
        status: PaymentStatus,
        date: NaiveDate,
    },
}

/// Accumulate a payment onto a job and derive the resulting status.
///
/// Deposits count toward `deposit_required`; final payments count toward the
/// balance remaining after deposits (`total_cost - deposit_received`). Both
/// accumulators only ever grow.
pub fn apply_payment(
    job: &JobRow,
    kind: PaymentKind,
    amount: f64,
    date: NaiveDate,
) -> Result<PaymentUpdate, ServiceError> {
    if amount <= 0.0 {
        return Err(ServiceError::ValidationError(
            "Payment amount must be positive".to_string(),
        ));
    }

    match kind {
        PaymentKind::Deposit => {
            let received = job.deposit_received + amount;
            let status = if received >= job.deposit_required {
                DepositStatus::Received
            } else {
                DepositStatus::Pending
            };
            Ok(PaymentUpdate::Deposit { received, status, date })
        }
        PaymentKind::Final => {
            let balance_due = job.total_cost - job.deposit_received;
            let received = job.final_payment_received + amount;
            let status = if received >= balance_due {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Pending
            };
            Ok(PaymentUpdate::Final { received, status, date })
        }
    }
}

/// The deposit gate: a job cannot be marked Ready until its deposit has been
/// received in full. Every other transition is allowed unconditionally.
pub fn check_status_transition(
    new_status: JobStatus,
    deposit_status: DepositStatus,
) -> Result<(), ServiceError> {
    if new_status == JobStatus::Ready && deposit_status != DepositStatus::Received {
        return Err(ServiceError::PolicyViolation(
            "Job cannot be marked Ready until the required deposit has been received".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn job(total_cost: f64, deposit_required: f64, deposit_received: f64, final_received: f64) -> JobRow {
        let ts = NaiveDateTime::parse_from_str("2026-08-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        JobRow {
            id: 1,
            job_name: "Business cards for Acme".to_string(),
            po_number: None,
            customer_name: "Acme".to_string(),
            product_type: "Business Card".to_string(),
            quantity: 500,
            substrate: "Cardstock".to_string(),
            finishing: vec![],
            due_date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            due_time: None,
            priority: "Medium".to_string(),
            status: "Not Started".to_string(),
            machine_id: None,
            scheduled_start: None,
            scheduled_end: None,
            total_cost,
            deposit_required,
            deposit_received,
            deposit_date: None,
            deposit_status: "Pending".to_string(),
            final_payment_received: final_received,
            final_payment_date: None,
            payment_status: "Pending".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn deposit_accumulates_and_flips_to_received() {
        let job = job(500.0, 100.0, 60.0, 0.0);
        let update = apply_payment(&job, PaymentKind::Deposit, 50.0, date()).unwrap();
        assert_eq!(
            update,
            PaymentUpdate::Deposit {
                received: 110.0,
                status: DepositStatus::Received,
                date: date(),
            }
        );
    }

    #[test]
    fn partial_deposit_stays_pending() {
        let job = job(500.0, 100.0, 0.0, 0.0);
        let update = apply_payment(&job, PaymentKind::Deposit, 99.0, date()).unwrap();
        match update {
            PaymentUpdate::Deposit { received, status, .. } => {
                assert_eq!(received, 99.0);
                assert_eq!(status, DepositStatus::Pending);
            }
            other => panic!("expected deposit update, got {:?}", other),
        }
    }

    #[test]
    fn deposit_received_exactly_at_required_counts() {
        let job = job(500.0, 100.0, 60.0, 0.0);
        let update = apply_payment(&job, PaymentKind::Deposit, 40.0, date()).unwrap();
        match update {
            PaymentUpdate::Deposit { received, status, .. } => {
                assert_eq!(received, 100.0);
                assert_eq!(status, DepositStatus::Received);
            }
            other => panic!("expected deposit update, got {:?}", other),
        }
    }

    #[test]
    fn final_payment_paid_when_balance_covered() {
        // balance due = 500 - 100 = 400
        let job = job(500.0, 100.0, 100.0, 0.0);
        let update = apply_payment(&job, PaymentKind::Final, 400.0, date()).unwrap();
        match update {
            PaymentUpdate::Final { received, status, .. } => {
                assert_eq!(received, 400.0);
                assert_eq!(status, PaymentStatus::Paid);
            }
            other => panic!("expected final update, got {:?}", other),
        }
    }

    #[test]
    fn final_payment_below_balance_stays_pending() {
        let job = job(500.0, 100.0, 100.0, 0.0);
        let update = apply_payment(&job, PaymentKind::Final, 399.0, date()).unwrap();
        match update {
            PaymentUpdate::Final { received, status, .. } => {
                assert_eq!(received, 399.0);
                assert_eq!(status, PaymentStatus::Pending);
            }
            other => panic!("expected final update, got {:?}", other),
        }
    }

    #[test]
    fn final_payments_accumulate_across_events() {
        let job = job(500.0, 100.0, 100.0, 350.0);
        let update = apply_payment(&job, PaymentKind::Final, 50.0, date()).unwrap();
        match update {
            PaymentUpdate::Final { received, status, .. } => {
                assert_eq!(received, 400.0);
                assert_eq!(status, PaymentStatus::Paid);
            }
            other => panic!("expected final update, got {:?}", other),
        }
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let job = job(500.0, 100.0, 0.0, 0.0);
        assert!(apply_payment(&job, PaymentKind::Deposit, 0.0, date()).is_err());
        assert!(apply_payment(&job, PaymentKind::Final, -25.0, date()).is_err());
    }

    #[test]
    fn ready_requires_deposit_received() {
        assert!(check_status_transition(JobStatus::Ready, DepositStatus::Pending).is_err());
        assert!(check_status_transition(JobStatus::Ready, DepositStatus::Received).is_ok());
    }

    #[test]
    fn other_transitions_ignore_deposit_state() {
        // Only the Ready gate exists; anything else passes regardless.
        assert!(check_status_transition(JobStatus::NotStarted, DepositStatus::Pending).is_ok());
        assert!(check_status_transition(JobStatus::InProgress, DepositStatus::Pending).is_ok());
        assert!(check_status_transition(JobStatus::Completed, DepositStatus::Pending).is_ok());
    }
}
