use serde::{Deserialize, Serialize};

/// Job urgency. Rush sorts ahead of everything else in the scheduler.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Rush,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Rush => "Rush",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            "Rush" => Some(Priority::Rush),
            _ => None,
        }
    }

    /// Scheduling rank: lower runs first
    pub fn rank(self) -> u8 {
        match self {
            Priority::Rush => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
        }
    }
}

/// Production status of a job
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Ready,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::NotStarted => "Not Started",
            JobStatus::Ready => "Ready",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Not Started" => Some(JobStatus::NotStarted),
            "Ready" => Some(JobStatus::Ready),
            "In Progress" => Some(JobStatus::InProgress),
            "Completed" => Some(JobStatus::Completed),
            _ => None,
        }
    }
}

/// Whether the required deposit has been received in full
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum DepositStatus {
    Pending,
    Received,
}

impl DepositStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DepositStatus::Pending => "Pending",
            DepositStatus::Received => "Received",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(DepositStatus::Pending),
            "Received" => Some(DepositStatus::Received),
            _ => None,
        }
    }
}

/// Whether the balance after deposit has been paid in full
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

/// The two payment events a job can receive
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Deposit,
    Final,
}
