pub mod alert;
pub mod analytics;
pub mod error;
pub mod health;
pub mod job;
pub mod machine;
pub mod schedule;
pub mod validation;
