use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;

/// Service-level errors shared by all API areas
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Request was well-formed but semantically invalid
    ValidationError(String),

    /// Entity not found
    NotFound(&'static str, i32),

    /// A business rule rejected the operation
    PolicyViolation(String),

    /// A required resource is missing (e.g. no machines configured)
    ResourceUnavailable(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(what, id) => write!(f, "{} not found: {}", what, id),
            ServiceError::PolicyViolation(msg) => write!(f, "Policy violation: {}", msg),
            ServiceError::ResourceUnavailable(msg) => write!(f, "Resource unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::DatabaseError(e)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(what, id) => {
                warn!("{} not found: {}", what, id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("{} with id {} not found", what, id)}),
                })
            }
            ServiceError::PolicyViolation(msg) => {
                warn!("Policy violation: {}", msg);
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Operation not allowed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::ResourceUnavailable(msg) => {
                warn!("Resource unavailable: {}", msg);
                HttpResponse::ServiceUnavailable().json(ErrorResponse {
                    error: "Resource unavailable".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
        }
    }
}
