use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::auth::password::PasswordError;
use crate::model::leave_request::LeaveStatus;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("employee {0} not found")]
    EmployeeNotFound(u64),
    #[error("leave request {0} not found")]
    LeaveNotFound(u64),
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },
    #[error("insufficient leave balance: requested {requested} days, {available} available")]
    InsufficientBalance { requested: i64, available: i64 },
    #[error("cannot move leave from {current} to {attempted}")]
    InvalidStateTransition {
        current: LeaveStatus,
        attempted: LeaveStatus,
    },
    #[error("no fields to update")]
    NoFieldsToUpdate,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Credential(#[from] PasswordError),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl LeaveError {
    fn kind(&self) -> &'static str {
        match self {
            LeaveError::EmployeeNotFound(_) => "EmployeeNotFound",
            LeaveError::LeaveNotFound(_) => "LeaveNotFound",
            LeaveError::InvalidDateFormat(_) => "InvalidDateFormat",
            LeaveError::InvalidDateRange { .. } => "InvalidDateRange",
            LeaveError::InsufficientBalance { .. } => "InsufficientBalance",
            LeaveError::InvalidStateTransition { .. } => "InvalidStateTransition",
            LeaveError::NoFieldsToUpdate => "NoFieldsToUpdate",
            LeaveError::InvalidCredentials => "InvalidCredentials",
            LeaveError::Credential(_) => "Credential",
            LeaveError::StoreUnavailable(_) => "StoreUnavailable",
        }
    }
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::EmployeeNotFound(_) | LeaveError::LeaveNotFound(_) => StatusCode::NOT_FOUND,
            LeaveError::InvalidDateFormat(_)
            | LeaveError::InvalidDateRange { .. }
            | LeaveError::InsufficientBalance { .. }
            | LeaveError::NoFieldsToUpdate => StatusCode::BAD_REQUEST,
            LeaveError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            LeaveError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LeaveError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LeaveError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });

        match self {
            LeaveError::InsufficientBalance {
                requested,
                available,
            } => {
                body["requested"] = json!(requested);
                body["available"] = json!(available);
            }
            LeaveError::InvalidStateTransition { current, attempted } => {
                body["current"] = json!(current);
                body["attempted"] = json!(attempted);
            }
            LeaveError::StoreUnavailable(e) => {
                // client sees a generic message; driver detail goes to the log
                tracing::error!(error = %e, "Store failure surfaced to client");
                body["message"] = json!("Service temporarily unavailable");
            }
            LeaveError::Credential(e) => {
                tracing::error!(error = %e, "Credential failure surfaced to client");
                body["message"] = json!("Internal Server Error");
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}
