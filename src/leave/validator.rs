//! Admission checks for a new leave request. Performs no writes.

use chrono::NaiveDate;

use super::error::LeaveError;
use crate::model::leave_request::NewLeave;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct LeaveApplication {
    pub employee_id: u64,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
}

/// What the store knows about an applicant that holds a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applicant {
    pub employee_id: u64,
    pub current_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_days: i64,
    pub new_balance: i64,
    pub reason: String,
}

impl ValidatedRequest {
    pub fn into_new_leave(self, applied_on: NaiveDate) -> NewLeave {
        NewLeave {
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            leave_days: self.leave_days,
            remaining_days: self.new_balance,
            reason: self.reason,
            applied_on,
        }
    }
}

/// Strict `YYYY-MM-DD`. chrono alone accepts single digit months and days.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LeaveError> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shaped {
        return Err(LeaveError::InvalidDateFormat(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| LeaveError::InvalidDateFormat(raw.to_string()))
}

/// Inclusive day count.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// `applicant` is `None` when the employee or its credential is missing.
pub fn validate(
    applicant: Option<Applicant>,
    application: &LeaveApplication,
) -> Result<ValidatedRequest, LeaveError> {
    let applicant = applicant.ok_or(LeaveError::EmployeeNotFound(application.employee_id))?;

    let start_date = parse_date(&application.start_date)?;
    let end_date = parse_date(&application.end_date)?;

    let leave_days = leave_days(start_date, end_date);
    if leave_days < 1 {
        return Err(LeaveError::InvalidDateRange {
            start: application.start_date.clone(),
            end: application.end_date.clone(),
        });
    }

    if leave_days > applicant.current_balance {
        return Err(LeaveError::InsufficientBalance {
            requested: leave_days,
            available: applicant.current_balance,
        });
    }

    Ok(ValidatedRequest {
        employee_id: applicant.employee_id,
        start_date,
        end_date,
        leave_days,
        new_balance: applicant.current_balance - leave_days,
        reason: application.reason.clone(),
    })
}
