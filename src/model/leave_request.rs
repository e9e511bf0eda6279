use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Whether the employee is considered back at work for this request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum Returned {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 7,
    "start_date": "2024-01-01",
    "end_date": "2024-01-05",
    "leave_days": 5,
    "remaining_days": 15,
    "reason": "Family visit",
    "status": "Pending",
    "returned": "No",
    "applied_on": "2023-12-20",
    "actual_return_date": null
}))]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, example = "2024-01-01")]
    pub start_date: NaiveDate,
    /// Inclusive.
    #[schema(value_type = String, example = "2024-01-05")]
    pub end_date: NaiveDate,
    pub leave_days: i64,
    /// Balance right after this request was admitted.
    pub remaining_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub returned: Returned,
    #[schema(value_type = String, example = "2023-12-20")]
    pub applied_on: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub actual_return_date: Option<NaiveDate>,
}

impl LeaveRequest {
    pub fn is_active(&self) -> bool {
        self.status == LeaveStatus::Approved && self.returned == Returned::No
    }
}

/// A validated request ready to be persisted as a new Pending row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeave {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_days: i64,
    pub remaining_days: i64,
    pub reason: String,
    pub applied_on: NaiveDate,
}

impl NewLeave {
    pub fn into_pending(self, id: u64) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            leave_days: self.leave_days,
            remaining_days: self.remaining_days,
            reason: self.reason,
            status: LeaveStatus::Pending,
            returned: Returned::No,
            applied_on: self.applied_on,
            actual_return_date: None,
        }
    }
}
