//! Read-side derivations over stored employees and leave rows, relative
//! to a caller supplied `today`.
//!
//! "Present" and "Overdue" are computed independently and may overlap: an
//! approved leave whose end date has passed without a return being recorded
//! counts the employee as present and as overdue at the same time.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{
    employee::Employee,
    leave_request::{LeaveRequest, LeaveStatus, Returned},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeLeave {
    pub employee: Employee,
    pub leave: LeaveRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PresentEmployee {
    pub employee: Employee,
    /// The request presence was judged on, if any.
    pub latest_leave: Option<LeaveRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NamedLeave {
    pub employee_name: String,
    pub leave: LeaveRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TallyRow {
    pub employee_id: u64,
    pub name: String,
    pub position: String,
    pub department: String,
    pub leave_id: u64,
    /// 1-based position of this leave among the employee's leaves.
    pub ordinal: u32,
    pub reason: String,
    pub leave_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeTotal {
    pub employee_id: u64,
    pub name: String,
    pub leave_count: u32,
    pub total_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveTally {
    pub rows: Vec<TallyRow>,
    pub totals: Vec<EmployeeTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveStatusSummary {
    pub employee_id: u64,
    pub latest_leave_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub remaining_days: i64,
    #[schema(value_type = Option<String>, example = "2024-01-05")]
    pub expected_return: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeaveNotice {
    pub leave_id: u64,
    pub status: LeaveStatus,
    pub message: String,
    /// Only set for approved leave: the first working day after it.
    #[schema(value_type = Option<String>, example = "2024-01-06")]
    pub return_on: Option<NaiveDate>,
}

fn directory(employees: &[Employee]) -> HashMap<u64, &Employee> {
    employees.iter().map(|e| (e.id, e)).collect()
}

/// Joins leave rows onto their employee, dropping orphans.
fn joined<'a>(
    employees: &'a [Employee],
    leaves: impl Iterator<Item = &'a LeaveRequest>,
) -> Vec<EmployeeLeave> {
    let by_id = directory(employees);
    leaves
        .filter_map(|leave| {
            by_id.get(&leave.employee_id).map(|employee| EmployeeLeave {
                employee: (*employee).clone(),
                leave: leave.clone(),
            })
        })
        .collect()
}

/// Approved and not returned, soonest back first.
pub fn on_leave(employees: &[Employee], leaves: &[LeaveRequest]) -> Vec<EmployeeLeave> {
    let mut rows = joined(employees, leaves.iter().filter(|l| l.is_active()));
    rows.sort_by_key(|row| row.leave.end_date);
    rows
}

pub fn overdue(
    employees: &[Employee],
    leaves: &[LeaveRequest],
    today: NaiveDate,
) -> Vec<EmployeeLeave> {
    let mut rows = joined(
        employees,
        leaves
            .iter()
            .filter(|l| l.is_active() && l.end_date < today),
    );
    rows.sort_by_key(|row| row.leave.end_date);
    rows
}

/// Decided requests only; a pending request says nothing about presence.
fn latest_decided<'a>(leaves: &'a [LeaveRequest], employee_id: u64) -> Option<&'a LeaveRequest> {
    leaves
        .iter()
        .filter(|l| l.employee_id == employee_id && l.status != LeaveStatus::Pending)
        .max_by_key(|l| l.id)
}

pub fn is_present(leave: Option<&LeaveRequest>, today: NaiveDate) -> bool {
    match leave {
        None => true,
        Some(leave) => leave.returned == Returned::Yes || leave.end_date < today,
    }
}

/// Ordered by name.
pub fn present(
    employees: &[Employee],
    leaves: &[LeaveRequest],
    today: NaiveDate,
) -> Vec<PresentEmployee> {
    let mut rows: Vec<PresentEmployee> = employees
        .iter()
        .filter_map(|employee| {
            let latest = latest_decided(leaves, employee.id);
            is_present(latest, today).then(|| PresentEmployee {
                employee: employee.clone(),
                latest_leave: latest.cloned(),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.employee.name.cmp(&b.employee.name));
    rows
}

/// Oldest application first.
pub fn pending(employees: &[Employee], leaves: &[LeaveRequest]) -> Vec<EmployeeLeave> {
    let mut rows = joined(
        employees,
        leaves.iter().filter(|l| l.status == LeaveStatus::Pending),
    );
    rows.sort_by_key(|row| (row.leave.applied_on, row.leave.id));
    rows
}

pub fn named(employees: &[Employee], leaves: &[LeaveRequest]) -> Vec<NamedLeave> {
    joined(employees, leaves.iter())
        .into_iter()
        .map(|row| NamedLeave {
            employee_name: row.employee.name,
            leave: row.leave,
        })
        .collect()
}

pub fn tally(employees: &[Employee], leaves: &[LeaveRequest]) -> LeaveTally {
    let mut ordered = joined(employees, leaves.iter());
    ordered.sort_by_key(|row| (row.employee.id, row.leave.start_date, row.leave.id));

    let mut totals: BTreeMap<u64, EmployeeTotal> = BTreeMap::new();
    let rows = ordered
        .into_iter()
        .map(|EmployeeLeave { employee, leave }| {
            let total = totals.entry(employee.id).or_insert_with(|| EmployeeTotal {
                employee_id: employee.id,
                name: employee.name.clone(),
                leave_count: 0,
                total_days: 0,
            });
            total.leave_count += 1;
            total.total_days += leave.leave_days;

            TallyRow {
                employee_id: employee.id,
                name: employee.name,
                position: employee.position,
                department: employee.department,
                leave_id: leave.id,
                ordinal: total.leave_count,
                reason: leave.reason,
                leave_days: leave.leave_days,
            }
        })
        .collect();

    LeaveTally {
        rows,
        totals: totals.into_values().collect(),
    }
}

/// `history` is one employee's rows in any order.
pub fn status_summary(employee_id: u64, history: &[LeaveRequest], balance: i64) -> LeaveStatusSummary {
    let latest = history.iter().max_by_key(|l| l.id);
    LeaveStatusSummary {
        employee_id,
        latest_leave_id: latest.map(|l| l.id),
        status: latest.map(|l| l.status),
        remaining_days: balance,
        expected_return: latest.map(|l| l.end_date),
    }
}

pub fn notice(latest: Option<&LeaveRequest>) -> Option<LeaveNotice> {
    let leave = latest?;
    let (message, return_on) = match leave.status {
        LeaveStatus::Approved => {
            let return_on = leave.end_date.checked_add_days(Days::new(1));
            let message = match return_on {
                Some(day) => format!("Please return to work on {day}"),
                None => format!("Please return after {}", leave.end_date),
            };
            (message, return_on)
        }
        LeaveStatus::Rejected => (
            "Your leave application was rejected. Please contact HR.".to_string(),
            None,
        ),
        LeaveStatus::Pending => (
            "Your leave application is currently pending approval.".to_string(),
            None,
        ),
    };

    Some(LeaveNotice {
        leave_id: leave.id,
        status: leave.status,
        message,
        return_on,
    })
}
