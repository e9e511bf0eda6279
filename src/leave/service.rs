//! The operations collaborators call. Each one runs in exactly one store
//! transaction: read, validate, write, commit. Any early return drops the
//! transaction and with it every write made so far.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::balance::current_balance;
use super::error::LeaveError;
use super::state_machine::{self, Decision};
use super::tracker::{self, EmployeeLeave, LeaveNotice, LeaveStatusSummary, LeaveTally, NamedLeave, PresentEmployee};
use super::validator::{self, Applicant, LeaveApplication};
use crate::auth::password::{generate_initial_password, hash_password, verify_password};
use crate::model::{
    credential::{Credential, IssuedCredential},
    employee::{Employee, EmployeePatch, NewEmployee},
    leave_request::LeaveRequest,
    ledger::NewLedgerEntry,
};
use crate::store::{LeaveStore, StoreTx};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeDetails {
    pub employee: Employee,
    /// Most recent first.
    pub leave_history: Vec<LeaveRequest>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub leave_balance: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedEmployee {
    pub employee: Employee,
    pub credential: IssuedCredential,
}

pub struct LeaveService<S> {
    store: S,
}

impl<S: LeaveStore> LeaveService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /* =========================
    Leave lifecycle
    ========================= */

    #[instrument(name = "apply_leave", skip(self, application), fields(employee_id = application.employee_id))]
    pub async fn apply_leave(
        &self,
        application: LeaveApplication,
        now: NaiveDateTime,
    ) -> Result<LeaveRequest, LeaveError> {
        let employee_id = application.employee_id;
        let mut tx = self.store.begin().await?;

        // Holding the employee row serialises concurrent applies so two
        // requests cannot both spend the same balance.
        let known = tx.lock_employee(employee_id).await?.is_some()
            && tx.credential(employee_id).await?.is_some();
        let applicant = if known {
            Some(Applicant {
                employee_id,
                current_balance: current_balance(&mut tx, employee_id).await?,
            })
        } else {
            None
        };

        let validated = validator::validate(applicant, &application).inspect_err(|e| {
            warn!(error = %e, "Leave application refused");
        })?;

        let leave_days = validated.leave_days;
        let new_balance = validated.new_balance;
        let leave = tx
            .insert_leave(&validated.into_new_leave(now.date()))
            .await?;
        tx.append_ledger(&NewLedgerEntry {
            employee_id,
            leave_id: leave.id,
            delta: -leave_days,
            resulting_balance: new_balance,
            recorded_at: now,
        })
        .await?;
        tx.commit().await?;

        info!(leave_id = leave.id, leave_days, new_balance, "Leave application submitted");
        Ok(leave)
    }

    pub async fn approve_leave(&self, leave_id: u64) -> Result<LeaveRequest, LeaveError> {
        self.decide(leave_id, Decision::Approve).await
    }

    pub async fn reject_leave(&self, leave_id: u64) -> Result<LeaveRequest, LeaveError> {
        self.decide(leave_id, Decision::Reject).await
    }

    #[instrument(skip(self))]
    async fn decide(&self, leave_id: u64, decision: Decision) -> Result<LeaveRequest, LeaveError> {
        let mut tx = self.store.begin().await?;
        let mut leave = tx
            .lock_leave(leave_id)
            .await?
            .ok_or(LeaveError::LeaveNotFound(leave_id))?;

        let transition = state_machine::decide(leave.status, decision).inspect_err(|e| {
            warn!(error = %e, "Leave decision refused");
        })?;

        tx.set_leave_status(leave_id, transition.status, transition.returned)
            .await?;
        tx.commit().await?;

        leave.status = transition.status;
        leave.returned = transition.returned;
        info!(employee_id = leave.employee_id, status = %leave.status, "Leave decided");
        Ok(leave)
    }

    pub async fn get_balance(&self, employee_id: u64) -> Result<i64, LeaveError> {
        let mut tx = self.store.begin().await?;
        tx.employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        Ok(current_balance(&mut tx, employee_id).await?)
    }

    /// Most recent first.
    pub async fn leave_history(&self, employee_id: u64) -> Result<Vec<LeaveRequest>, LeaveError> {
        let mut tx = self.store.begin().await?;
        tx.employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        let mut leaves = tx.leaves_for(employee_id).await?;
        leaves.reverse();
        Ok(leaves)
    }

    pub async fn leave_status(&self, employee_id: u64) -> Result<LeaveStatusSummary, LeaveError> {
        let mut tx = self.store.begin().await?;
        tx.employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        let history = tx.leaves_for(employee_id).await?;
        let balance = current_balance(&mut tx, employee_id).await?;
        Ok(tracker::status_summary(employee_id, &history, balance))
    }

    pub async fn notification(&self, employee_id: u64) -> Result<Option<LeaveNotice>, LeaveError> {
        let history = self.leave_history(employee_id).await?;
        Ok(tracker::notice(history.first()))
    }

    /* =========================
    Reports
    ========================= */

    async fn snapshot(&self) -> Result<(Vec<Employee>, Vec<LeaveRequest>), LeaveError> {
        let mut tx = self.store.begin().await?;
        let employees = tx.employees().await?;
        let leaves = tx.all_leaves().await?;
        Ok((employees, leaves))
    }

    pub async fn list_on_leave(&self) -> Result<Vec<EmployeeLeave>, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::on_leave(&employees, &leaves))
    }

    pub async fn list_overdue(&self, today: NaiveDate) -> Result<Vec<EmployeeLeave>, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::overdue(&employees, &leaves, today))
    }

    pub async fn list_present(&self, today: NaiveDate) -> Result<Vec<PresentEmployee>, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::present(&employees, &leaves, today))
    }

    pub async fn list_pending(&self) -> Result<Vec<EmployeeLeave>, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::pending(&employees, &leaves))
    }

    pub async fn list_all_leaves(&self) -> Result<Vec<NamedLeave>, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::named(&employees, &leaves))
    }

    pub async fn leave_tally(&self) -> Result<LeaveTally, LeaveError> {
        let (employees, leaves) = self.snapshot().await?;
        Ok(tracker::tally(&employees, &leaves))
    }

    /* =========================
    Employee directory
    ========================= */

    #[instrument(skip(self, new_employee), fields(name = %new_employee.name))]
    pub async fn add_employee(&self, new_employee: NewEmployee) -> Result<CreatedEmployee, LeaveError> {
        let password = generate_initial_password();
        let password_hash = hash_password(&password)?;

        let mut tx = self.store.begin().await?;
        let employee = tx.insert_employee(&new_employee).await?;
        let credential = Credential {
            employee_id: employee.id,
            username: Credential::username_for(employee.id),
            password_hash,
        };
        tx.insert_credential(&credential).await?;
        tx.commit().await?;

        info!(employee_id = employee.id, username = %credential.username, "Employee added");
        Ok(CreatedEmployee {
            employee,
            credential: IssuedCredential {
                username: credential.username,
                password,
            },
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn edit_employee(&self, employee_id: u64, patch: EmployeePatch) -> Result<Employee, LeaveError> {
        if patch.is_empty() {
            return Err(LeaveError::NoFieldsToUpdate);
        }

        let mut tx = self.store.begin().await?;
        let mut employee = tx
            .lock_employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        patch.apply_to(&mut employee);
        tx.update_employee(&employee).await?;
        tx.commit().await?;

        info!("Employee updated");
        Ok(employee)
    }

    /// Removes ledger, leave rows and credential before the employee row.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, employee_id: u64) -> Result<Employee, LeaveError> {
        let mut tx = self.store.begin().await?;
        let employee = tx
            .lock_employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;

        let ledger_entries = tx.delete_ledger_for(employee_id).await?;
        let leaves = tx.delete_leaves_for(employee_id).await?;
        let credentials = tx.delete_credential(employee_id).await?;
        tx.delete_employee(employee_id).await?;
        tx.commit().await?;

        info!(ledger_entries, leaves, credentials, "Employee deleted");
        Ok(employee)
    }

    pub async fn employee(&self, employee_id: u64) -> Result<EmployeeDetails, LeaveError> {
        let mut tx = self.store.begin().await?;
        let employee = tx
            .employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        let mut leave_history = tx.leaves_for(employee_id).await?;
        leave_history.reverse();
        Ok(EmployeeDetails {
            employee,
            leave_history,
        })
    }

    pub async fn employees(&self) -> Result<Vec<Employee>, LeaveError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.employees().await?)
    }

    pub async fn profile(&self, employee_id: u64) -> Result<EmployeeProfile, LeaveError> {
        let mut tx = self.store.begin().await?;
        let employee = tx
            .employee(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))?;
        let leave_balance = current_balance(&mut tx, employee_id).await?;
        Ok(EmployeeProfile {
            employee,
            leave_balance,
        })
    }

    /// Employee login check.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Credential, LeaveError> {
        let mut tx = self.store.begin().await?;
        let credential = tx
            .credential_by_username(username)
            .await?
            .ok_or(LeaveError::InvalidCredentials)?;
        drop(tx);

        verify_password(password, &credential.password_hash).map_err(|e| {
            warn!(error = %e, username, "Employee login refused");
            LeaveError::InvalidCredentials
        })?;
        Ok(credential)
    }
}
