use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use super::{LeaveStore, StoreError, StoreTx};
use crate::model::{
    credential::Credential,
    employee::{Employee, NewEmployee},
    leave_request::{LeaveRequest, LeaveStatus, NewLeave, Returned},
    ledger::{LedgerEntry, NewLedgerEntry},
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl LeaveStore for MySqlStore {
    type Tx = MySqlTx;

    async fn begin(&self) -> Result<MySqlTx, StoreError> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open transaction");
            StoreError::Unavailable(e.to_string())
        })?;
        Ok(MySqlTx { tx })
    }
}

pub struct MySqlTx {
    tx: Transaction<'static, MySql>,
}

/// `leave_requests` row as stored; status columns are plain strings.
#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    leave_days: i64,
    remaining_days: i64,
    reason: String,
    status: String,
    returned: String,
    applied_on: NaiveDate,
    actual_return_date: Option<NaiveDate>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status).map_err(|_| {
            StoreError::Corrupt(format!("leave {} has status {:?}", row.id, row.status))
        })?;
        let returned = Returned::from_str(&row.returned).map_err(|_| {
            StoreError::Corrupt(format!("leave {} has returned {:?}", row.id, row.returned))
        })?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            leave_days: row.leave_days,
            remaining_days: row.remaining_days,
            reason: row.reason,
            status,
            returned,
            applied_on: row.applied_on,
            actual_return_date: row.actual_return_date,
        })
    }
}

fn into_leaves(rows: Vec<LeaveRow>) -> Result<Vec<LeaveRequest>, StoreError> {
    rows.into_iter().map(LeaveRequest::try_from).collect()
}

impl StoreTx for MySqlTx {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, gender, age, position, department, phone, email, status
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(employee)
    }

    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, gender, age, position, department, phone, email, status
            FROM employees
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(employee)
    }

    async fn employees(&mut self) -> Result<Vec<Employee>, StoreError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, gender, age, position, department, phone, email, status
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(employees)
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> Result<Employee, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees
                (name, gender, age, position, department, phone, email, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.gender)
        .bind(employee.age)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.status)
        .execute(&mut *self.tx)
        .await?;

        Ok(employee.clone().into_employee(result.last_insert_id()))
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, gender = ?, age = ?, position = ?, department = ?,
                phone = ?, email = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.gender)
        .bind(employee.age)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.status)
        .bind(employee.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn delete_employee(&mut self, id: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn credential(&mut self, employee_id: u64) -> Result<Option<Credential>, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT employee_id, username, password_hash
            FROM employee_users
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(credential)
    }

    async fn credential_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT employee_id, username, password_hash
            FROM employee_users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(credential)
    }

    async fn insert_credential(&mut self, credential: &Credential) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employee_users (employee_id, username, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(credential.employee_id)
        .bind(&credential.username)
        .bind(&credential.password_hash)
        .execute(&mut *self.tx)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23000") => {
                Err(StoreError::Conflict(format!(
                    "username {} already exists",
                    credential.username
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_credential(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM employee_users WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let row = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, employee_id, start_date, end_date, leave_days, remaining_days,
                   reason, status, returned, applied_on, actual_return_date
            FROM leave_requests
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(LeaveRequest::try_from).transpose()
    }

    async fn leaves_for(&mut self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, employee_id, start_date, end_date, leave_days, remaining_days,
                   reason, status, returned, applied_on, actual_return_date
            FROM leave_requests
            WHERE employee_id = ?
            ORDER BY id
            "#,
        )
        .bind(employee_id)
        .fetch_all(&mut *self.tx)
        .await?;
        into_leaves(rows)
    }

    async fn all_leaves(&mut self) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, employee_id, start_date, end_date, leave_days, remaining_days,
                   reason, status, returned, applied_on, actual_return_date
            FROM leave_requests
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        into_leaves(rows)
    }

    async fn insert_leave(&mut self, leave: &NewLeave) -> Result<LeaveRequest, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, start_date, end_date, leave_days, remaining_days,
                 reason, status, returned, applied_on)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(leave.employee_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(leave.leave_days)
        .bind(leave.remaining_days)
        .bind(&leave.reason)
        .bind(LeaveStatus::Pending.as_ref())
        .bind(Returned::No.as_ref())
        .bind(leave.applied_on)
        .execute(&mut *self.tx)
        .await?;

        Ok(leave.clone().into_pending(result.last_insert_id()))
    }

    async fn set_leave_status(
        &mut self,
        id: u64,
        status: LeaveStatus,
        returned: Returned,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE leave_requests SET status = ?, returned = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(returned.as_ref())
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_leaves_for(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn latest_ledger_entry(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, employee_id, leave_id, delta, resulting_balance, recorded_at
            FROM leave_ledger
            WHERE employee_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(entry)
    }

    async fn append_ledger(&mut self, entry: &NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_ledger
                (employee_id, leave_id, delta, resulting_balance, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.employee_id)
        .bind(entry.leave_id)
        .bind(entry.delta)
        .bind(entry.resulting_balance)
        .bind(entry.recorded_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(entry.clone().into_entry(result.last_insert_id()))
    }

    async fn delete_ledger_for(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM leave_ledger WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
