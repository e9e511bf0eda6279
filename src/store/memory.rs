use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::lock::{Mutex, OwnedMutexGuard};

use super::{LeaveStore, StoreError, StoreTx};
use crate::model::{
    credential::Credential,
    employee::{Employee, NewEmployee},
    leave_request::{LeaveRequest, LeaveStatus, NewLeave, Returned},
    ledger::{LedgerEntry, NewLedgerEntry},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    employees: BTreeMap<u64, Employee>,
    credentials: BTreeMap<u64, Credential>,
    leaves: BTreeMap<u64, LeaveRequest>,
    ledger: BTreeMap<u64, LedgerEntry>,
    employee_seq: u64,
    leave_seq: u64,
    ledger_seq: u64,
}

fn next_id(seq: &mut u64) -> u64 {
    *seq += 1;
    *seq
}

/// Process-local store. A transaction holds the whole store for its
/// lifetime, works on a copy, and publishes the copy on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_commits: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following commit fail as if the backend went away.
    #[cfg(test)]
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

impl LeaveStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            fail_commit: self.fail_commits.load(Ordering::SeqCst),
        })
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_commit: bool,
}

impl StoreTx for MemoryTx {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.working.employees.get(&id).cloned())
    }

    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError> {
        // the tx already owns the whole store
        self.employee(id).await
    }

    async fn employees(&mut self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.working.employees.values().cloned().collect())
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> Result<Employee, StoreError> {
        let id = next_id(&mut self.working.employee_seq);
        let employee = employee.clone().into_employee(id);
        self.working.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError> {
        match self.working.employees.get_mut(&employee.id) {
            Some(stored) => {
                *stored = employee.clone();
                Ok(())
            }
            None => Err(StoreError::Conflict(format!(
                "employee {} does not exist",
                employee.id
            ))),
        }
    }

    async fn delete_employee(&mut self, id: u64) -> Result<u64, StoreError> {
        Ok(self.working.employees.remove(&id).map_or(0, |_| 1))
    }

    async fn credential(&mut self, employee_id: u64) -> Result<Option<Credential>, StoreError> {
        Ok(self.working.credentials.get(&employee_id).cloned())
    }

    async fn credential_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .working
            .credentials
            .values()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn insert_credential(&mut self, credential: &Credential) -> Result<(), StoreError> {
        let taken = self.working.credentials.contains_key(&credential.employee_id)
            || self
                .working
                .credentials
                .values()
                .any(|c| c.username == credential.username);
        if taken {
            return Err(StoreError::Conflict(format!(
                "credential for employee {} or username {} already exists",
                credential.employee_id, credential.username
            )));
        }
        self.working
            .credentials
            .insert(credential.employee_id, credential.clone());
        Ok(())
    }

    async fn delete_credential(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        Ok(self.working.credentials.remove(&employee_id).map_or(0, |_| 1))
    }

    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.working.leaves.get(&id).cloned())
    }

    async fn leaves_for(&mut self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self
            .working
            .leaves
            .values()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn all_leaves(&mut self) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self.working.leaves.values().cloned().collect())
    }

    async fn insert_leave(&mut self, leave: &NewLeave) -> Result<LeaveRequest, StoreError> {
        let id = next_id(&mut self.working.leave_seq);
        let leave = leave.clone().into_pending(id);
        self.working.leaves.insert(id, leave.clone());
        Ok(leave)
    }

    async fn set_leave_status(
        &mut self,
        id: u64,
        status: LeaveStatus,
        returned: Returned,
    ) -> Result<(), StoreError> {
        let leave = self
            .working
            .leaves
            .get_mut(&id)
            .ok_or_else(|| StoreError::Conflict(format!("leave {id} does not exist")))?;
        leave.status = status;
        leave.returned = returned;
        Ok(())
    }

    async fn delete_leaves_for(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        let before = self.working.leaves.len();
        self.working
            .leaves
            .retain(|_, l| l.employee_id != employee_id);
        Ok((before - self.working.leaves.len()) as u64)
    }

    async fn latest_ledger_entry(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self
            .working
            .ledger
            .values()
            .rev()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn append_ledger(&mut self, entry: &NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        let id = next_id(&mut self.working.ledger_seq);
        let entry = entry.clone().into_entry(id);
        self.working.ledger.insert(id, entry.clone());
        Ok(entry)
    }

    async fn delete_ledger_for(&mut self, employee_id: u64) -> Result<u64, StoreError> {
        let before = self.working.ledger.len();
        self.working
            .ledger
            .retain(|_, e| e.employee_id != employee_id);
        Ok((before - self.working.ledger.len()) as u64)
    }

    async fn commit(self) -> Result<(), StoreError> {
        if self.fail_commit {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }
        let MemoryTx {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }
}
