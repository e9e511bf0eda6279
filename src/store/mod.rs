//! Persistence seam for the leave engine.
//!
//! Every engine operation opens one [`StoreTx`], does its reads and writes
//! through it, and either commits or drops it. Dropping an uncommitted
//! transaction discards every write made through it.

pub mod memory;
pub mod mysql;

use crate::model::{
    credential::Credential,
    employee::{Employee, NewEmployee},
    leave_request::{LeaveRequest, LeaveStatus, NewLeave, Returned},
    ledger::{LedgerEntry, NewLedgerEntry},
};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("conflicting record: {0}")]
    Conflict(String),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

#[allow(async_fn_in_trait)]
pub trait LeaveStore: Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// One unit of work. Reads observe the writes made earlier in the same tx.
#[allow(async_fn_in_trait)]
pub trait StoreTx: Send {
    async fn employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError>;

    /// Like [`StoreTx::employee`], but holds the row until the tx ends so
    /// concurrent writers for the same employee queue behind this one.
    async fn lock_employee(&mut self, id: u64) -> Result<Option<Employee>, StoreError>;

    /// All employees ordered by id.
    async fn employees(&mut self) -> Result<Vec<Employee>, StoreError>;

    async fn insert_employee(&mut self, employee: &NewEmployee) -> Result<Employee, StoreError>;

    async fn update_employee(&mut self, employee: &Employee) -> Result<(), StoreError>;

    async fn delete_employee(&mut self, id: u64) -> Result<u64, StoreError>;

    async fn credential(&mut self, employee_id: u64) -> Result<Option<Credential>, StoreError>;

    async fn credential_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<Credential>, StoreError>;

    async fn insert_credential(&mut self, credential: &Credential) -> Result<(), StoreError>;

    async fn delete_credential(&mut self, employee_id: u64) -> Result<u64, StoreError>;

    async fn lock_leave(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    /// Leave rows for one employee ordered by id.
    async fn leaves_for(&mut self, employee_id: u64) -> Result<Vec<LeaveRequest>, StoreError>;

    /// Every leave row ordered by id.
    async fn all_leaves(&mut self) -> Result<Vec<LeaveRequest>, StoreError>;

    async fn insert_leave(&mut self, leave: &NewLeave) -> Result<LeaveRequest, StoreError>;

    async fn set_leave_status(
        &mut self,
        id: u64,
        status: LeaveStatus,
        returned: Returned,
    ) -> Result<(), StoreError>;

    async fn delete_leaves_for(&mut self, employee_id: u64) -> Result<u64, StoreError>;

    async fn latest_ledger_entry(
        &mut self,
        employee_id: u64,
    ) -> Result<Option<LedgerEntry>, StoreError>;

    async fn append_ledger(&mut self, entry: &NewLedgerEntry) -> Result<LedgerEntry, StoreError>;

    async fn delete_ledger_for(&mut self, employee_id: u64) -> Result<u64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
