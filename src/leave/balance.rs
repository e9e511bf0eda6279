//! Balance calculator.
//!
//! The balance is not summed. It is whatever the most recent ledger entry
//! says, whatever happened to the request that produced it afterwards.

use crate::model::ledger::LedgerEntry;
use crate::store::{StoreError, StoreTx};

/// Balance of an employee who has never requested leave.
pub const DEFAULT_ENTITLEMENT: i64 = 20;

pub fn balance_from(latest: Option<&LedgerEntry>) -> i64 {
    latest.map_or(DEFAULT_ENTITLEMENT, |entry| entry.resulting_balance)
}

pub async fn current_balance<T: StoreTx>(tx: &mut T, employee_id: u64) -> Result<i64, StoreError> {
    let latest = tx.latest_ledger_entry(employee_id).await?;
    Ok(balance_from(latest.as_ref()))
}
