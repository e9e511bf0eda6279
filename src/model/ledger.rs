use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Append-only balance movement. The entry with the highest id for an
/// employee carries their current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: u64,
    pub employee_id: u64,
    pub leave_id: u64,
    pub delta: i64,
    pub resulting_balance: i64,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub employee_id: u64,
    pub leave_id: u64,
    pub delta: i64,
    pub resulting_balance: i64,
    pub recorded_at: NaiveDateTime,
}

impl NewLedgerEntry {
    pub fn into_entry(self, id: u64) -> LedgerEntry {
        LedgerEntry {
            id,
            employee_id: self.employee_id,
            leave_id: self.leave_id,
            delta: self.delta,
            resulting_balance: self.resulting_balance,
            recorded_at: self.recorded_at,
        }
    }
}
