//! Leave lifecycle engine: balance, admission, status transitions and the
//! derived on-leave / overdue / present views.

pub mod balance;
pub mod error;
pub mod service;
pub mod state_machine;
pub mod tracker;
pub mod validator;

#[cfg(test)]
mod tests;

pub use error::LeaveError;
pub use service::LeaveService;
pub use validator::LeaveApplication;
