pub mod credential;
pub mod employee;
pub mod leave_request;
pub mod ledger;
pub mod role;
