//! Pending is the only state a request can leave. Approved and Rejected
//! are terminal; re-applying creates a new request.

use super::error::LeaveError;
use crate::model::leave_request::{LeaveStatus, Returned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: LeaveStatus,
    pub returned: Returned,
}

pub fn decide(current: LeaveStatus, decision: Decision) -> Result<Transition, LeaveError> {
    if current != LeaveStatus::Pending {
        return Err(LeaveError::InvalidStateTransition {
            current,
            attempted: decision.target(),
        });
    }

    let returned = match decision {
        // the employee is now expected to be away
        Decision::Approve => Returned::No,
        Decision::Reject => Returned::Yes,
    };

    Ok(Transition {
        status: decision.target(),
        returned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approving_pending_marks_employee_away() {
        let t = decide(LeaveStatus::Pending, Decision::Approve).unwrap();
        assert_eq!(t.status, LeaveStatus::Approved);
        assert_eq!(t.returned, Returned::No);
    }

    #[test]
    fn rejecting_pending_marks_employee_returned() {
        let t = decide(LeaveStatus::Pending, Decision::Reject).unwrap();
        assert_eq!(t.status, LeaveStatus::Rejected);
        assert_eq!(t.returned, Returned::Yes);
    }

    #[test]
    fn terminal_states_refuse_every_decision() {
        for current in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for decision in [Decision::Approve, Decision::Reject] {
                match decide(current, decision) {
                    Err(LeaveError::InvalidStateTransition {
                        current: c,
                        attempted,
                    }) => {
                        assert_eq!(c, current);
                        assert_eq!(attempted, decision.target());
                    }
                    other => panic!("{current} + {decision:?} gave {other:?}"),
                }
            }
        }
    }
}
