//! The parent/slice state machine. The same set of states describes both
//! the parent order and its current slice — `IcebergStrategy` keeps two
//! separate fields of this type rather than conflating them, since a
//! rejected slice does not always mean the same thing as a rejected parent
//! (though today they move in lockstep).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentState {
    Pending,
    Sent,
    Working,
    PartiallyFilled,
    ReviseSent,
    CancelSent,
    Filled,
    Cancelled,
    Rejected,
}

impl ParentState {
    /// States in which a revise/cancel command is meaningful to send.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ParentState::Pending | ParentState::Working | ParentState::PartiallyFilled
        )
    }

    /// Once reached, no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ParentState::Rejected | ParentState::Cancelled | ParentState::Filled
        )
    }
}
