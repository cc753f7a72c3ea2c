//! Row lifecycle state machine
//!
//! `RowStatus` is what a manager writes; `RowState` is what the row is.
//! Every (state, request) pair has an entry in [`TRANSITIONS`].

use serde::Serialize;
use std::fmt;

/// Values of a RowStatus column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowStatus {
    Active = 1,
    NotInService = 2,
    NotReady = 3,
    CreateAndGo = 4,
    CreateAndWait = 5,
    Destroy = 6,
}

impl RowStatus {
    pub fn from_value(value: i64) -> Option<RowStatus> {
        Some(match value {
            1 => RowStatus::Active,
            2 => RowStatus::NotInService,
            3 => RowStatus::NotReady,
            4 => RowStatus::CreateAndGo,
            5 => RowStatus::CreateAndWait,
            6 => RowStatus::Destroy,
            _ => return None,
        })
    }

    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn is_create(self) -> bool {
        matches!(self, RowStatus::CreateAndGo | RowStatus::CreateAndWait)
    }

    fn column(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowStatus::Active => "active",
            RowStatus::NotInService => "notInService",
            RowStatus::NotReady => "notReady",
            RowStatus::CreateAndGo => "createAndGo",
            RowStatus::CreateAndWait => "createAndWait",
            RowStatus::Destroy => "destroy",
        })
    }
}

/// Lifecycle state of a conceptual row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowState {
    NonExistent,
    Active,
    NotInService,
    NotReady,
}

impl RowState {
    /// Value a RowStatus column reads back in this state
    pub fn reported(self) -> Option<RowStatus> {
        match self {
            RowState::NonExistent => None,
            RowState::Active => Some(RowStatus::Active),
            RowState::NotInService => Some(RowStatus::NotInService),
            RowState::NotReady => Some(RowStatus::NotReady),
        }
    }

    pub fn exists(self) -> bool {
        self != RowState::NonExistent
    }

    fn row(self) -> usize {
        match self {
            RowState::NonExistent => 0,
            RowState::Active => 1,
            RowState::NotInService => 2,
            RowState::NotReady => 3,
        }
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowState::NonExistent => "nonExistent",
            RowState::Active => "active",
            RowState::NotInService => "notInService",
            RowState::NotReady => "notReady",
        })
    }
}

/// Outcome of one table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    To(RowState),
    /// Allowed when every mandatory column has a value; otherwise go to
    /// `otherwise`, or deny when that is `None`
    IfComplete {
        then: RowState,
        otherwise: Option<RowState>,
    },
    Deny,
}

use self::RowState as S;
use self::Rule::{Deny, IfComplete, To};

/// Rows: current state. Columns: requested status in value order
/// (active, notInService, notReady, createAndGo, createAndWait, destroy).
pub const TRANSITIONS: [[Rule; 6]; 4] = [
    // nonExistent
    [
        Deny,
        Deny,
        Deny,
        IfComplete {
            then: S::Active,
            otherwise: None,
        },
        IfComplete {
            then: S::NotInService,
            otherwise: Some(S::NotReady),
        },
        To(S::NonExistent),
    ],
    // active
    [
        To(S::Active),
        To(S::NotInService),
        Deny,
        Deny,
        Deny,
        To(S::NonExistent),
    ],
    // notInService
    [
        IfComplete {
            then: S::Active,
            otherwise: None,
        },
        To(S::NotInService),
        Deny,
        Deny,
        Deny,
        To(S::NonExistent),
    ],
    // notReady
    [
        IfComplete {
            then: S::Active,
            otherwise: None,
        },
        IfComplete {
            then: S::NotInService,
            otherwise: None,
        },
        Deny,
        Deny,
        Deny,
        To(S::NonExistent),
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row in state {from} cannot accept {requested}")]
pub struct TransitionDenied {
    pub from: RowState,
    pub requested: RowStatus,
}

/// Next state for `requested`, given whether the row has every mandatory column
///
/// # Errors
///
/// `TransitionDenied` when the table has no allowed move.
pub fn transition(
    from: RowState,
    requested: RowStatus,
    complete: bool,
) -> Result<RowState, TransitionDenied> {
    let denied = TransitionDenied { from, requested };
    match TRANSITIONS[from.row()][requested.column()] {
        To(next) => Ok(next),
        IfComplete { then, otherwise } => {
            if complete {
                Ok(then)
            } else {
                otherwise.ok_or(denied)
            }
        }
        Deny => Err(denied),
    }
}
