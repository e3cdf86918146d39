// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player actions.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::poker::{Chips, SeatId};

/// The kind of a logged action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Forced blind bet.
    Blind,
    /// Player folds.
    Fold,
    /// Player checks.
    Check,
    /// Player calls.
    Call,
    /// Player raises.
    Raise,
    /// Player bets all the remaining chips.
    #[serde(rename = "all-in")]
    AllIn,
}

impl ActionKind {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Blind => "BLIND",
            ActionKind::Fold => "FOLD",
            ActionKind::Check => "CHECK",
            ActionKind::Call => "CALL",
            ActionKind::Raise => "RAISE",
            ActionKind::AllIn => "ALL-IN",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An action a seat takes on its turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnAction {
    /// Give up the hand.
    Fold,
    /// Pass without betting.
    Check,
    /// Match the current bet.
    Call,
    /// Put the given amount of chips in the pot.
    Raise(Chips),
    /// Put all the remaining chips in the pot.
    AllIn,
}

impl TurnAction {
    /// The kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            TurnAction::Fold => ActionKind::Fold,
            TurnAction::Check => ActionKind::Check,
            TurnAction::Call => ActionKind::Call,
            TurnAction::Raise(_) => ActionKind::Raise,
            TurnAction::AllIn => ActionKind::AllIn,
        }
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnAction::Raise(amount) => write!(f, "{} {amount}", self.kind()),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// An entry in the hand action log.
///
/// The amount is the number of chips the seat moved into the pot, it is only
/// present for blinds, calls, raises and all-ins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The action kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// The chips moved into the pot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
    /// The seat that took the action.
    #[serde(rename = "player")]
    pub seat: SeatId,
    /// Position of this action in the hand.
    pub seq: u32,
}

impl Action {
    /// The chips moved by this action, zero for folds and checks.
    pub fn chips(&self) -> Chips {
        self.amount.unwrap_or_default()
    }

    /// Checks if this action raised the bet.
    pub fn is_aggressive(&self) -> bool {
        matches!(self.kind, ActionKind::Raise | ActionKind::AllIn)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{} {} {amount}", self.seat, self.kind),
            None => write!(f, "{} {}", self.seat, self.kind),
        }
    }
}
