// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game errors.
use thiserror::Error;

use crate::poker::{Chips, DeckError, EvalError, SeatId};

/// An action that breaks the betting rules.
///
/// The state that rejected the action is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// The hand is over.
    #[error("the hand has ended")]
    HandEnded,
    /// The seat acted out of turn.
    #[error("seat {seat} acted out of turn")]
    NotYourTurn {
        /// The seat that tried to act.
        seat: SeatId,
        /// The seat that should act, if any.
        expected: Option<SeatId>,
    },
    /// Check against a live bet.
    #[error("cannot check with {to_call} to call")]
    CannotCheck {
        /// Chips owed by the seat.
        to_call: Chips,
    },
    /// Raise below the minimum that is not an all-in.
    #[error("raise of {amount} is below the minimum of {minimum}")]
    RaiseTooSmall {
        /// The raise amount.
        amount: Chips,
        /// The minimum raise.
        minimum: Chips,
    },
    /// Raise larger than the seat stack.
    #[error("raise of {amount} exceeds the stack of {stack}")]
    ExceedsStack {
        /// The raise amount.
        amount: Chips,
        /// The seat chips.
        stack: Chips,
    },
    /// Raise of zero chips.
    #[error("raise amount must be positive")]
    ZeroAmount,
}

/// Errors from the betting state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The action was rejected.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    /// The deck ran out of cards, the hand must be aborted.
    #[error(transparent)]
    DeckExhausted(#[from] DeckError),
    /// A hand evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// A seat cannot start a hand without chips.
    #[error("seat {0} has no chips")]
    NotEnoughChips(SeatId),
    /// The blinds configuration is not usable.
    #[error("invalid blinds {small_blind}/{big_blind}")]
    InvalidBlinds {
        /// Small blind.
        small_blind: Chips,
        /// Big blind.
        big_blind: Chips,
    },
    /// Both seats were given the same id.
    #[error("both seats have id {0}")]
    DuplicateSeat(SeatId),
}

impl GameError {
    /// Returns the invalid action if this error rejected an action.
    pub fn invalid_action(&self) -> Option<&InvalidAction> {
        match self {
            GameError::InvalidAction(e) => Some(e),
            _ => None,
        }
    }
}
