// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table seat types.
use serde::{Deserialize, Serialize};

use crate::{
    action::ActionKind,
    poker::{Chips, PlayerCards, SeatId},
};

/// A seat state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    /// The seat id.
    pub id: SeatId,
    /// The player display name.
    pub name: String,
    /// This seat chips.
    pub chips: Chips,
    /// This seat private cards.
    pub hole_cards: PlayerCards,
    /// The external wallet address, if connected.
    pub wallet_address: Option<String>,
    /// The seat bet in the current round.
    pub bet: Chips,
    /// The chips this seat put in the pot during the hand.
    pub contributed: Chips,
    /// The last seat action in the current round.
    pub action: Option<ActionKind>,
}

impl Seat {
    /// Creates a new seat.
    pub fn new(id: SeatId, name: impl Into<String>, chips: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            chips,
            hole_cards: PlayerCards::None,
            wallet_address: None,
            bet: Chips::ZERO,
            contributed: Chips::ZERO,
            action: None,
        }
    }

    /// Sets the seat wallet address.
    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    /// Checks if the seat acted in this round, blinds are not an action.
    pub fn has_acted(&self) -> bool {
        matches!(self.action, Some(kind) if kind != ActionKind::Blind)
    }

    /// Checks if the seat has chips left to bet.
    pub fn has_chips(&self) -> bool {
        !self.chips.is_zero()
    }

    /// Moves up to `amount` chips from the stack to the seat bet.
    ///
    /// Returns the chips moved, less than `amount` if the seat goes all in.
    pub(crate) fn put(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.bet += paid;
        self.contributed += paid;
        paid
    }

    pub(crate) fn start_hand(&mut self) {
        self.hole_cards = PlayerCards::None;
        self.bet = Chips::ZERO;
        self.contributed = Chips::ZERO;
        self.action = None;
    }

    pub(crate) fn start_round(&mut self) {
        self.bet = Chips::ZERO;
        self.action = None;
    }
}
