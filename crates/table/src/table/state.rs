// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Session state carried across hands.
use anyhow::{Result, bail};
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};

use pokermind_core::{
    action::{ActionKind, TurnAction},
    error::{GameError, InvalidAction},
    game_state::GameState,
    poker::{Chips, Deck, SeatId},
    seat::Seat,
    wallet::{REASON_AI_FOLDED, REASON_PLAYER_WON},
};

use super::TableConfig;

/// A pot transfer owed to the human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// The chips won by the human seat.
    pub amount: Chips,
    /// The transfer reason.
    pub reason: &'static str,
}

/// Internal table state.
#[derive(Debug)]
pub struct State {
    config: TableConfig,
    starting_chips: [Chips; 2],
    chips: [Chips; 2],
    ai_wallet: Option<String>,
    hand_id: u64,
    game: Option<GameState>,
    rng: StdRng,
}

impl State {
    /// Creates a new state with the given starting chips.
    pub fn new(config: TableConfig, chips: [Chips; 2], ai_wallet: Option<String>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            config,
            starting_chips: chips,
            chips,
            ai_wallet,
            hand_id: 0,
            game: None,
            rng,
        }
    }

    /// The current hand id.
    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    /// The current hand, if any.
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// The chips a seat carries into the next hand.
    pub fn chips(&self, seat: SeatId) -> Chips {
        self.chips[seat.index()]
    }

    /// Starts a new hand with a shuffled deck.
    pub fn start_hand(&mut self) -> Result<&GameState> {
        let deck = Deck::new_and_shuffled(&mut self.rng);
        self.start_hand_with_deck(deck)
    }

    /// Starts a new hand with the given deck, aborting a hand in progress.
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<&GameState> {
        if self.game.as_ref().is_some_and(|g| !g.is_ended()) {
            info!("Aborting hand {} for a new hand", self.hand_id);
            self.abort_hand();
        }

        for seat in SeatId::ALL {
            if self.chips(seat).is_zero() {
                bail!("{} has no chips left, reset the table", self.name(seat));
            }
        }

        let mut ai = Seat::new(SeatId::Ai, &self.config.ai_name, self.chips(SeatId::Ai));
        if let Some(address) = &self.ai_wallet {
            ai = ai.with_wallet(address);
        }

        let seats = [
            Seat::new(SeatId::Human, &self.config.human_name, self.chips(SeatId::Human)),
            ai,
        ];

        let game = GameState::start(self.config.hand, seats, deck)?;
        // A short blind all-in can run the board out at the start.
        if game.is_ended() {
            self.carry_chips(&game);
        }

        self.hand_id += 1;
        info!("Hand {} started", self.hand_id);

        Ok(self.game.insert(game))
    }

    /// Applies an action to the current hand.
    ///
    /// An invalid action leaves the hand unchanged, a short deck aborts the
    /// hand and returns the contributions.
    pub fn apply(&mut self, seat: SeatId, action: TurnAction) -> Result<&GameState, GameError> {
        let Some(game) = self.game.as_ref() else {
            return Err(InvalidAction::HandEnded.into());
        };

        match game.apply(seat, action) {
            Ok(next) => {
                if next.is_ended() {
                    self.carry_chips(&next);
                }

                Ok(self.game.insert(next))
            }
            Err(e @ GameError::DeckExhausted(_)) => {
                error!("Hand {} aborted: {e}", self.hand_id);
                self.abort_hand();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Aborts the hand in progress and returns the contributions.
    pub fn abort_hand(&mut self) {
        if let Some(game) = self.game.as_ref().filter(|g| !g.is_ended()) {
            let aborted = game.abort();
            self.carry_chips(&aborted);
            self.game = Some(aborted);
        }
    }

    /// Clears the hand and restores the starting chips.
    ///
    /// The hand id moves on so that late results for the old hand are stale.
    pub fn reset(&mut self) {
        self.game = None;
        self.chips = self.starting_chips;
        self.hand_id += 1;
        info!("Table reset");
    }

    /// The transfer owed to the human seat for an ended hand.
    pub fn settlement(&self) -> Option<Settlement> {
        let game = self.game.as_ref().filter(|g| g.is_ended())?;
        if game.winner() != Some(SeatId::Human) {
            return None;
        }

        let amount = game
            .payoffs()
            .iter()
            .filter(|p| p.seat == SeatId::Human)
            .map(|p| p.chips)
            .sum::<Chips>();

        if amount.is_zero() {
            return None;
        }

        let ai_folded = game
            .actions()
            .last()
            .is_some_and(|a| a.seat == SeatId::Ai && a.kind == ActionKind::Fold);

        Some(Settlement {
            amount,
            reason: if ai_folded {
                REASON_AI_FOLDED
            } else {
                REASON_PLAYER_WON
            },
        })
    }

    fn name(&self, seat: SeatId) -> &str {
        match seat {
            SeatId::Human => &self.config.human_name,
            SeatId::Ai => &self.config.ai_name,
        }
    }

    fn carry_chips(&mut self, game: &GameState) {
        for seat in game.seats() {
            self.chips[seat.id.index()] = seat.chips;
        }
    }
}
