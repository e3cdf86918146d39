// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Heads-up betting state machine.
//!
//! A [GameState] holds one hand from the blinds to the payoffs. Transitions
//! are pure: [GameState::apply] returns a new state and leaves the input
//! untouched, so a rejected action never changes the hand.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    action::{Action, ActionKind, TurnAction},
    error::{GameError, InvalidAction},
    poker::{Card, Chips, Deck, PlayerCards, PokerHand, SeatId},
    seat::Seat,
    view::GameView,
};

/// The betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    /// Before the flop.
    Preflop,
    /// After three community cards.
    Flop,
    /// After the fourth community card.
    Turn,
    /// After the fifth community card.
    River,
    /// Hands are compared.
    Showdown,
}

impl Round {
    /// The round that follows this one.
    pub fn next(&self) -> Round {
        match self {
            Round::Preflop => Round::Flop,
            Round::Flop => Round::Turn,
            Round::Turn => Round::River,
            Round::River | Round::Showdown => Round::Showdown,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Round::Preflop => "preflop",
            Round::Flop => "flop",
            Round::Turn => "turn",
            Round::River => "river",
            Round::Showdown => "showdown",
        };

        f.write_str(name)
    }
}

/// Blinds configuration for a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandConfig {
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
    /// The seat that posts the big blind, it also gets the odd chip of a split pot.
    pub big_blind_seat: SeatId,
}

impl HandConfig {
    /// The seat that posts the small blind.
    pub fn small_blind_seat(&self) -> SeatId {
        self.big_blind_seat.opponent()
    }
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            small_blind: Chips::new(10),
            big_blind: Chips::new(20),
            big_blind_seat: SeatId::Human,
        }
    }
}

/// Chips paid to a seat at the end of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payoff {
    /// The seat paid.
    pub seat: SeatId,
    /// The chips won.
    pub chips: Chips,
}

/// Both seats hands at showdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownHands {
    /// The human seat hand.
    pub human: PokerHand,
    /// The AI seat hand.
    pub ai: PokerHand,
}

impl ShowdownHands {
    /// The hand for the given seat.
    pub fn get(&self, seat: SeatId) -> &PokerHand {
        match seat {
            SeatId::Human => &self.human,
            SeatId::Ai => &self.ai,
        }
    }
}

/// Splits a pot in two halves, the odd chip goes to `odd_chip_seat`.
///
/// Returns the human and AI shares.
pub fn split_pot(pot: Chips, odd_chip_seat: SeatId) -> (Chips, Chips) {
    let half = pot / 2;
    let odd = pot % 2;
    match odd_chip_seat {
        SeatId::Human => (half + odd, half),
        SeatId::Ai => (half, half + odd),
    }
}

/// The state of a heads-up hand.
#[derive(Debug, Clone)]
pub struct GameState {
    config: HandConfig,
    seats: [Seat; 2],
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    round: Round,
    current_bet: Chips,
    current_seat: Option<SeatId>,
    actions: Vec<Action>,
    ended: bool,
    winner: Option<SeatId>,
    hands: Option<ShowdownHands>,
    payoffs: Vec<Payoff>,
}

impl GameState {
    /// Starts a new hand, posts the blinds and deals the hole cards.
    pub fn start(config: HandConfig, seats: [Seat; 2], deck: Deck) -> Result<Self, GameError> {
        if config.big_blind.is_zero() || config.small_blind > config.big_blind {
            return Err(GameError::InvalidBlinds {
                small_blind: config.small_blind,
                big_blind: config.big_blind,
            });
        }

        let mut seats = seats;
        seats.sort_by_key(|s| s.id.index());
        if seats[0].id == seats[1].id {
            return Err(GameError::DuplicateSeat(seats[0].id));
        }

        for seat in seats.iter_mut() {
            if !seat.has_chips() {
                return Err(GameError::NotEnoughChips(seat.id));
            }

            seat.start_hand();
        }

        let mut state = Self {
            config,
            seats,
            deck,
            board: Vec::with_capacity(5),
            pot: Chips::ZERO,
            round: Round::Preflop,
            current_bet: Chips::ZERO,
            current_seat: None,
            actions: Vec::new(),
            ended: false,
            winner: None,
            hands: None,
            payoffs: Vec::new(),
        };

        state.post_blind(config.small_blind_seat(), config.small_blind);
        state.post_blind(config.big_blind_seat, config.big_blind);

        for id in SeatId::ALL {
            let cards = state.deck.deal(2)?;
            state.seat_mut(id).hole_cards = PlayerCards::Cards(cards[0], cards[1]);
        }

        state.current_bet = state.seats.iter().map(|s| s.bet).max().unwrap_or_default();
        state.current_seat = state.first_to_act();

        info!(
            "Hand started {} {} / {} {} pot {}",
            state.seat(SeatId::Human).name,
            state.seat(SeatId::Human).chips,
            state.seat(SeatId::Ai).name,
            state.seat(SeatId::Ai).chips,
            state.pot
        );

        // A short blind all-in can leave nobody to act.
        if state.is_round_complete() {
            state.next_round()?;
        }

        Ok(state)
    }

    /// Applies an action for a seat and returns the new state.
    ///
    /// On error this state is unchanged and can be used to retry.
    pub fn apply(&self, seat: SeatId, action: TurnAction) -> Result<GameState, GameError> {
        if self.ended {
            return Err(InvalidAction::HandEnded.into());
        }

        if self.current_seat != Some(seat) {
            return Err(InvalidAction::NotYourTurn {
                seat,
                expected: self.current_seat,
            }
            .into());
        }

        let mut next = self.clone();
        next.execute(seat, action)?;
        Ok(next)
    }

    /// Aborts the hand and returns every seat contribution.
    pub fn abort(&self) -> GameState {
        let mut state = self.clone();
        for seat in state.seats.iter_mut() {
            seat.chips += seat.contributed;
            seat.contributed = Chips::ZERO;
            seat.bet = Chips::ZERO;
        }

        state.pot = Chips::ZERO;
        state.current_bet = Chips::ZERO;
        state.current_seat = None;
        state.winner = None;
        state.ended = true;
        state
    }

    /// A snapshot of this hand as seen by `seat`.
    pub fn view(&self, seat: SeatId) -> GameView {
        GameView::new(self, seat)
    }

    /// The hand configuration.
    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    /// The seat with the given id.
    pub fn seat(&self, id: SeatId) -> &Seat {
        &self.seats[id.index()]
    }

    /// Both seats in table order.
    pub fn seats(&self) -> &[Seat; 2] {
        &self.seats
    }

    /// The community cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The chips in the pot.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// The current round.
    pub fn round(&self) -> Round {
        self.round
    }

    /// The highest bet in this round.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    /// The seat that has to act.
    pub fn current_seat(&self) -> Option<SeatId> {
        self.current_seat
    }

    /// The hand actions log.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Checks if the hand is over.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The hand winner, `None` for a split pot or an aborted hand.
    pub fn winner(&self) -> Option<SeatId> {
        self.winner
    }

    /// The evaluated hands if the hand went to showdown.
    pub fn hands(&self) -> Option<&ShowdownHands> {
        self.hands.as_ref()
    }

    /// The chips paid to seats at the end of the hand.
    pub fn payoffs(&self) -> &[Payoff] {
        &self.payoffs
    }

    /// Chips `seat` has to put in to match the current bet.
    pub fn to_call(&self, seat: SeatId) -> Chips {
        self.current_bet - self.seat(seat).bet
    }

    /// The minimum raise amount that is not an all-in.
    pub fn min_raise(&self) -> Chips {
        (self.current_bet * 2).max(Chips::new(1))
    }

    /// Cards left in the deck.
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// The chips on the table, seat stacks and pot.
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().map(|s| s.chips).sum::<Chips>() + self.pot
    }

    fn seat_mut(&mut self, id: SeatId) -> &mut Seat {
        &mut self.seats[id.index()]
    }

    fn execute(&mut self, seat: SeatId, action: TurnAction) -> Result<(), GameError> {
        let to_call = self.to_call(seat);
        let stack = self.seat(seat).chips;

        let amount = match action {
            TurnAction::Fold => {
                self.log(seat, ActionKind::Fold, None);
                self.fold(seat);
                return Ok(());
            }
            TurnAction::Check => {
                if !to_call.is_zero() {
                    return Err(InvalidAction::CannotCheck { to_call }.into());
                }

                None
            }
            TurnAction::Call => Some(self.put(seat, to_call)),
            TurnAction::Raise(amount) => {
                if amount.is_zero() {
                    return Err(InvalidAction::ZeroAmount.into());
                }

                if amount > stack {
                    return Err(InvalidAction::ExceedsStack { amount, stack }.into());
                }

                let minimum = self.current_bet * 2;
                if amount < minimum && amount != stack {
                    return Err(InvalidAction::RaiseTooSmall { amount, minimum }.into());
                }

                Some(self.put(seat, amount))
            }
            TurnAction::AllIn => Some(self.put(seat, stack)),
        };

        let kind = action.kind();
        self.log(seat, kind, amount);
        self.seat_mut(seat).action = Some(kind);
        self.current_bet = self.current_bet.max(self.seat(seat).bet);

        debug!(
            "{seat} {kind} {} pot {} bet {}",
            amount.unwrap_or_default(),
            self.pot,
            self.current_bet
        );

        if self.is_round_complete() {
            self.next_round()
        } else {
            self.current_seat = self.next_to_act(seat);
            Ok(())
        }
    }

    fn post_blind(&mut self, seat: SeatId, blind: Chips) {
        let paid = self.put(seat, blind);
        self.log(seat, ActionKind::Blind, Some(paid));
        self.seat_mut(seat).action = Some(ActionKind::Blind);
    }

    /// Moves chips from a seat to the pot.
    fn put(&mut self, seat: SeatId, amount: Chips) -> Chips {
        let paid = self.seat_mut(seat).put(amount);
        self.pot += paid;
        paid
    }

    fn log(&mut self, seat: SeatId, kind: ActionKind, amount: Option<Chips>) {
        let seq = self.actions.len() as u32;
        self.actions.push(Action {
            kind,
            amount,
            seat,
            seq,
        });
    }

    fn fold(&mut self, seat: SeatId) {
        let winner = seat.opponent();
        let pot = self.pot;
        self.award(winner, pot);
        self.winner = Some(winner);
        self.end_hand();
    }

    /// Checks if all seats in the hand have acted.
    fn is_round_complete(&self) -> bool {
        for seat in self.seats.iter() {
            // A seat that didn't match the bet and is not all in has to act.
            if seat.bet < self.current_bet && seat.has_chips() {
                return false;
            }
        }

        // Nobody left to bet against.
        if self.count_with_chips() < 2 {
            return true;
        }

        self.seats.iter().all(|s| s.has_acted())
    }

    fn count_with_chips(&self) -> usize {
        self.seats.iter().filter(|s| s.has_chips()).count()
    }

    /// The big blind seat acts first in every round.
    fn first_to_act(&self) -> Option<SeatId> {
        let bb = self.config.big_blind_seat;
        [bb, bb.opponent()]
            .into_iter()
            .find(|id| self.seat(*id).has_chips())
    }

    fn next_to_act(&self, last: SeatId) -> Option<SeatId> {
        [last.opponent(), last]
            .into_iter()
            .find(|id| self.seat(*id).has_chips())
    }

    /// Moves to the next round, running out the board when betting is closed.
    fn next_round(&mut self) -> Result<(), GameError> {
        loop {
            for seat in self.seats.iter_mut() {
                seat.start_round();
            }

            self.current_bet = Chips::ZERO;
            self.current_seat = None;

            let count = match self.round {
                Round::Preflop => 3,
                Round::Flop | Round::Turn => 1,
                Round::River | Round::Showdown => return self.showdown(),
            };

            let cards = self.deck.deal(count)?;
            self.board.extend(cards);
            self.round = self.round.next();

            debug!("Enter {} board {:?}", self.round, self.board);

            if self.count_with_chips() >= 2 {
                self.current_seat = self.first_to_act();
                return Ok(());
            }
        }
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        self.round = Round::Showdown;
        self.return_uncalled();

        let human = self.eval_seat(SeatId::Human)?;
        let ai = self.eval_seat(SeatId::Ai)?;
        let pot = self.pot;

        match human.cmp(&ai) {
            std::cmp::Ordering::Greater => {
                self.award(SeatId::Human, pot);
                self.winner = Some(SeatId::Human);
            }
            std::cmp::Ordering::Less => {
                self.award(SeatId::Ai, pot);
                self.winner = Some(SeatId::Ai);
            }
            std::cmp::Ordering::Equal => {
                let (human_share, ai_share) = split_pot(pot, self.config.big_blind_seat);
                self.award(SeatId::Human, human_share);
                self.award(SeatId::Ai, ai_share);
                self.winner = None;
            }
        }

        self.hands = Some(ShowdownHands { human, ai });
        self.end_hand();
        Ok(())
    }

    /// Gives back the part of a bet the opponent could not match.
    fn return_uncalled(&mut self) {
        let [human, ai] = &self.seats;
        let (deeper, excess) = if human.contributed > ai.contributed {
            (SeatId::Human, human.contributed - ai.contributed)
        } else {
            (SeatId::Ai, ai.contributed - human.contributed)
        };

        if excess.is_zero() {
            return;
        }

        let seat = self.seat_mut(deeper);
        seat.chips += excess;
        seat.contributed -= excess;
        self.pot -= excess;

        debug!("Returned {excess} uncalled chips to {deeper}");
    }

    fn eval_seat(&self, id: SeatId) -> Result<PokerHand, GameError> {
        let mut cards = self.seat(id).hole_cards.to_vec();
        cards.extend_from_slice(&self.board);
        Ok(PokerHand::eval(&cards)?)
    }

    fn award(&mut self, seat: SeatId, chips: Chips) {
        self.seat_mut(seat).chips += chips;
        self.pot -= chips;
        self.payoffs.push(Payoff { seat, chips });
    }

    fn end_hand(&mut self) {
        self.ended = true;
        self.current_seat = None;
        self.current_bet = Chips::ZERO;
        for seat in self.seats.iter_mut() {
            seat.bet = Chips::ZERO;
        }

        match self.winner {
            Some(winner) => info!("Hand won by {winner} payoffs {:?}", self.payoffs),
            None => info!("Hand split payoffs {:?}", self.payoffs),
        }
    }
}
