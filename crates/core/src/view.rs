// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Read-only hand snapshot for one seat.
use serde::Serialize;

use crate::{
    action::{Action, ActionKind},
    game_state::{GameState, Round, ShowdownHands},
    poker::{Card, Chips, PlayerCards, SeatId},
};

/// What a seat can see of a hand.
///
/// The opponent hole cards stay covered unless the hand went to showdown.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    /// The seat this view is for.
    pub seat: SeatId,
    /// The current round.
    pub round: Round,
    /// The chips in the pot.
    pub pot: Chips,
    /// The community cards.
    pub board: Vec<Card>,
    /// This seat cards.
    pub hole_cards: PlayerCards,
    /// This seat chips.
    pub chips: Chips,
    /// This seat bet in the round.
    pub bet: Chips,
    /// The opponent chips.
    pub opponent_chips: Chips,
    /// The opponent bet in the round.
    pub opponent_bet: Chips,
    /// The opponent cards, covered until showdown.
    pub opponent_cards: PlayerCards,
    /// The highest bet in the round.
    pub current_bet: Chips,
    /// Chips this seat has to put in to call.
    pub to_call: Chips,
    /// The minimum raise that is not an all-in.
    pub min_raise: Chips,
    /// The hand big blind.
    pub big_blind: Chips,
    /// The hand actions log.
    pub actions: Vec<Action>,
    /// The actions this seat can take now, empty if not its turn.
    pub legal_actions: Vec<ActionKind>,
    /// The hand is over.
    pub ended: bool,
    /// The hand winner if there is one.
    pub winner: Option<SeatId>,
    /// Both hands if the hand went to showdown.
    pub hands: Option<ShowdownHands>,
    /// Chips paid at the end of the hand.
    pub payoffs: Vec<(SeatId, Chips)>,
}

impl GameView {
    /// Creates a view of `state` for `seat`.
    pub fn new(state: &GameState, seat: SeatId) -> Self {
        let me = state.seat(seat);
        let opponent = state.seat(seat.opponent());
        let to_call = state.to_call(seat);

        let opponent_cards = if state.hands().is_some() {
            opponent.hole_cards
        } else {
            opponent.hole_cards.covered()
        };

        let mut legal_actions = Vec::new();
        if !state.is_ended() && state.current_seat() == Some(seat) {
            legal_actions.push(ActionKind::Fold);
            if to_call.is_zero() {
                legal_actions.push(ActionKind::Check);
            } else {
                legal_actions.push(ActionKind::Call);
            }

            if me.chips > to_call {
                legal_actions.push(ActionKind::Raise);
            }

            if me.has_chips() {
                legal_actions.push(ActionKind::AllIn);
            }
        }

        Self {
            seat,
            round: state.round(),
            pot: state.pot(),
            board: state.board().to_vec(),
            hole_cards: me.hole_cards,
            chips: me.chips,
            bet: me.bet,
            opponent_chips: opponent.chips,
            opponent_bet: opponent.bet,
            opponent_cards,
            current_bet: state.current_bet(),
            to_call,
            min_raise: state.min_raise(),
            big_blind: state.config().big_blind,
            actions: state.actions().to_vec(),
            legal_actions,
            ended: state.is_ended(),
            winner: state.winner(),
            hands: state.hands().copied(),
            payoffs: state.payoffs().iter().map(|p| (p.seat, p.chips)).collect(),
        }
    }

    /// Checks if this seat has to act.
    pub fn is_turn(&self) -> bool {
        !self.legal_actions.is_empty()
    }

    /// Check if a check action is legal.
    pub fn can_check(&self) -> bool {
        self.is_legal(ActionKind::Check)
    }

    /// Check if a call action is legal.
    pub fn can_call(&self) -> bool {
        self.is_legal(ActionKind::Call)
    }

    /// Check if a raise action is legal.
    pub fn can_raise(&self) -> bool {
        self.is_legal(ActionKind::Raise)
    }

    /// Checks if an action kind is legal.
    pub fn is_legal(&self, kind: ActionKind) -> bool {
        self.legal_actions.contains(&kind)
    }

    /// The last action taken by the opponent.
    pub fn last_opponent_action(&self) -> Option<&Action> {
        self.actions
            .iter()
            .rev()
            .find(|a| a.seat == self.seat.opponent())
    }

    /// The last `n` actions.
    pub fn recent_actions(&self, n: usize) -> &[Action] {
        let start = self.actions.len().saturating_sub(n);
        &self.actions[start..]
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        action::TurnAction,
        game_state::HandConfig,
        poker::{Deck, PlayerCards},
        seat::Seat,
    };

    use super::*;

    fn new_state() -> GameState {
        let seats = [
            Seat::new(SeatId::Human, "Alice", Chips::new(1_000)),
            Seat::new(SeatId::Ai, "Bot", Chips::new(1_000)),
        ];
        GameState::start(HandConfig::default(), seats, Deck::default()).unwrap()
    }

    #[test]
    fn opponent_cards_are_covered() {
        let state = new_state();
        let view = state.view(SeatId::Ai);

        assert_eq!(view.opponent_cards, PlayerCards::Covered);
        assert!(matches!(view.hole_cards, PlayerCards::Cards(_, _)));
        assert_eq!(view.hole_cards, state.seat(SeatId::Ai).hole_cards);
        assert_eq!(view.to_call, Chips::new(10));
        assert!(!view.is_turn());

        // Hidden cards never reach the serialized view.
        let json = serde_json::to_string(&view).unwrap();
        for card in state.seat(SeatId::Human).hole_cards.to_vec() {
            let card = serde_json::to_string(&card).unwrap();
            assert!(!json.contains(&card));
        }
        assert!(json.contains(r#""opponent_cards":"Covered""#));
    }

    #[test]
    fn legal_actions() {
        let state = new_state();
        let view = state.view(SeatId::Human);
        assert!(view.is_turn());
        assert!(view.can_check());
        assert!(!view.can_call());
        assert!(view.can_raise());
        assert_eq!(view.min_raise, Chips::new(40));

        let state = state.apply(SeatId::Human, TurnAction::Check).unwrap();
        let view = state.view(SeatId::Ai);
        assert!(!view.can_check());
        assert!(view.can_call());
        assert_eq!(view.last_opponent_action().unwrap().kind, ActionKind::Check);
        assert_eq!(view.recent_actions(2).len(), 2);
        assert_eq!(view.recent_actions(10).len(), 3);
    }

    #[test]
    fn showdown_reveals_cards() {
        let mut state = new_state();
        state = state.apply(SeatId::Human, TurnAction::AllIn).unwrap();
        state = state.apply(SeatId::Ai, TurnAction::Call).unwrap();
        assert!(state.is_ended());

        let view = state.view(SeatId::Ai);
        assert_eq!(view.opponent_cards, state.seat(SeatId::Human).hole_cards);
        assert!(view.hands.is_some());
        assert!(view.legal_actions.is_empty());
        assert!(!view.payoffs.is_empty());
    }

    #[test]
    fn fold_keeps_cards_covered() {
        let state = new_state().apply(SeatId::Human, TurnAction::Fold).unwrap();
        let view = state.view(SeatId::Human);
        assert_eq!(view.opponent_cards, PlayerCards::Covered);
        assert_eq!(view.winner, Some(SeatId::Ai));
    }
}
