// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Decisions and their parsing.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pokermind_core::{
    action::{ActionKind, TurnAction},
    poker::Chips,
    view::GameView,
};

/// A decision provider failure.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The request could not be completed.
    #[error("decision request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with an error status.
    #[error("decision provider returned status {0}")]
    Status(u16),
    /// The response is not a decision.
    #[error("malformed decision: {0}")]
    Malformed(String),
    /// The response action is not a poker action.
    #[error("unknown action {0:?}")]
    UnknownAction(String),
}

/// An action chosen by a strategy.
///
/// A decision is not checked against the betting rules, use
/// [Decision::to_action] to get an action that the hand accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    /// The chosen action.
    pub action: ActionKind,
    /// The raise amount.
    pub amount: Option<Chips>,
    /// How confident the strategy is, between 0 and 1.
    pub confidence: f64,
    /// Why the strategy chose this action.
    pub reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    action: String,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

impl Decision {
    /// Creates a decision with the given action.
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            amount: None,
            confidence: 0.5,
            reasoning: None,
        }
    }

    /// Sets the decision amount.
    pub fn with_amount(mut self, amount: Chips) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the decision confidence, clamped between 0 and 1.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Sets the decision reasoning.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Parses the first JSON decision object in `text`.
    ///
    /// Text around the object is ignored so that a model completion with some
    /// prose before or after the JSON still parses, braces in the prose are
    /// skipped until an object reads as a decision.
    pub fn parse(text: &str) -> Result<Self, DecisionError> {
        let mut error = None;
        let mut raw = None;
        for (start, _) in text.match_indices('{') {
            match serde_json::Deserializer::from_str(&text[start..])
                .into_iter::<RawDecision>()
                .next()
            {
                Some(Ok(decision)) => {
                    raw = Some(decision);
                    break;
                }
                Some(Err(e)) => {
                    error.get_or_insert_with(|| e.to_string());
                }
                None => {}
            }
        }

        let raw = raw.ok_or_else(|| {
            DecisionError::Malformed(error.unwrap_or_else(|| "no JSON object".to_string()))
        })?;

        let action = parse_action(&raw.action)?;
        let amount = match raw.amount {
            Some(amount) if !amount.is_finite() || amount < 0.0 => {
                return Err(DecisionError::Malformed(format!("invalid amount {amount}")));
            }
            Some(amount) => Some(Chips::new(amount.round() as u32)),
            None => None,
        };

        Ok(Self {
            action,
            amount,
            confidence: clamp_confidence(raw.confidence.unwrap_or(0.5)),
            reasoning: raw.reasoning,
        })
    }

    /// Turns this decision into an action that is legal for `view`.
    ///
    /// A check facing a bet becomes a call, a call with nothing to call becomes
    /// a check, a raise is lifted to the minimum raise and becomes an all-in
    /// when it needs the whole stack.
    pub fn to_action(&self, view: &GameView) -> TurnAction {
        match self.action {
            ActionKind::Fold => TurnAction::Fold,
            ActionKind::Check | ActionKind::Call | ActionKind::Blind => {
                if view.to_call.is_zero() {
                    TurnAction::Check
                } else {
                    TurnAction::Call
                }
            }
            ActionKind::Raise => {
                let amount = self.amount.unwrap_or(view.min_raise).max(view.min_raise);
                if amount >= view.chips {
                    TurnAction::AllIn
                } else {
                    TurnAction::Raise(amount)
                }
            }
            ActionKind::AllIn => TurnAction::AllIn,
        }
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn parse_action(action: &str) -> Result<ActionKind, DecisionError> {
    let kind = match action.trim().to_ascii_lowercase().as_str() {
        "fold" => ActionKind::Fold,
        "check" => ActionKind::Check,
        "call" => ActionKind::Call,
        "raise" | "bet" => ActionKind::Raise,
        "all-in" | "allin" | "all_in" | "all in" => ActionKind::AllIn,
        _ => return Err(DecisionError::UnknownAction(action.to_string())),
    };

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokermind_core::{
        game_state::{GameState, HandConfig},
        poker::{Deck, SeatId},
        seat::Seat,
    };

    fn new_state() -> GameState {
        let seats = [
            Seat::new(SeatId::Human, "Alice", Chips::new(1_000)),
            Seat::new(SeatId::Ai, "Bot", Chips::new(200)),
        ];
        let state = GameState::start(HandConfig::default(), seats, Deck::default()).unwrap();
        state
            .apply(SeatId::Human, TurnAction::Raise(Chips::new(60)))
            .unwrap()
    }

    #[test]
    fn parse_json() {
        let d = Decision::parse(
            r#"{"action":"raise","amount":80,"confidence":0.8,"reasoning":"Strong pair"}"#,
        )
        .unwrap();
        assert_eq!(d.action, ActionKind::Raise);
        assert_eq!(d.amount, Some(Chips::new(80)));
        assert_eq!(d.confidence, 0.8);
        assert_eq!(d.reasoning.as_deref(), Some("Strong pair"));
    }

    #[test]
    fn parse_json_in_text() {
        let text = "I think the best play here is:\n```json\n{\"action\": \"All-In\", \
                    \"confidence\": 1.7}\n```\nGood luck {not json}";
        let d = Decision::parse(text).unwrap();
        assert_eq!(d.action, ActionKind::AllIn);
        assert_eq!(d.amount, None);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn parse_skips_braces_in_prose() {
        let text = "Given {pot} and my {cards}, I will raise: \
                    {\"action\": \"raise\", \"amount\": 60, \"confidence\": 0.6}";
        let d = Decision::parse(text).unwrap();
        assert_eq!(d.action, ActionKind::Raise);
        assert_eq!(d.amount, Some(Chips::new(60)));
        assert_eq!(d.confidence, 0.6);

        assert!(matches!(
            Decision::parse("only {prose} here"),
            Err(DecisionError::Malformed(_))
        ));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Decision::parse("no decision"),
            Err(DecisionError::Malformed(_))
        ));
        assert!(matches!(
            Decision::parse(r#"{"action": "#),
            Err(DecisionError::Malformed(_))
        ));
        assert!(matches!(
            Decision::parse(r#"{"confidence": 0.2}"#),
            Err(DecisionError::Malformed(_))
        ));
        assert!(matches!(
            Decision::parse(r#"{"action": "dance"}"#),
            Err(DecisionError::UnknownAction(_))
        ));
        assert!(matches!(
            Decision::parse(r#"{"action": "raise", "amount": -5}"#),
            Err(DecisionError::Malformed(_))
        ));
    }

    #[test]
    fn legal_actions() {
        let state = new_state();
        let view = state.view(SeatId::Ai);
        assert_eq!(view.to_call, Chips::new(70));
        assert_eq!(view.min_raise, Chips::new(160));

        let check = Decision::new(ActionKind::Check);
        assert_eq!(check.to_action(&view), TurnAction::Call);

        let small = Decision::new(ActionKind::Raise).with_amount(Chips::new(10));
        assert_eq!(small.to_action(&view), TurnAction::Raise(Chips::new(160)));

        let big = Decision::new(ActionKind::Raise).with_amount(Chips::new(500));
        assert_eq!(big.to_action(&view), TurnAction::AllIn);

        for decision in [check, small, big] {
            let action = decision.to_action(&view);
            assert!(state.apply(SeatId::Ai, action).is_ok(), "{action}");
        }
    }

    #[test]
    fn call_without_bet_is_check() {
        let seats = [
            Seat::new(SeatId::Human, "Alice", Chips::new(1_000)),
            Seat::new(SeatId::Ai, "Bot", Chips::new(1_000)),
        ];
        let state = GameState::start(HandConfig::default(), seats, Deck::default()).unwrap();
        let view = state.view(SeatId::Human);
        let call = Decision::new(ActionKind::Call).with_confidence(-2.0);
        assert_eq!(call.confidence, 0.0);
        assert_eq!(call.to_action(&view), TurnAction::Check);
    }
}
