// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Weighted random strategy.
use async_trait::async_trait;
use rand::{Rng, SeedableRng, distr::weighted::WeightedIndex, rngs::StdRng};
use std::sync::LazyLock;

use pokermind_core::{action::ActionKind, view::GameView};

use crate::{Decision, DecisionError, Strategy};

const CHOICES: [ActionKind; 5] = [
    ActionKind::Fold,
    ActionKind::Check,
    ActionKind::Call,
    ActionKind::Raise,
    ActionKind::AllIn,
];

const WEIGHTS: [u32; 5] = [10, 30, 30, 20, 10];

static WEIGHTED_CHOICES: LazyLock<WeightedIndex<u32>> =
    LazyLock::new(|| WeightedIndex::new(WEIGHTS).unwrap());

const REASONING: &str = "Fallback decision due to AI agent unavailability";

/// A strategy that picks weighted random actions.
///
/// Folds 10% of the time, checks 30%, calls 30%, raises 20% and goes all-in
/// 10%. A check facing a bet or an opponent raise becomes a call, raises are
/// between two and four big blinds.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
    weights: WeightedIndex<u32>,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl RandomStrategy {
    /// Creates a strategy seeded from the OS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strategy with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            weights: WEIGHTED_CHOICES.clone(),
        }
    }

    /// Picks a decision for the given view.
    pub fn pick(&mut self, view: &GameView) -> Decision {
        let mut action = CHOICES[self.rng.sample(&self.weights)];

        if action == ActionKind::Check {
            let facing_raise = view
                .last_opponent_action()
                .map(|a| a.is_aggressive())
                .unwrap_or(false);
            if facing_raise || !view.can_check() {
                action = ActionKind::Call;
            }
        }

        let mut decision = Decision::new(action)
            .with_confidence(self.rng.random_range(0.3..1.0))
            .with_reasoning(REASONING);

        if action == ActionKind::Raise {
            let multiplier = self.rng.random_range(2..=4);
            decision = decision.with_amount((view.big_blind * multiplier).max(view.min_raise));
        }

        decision
    }
}

#[async_trait]
impl Strategy for RandomStrategy {
    async fn decide(&mut self, view: &GameView) -> Result<Decision, DecisionError> {
        Ok(self.pick(view))
    }

    fn name(&self) -> &str {
        "random"
    }
}
