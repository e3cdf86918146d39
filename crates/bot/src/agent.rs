// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! AI agent with fallback.
use async_trait::async_trait;
use log::{debug, warn};

use pokermind_core::{action::TurnAction, view::GameView};

use crate::{Decision, DecisionError, RandomStrategy};

/// A decision strategy.
#[async_trait]
pub trait Strategy: Send + 'static {
    /// Decides an action for the seat that owns the view.
    async fn decide(&mut self, view: &GameView) -> Result<Decision, DecisionError>;

    /// The strategy name used in logs.
    fn name(&self) -> &str;
}

/// A decision and the legal action it maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDecision {
    /// The strategy decision.
    pub decision: Decision,
    /// The action to apply.
    pub action: TurnAction,
    /// Set if the decision comes from the fallback strategy.
    pub fallback: bool,
}

/// The AI agent.
///
/// Asks the primary strategy, retrying on failure, and falls back to a
/// [RandomStrategy] so that [Agent::decide] always gives a legal action.
pub struct Agent {
    primary: Option<Box<dyn Strategy>>,
    fallback: RandomStrategy,
    retries: u32,
}

impl Agent {
    /// Creates an agent with the given primary strategy.
    pub fn new(primary: impl Strategy) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            fallback: RandomStrategy::new(),
            retries: 0,
        }
    }

    /// Creates an agent that only uses the random strategy.
    pub fn local() -> Self {
        Self {
            primary: None,
            fallback: RandomStrategy::new(),
            retries: 0,
        }
    }

    /// Sets the fallback strategy.
    pub fn with_fallback(mut self, fallback: RandomStrategy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets how many times a failed primary request is retried.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Decides an action for the view.
    pub async fn decide(&mut self, view: &GameView) -> AgentDecision {
        if let Some(primary) = self.primary.as_mut() {
            for attempt in 1..=self.retries + 1 {
                match primary.decide(view).await {
                    Ok(decision) => {
                        debug!("{} decided {decision:?}", primary.name());
                        return AgentDecision::new(decision, view, false);
                    }
                    Err(e) => warn!("Decision from {} failed ({attempt}): {e}", primary.name()),
                }
            }
        }

        AgentDecision::new(self.fallback.pick(view), view, true)
    }
}

impl AgentDecision {
    fn new(decision: Decision, view: &GameView, fallback: bool) -> Self {
        let action = decision.to_action(view);
        Self {
            decision,
            action,
            fallback,
        }
    }
}
