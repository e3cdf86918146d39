// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind AI decision strategies.
//!
//! A [Strategy] turns a [GameView](core::view::GameView) into a [Decision].
//! The [RemoteStrategy] asks the agent backend, the [RandomStrategy] picks a
//! weighted random action, and an [Agent] wraps a primary strategy with the
//! random one so that a decision is always available:
//!
//! ```no_run
//! # use pokermind_bot::{Agent, Backend, BackendConfig, RemoteStrategy, core::view::GameView};
//! # async fn run(view: GameView) -> anyhow::Result<()> {
//! let backend = Backend::new(&BackendConfig::new("http://localhost:3001"))?;
//! let mut agent = Agent::new(RemoteStrategy::new(backend)).with_retries(1);
//! let decision = agent.decide(&view).await;
//! println!("{} ({:.0}%)", decision.action, decision.decision.confidence * 100.0);
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod agent;
mod decision;
mod random;
mod remote;

pub use agent::{Agent, AgentDecision, Strategy};
pub use decision::{Decision, DecisionError};
pub use random::RandomStrategy;
pub use remote::{Backend, BackendConfig, BackendWallet, DecisionRequest, RemoteStrategy};

/// Reexport core types.
pub use pokermind_core as core;
