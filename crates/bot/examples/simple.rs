// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A simple strategy playing against the random strategy.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use log::info;
use rand::{SeedableRng, rngs::StdRng};

use pokermind_bot::{
    Agent, Decision, DecisionError, RandomStrategy, Strategy,
    core::{
        action::ActionKind,
        game_state::{GameState, HandConfig},
        poker::{Chips, Deck, PlayerCards, SeatId},
        seat::Seat,
        view::GameView,
    },
};

/// Raises pairs preflop, otherwise calls or checks.
struct AlwaysCallOrCheck;

#[async_trait]
impl Strategy for AlwaysCallOrCheck {
    async fn decide(&mut self, view: &GameView) -> Result<Decision, DecisionError> {
        if let PlayerCards::Cards(c1, c2) = view.hole_cards {
            if c1.rank() == c2.rank() && view.board.is_empty() && view.can_raise() {
                return Ok(Decision::new(ActionKind::Raise)
                    .with_amount(view.min_raise)
                    .with_confidence(0.8)
                    .with_reasoning("Pocket pair"));
            }
        }

        let action = if view.can_call() {
            ActionKind::Call
        } else {
            ActionKind::Check
        };

        Ok(Decision::new(action))
    }

    fn name(&self) -> &str {
        "call-or-check"
    }
}

#[derive(Debug, Parser)]
struct Cli {
    /// Number of hands to play.
    #[clap(long, short = 'n', default_value_t = 100)]
    hands: u32,
    /// Starting chips for each seat.
    #[clap(long, short, default_value_t = 1_000)]
    chips: u32,
    /// Random seed.
    #[clap(long, short)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut human = Agent::local().with_fallback(RandomStrategy::with_seed(cli.seed.unwrap_or(0)));
    let mut ai = Agent::new(AlwaysCallOrCheck);

    let mut chips = [Chips::new(cli.chips), Chips::new(cli.chips)];
    let config = HandConfig::default();

    for hand in 0..cli.hands {
        if chips.iter().any(|c| c.is_zero()) {
            break;
        }

        let seats = [
            Seat::new(SeatId::Human, "Random", chips[0]),
            Seat::new(SeatId::Ai, "CallOrCheck", chips[1]),
        ];
        let mut state = GameState::start(config, seats, Deck::new_and_shuffled(&mut rng))?;

        while let Some(seat) = state.current_seat() {
            let view = state.view(seat);
            let decision = match seat {
                SeatId::Human => human.decide(&view).await,
                SeatId::Ai => ai.decide(&view).await,
            };
            state = state.apply(seat, decision.action)?;
        }

        chips = [state.seat(SeatId::Human).chips, state.seat(SeatId::Ai).chips];
        info!(
            "Hand {hand}: winner {:?} random {} call-or-check {}",
            state.winner(),
            chips[0],
            chips[1]
        );
    }

    Ok(())
}
