// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind terminal client.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::Parser;
use log::info;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;

use pokermind_bot::{
    Agent, Backend, BackendConfig, BackendWallet, RandomStrategy, RemoteStrategy,
};
use pokermind_core::{
    game_state::HandConfig,
    poker::{Chips, SeatId},
    wallet::{ChipsPolicy, DemoWallet, Wallet},
};
use pokermind_table::{Table, TableConfig};

mod command;
mod terminal;

#[derive(Debug, Parser)]
struct Cli {
    /// The agent backend url (eg. http://localhost:3001).
    #[clap(long, short, env = "POKERMIND_BACKEND")]
    backend: Option<String>,
    /// Backend request timeout in milliseconds.
    #[clap(long, default_value_t = 10_000)]
    timeout_ms: u64,
    /// Decision retries before using the random strategy.
    #[clap(long, default_value_t = 1)]
    retries: u32,
    /// How long the agent thinks in milliseconds.
    #[clap(long, default_value_t = 1_500)]
    think_ms: u64,
    /// Seed for the shuffles and the random strategy.
    #[clap(long)]
    seed: Option<u64>,
    /// The small blind.
    #[clap(long, default_value_t = 10)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 20)]
    big_blind: u32,
    /// Your name at the table.
    #[clap(long, short, default_value = "Player")]
    name: String,
    /// Your demo wallet balance.
    #[clap(long, default_value_t = 1.0)]
    balance: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let fallback = match cli.seed {
        Some(seed) => RandomStrategy::with_seed(seed),
        None => RandomStrategy::new(),
    };

    let (agent, wallet): (Agent, Arc<dyn Wallet>) = match &cli.backend {
        Some(url) => {
            let config = BackendConfig::new(url).with_timeout(Duration::from_millis(cli.timeout_ms));
            let backend = Backend::new(&config)?;
            let wallet = BackendWallet::connect(backend.clone()).await;
            let agent = Agent::new(RemoteStrategy::new(backend)).with_retries(cli.retries);
            (agent, Arc::new(wallet))
        }
        None => {
            info!("No agent backend, playing against the random strategy");
            (Agent::local(), Arc::new(DemoWallet::new(1.0)))
        }
    };

    let policy = ChipsPolicy::default();
    let human_chips = policy.starting_chips(&DemoWallet::new(cli.balance)).await?;
    let ai_chips = policy.starting_chips_or(wallet.as_ref(), human_chips).await;

    let config = TableConfig {
        hand: HandConfig {
            small_blind: Chips::new(cli.small_blind),
            big_blind: Chips::new(cli.big_blind),
            big_blind_seat: SeatId::Human,
        },
        think_delay: Duration::from_millis(cli.think_ms),
        seed: cli.seed,
        human_name: cli.name,
        ..TableConfig::default()
    };

    let (events_tx, events_rx) = mpsc::channel(128);
    let table = Table::new(
        config,
        [human_chips, ai_chips],
        agent.with_fallback(fallback),
        wallet,
        events_tx,
    );

    terminal::run(table, events_rx).await
}
