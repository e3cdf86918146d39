// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind core types and the heads-up betting state machine.
//!
//! A hand is a [GameState](game_state::GameState) advanced by pure
//! transitions, each seat gets a [GameView](view::GameView) that hides the
//! opponent cards, and a [Wallet](wallet::Wallet) sizes stacks and settles
//! pots.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod action;
pub mod error;
pub mod game_state;
pub mod poker;
pub mod seat;
pub mod view;
pub mod wallet;
