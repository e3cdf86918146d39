// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind heads-up table.
//!
//! A [Table] runs a session between a human seat and an AI [Agent] on a
//! spawned task. Commands from the human go through the table handle, the
//! agent plays its turns after a think delay and every change is published as
//! a [TableEvent].
//!
//! [Agent]: pokermind_bot::Agent
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod table;

pub use table::{Settlement, Table, TableConfig, TableEvent};
