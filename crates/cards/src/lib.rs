// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use pokermind_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.to_string(), "AH");
//! assert_eq!(ah.rank().value(), 14);
//! ```
//!
//! and a [Deck] type for shuffling and dealing cards:
//!
//! ```
//! # use pokermind_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! let hole = deck.deal(2).unwrap();
//! assert_eq!(hole.len(), 2);
//! assert_eq!(deck.remaining(), Deck::SIZE - 2);
//! assert!(deck.deal(51).is_err());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, DeckError, ParseCardError, Rank, Suit};
