// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pokermind Poker hand evaluator.
//!
//! Evaluates any hand of five or more cards by scoring every five cards
//! subset and keeping the best one. Hands compare by their [HandRank] first
//! and by a single tie-break [Rank] second:
//!
//! ```
//! # use pokermind_eval::*;
//! let flush = [
//!     Card::new(Rank::Deuce, Suit::Clubs),
//!     Card::new(Rank::Seven, Suit::Clubs),
//!     Card::new(Rank::Nine, Suit::Clubs),
//!     Card::new(Rank::Jack, Suit::Clubs),
//!     Card::new(Rank::King, Suit::Clubs),
//! ];
//! let straight = [
//!     Card::new(Rank::Ten, Suit::Hearts),
//!     Card::new(Rank::Jack, Suit::Spades),
//!     Card::new(Rank::Queen, Suit::Clubs),
//!     Card::new(Rank::King, Suit::Diamonds),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ];
//!
//! let v1 = PokerHand::eval(&flush).unwrap();
//! let v2 = PokerHand::eval(&straight).unwrap();
//! assert_eq!(v1.rank(), HandRank::Flush);
//! assert!(v1 > v2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{EvalError, HandRank, PokerHand};

// Reexport cards types.
pub use pokermind_cards::{Card, Deck, DeckError, ParseCardError, Rank, Suit};
