// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Best five cards hand evaluation.
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error;

use pokermind_cards::{Card, Rank};

/// Evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A hand needs at least five cards.
    #[error("insufficient cards: a hand needs 5 cards, got {0}")]
    InsufficientCards(usize),
}

/// The hand category, from the lowest to the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight of the same suit.
    StraightFlush,
    /// Ace high straight flush.
    RoyalFlush,
}

impl HandRank {
    /// The category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }

    /// The category value, 0 for a high card up to 9 for a royal flush.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The best five cards hand out of a set of cards.
///
/// Equality and ordering only look at the hand rank and the tie-break rank,
/// two hands that differ only in their kickers compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PokerHand {
    rank: HandRank,
    tie_break: Rank,
    cards: [Card; 5],
}

impl PokerHand {
    /// Evaluates the best hand from five or more cards.
    pub fn eval(cards: &[Card]) -> Result<Self, EvalError> {
        if cards.len() < 5 {
            return Err(EvalError::InsufficientCards(cards.len()));
        }

        let mut best: Option<PokerHand> = None;
        for_each_five(cards, |hand| {
            let (rank, tie_break) = score(hand);
            let value = PokerHand {
                rank,
                tie_break,
                cards: *hand,
            };

            if best.is_none_or(|b| value > b) {
                best = Some(value);
            }
        });

        best.ok_or(EvalError::InsufficientCards(cards.len()))
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The category name.
    pub fn name(&self) -> &'static str {
        self.rank.name()
    }

    /// The rank that breaks ties between hands of the same category.
    pub fn tie_break(&self) -> Rank {
        self.tie_break
    }

    /// The five cards that make this hand.
    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }
}

impl PartialEq for PokerHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PokerHand {}

impl PartialOrd for PokerHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PokerHand {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.tie_break).cmp(&(other.rank, other.tie_break))
    }
}

impl fmt::Display for PokerHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.rank)?;
        for (idx, card) in self.cards.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str(")")
    }
}

/// Calls `f` for each five cards subset of `cards` in lexicographic order.
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut(&[Card; 5]),
{
    let n = cards.len();
    if n < 5 {
        return;
    }

    let mut idx = [0, 1, 2, 3, 4];
    loop {
        f(&idx.map(|i| cards[i]));

        // Find the rightmost index that can move forward.
        let mut i = 4;
        while idx[i] == n - 5 + i {
            if i == 0 {
                return;
            }
            i -= 1;
        }

        idx[i] += 1;
        for j in (i + 1)..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Scores a five cards hand.
fn score(cards: &[Card; 5]) -> (HandRank, Rank) {
    let mut ranks = cards.map(|c| c.rank());
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight = straight_high(&ranks);

    match (straight, is_flush) {
        (Some(Rank::Ace), true) => return (HandRank::RoyalFlush, Rank::Ace),
        (Some(high), true) => return (HandRank::StraightFlush, high),
        _ => {}
    }

    let mut counts = AHashMap::<Rank, usize>::with_capacity(5);
    for rank in ranks {
        *counts.entry(rank).or_default() += 1;
    }

    // Groups by count and then by rank, highest first.
    let mut groups = counts.into_iter().collect::<Vec<_>>();
    groups.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let (top_rank, top_count) = groups[0];
    let next_count = groups.get(1).map(|g| g.1).unwrap_or_default();

    match (top_count, next_count) {
        (4, _) => return (HandRank::FourOfAKind, top_rank),
        (3, 2) => return (HandRank::FullHouse, top_rank),
        _ => {}
    }

    if is_flush {
        return (HandRank::Flush, ranks[0]);
    }

    if let Some(high) = straight {
        return (HandRank::Straight, high);
    }

    match (top_count, next_count) {
        (3, _) => (HandRank::ThreeOfAKind, top_rank),
        (2, 2) => (HandRank::TwoPair, top_rank),
        (2, _) => (HandRank::OnePair, top_rank),
        _ => (HandRank::HighCard, ranks[0]),
    }
}

/// Returns the straight high card for ranks sorted from highest to lowest.
fn straight_high(ranks: &[Rank; 5]) -> Option<Rank> {
    if ranks.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }

    if ranks[0].value() - ranks[4].value() == 4 {
        return Some(ranks[0]);
    }

    // The wheel plays the ace low.
    let wheel = [Rank::Ace, Rank::Five, Rank::Four, Rank::Trey, Rank::Deuce];
    (*ranks == wheel).then_some(Rank::Five)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokermind_cards::Suit;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn eval(s: &str) -> PokerHand {
        PokerHand::eval(&cards(s)).unwrap()
    }

    #[test]
    fn categories() {
        let tests = [
            ("TH JH QH KH AH", HandRank::RoyalFlush, Rank::Ace),
            ("9S TS JS QS KS", HandRank::StraightFlush, Rank::King),
            ("AD 2D 3D 4D 5D", HandRank::StraightFlush, Rank::Five),
            ("7C 7D 7H 7S 2C", HandRank::FourOfAKind, Rank::Seven),
            ("3C 3D 3H KS KC", HandRank::FullHouse, Rank::Trey),
            ("2C 7C 9C JC KC", HandRank::Flush, Rank::King),
            ("9C TD JH QS KC", HandRank::Straight, Rank::King),
            ("AS 2D 3C 4H 5S", HandRank::Straight, Rank::Five),
            ("8C 8D 8H KS 2C", HandRank::ThreeOfAKind, Rank::Eight),
            ("4C 4D JH JS 2C", HandRank::TwoPair, Rank::Jack),
            ("QC QD 9H 5S 2C", HandRank::OnePair, Rank::Queen),
            ("2C 5D 9H JS KC", HandRank::HighCard, Rank::King),
        ];

        for (hand, rank, tie_break) in tests {
            let value = eval(hand);
            assert_eq!(value.rank(), rank, "{hand}");
            assert_eq!(value.tie_break(), tie_break, "{hand}");
        }
    }

    #[test]
    fn wheel_is_five_high() {
        let wheel = eval("AS 2D 3C 4H 5S");
        assert_eq!(wheel.rank().value(), 4);
        assert_eq!(wheel.tie_break(), Rank::Five);

        // A six high straight beats the wheel.
        assert!(eval("2D 3C 4H 5S 6C") > wheel);

        // Ace king high wrap is not a straight.
        assert_eq!(eval("QS KD AC 2H 3S").rank(), HandRank::HighCard);
    }

    #[test]
    fn royal_flush() {
        let royal = eval("TH JH QH KH AH");
        assert_eq!(royal.rank().value(), 9);
        assert_eq!(royal.name(), "Royal Flush");
    }

    #[test]
    fn best_of_seven() {
        // Flush in hearts using the board.
        let value = eval("AH 3H 5H 9H KH 5C 5D");
        assert_eq!(value.rank(), HandRank::Flush);
        assert_eq!(value.tie_break(), Rank::Ace);
        assert!(value.cards().iter().all(|c| c.suit() == Suit::Hearts));

        // Full house beats the trips on board.
        let value = eval("5S 9D 5C 5D 9H 2C KS");
        assert_eq!(value.rank(), HandRank::FullHouse);
        assert_eq!(value.tie_break(), Rank::Five);

        // Six cards.
        let value = eval("7C 8D 9H TS JC 2D");
        assert_eq!(value.rank(), HandRank::Straight);
        assert_eq!(value.tie_break(), Rank::Jack);
    }

    #[test]
    fn ties() {
        let h1 = eval("KC KD 9H 5S 2C");
        let h2 = eval("KH KS QH JS 3C");
        assert_eq!(h1, h2);
        assert_eq!(h1.cmp(&h2), Ordering::Equal);

        let h1 = eval("2C 7C 9C JC KC");
        let h2 = eval("3D 4D 8D TD KD");
        assert_eq!(h1, h2);
    }

    #[test]
    fn higher_category_wins() {
        let order = [
            "2C 5D 9H JS KC",
            "2C 2D 9H 5S 3C",
            "2C 2D 3H 3S 4C",
            "2C 2D 2H 5S 3C",
            "AS 2D 3C 4H 5S",
            "2C 3C 4C 5C 7C",
            "2C 2D 2H 3S 3C",
            "2C 2D 2H 2S 3C",
            "AD 2D 3D 4D 5D",
            "TH JH QH KH AH",
        ];

        let values = order.iter().map(|h| eval(h)).collect::<Vec<_>>();
        for (idx, value) in values.iter().enumerate() {
            assert_eq!(value.rank().value() as usize, idx);
        }

        for w in values.windows(2) {
            assert!(w[1] > w[0]);
        }

        // Lowest flush beats the highest straight.
        assert!(eval("2C 3C 4C 5C 7C") > eval("TH JS QC KD AH"));
    }

    #[test]
    fn insufficient_cards() {
        let err = PokerHand::eval(&cards("AS KS QS JS")).unwrap_err();
        assert_eq!(err, EvalError::InsufficientCards(4));
        assert!(PokerHand::eval(&[]).is_err());
    }

    #[test]
    fn five_subsets_count() {
        let cards = cards("2C 3D 4H 5S 6C 7D 8H");
        let mut count = 0;
        for_each_five(&cards, |_| count += 1);
        assert_eq!(count, 21);

        let mut count = 0;
        for_each_five(&cards[..5], |_| count += 1);
        assert_eq!(count, 1);
    }
}
