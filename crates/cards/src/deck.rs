// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cards and deck definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A Poker card.
///
/// Cards serialize as `{"suit": "hearts", "rank": "10"}`, the format used
/// when exchanging game views with a remote decision provider.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    suit: Suit,
    rank: Rank,
}

impl Card {
    /// Create a card given a suit and rank.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Self { suit, rank }
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses a card like `"AS"`, `"TH"` or `"10H"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError(s.to_string());
        let s = s.trim();
        let split = s.len().checked_sub(1).ok_or_else(err)?;
        let (rank, suit) = (s.get(..split).ok_or_else(err)?, s.get(split..).ok_or_else(err)?);

        let rank = match rank.to_ascii_uppercase().as_str() {
            "2" => Rank::Deuce,
            "3" => Rank::Trey,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(err()),
        };

        let suit = match suit.to_ascii_uppercase().as_str() {
            "H" => Suit::Hearts,
            "D" => Suit::Diamonds,
            "C" => Suit::Clubs,
            "S" => Suit::Spades,
            _ => return Err(err()),
        };

        Ok(Card::new(rank, suit))
    }
}

/// Error parsing a card string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card {0:?}")]
pub struct ParseCardError(String);

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    #[serde(rename = "2")]
    Deuce = 2,
    /// Trey
    #[serde(rename = "3")]
    Trey,
    /// Four
    #[serde(rename = "4")]
    Four,
    /// Five
    #[serde(rename = "5")]
    Five,
    /// Six
    #[serde(rename = "6")]
    Six,
    /// Seven
    #[serde(rename = "7")]
    Seven,
    /// Eight
    #[serde(rename = "8")]
    Eight,
    /// Nine
    #[serde(rename = "9")]
    Nine,
    /// Ten
    #[serde(rename = "10")]
    Ten,
    /// Jack
    #[serde(rename = "J")]
    Jack,
    /// Queen
    #[serde(rename = "Q")]
    Queen,
    /// King
    #[serde(rename = "K")]
    King,
    /// Ace
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Returns all ranks from lowest to highest.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The rank value, from 2 for a deuce to 14 for an ace.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Hearts suit.
    Hearts,
    /// Diamonds suit.
    Diamonds,
    /// Clubs suit.
    Clubs,
    /// Spades suit.
    Spades,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades].into_iter()
    }
}

/// Deck errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Asked for more cards than the deck holds.
    #[error("deck exhausted: requested {requested} cards with {remaining} remaining")]
    Exhausted {
        /// Cards requested.
        requested: usize,
        /// Cards left in the deck.
        remaining: usize,
    },
    /// A stacked deck holds the same card twice.
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
}

/// A cards deck.
///
/// Cards are dealt from the back of the deck, a card once dealt never goes
/// back into the same deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new ordered deck, suit-major.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stacked deck with the given cards, the last card is dealt first.
    ///
    /// Used to script hands in tests. The cards may be fewer than a full deck
    /// but each card can appear only once.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        for (idx, card) in cards.iter().enumerate() {
            if cards[..idx].contains(card) {
                return Err(DeckError::DuplicateCard(*card));
            }
        }

        Ok(Self { cards })
    }

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    /// Shuffles the remaining cards in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals `n` cards from the deck.
    ///
    /// Nothing is dealt if the deck has fewer than `n` cards.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.cards.len();
        if n > remaining {
            return Err(DeckError::Exhausted {
                requested: n,
                remaining,
            });
        }

        let mut cards = self.cards.split_off(remaining - n);
        cards.reverse();
        Ok(cards)
    }

    /// Deals a single card from the deck.
    pub fn deal_card(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Exhausted {
            requested: 1,
            remaining: 0,
        })
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards left in the deck.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// The cards left in the deck, the last card is the next one dealt.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;

    #[test]
    fn new_deck_is_all_suits_and_ranks() {
        let deck = Deck::default();
        assert_eq!(deck.remaining(), Deck::SIZE);

        let cards = deck.into_iter().collect::<HashSet<_>>();
        assert_eq!(cards.len(), Deck::SIZE);

        for suit in Suit::suits() {
            for rank in Rank::ranks() {
                assert!(cards.contains(&Card::new(rank, suit)));
            }
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(101);
        let mut deck = Deck::new_and_shuffled(&mut rng);
        assert_eq!(deck.remaining(), Deck::SIZE);

        let mut sorted = deck.cards().to_vec();
        sorted.sort_by_key(|c| (c.suit(), c.rank()));
        let mut fresh = Deck::default().cards().to_vec();
        fresh.sort_by_key(|c| (c.suit(), c.rank()));
        assert_eq!(sorted, fresh);

        deck.shuffle(&mut rng);
        assert_eq!(deck.remaining(), Deck::SIZE);
    }

    #[test]
    fn deal_and_remainder_rebuild_deck() {
        let mut deck = Deck::new_and_shuffled(&mut rand::rng());
        let top = *deck.cards().last().unwrap();

        let mut dealt = deck.deal(9).unwrap();
        assert_eq!(dealt.len(), 9);
        assert_eq!(dealt[0], top);
        assert_eq!(deck.remaining(), Deck::SIZE - 9);

        dealt.push(deck.deal_card().unwrap());
        dealt.extend(deck.clone());

        let cards = dealt.into_iter().collect::<HashSet<_>>();
        assert_eq!(cards.len(), Deck::SIZE);
    }

    #[test]
    fn stacked_deck() {
        let ah = Card::new(Rank::Ace, Suit::Hearts);
        let ks = Card::new(Rank::King, Suit::Spades);

        let mut deck = Deck::from_cards(vec![ks, ah]).unwrap();
        assert_eq!(deck.deal_card().unwrap(), ah);
        assert_eq!(deck.remaining(), 1);

        let err = Deck::from_cards(vec![ah, ks, ah]).unwrap_err();
        assert_eq!(err, DeckError::DuplicateCard(ah));
    }

    #[test]
    fn deal_exhausted() {
        let mut deck = Deck::default();
        deck.deal(50).unwrap();

        let err = deck.deal(3).unwrap_err();
        assert_eq!(
            err,
            DeckError::Exhausted {
                requested: 3,
                remaining: 2
            }
        );

        // A failed deal leaves the deck untouched.
        assert_eq!(deck.remaining(), 2);
        deck.deal(2).unwrap();
        assert!(deck.is_empty());
        assert!(deck.deal_card().is_err());
        assert_eq!(deck.deal(0).unwrap(), vec![]);
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "KD");

        let c = Card::new(Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5S");

        let c = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "TH");
    }

    #[test]
    fn parse_cards() {
        assert_eq!("KD".parse::<Card>().unwrap(), Card::new(Rank::King, Suit::Diamonds));
        assert_eq!("10h".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!("TH".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert!("".parse::<Card>().is_err());
        assert!("1H".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());

        for card in Deck::default() {
            assert_eq!(card.to_string().parse::<Card>().unwrap(), card);
        }
    }

    #[test]
    fn card_json() {
        let c = Card::new(Rank::Ten, Suit::Hearts);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"suit":"hearts","rank":"10"}"#);

        let c: Card = serde_json::from_str(r#"{"suit":"spades","rank":"A"}"#).unwrap();
        assert_eq!(c, Card::new(Rank::Ace, Suit::Spades));
    }

    #[test]
    fn rank_values() {
        let values = Rank::ranks().map(|r| r.value()).collect::<Vec<_>>();
        assert_eq!(values, (2..=14).collect::<Vec<_>>());
    }
}
