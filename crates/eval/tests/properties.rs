// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Evaluator properties over random hands.
use proptest::prelude::*;

use pokermind_eval::*;

fn all_cards() -> Vec<Card> {
    Deck::default().into_iter().collect()
}

/// Strategy for `n` distinct cards.
fn distinct_cards(n: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(all_cards()).prop_shuffle().prop_map(move |cards| cards[..n].to_vec())
}

proptest! {
    #[test]
    fn best_hand_is_subset_of_input(cards in distinct_cards(7)) {
        let value = PokerHand::eval(&cards).unwrap();
        for card in value.cards() {
            prop_assert!(cards.contains(card));
        }
    }

    #[test]
    fn more_cards_never_worse(cards in distinct_cards(7)) {
        let five = PokerHand::eval(&cards[..5]).unwrap();
        let six = PokerHand::eval(&cards[..6]).unwrap();
        let seven = PokerHand::eval(&cards).unwrap();
        prop_assert!(six >= five);
        prop_assert!(seven >= six);
    }

    #[test]
    fn order_does_not_matter(cards in distinct_cards(7)) {
        let mut reversed = cards.clone();
        reversed.reverse();

        let v1 = PokerHand::eval(&cards).unwrap();
        let v2 = PokerHand::eval(&reversed).unwrap();
        prop_assert_eq!(v1.rank(), v2.rank());
        prop_assert_eq!(v1.tie_break(), v2.tie_break());
    }

    #[test]
    fn category_decides_before_tie_break(h1 in distinct_cards(5), h2 in distinct_cards(5)) {
        let v1 = PokerHand::eval(&h1).unwrap();
        let v2 = PokerHand::eval(&h2).unwrap();
        if v1.rank() != v2.rank() {
            prop_assert_eq!(v1 > v2, v1.rank() > v2.rank());
        } else {
            prop_assert_eq!(v1.cmp(&v2), v1.tie_break().cmp(&v2.tie_break()));
        }
    }

    #[test]
    fn fewer_than_five_cards_fail(cards in distinct_cards(4), n in 0usize..5) {
        let cards = &cards[..n.min(4)];
        prop_assert_eq!(
            PokerHand::eval(cards).unwrap_err(),
            EvalError::InsufficientCards(cards.len())
        );
    }
}
