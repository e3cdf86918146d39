// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example sample7 -- --hands 1000000
// ```
use clap::Parser;
use rand::prelude::*;
use std::time::Instant;

use pokermind_eval::*;

#[derive(Debug, Parser)]
struct Cli {
    /// Number of random 7 cards hands to evaluate.
    #[clap(long, short, default_value_t = 1_000_000)]
    hands: usize,
    /// Seed for the random generator.
    #[clap(long, short)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let now = Instant::now();
    let mut counts = [0usize; 10];

    for _ in 0..cli.hands {
        let mut deck = Deck::new_and_shuffled(&mut rng);
        let Ok(hand) = deck.deal(7) else {
            break;
        };

        if let Ok(value) = PokerHand::eval(&hand) {
            counts[value.rank().value() as usize] += 1;
        }
    }

    let elapsed = now.elapsed().as_secs_f64();
    let total = counts.iter().sum::<usize>();
    println!("Total hands      {total}");
    println!("Elapsed:         {:.3}s", elapsed);
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);

    let ranks = [
        HandRank::HighCard,
        HandRank::OnePair,
        HandRank::TwoPair,
        HandRank::ThreeOfAKind,
        HandRank::Straight,
        HandRank::Flush,
        HandRank::FullHouse,
        HandRank::FourOfAKind,
        HandRank::StraightFlush,
        HandRank::RoyalFlush,
    ];

    for rank in ranks {
        let count = counts[rank.value() as usize];
        let pct = 100.0 * count as f64 / total.max(1) as f64;
        println!("{:<16} {count:>10} {pct:>8.4}%", format!("{rank}:"));
    }
}
