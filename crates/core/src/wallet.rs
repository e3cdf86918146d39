// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Wallet boundary used to size stacks and settle pots.
use anyhow::{Result, bail};
use async_trait::async_trait;
use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::poker::Chips;

/// Reason for a transfer after the AI folded.
pub const REASON_AI_FOLDED: &str = "Poker pot transfer - AI folded";

/// Reason for a transfer after the player won at showdown.
pub const REASON_PLAYER_WON: &str = "Poker pot transfer - Player won";

/// Wallet errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// The balance buys fewer chips than the table minimum.
    #[error("insufficient balance {balance}: {chips} chips, the minimum is {minimum}")]
    InsufficientBalance {
        /// The wallet balance.
        balance: f64,
        /// The chips the balance buys.
        chips: Chips,
        /// The minimum chips.
        minimum: Chips,
    },
}

/// An external wallet.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The wallet address, if connected.
    fn address(&self) -> Option<String>;

    /// Reads the wallet balance.
    async fn balance(&self) -> Result<f64>;

    /// Transfers `amount` chips out of the wallet, returns the transaction id.
    async fn transfer(&self, amount: Chips, reason: &str) -> Result<String>;
}

/// Converts a wallet balance into table chips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipsPolicy {
    /// Chips for one unit of balance.
    pub chips_per_unit: u32,
    /// Maximum starting chips.
    pub max_chips: Chips,
    /// Minimum starting chips.
    pub min_chips: Chips,
    /// Chips used when the balance cannot be read.
    pub demo_chips: Chips,
}

impl Default for ChipsPolicy {
    fn default() -> Self {
        Self {
            chips_per_unit: 1_000,
            max_chips: Chips::new(2_000),
            min_chips: Chips::new(100),
            demo_chips: Chips::new(1_000),
        }
    }
}

impl ChipsPolicy {
    /// The chips a balance buys, capped at the maximum.
    pub fn chips_for_balance(&self, balance: f64) -> Chips {
        let chips = (balance.max(0.0) * self.chips_per_unit as f64).floor();
        let max = self.max_chips.amount() as f64;
        Chips::new(chips.min(max) as u32)
    }

    /// The starting chips for a wallet.
    ///
    /// A failed balance read falls back to the demo chips.
    pub async fn starting_chips(&self, wallet: &dyn Wallet) -> Result<Chips, WalletError> {
        let balance = match wallet.balance().await {
            Ok(balance) => balance,
            Err(e) => {
                warn!("Balance read failed, using {} demo chips: {e:#}", self.demo_chips);
                return Ok(self.demo_chips);
            }
        };

        let chips = self.chips_for_balance(balance);
        if chips < self.min_chips {
            return Err(WalletError::InsufficientBalance {
                balance,
                chips,
                minimum: self.min_chips,
            });
        }

        info!("Wallet balance {balance} buys {chips} chips");
        Ok(chips)
    }

    /// The starting chips for a wallet that must not block play.
    ///
    /// A balance below the minimum is logged and `fallback` is used instead.
    pub async fn starting_chips_or(&self, wallet: &dyn Wallet, fallback: Chips) -> Chips {
        match self.starting_chips(wallet).await {
            Ok(chips) => chips,
            Err(e) => {
                warn!("{e}, using {fallback} chips");
                fallback
            }
        }
    }
}

/// A transfer recorded by a [DemoWallet].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// The transaction id.
    pub id: String,
    /// The chips transferred.
    pub amount: Chips,
    /// The transfer reason.
    pub reason: String,
}

#[derive(Debug, Default)]
struct Ledger {
    balance: f64,
    transfers: Vec<Transfer>,
    fail: bool,
}

/// In-memory wallet for demo play and tests.
#[derive(Debug, Clone, Default)]
pub struct DemoWallet {
    address: Option<String>,
    ledger: Arc<Mutex<Ledger>>,
}

impl DemoWallet {
    /// Creates a demo wallet with the given balance.
    pub fn new(balance: f64) -> Self {
        let ledger = Ledger {
            balance,
            ..Ledger::default()
        };

        Self {
            address: Some("demo".to_string()),
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Creates a wallet whose calls always fail.
    pub fn failing() -> Self {
        let wallet = Self::new(0.0);
        wallet.ledger.lock().fail = true;
        wallet
    }

    /// The transfers made so far.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.ledger.lock().transfers.clone()
    }
}

#[async_trait]
impl Wallet for DemoWallet {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    async fn balance(&self) -> Result<f64> {
        let ledger = self.ledger.lock();
        if ledger.fail {
            bail!("demo wallet unavailable");
        }

        Ok(ledger.balance)
    }

    async fn transfer(&self, amount: Chips, reason: &str) -> Result<String> {
        let mut ledger = self.ledger.lock();
        if ledger.fail {
            bail!("demo wallet unavailable");
        }

        let id = format!("demo-{}", ledger.transfers.len() + 1);
        ledger.transfers.push(Transfer {
            id: id.clone(),
            amount,
            reason: reason.to_string(),
        });

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_to_chips() {
        let policy = ChipsPolicy::default();
        assert_eq!(policy.chips_for_balance(0.5), Chips::new(500));
        assert_eq!(policy.chips_for_balance(1.2345), Chips::new(1_234));
        assert_eq!(policy.chips_for_balance(12.0), Chips::new(2_000));
        assert_eq!(policy.chips_for_balance(-1.0), Chips::ZERO);
        assert_eq!(policy.chips_for_balance(f64::NAN), Chips::ZERO);
    }

    #[tokio::test]
    async fn starting_chips() {
        let policy = ChipsPolicy::default();

        let chips = policy.starting_chips(&DemoWallet::new(1.5)).await.unwrap();
        assert_eq!(chips, Chips::new(1_500));

        // Failures degrade to demo chips.
        let chips = policy.starting_chips(&DemoWallet::failing()).await.unwrap();
        assert_eq!(chips, Chips::new(1_000));

        let err = policy.starting_chips(&DemoWallet::new(0.05)).await.unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn low_balance_uses_fallback_chips() {
        let policy = ChipsPolicy::default();

        let chips = policy
            .starting_chips_or(&DemoWallet::new(0.05), Chips::new(1_200))
            .await;
        assert_eq!(chips, Chips::new(1_200));

        let chips = policy
            .starting_chips_or(&DemoWallet::new(0.5), Chips::new(1_200))
            .await;
        assert_eq!(chips, Chips::new(500));

        let chips = policy
            .starting_chips_or(&DemoWallet::failing(), Chips::new(1_200))
            .await;
        assert_eq!(chips, Chips::new(1_000));
    }

    #[tokio::test]
    async fn demo_transfers() {
        let wallet = DemoWallet::new(1.0);
        let id = wallet
            .transfer(Chips::new(120), REASON_PLAYER_WON)
            .await
            .unwrap();
        assert_eq!(id, "demo-1");

        let transfers = wallet.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, Chips::new(120));
        assert_eq!(transfers[0].reason, REASON_PLAYER_WON);

        assert!(DemoWallet::failing().transfer(Chips::new(1), "x").await.is_err());
    }
}
