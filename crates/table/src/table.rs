// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Heads-up table session.
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, mpsc, oneshot},
    task::JoinHandle,
    time,
};

use pokermind_bot::{Agent, AgentDecision, Decision};
use pokermind_core::{
    action::{Action, TurnAction},
    error::GameError,
    game_state::HandConfig,
    poker::{Chips, SeatId},
    view::GameView,
    wallet::Wallet,
};

mod state;

pub use state::Settlement;
use state::State;

/// Table configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Blinds and big blind seat.
    pub hand: HandConfig,
    /// How long the agent waits before its action is applied.
    pub think_delay: Duration,
    /// Seed for the deck shuffles.
    pub seed: Option<u64>,
    /// The human seat name.
    pub human_name: String,
    /// The AI seat name.
    pub ai_name: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            hand: HandConfig::default(),
            think_delay: Duration::from_millis(1_500),
            seed: None,
            human_name: "Player".to_string(),
            ai_name: "AI Agent".to_string(),
        }
    }
}

/// An event published by the table.
#[derive(Debug, Clone)]
pub enum TableEvent {
    /// A new hand started.
    HandStarted {
        /// The hand id.
        hand_id: u64,
        /// The human view.
        view: GameView,
    },
    /// An action has been applied.
    ActionApplied {
        /// The hand id.
        hand_id: u64,
        /// The logged action.
        action: Action,
        /// The human view after the action.
        view: GameView,
    },
    /// The agent is deciding.
    AgentThinking {
        /// The hand id.
        hand_id: u64,
    },
    /// The agent decided, the action follows after the think delay.
    AgentDecided {
        /// The hand id.
        hand_id: u64,
        /// The agent decision.
        decision: Decision,
        /// The action that will be applied.
        action: TurnAction,
        /// Set if the decision comes from the fallback strategy.
        fallback: bool,
    },
    /// The hand ended.
    HandEnded {
        /// The hand id.
        hand_id: u64,
        /// The human view with the showdown hands and payoffs.
        view: GameView,
    },
    /// The hand was aborted and the contributions returned.
    HandAborted {
        /// The hand id.
        hand_id: u64,
        /// Why the hand was aborted.
        reason: String,
    },
    /// The pot won by the human seat has been transferred.
    Settled {
        /// The hand id.
        hand_id: u64,
        /// The transferred chips.
        amount: Chips,
        /// The transaction id.
        transaction: String,
    },
}

/// A heads-up table between a human and the AI agent.
#[derive(Debug)]
pub struct Table {
    /// Channel for sending commands.
    commands_tx: mpsc::Sender<TableCommand>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Start a new hand.
    StartHand {
        resp_tx: oneshot::Sender<Result<GameView>>,
    },
    /// Apply a human action.
    Act {
        action: TurnAction,
        resp_tx: oneshot::Sender<Result<GameView>>,
    },
    /// Get the human view.
    View {
        resp_tx: oneshot::Sender<Option<GameView>>,
    },
    /// Clear the hand and restore the starting chips.
    Reset { resp_tx: oneshot::Sender<()> },
}

impl Table {
    /// Creates a table and spawns its task.
    ///
    /// The `wallet` is the AI wallet, the pots won by the human are transferred
    /// from it. Events are sent to `events_tx`.
    pub fn new(
        config: TableConfig,
        chips: [Chips; 2],
        agent: Agent,
        wallet: Arc<dyn Wallet>,
        events_tx: mpsc::Sender<TableEvent>,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(128);
        let (turn_tx, turn_rx) = mpsc::channel(8);

        let think_delay = config.think_delay;
        let mut task = TableTask {
            state: State::new(config, chips, wallet.address()),
            agent: Arc::new(Mutex::new(agent)),
            wallet,
            think_delay,
            commands_rx,
            events_tx,
            turn_tx,
            turn_rx,
            pending: None,
        };

        tokio::spawn(async move {
            task.run().await;
            info!("Table task stopped");
        });

        Self { commands_tx }
    }

    /// Starts a new hand, a hand in progress is aborted.
    pub async fn start_hand(&self) -> Result<GameView> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::StartHand { resp_tx })
            .await?;
        resp_rx.await?
    }

    /// Applies a human action.
    ///
    /// An invalid action returns a [GameError] and leaves the hand unchanged.
    pub async fn act(&self, action: TurnAction) -> Result<GameView> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::Act { action, resp_tx })
            .await?;
        resp_rx.await?
    }

    /// The human view of the current hand.
    pub async fn view(&self) -> Result<Option<GameView>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::View { resp_tx })
            .await?;
        Ok(resp_rx.await?)
    }

    /// Clears the hand and restores the starting chips.
    pub async fn reset(&self) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::Reset { resp_tx })
            .await?;
        Ok(resp_rx.await?)
    }
}

/// An agent action ready to be applied.
#[derive(Debug)]
struct AgentTurn {
    hand_id: u64,
    action: TurnAction,
}

struct TableTask {
    /// Session and hand state.
    state: State,
    /// The AI agent, shared with the pending turn.
    agent: Arc<Mutex<Agent>>,
    /// The AI wallet.
    wallet: Arc<dyn Wallet>,
    think_delay: Duration,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// Channel for publishing events.
    events_tx: mpsc::Sender<TableEvent>,
    turn_tx: mpsc::Sender<AgentTurn>,
    turn_rx: mpsc::Receiver<AgentTurn>,
    /// The agent turn in progress.
    pending: Option<JoinHandle<()>>,
}

impl TableTask {
    async fn run(&mut self) {
        loop {
            tokio::select! {
                res = self.commands_rx.recv() => match res {
                    Some(TableCommand::StartHand { resp_tx }) => {
                        let res = self.start_hand().await;
                        let _ = resp_tx.send(res);
                    }
                    Some(TableCommand::Act { action, resp_tx }) => {
                        let res = self.act(action).await;
                        let _ = resp_tx.send(res);
                    }
                    Some(TableCommand::View { resp_tx }) => {
                        let _ = resp_tx.send(self.human_view());
                    }
                    Some(TableCommand::Reset { resp_tx }) => {
                        self.cancel_pending();
                        self.state.reset();
                        let _ = resp_tx.send(());
                    }
                    // The table handle has been dropped.
                    None => break,
                },
                Some(turn) = self.turn_rx.recv() => {
                    self.agent_turn(turn).await;
                }
            }
        }

        self.cancel_pending();
    }

    async fn start_hand(&mut self) -> Result<GameView> {
        self.cancel_pending();

        let aborted = self.state.game().is_some_and(|g| !g.is_ended());
        let old_hand_id = self.state.hand_id();

        let view = self.state.start_hand()?.view(SeatId::Human);
        if aborted {
            self.send(TableEvent::HandAborted {
                hand_id: old_hand_id,
                reason: "new hand started".to_string(),
            })
            .await;
        }

        let hand_id = self.state.hand_id();
        self.send(TableEvent::HandStarted {
            hand_id,
            view: view.clone(),
        })
        .await;

        self.advance().await;
        Ok(view)
    }

    async fn act(&mut self, action: TurnAction) -> Result<GameView> {
        self.apply(SeatId::Human, action).await?;
        self.human_view().context("No hand in progress")
    }

    async fn agent_turn(&mut self, turn: AgentTurn) {
        if turn.hand_id != self.state.hand_id() {
            debug!("Discarding agent action for old hand {}", turn.hand_id);
            return;
        }

        self.pending = None;

        if let Err(GameError::InvalidAction(e)) = self.apply(SeatId::Ai, turn.action).await {
            let fallback = match self.state.game() {
                Some(game) if game.to_call(SeatId::Ai).is_zero() => TurnAction::Check,
                _ => TurnAction::Call,
            };

            warn!("Agent action {} rejected: {e}, playing {fallback}", turn.action);
            if let Err(e) = self.apply(SeatId::Ai, fallback).await {
                error!("Agent fallback action {fallback} failed: {e}");
            }
        }
    }

    /// Applies an action and publishes what happened.
    async fn apply(&mut self, seat: SeatId, action: TurnAction) -> Result<(), GameError> {
        let hand_id = self.state.hand_id();

        match self.state.apply(seat, action) {
            Ok(game) => {
                let event = game.actions().last().map(|a| TableEvent::ActionApplied {
                    hand_id,
                    action: *a,
                    view: game.view(SeatId::Human),
                });

                if let Some(event) = event {
                    self.send(event).await;
                }

                self.advance().await;
                Ok(())
            }
            Err(e @ GameError::DeckExhausted(_)) => {
                self.send(TableEvent::HandAborted {
                    hand_id,
                    reason: e.to_string(),
                })
                .await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Ends the hand or hands the turn to the agent.
    async fn advance(&mut self) {
        let hand_id = self.state.hand_id();
        let Some(game) = self.state.game() else {
            return;
        };

        if game.is_ended() {
            let view = game.view(SeatId::Human);
            self.send(TableEvent::HandEnded { hand_id, view }).await;

            if let Some(settlement) = self.state.settlement() {
                self.settle(hand_id, settlement);
            }
        } else if game.current_seat() == Some(SeatId::Ai) && self.pending.is_none() {
            let view = game.view(SeatId::Ai);
            self.spawn_agent_turn(hand_id, view).await;
        }
    }

    async fn spawn_agent_turn(&mut self, hand_id: u64, view: GameView) {
        self.send(TableEvent::AgentThinking { hand_id }).await;

        let agent = self.agent.clone();
        let events_tx = self.events_tx.clone();
        let turn_tx = self.turn_tx.clone();
        let think_delay = self.think_delay;

        self.pending = Some(tokio::spawn(async move {
            let AgentDecision {
                decision,
                action,
                fallback,
            } = agent.lock().await.decide(&view).await;

            let _ = events_tx
                .send(TableEvent::AgentDecided {
                    hand_id,
                    decision,
                    action,
                    fallback,
                })
                .await;

            time::sleep(think_delay).await;
            let _ = turn_tx.send(AgentTurn { hand_id, action }).await;
        }));
    }

    /// Transfers the pot without waiting for the wallet.
    fn settle(&self, hand_id: u64, settlement: Settlement) {
        let wallet = self.wallet.clone();
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let Settlement { amount, reason } = settlement;
            match wallet.transfer(amount, reason).await {
                Ok(transaction) => {
                    info!("Hand {hand_id} settled {amount} chips, transaction {transaction}");
                    let _ = events_tx
                        .send(TableEvent::Settled {
                            hand_id,
                            amount,
                            transaction,
                        })
                        .await;
                }
                Err(e) => error!("Hand {hand_id} settlement of {amount} chips failed: {e:#}"),
            }
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    fn human_view(&self) -> Option<GameView> {
        self.state.game().map(|g| g.view(SeatId::Human))
    }

    async fn send(&self, event: TableEvent) {
        let _ = self.events_tx.send(event).await;
    }
}

impl Drop for TableTask {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
