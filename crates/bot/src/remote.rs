// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Agent backend client.
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use pokermind_core::{
    action::Action,
    game_state::Round,
    poker::{Card, Chips},
    view::GameView,
    wallet::Wallet,
};

use crate::{Decision, DecisionError, Strategy};

/// Number of recent actions sent with a decision request.
const RECENT_ACTIONS: usize = 3;

/// Agent backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// The backend base url (eg. http://localhost:3001).
    pub url: String,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    /// Creates a configuration for the given url without a timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The game information sent to the agent backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// Chips in the pot.
    pub pot: Chips,
    /// The betting round.
    pub round: Round,
    /// The board cards.
    pub community_cards: Vec<Card>,
    /// The deciding seat hole cards.
    pub ai_cards: Vec<Card>,
    /// The deciding seat chips.
    pub ai_chips: Chips,
    /// The opponent chips.
    pub player_chips: Chips,
    /// The most recent actions.
    pub actions: Vec<Action>,
}

impl From<&GameView> for DecisionRequest {
    fn from(view: &GameView) -> Self {
        Self {
            pot: view.pot,
            round: view.round,
            community_cards: view.board.clone(),
            ai_cards: view.hole_cards.to_vec(),
            ai_chips: view.chips,
            player_chips: view.opponent_chips,
            actions: view.recent_actions(RECENT_ACTIONS).to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    address: String,
    balance: f64,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: f64,
}

#[derive(Debug, Serialize)]
struct TransactionRequest<'a> {
    amount: Chips,
    reason: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
    success: bool,
    #[serde(default)]
    transaction_hash: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// The agent backend HTTP client.
#[derive(Debug, Clone)]
pub struct Backend {
    client: reqwest::Client,
    base_url: String,
}

impl Backend {
    /// Creates a client for the given configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// The backend base url.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/agent/{path}", self.base_url)
    }

    /// Asks the backend for a decision.
    pub async fn decision(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let response = self
            .client
            .post(self.endpoint("decision"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecisionError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Decision::parse(&body)
    }

    /// Connects the agent, returns its address and balance.
    pub async fn connect(&self) -> Result<(String, f64)> {
        let response = self
            .client
            .post(self.endpoint("connect"))
            .send()
            .await
            .context("Failed to send connect request")?;

        if !response.status().is_success() {
            bail!("Connect failed with status {}", response.status());
        }

        let res: ConnectResponse = response
            .json()
            .await
            .context("Failed to parse connect response")?;

        Ok((res.address, res.balance))
    }

    /// Reads the agent balance.
    pub async fn balance(&self) -> Result<f64> {
        let response = self
            .client
            .get(self.endpoint("balance"))
            .send()
            .await
            .context("Failed to send balance request")?;

        if !response.status().is_success() {
            bail!("Balance failed with status {}", response.status());
        }

        let res: BalanceResponse = response
            .json()
            .await
            .context("Failed to parse balance response")?;

        Ok(res.balance)
    }

    /// Requests a transaction, returns the transaction hash.
    pub async fn transaction(&self, amount: Chips, reason: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint("transaction"))
            .json(&TransactionRequest { amount, reason })
            .send()
            .await
            .context("Failed to send transaction request")?;

        let status = response.status();
        let res: TransactionResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse transaction response ({status})"))?;

        match res {
            TransactionResponse {
                success: true,
                transaction_hash: Some(hash),
                ..
            } => Ok(hash),
            TransactionResponse { error, .. } => {
                bail!(
                    "Transaction failed: {}",
                    error.as_deref().unwrap_or("no transaction hash")
                )
            }
        }
    }
}

/// A strategy that asks the agent backend.
#[derive(Debug, Clone)]
pub struct RemoteStrategy {
    backend: Backend,
}

impl RemoteStrategy {
    /// Creates a strategy for the given backend.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Strategy for RemoteStrategy {
    async fn decide(&mut self, view: &GameView) -> Result<Decision, DecisionError> {
        self.backend.decision(&DecisionRequest::from(view)).await
    }

    fn name(&self) -> &str {
        self.backend.url()
    }
}

/// The agent wallet held by the backend.
#[derive(Debug, Clone)]
pub struct BackendWallet {
    backend: Backend,
    address: Option<String>,
}

impl BackendWallet {
    /// Connects the agent wallet.
    ///
    /// A failed connection gives a wallet without address, its reads and
    /// transfers still go to the backend.
    pub async fn connect(backend: Backend) -> Self {
        let address = match backend.connect().await {
            Ok((address, balance)) => {
                info!("Agent wallet {address} connected, balance {balance}");
                Some(address)
            }
            Err(e) => {
                warn!("Agent wallet connect failed: {e:#}");
                None
            }
        };

        Self { backend, address }
    }
}

#[async_trait]
impl Wallet for BackendWallet {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    async fn balance(&self) -> Result<f64> {
        self.backend.balance().await
    }

    async fn transfer(&self, amount: Chips, reason: &str) -> Result<String> {
        self.backend.transaction(amount, reason).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Agent;
    use pokermind_core::{
        action::{ActionKind, TurnAction},
        game_state::{GameState, HandConfig},
        poker::{Deck, SeatId},
        seat::Seat,
    };
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    /// Serves one HTTP request, sends back the request line and body.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
            }

            let request_line = head.lines().next().unwrap_or_default().to_string();
            let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();

            let _ = tx.send((request_line, request_body));
        });

        (url, rx)
    }

    fn new_view() -> GameView {
        let seats = [
            Seat::new(SeatId::Human, "Alice", Chips::new(1_000)),
            Seat::new(SeatId::Ai, "Bot", Chips::new(900)),
        ];
        GameState::start(HandConfig::default(), seats, Deck::default())
            .unwrap()
            .apply(SeatId::Human, TurnAction::Raise(Chips::new(40)))
            .unwrap()
            .view(SeatId::Ai)
    }

    #[test]
    fn decision_request_fields() {
        let view = new_view();
        let req = DecisionRequest::from(&view);
        assert_eq!(req.ai_cards.len(), 2);
        assert_eq!(req.actions.len(), 3);
        assert_eq!(req.ai_chips, Chips::new(890));
        assert_eq!(req.player_chips, Chips::new(940));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["round"], "preflop");
        assert_eq!(json["pot"], 70);
        assert!(json["communityCards"].as_array().unwrap().is_empty());
        assert!(json["aiCards"].is_array());
        assert_eq!(json["aiChips"], 890);
        assert_eq!(json["playerChips"], 940);
        assert_eq!(json["actions"][2]["type"], "raise");
    }

    #[tokio::test]
    async fn remote_decision() {
        let (url, rx) = serve_once(
            "200 OK",
            r#"{"action":"call","confidence":0.7,"reasoning":"Pot odds"}"#,
        )
        .await;

        let backend = Backend::new(&BackendConfig::new(format!("{url}/"))).unwrap();
        let mut strategy = RemoteStrategy::new(backend);
        let decision = strategy.decide(&new_view()).await.unwrap();
        assert_eq!(decision.action, ActionKind::Call);
        assert_eq!(decision.confidence, 0.7);

        let (line, body) = rx.await.unwrap();
        assert!(line.starts_with("POST /api/agent/decision "));
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["round"], "preflop");
    }

    #[tokio::test]
    async fn remote_error_status() {
        let (url, _rx) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"model unavailable"}"#,
        )
        .await;

        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let res = RemoteStrategy::new(backend).decide(&new_view()).await;
        assert!(matches!(res, Err(DecisionError::Status(500))));
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let (url, _rx) = serve_once("200 OK", "not json").await;

        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let mut agent = Agent::new(RemoteStrategy::new(backend));
        let res = agent.decide(&new_view()).await;
        assert!(res.fallback);
        assert_ne!(res.action, TurnAction::Check);
    }

    #[tokio::test]
    async fn remote_unreachable() {
        // Bind and drop to get a closed port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let res = RemoteStrategy::new(backend).decide(&new_view()).await;
        assert!(matches!(res, Err(DecisionError::Transport(_))));
    }

    #[tokio::test]
    async fn wallet_transfer() {
        let (url, rx) = serve_once(
            "200 OK",
            r#"{"success":true,"transactionHash":"hash_42"}"#,
        )
        .await;

        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let hash = backend
            .transaction(Chips::new(120), "Poker pot transfer - AI folded")
            .await
            .unwrap();
        assert_eq!(hash, "hash_42");

        let (line, body) = rx.await.unwrap();
        assert!(line.starts_with("POST /api/agent/transaction "));
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["amount"], 120);
        assert_eq!(body["reason"], "Poker pot transfer - AI folded");
    }

    #[tokio::test]
    async fn wallet_transfer_failed() {
        let (url, _rx) = serve_once(
            "500 Internal Server Error",
            r#"{"success":false,"error":"Agent not initialized"}"#,
        )
        .await;

        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let err = backend
            .transaction(Chips::new(120), "test")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Agent not initialized"));
    }

    #[tokio::test]
    async fn wallet_connect() {
        let (url, _rx) = serve_once("200 OK", r#"{"address":"0xabc","balance":1.5}"#).await;
        let backend = Backend::new(&BackendConfig::new(url)).unwrap();
        let wallet = BackendWallet::connect(backend).await;
        assert_eq!(wallet.address().as_deref(), Some("0xabc"));
    }
}
