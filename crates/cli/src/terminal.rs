// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal I/O.
use anyhow::Result;
use crossterm::{
    queue,
    style::{self, Stylize},
};
use std::io::{self, Write};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use pokermind_core::{
    action::{Action, ActionKind},
    game_state::Round,
    poker::{Card, PlayerCards, SeatId},
    view::GameView,
};
use pokermind_table::{Table, TableEvent};

use crate::command::Command;

/// Runs the terminal loop until the user quits or stdin closes.
pub async fn run(table: Table, mut events_rx: mpsc::Receiver<TableEvent>) -> Result<()> {
    let mut term = Terminal::new(io::stdout());
    term.help()?;
    term.execute(&table, Command::Deal).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            res = lines.next_line() => {
                let Some(line) = res? else {
                    break;
                };

                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(cmd)) => term.execute(&table, cmd).await?,
                    Ok(None) => {}
                    Err(e) => term.error(&e.to_string())?,
                }
            }
            Some(event) = events_rx.recv() => {
                term.event(&event)?;
            }
        }
    }

    Ok(())
}

struct Terminal<W: Write> {
    w: W,
    round: Option<Round>,
}

impl<W: Write> Terminal<W> {
    fn new(w: W) -> Self {
        Self { w, round: None }
    }

    async fn execute(&mut self, table: &Table, cmd: Command) -> Result<()> {
        let res = match cmd {
            Command::Act(action) => table.act(action).await.map(|_| ()),
            Command::Deal => table.start_hand().await.map(|_| ()),
            Command::State => match table.view().await? {
                Some(view) => return self.view(&view),
                None => return self.line("No hand in progress, type deal".dark_grey()),
            },
            Command::Reset => {
                table.reset().await?;
                self.round = None;
                return self.line("Chips restored, type deal for a new hand".dark_grey());
            }
            Command::Help => return self.help(),
            Command::Quit => Ok(()),
        };

        match res {
            Ok(()) => Ok(()),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn event(&mut self, event: &TableEvent) -> Result<()> {
        match event {
            TableEvent::HandStarted { hand_id, view } => {
                self.round = Some(view.round);
                self.line(format!("=== Hand {hand_id} ===").as_str().bold())?;
                self.view(view)
            }
            TableEvent::ActionApplied { action, view, .. } => {
                self.action(action)?;
                if !view.ended && self.round != Some(view.round) {
                    self.round = Some(view.round);
                    self.line(
                        format!("--- {} {} ---", view.round, cards(&view.board))
                            .as_str()
                            .bold(),
                    )?;
                }

                if view.is_turn() {
                    self.prompt(view)?;
                }

                Ok(())
            }
            TableEvent::AgentThinking { .. } => self.line("AI agent is thinking...".dark_grey()),
            TableEvent::AgentDecided {
                decision,
                action,
                fallback,
                ..
            } => {
                let mut text = format!(
                    "AI agent decided {action} ({:.0}% confident)",
                    decision.confidence * 100.0
                );
                if let Some(reasoning) = &decision.reasoning {
                    text.push_str(&format!(": {reasoning}"));
                }
                if *fallback {
                    text.push_str(" [fallback]");
                }
                self.line(text.as_str().dark_cyan())
            }
            TableEvent::HandEnded { view, .. } => self.hand_ended(view),
            TableEvent::HandAborted { hand_id, reason } => {
                self.round = None;
                self.line(format!("Hand {hand_id} aborted: {reason}").as_str().red())
            }
            TableEvent::Settled {
                amount, transaction, ..
            } => self.line(
                format!("Pot of {amount} chips transferred, transaction {transaction}")
                    .as_str()
                    .dark_yellow(),
            ),
        }
    }

    fn view(&mut self, view: &GameView) -> Result<()> {
        self.line(
            format!(
                "{} | pot {} | board {}",
                view.round,
                view.pot,
                cards(&view.board)
            )
            .as_str()
            .white(),
        )?;
        self.line(
            format!(
                "You   {:>6} chips  bet {:>5}  {}",
                view.chips,
                view.bet,
                hole_cards(view.hole_cards)
            )
            .as_str()
            .green(),
        )?;
        self.line(
            format!(
                "AI    {:>6} chips  bet {:>5}  {}",
                view.opponent_chips,
                view.opponent_bet,
                hole_cards(view.opponent_cards)
            )
            .as_str()
            .cyan(),
        )?;

        if view.is_turn() {
            self.prompt(view)?;
        }

        Ok(())
    }

    fn action(&mut self, action: &Action) -> Result<()> {
        let who = match action.seat {
            SeatId::Human => "You",
            SeatId::Ai => "AI",
        };

        let text = match action.amount {
            Some(amount) if action.kind != ActionKind::Fold => {
                format!("{who}: {} {amount}", action.kind.label())
            }
            _ => format!("{who}: {}", action.kind.label()),
        };

        match action.seat {
            SeatId::Human => self.line(text.as_str().green()),
            SeatId::Ai => self.line(text.as_str().cyan()),
        }
    }

    fn prompt(&mut self, view: &GameView) -> Result<()> {
        let actions = view
            .legal_actions
            .iter()
            .map(|kind| match kind {
                ActionKind::Call => format!("call {}", view.to_call),
                ActionKind::Raise => format!("raise <{}+>", view.min_raise),
                ActionKind::AllIn => "allin".to_string(),
                kind => kind.label().to_lowercase(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        self.line(format!("Your turn: {actions}").as_str().yellow())
    }

    fn hand_ended(&mut self, view: &GameView) -> Result<()> {
        self.round = None;

        if let Some(hands) = &view.hands {
            self.line(
                format!(
                    "Board {} | your {} {} | AI {} {}",
                    cards(&view.board),
                    hole_cards(view.hole_cards),
                    hands.get(view.seat),
                    hole_cards(view.opponent_cards),
                    hands.get(view.seat.opponent()),
                )
                .as_str()
                .white(),
            )?;
        }

        let result = match view.winner {
            Some(winner) if winner == view.seat => "You win".green().bold(),
            Some(_) => "AI agent wins".cyan().bold(),
            None => "Split pot".yellow().bold(),
        };
        self.line(result)?;

        for (seat, chips) in &view.payoffs {
            let who = if *seat == view.seat { "You" } else { "AI" };
            self.line(format!("{who} collect {chips}").as_str().white())?;
        }

        self.line(
            format!(
                "You have {} chips, AI has {}. Type deal for the next hand",
                view.chips, view.opponent_chips
            )
            .as_str()
            .dark_grey(),
        )
    }

    fn help(&mut self) -> Result<()> {
        self.line(
            "Commands: fold, check, call, raise <n>, allin, deal, state, reset, help, quit"
                .dark_grey(),
        )
    }

    fn error(&mut self, msg: &str) -> Result<()> {
        self.line(msg.red())
    }

    fn line<D: std::fmt::Display>(&mut self, text: style::StyledContent<D>) -> Result<()> {
        queue!(self.w, style::PrintStyledContent(text), style::Print("\n"))?;
        self.w.flush()?;
        Ok(())
    }
}

fn cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }

    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn hole_cards(cards: PlayerCards) -> String {
    match cards {
        PlayerCards::None => "".to_string(),
        PlayerCards::Covered => "▒▒ ▒▒".to_string(),
        PlayerCards::Cards(c1, c2) => format!("{c1} {c2}"),
    }
}
