// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal commands.
use anyhow::{Result, bail};

use pokermind_core::{action::TurnAction, poker::Chips};

/// A command typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play an action.
    Act(TurnAction),
    /// Deal a new hand.
    Deal,
    /// Show the hand.
    State,
    /// Restore the starting chips.
    Reset,
    /// Show the commands.
    Help,
    /// Exit.
    Quit,
}

impl Command {
    /// Parses a command line, an empty line gives `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(None);
        };

        let cmd = match name.to_ascii_lowercase().as_str() {
            "fold" | "f" => Command::Act(TurnAction::Fold),
            "check" | "k" => Command::Act(TurnAction::Check),
            "call" | "c" => Command::Act(TurnAction::Call),
            "raise" | "r" | "bet" => {
                let Some(amount) = parts.next() else {
                    bail!("Usage: raise <chips>");
                };

                match amount.parse::<u32>() {
                    Ok(amount) => Command::Act(TurnAction::Raise(Chips::new(amount))),
                    Err(_) => bail!("Invalid raise amount {amount:?}"),
                }
            }
            "allin" | "all-in" | "a" => Command::Act(TurnAction::AllIn),
            "deal" | "d" => Command::Deal,
            "state" | "s" => Command::State,
            "reset" => Command::Reset,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => bail!("Unknown command {name:?}, type help for the commands"),
        };

        if parts.next().is_some() {
            bail!("Too many arguments for {name}");
        }

        Ok(Some(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(
            Command::parse("FOLD").unwrap(),
            Some(Command::Act(TurnAction::Fold))
        );
        assert_eq!(
            Command::parse(" raise 120 ").unwrap(),
            Some(Command::Act(TurnAction::Raise(Chips::new(120))))
        );
        assert_eq!(
            Command::parse("all-in").unwrap(),
            Some(Command::Act(TurnAction::AllIn))
        );
        assert_eq!(Command::parse("d").unwrap(), Some(Command::Deal));
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn parse_errors() {
        assert!(Command::parse("raise").is_err());
        assert!(Command::parse("raise ten").is_err());
        assert!(Command::parse("raise -5").is_err());
        assert!(Command::parse("check now").is_err());
        assert!(Command::parse("shuffle").is_err());
    }
}
