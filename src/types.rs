//! Shared types for the roulette simulator.
//!
//! These types form the data model used across all modules. The bet,
//! engine and strategy modules depend on them without depending on
//! each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::wheel::Pocket;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Color classification of a wheel pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
    Green,
    /// A label outside the 38 pockets. Never produced for valid pockets.
    Unknown,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
            Color::Green => write!(f, "Green"),
            Color::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Color::Red),
            "black" => Ok(Color::Black),
            "green" => Ok(Color::Green),
            "unknown" => Ok(Color::Unknown),
            _ => Err(anyhow::anyhow!("Unknown color: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Recorded outcomes
// ---------------------------------------------------------------------------

/// One pre-recorded spin from a sequence file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSpin {
    pub round: u64,
    pub pocket: Pocket,
    /// Winning number label exactly as recorded ("0", "00", "1".."36").
    pub label: String,
    /// Recorded color; `None` when the row left it blank.
    pub color: Option<Color>,
}

impl RecordedSpin {
    /// Build a spin record from a pocket, deriving label and color.
    pub fn from_pocket(round: u64, pocket: Pocket) -> Self {
        Self {
            round,
            pocket,
            label: pocket.label(),
            color: Some(pocket.color()),
        }
    }
}

/// The resolved result of one spin, as the strategy loop sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub pocket: Pocket,
    pub label: String,
    pub color: Color,
}

impl RoundOutcome {
    /// A live spin: label and color derived from the pocket.
    pub fn from_pocket(pocket: Pocket) -> Self {
        Self {
            pocket,
            label: pocket.label(),
            color: pocket.color(),
        }
    }

    /// A recorded spin. Recorded values are trusted as-is; a blank color
    /// is recomputed from the recorded label.
    pub fn from_recorded(spin: &RecordedSpin) -> Self {
        Self {
            pocket: spin.pocket,
            label: spin.label.clone(),
            color: spin
                .color
                .unwrap_or_else(|| crate::wheel::num_to_color(&spin.label)),
        }
    }
}

// ---------------------------------------------------------------------------
// Round log
// ---------------------------------------------------------------------------

/// Result of a single strategy round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub bet_label: String,
    /// Amount actually staked this round (after any all-in clamp).
    pub wager: f64,
    pub winning_label: String,
    pub winning_index: usize,
    pub color: Color,
    pub net: f64,
    pub balance: f64,
    /// The progression asked for more than the balance; the whole balance was staked.
    pub all_in: bool,
    /// Wager the progression will ask for next round.
    pub next_wager: f64,
}

impl RoundRecord {
    pub fn is_win(&self) -> bool {
        self.net > 0.0
    }
}

impl fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Round {}: Bet on {} | Landed on {} ({}) | Net: ${:+.2} | Balance: ${:.2}",
            self.round, self.bet_label, self.winning_label, self.color, self.net, self.balance,
        )
    }
}

// ---------------------------------------------------------------------------
// Terminal state
// ---------------------------------------------------------------------------

/// How a strategy run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    /// Balance reached the buyout target.
    Success,
    /// Balance hit zero.
    Bust,
    /// Recorded sequence exhausted before either boundary.
    Done,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalState::Success => write!(f, "SUCCESS"),
            TerminalState::Bust => write!(f, "BUST"),
            TerminalState::Done => write!(f, "DONE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Everything a finished strategy run hands back to its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub bet_label: String,
    pub initial_balance: f64,
    pub target_balance: f64,
    pub final_balance: f64,
    pub round_count: u64,
    pub terminal: TerminalState,
    pub rounds: Vec<RoundRecord>,
}

impl RunReport {
    pub fn wins(&self) -> usize {
        self.rounds.iter().filter(|r| r.is_win()).count()
    }

    pub fn losses(&self) -> usize {
        self.rounds.len() - self.wins()
    }

    /// Largest amount staked in any single round.
    pub fn max_wager(&self) -> f64 {
        self.rounds.iter().map(|r| r.wager).fold(0.0, f64::max)
    }

    /// Lowest balance seen after any round (the initial balance if none were played).
    pub fn low_water_mark(&self) -> f64 {
        self.rounds
            .iter()
            .map(|r| r.balance)
            .fold(self.initial_balance, f64::min)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} rounds on {} | balance=${:.2} target=${:.2} | W{}/L{} | max wager=${:.2}",
            self.terminal,
            self.round_count,
            self.bet_label,
            self.final_balance,
            self.target_balance,
            self.wins(),
            self.losses(),
            self.max_wager(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building or validating a bet.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BetError {
    #[error("Invalid tile: {0:?} (expected 0, 00 or 1-36)")]
    InvalidTile(String),

    #[error("Bet vector must have 38 slots for [0, 00, 1..36], got {0}")]
    InvalidLength(usize),

    #[error("Bet vector values must be finite and non-negative: {0}")]
    InvalidValue(String),

    #[error("Custom bet must sum to a finite positive value, got {0}")]
    InvalidCustomBet(f64),

    #[error("Unknown bet spec: {0}")]
    UnknownBetSpec(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
