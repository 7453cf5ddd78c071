//! The American wheel.
//!
//! Pockets are addressed by index: 0 = "0", 1 = "00", and `n + 1` for
//! number `n` in 1..=36. Every bet vector uses the same layout.
//! Random spins come from a [`SpinSource`] so tests and replays can
//! inject a deterministic one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::types::{BetError, Color, RecordedSpin};

/// Number of pockets on an American wheel.
pub const POCKETS: usize = 38;

pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];
pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

// ---------------------------------------------------------------------------
// Pocket
// ---------------------------------------------------------------------------

/// A single wheel position, always a valid index in `0..POCKETS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pocket(u8);

impl Pocket {
    pub const ZERO: Pocket = Pocket(0);
    pub const DOUBLE_ZERO: Pocket = Pocket(1);

    pub fn from_index(index: usize) -> Option<Self> {
        (index < POCKETS).then_some(Pocket(index as u8))
    }

    /// Pocket holding number `n` (1..=36).
    pub fn for_number(n: u8) -> Option<Self> {
        (1..=36).contains(&n).then_some(Pocket(n + 1))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The printed number, `None` for the two green pockets.
    pub fn number(self) -> Option<u8> {
        (self.0 >= 2).then_some(self.0 - 1)
    }

    pub fn label(self) -> String {
        match self.0 {
            0 => "0".to_string(),
            1 => "00".to_string(),
            n => (n - 1).to_string(),
        }
    }

    pub fn color(self) -> Color {
        match self.number() {
            None => Color::Green,
            Some(n) if RED_NUMBERS.contains(&n) => Color::Red,
            Some(n) if BLACK_NUMBERS.contains(&n) => Color::Black,
            Some(_) => Color::Unknown,
        }
    }

    /// All 38 pockets in index order.
    pub fn all() -> impl Iterator<Item = Pocket> {
        (0..POCKETS as u8).map(Pocket)
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parses a tile: "0", "00", or an integer in 1..=36.
impl std::str::FromStr for Pocket {
    type Err = BetError;

    fn from_str(tile: &str) -> Result<Self, Self::Err> {
        match tile {
            "0" => Ok(Pocket::ZERO),
            "00" => Ok(Pocket::DOUBLE_ZERO),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Pocket::for_number)
                .ok_or_else(|| BetError::InvalidTile(tile.to_string())),
        }
    }
}

impl TryFrom<u8> for Pocket {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Pocket::from_index(index as usize)
            .ok_or_else(|| format!("pocket index {index} out of range 0..{POCKETS}"))
    }
}

impl From<Pocket> for u8 {
    fn from(pocket: Pocket) -> u8 {
        pocket.0
    }
}

/// Label for a pocket index, `None` if the index is off the wheel.
pub fn index_to_num(index: usize) -> Option<String> {
    Pocket::from_index(index).map(Pocket::label)
}

/// Color for a number label. Labels outside the wheel map to `Unknown`.
pub fn num_to_color(label: &str) -> Color {
    match label {
        "0" | "00" => Color::Green,
        other => match other.trim().parse::<i64>() {
            Ok(n) if RED_NUMBERS.iter().any(|&r| i64::from(r) == n) => Color::Red,
            Ok(n) if BLACK_NUMBERS.iter().any(|&b| i64::from(b) == n) => Color::Black,
            _ => Color::Unknown,
        },
    }
}

// ---------------------------------------------------------------------------
// Spin sources
// ---------------------------------------------------------------------------

/// Anything that can pick a winning pocket.
#[cfg_attr(test, mockall::automock)]
pub trait SpinSource {
    fn spin(&mut self) -> Pocket;
}

/// Uniform spins backed by a `rand` generator.
pub struct RngSpinner<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RngSpinner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSpinner<StdRng> {
    /// Reproducible spins for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> SpinSource for RngSpinner<R> {
    fn spin(&mut self) -> Pocket {
        Pocket(self.rng.gen_range(0..POCKETS as u8))
    }
}

/// Spin `spins` times, numbering rounds from 1.
pub fn generate_sequence(spins: u64, spinner: &mut dyn SpinSource) -> Vec<RecordedSpin> {
    let sequence: Vec<_> = (1..=spins)
        .map(|round| RecordedSpin::from_pocket(round, spinner.spin()))
        .collect();
    debug!(spins, "Sequence generated");
    sequence
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
