//! The fixed table of category bets.

use std::fmt;

use super::BetVector;
use crate::types::BetError;
use crate::wheel::{Pocket, BLACK_NUMBERS, RED_NUMBERS};

/// A predefined grouping of pockets staked with an even split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetCategory {
    Red,
    Black,
    Green,
    Even,
    Odd,
    Low,
    High,
    First12,
    Second12,
    Third12,
    ColumnA,
    ColumnB,
    ColumnC,
}

impl BetCategory {
    pub const ALL: [BetCategory; 13] = [
        BetCategory::Red,
        BetCategory::Black,
        BetCategory::Green,
        BetCategory::Even,
        BetCategory::Odd,
        BetCategory::Low,
        BetCategory::High,
        BetCategory::First12,
        BetCategory::Second12,
        BetCategory::Third12,
        BetCategory::ColumnA,
        BetCategory::ColumnB,
        BetCategory::ColumnC,
    ];

    /// Spec token, as typed by the user.
    pub fn token(self) -> &'static str {
        match self {
            BetCategory::Red => "red",
            BetCategory::Black => "black",
            BetCategory::Green => "green",
            BetCategory::Even => "even",
            BetCategory::Odd => "odd",
            BetCategory::Low => "low",
            BetCategory::High => "high",
            BetCategory::First12 => "1st12",
            BetCategory::Second12 => "2nd12",
            BetCategory::Third12 => "3rd12",
            BetCategory::ColumnA => "col_a",
            BetCategory::ColumnB => "col_b",
            BetCategory::ColumnC => "col_c",
        }
    }

    /// Canonical display name.
    pub fn label(self) -> &'static str {
        match self {
            BetCategory::Red => "Red",
            BetCategory::Black => "Black",
            BetCategory::Green => "Green",
            BetCategory::Even => "Even",
            BetCategory::Odd => "Odd",
            BetCategory::Low => "Low (1-18)",
            BetCategory::High => "High (19-36)",
            BetCategory::First12 => "1st 12",
            BetCategory::Second12 => "2nd 12",
            BetCategory::Third12 => "3rd 12",
            BetCategory::ColumnA => "Column A",
            BetCategory::ColumnB => "Column B",
            BetCategory::ColumnC => "Column C",
        }
    }

    fn covers(self, n: u8) -> bool {
        match self {
            BetCategory::Red => RED_NUMBERS.contains(&n),
            BetCategory::Black => BLACK_NUMBERS.contains(&n),
            BetCategory::Green => false,
            BetCategory::Even => n % 2 == 0,
            BetCategory::Odd => n % 2 == 1,
            BetCategory::Low => n <= 18,
            BetCategory::High => n >= 19,
            BetCategory::First12 => n <= 12,
            BetCategory::Second12 => (13..=24).contains(&n),
            BetCategory::Third12 => n >= 25,
            BetCategory::ColumnA => n % 3 == 1,
            BetCategory::ColumnB => n % 3 == 2,
            BetCategory::ColumnC => n % 3 == 0,
        }
    }

    /// Member pockets in index order.
    pub fn pockets(self) -> Vec<Pocket> {
        match self {
            BetCategory::Green => vec![Pocket::ZERO, Pocket::DOUBLE_ZERO],
            _ => (1..=36)
                .filter(|&n| self.covers(n))
                .filter_map(Pocket::for_number)
                .collect(),
        }
    }

    /// Split `amount` evenly across the members.
    pub fn bet(self, amount: f64) -> BetVector {
        BetVector::spread(self.pockets(), amount)
    }
}

impl fmt::Display for BetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Exact token match; callers normalise case and whitespace first.
impl std::str::FromStr for BetCategory {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetCategory::ALL
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| BetError::UnknownBetSpec(s.to_string()))
    }
}
