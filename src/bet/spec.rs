//! Bet specification parsing.
//!
//! A spec is one or more `+`-separated parts. Each part is a category
//! token (`red`, `1st12`, `col_a`, ...), a single number
//! (`number:17`, `number:00`) or a custom weighting
//! (`custom:w0,w1,...,w37`). The wager is split evenly across parts.

use std::fmt;

use super::{BetCategory, BetVector};
use crate::types::BetError;
use crate::wheel::Pocket;

const CUSTOM_PREFIX: &str = "custom:";
const NUMBER_PREFIX: &str = "number:";

/// One parsed part of a bet spec.
#[derive(Debug, Clone, PartialEq)]
pub enum BetPart {
    Category(BetCategory),
    /// A straight-up bet; `tile` keeps the text the user typed.
    Number { pocket: Pocket, tile: String },
    /// Raw validated weights and their sum, finite and positive.
    Custom { weights: BetVector, sum: f64 },
}

impl BetPart {
    /// Parse a part that has already been trimmed and lowercased.
    pub fn parse(part: &str) -> Result<Self, BetError> {
        if let Some(raw) = part.strip_prefix(CUSTOM_PREFIX) {
            return Self::parse_custom(raw);
        }
        if let Some(tile) = part.strip_prefix(NUMBER_PREFIX) {
            let tile = tile.trim();
            let pocket: Pocket = tile.parse()?;
            return Ok(BetPart::Number {
                pocket,
                tile: tile.to_string(),
            });
        }
        part.parse::<BetCategory>().map(BetPart::Category)
    }

    fn parse_custom(raw: &str) -> Result<Self, BetError> {
        let values = raw
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| BetError::InvalidValue(format!("{:?} is not a number", v.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let weights = BetVector::from_slice(&values)?;
        let sum = weights.total();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(BetError::InvalidCustomBet(sum));
        }
        Ok(BetPart::Custom { weights, sum })
    }

    pub fn label(&self) -> String {
        match self {
            BetPart::Category(category) => category.label().to_string(),
            BetPart::Number { tile, .. } => format!("Number {tile}"),
            BetPart::Custom { .. } => "Custom".to_string(),
        }
    }

    /// Stake `amount` on this part.
    pub fn bet(&self, amount: f64) -> BetVector {
        match self {
            BetPart::Category(category) => category.bet(amount),
            BetPart::Number { pocket, .. } => BetVector::spread([*pocket], amount),
            BetPart::Custom { weights, sum } => weights.rescaled(*sum, amount),
        }
    }
}

/// A fully parsed, validated bet spec.
#[derive(Debug, Clone, PartialEq)]
pub struct BetSpec {
    parts: Vec<BetPart>,
}

impl BetSpec {
    /// Used when the spec is absent or has no non-empty parts.
    pub const DEFAULT: &'static str = "red";

    pub fn parse(spec: Option<&str>) -> Result<Self, BetError> {
        let mut tokens: Vec<String> = spec
            .unwrap_or(Self::DEFAULT)
            .split('+')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if tokens.is_empty() {
            tokens.push(Self::DEFAULT.to_string());
        }
        let parts = tokens
            .iter()
            .map(|t| BetPart::parse(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[BetPart] {
        &self.parts
    }

    pub fn label(&self) -> String {
        self.parts
            .iter()
            .map(BetPart::label)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Split `amount` evenly across the parts and sum the results.
    pub fn build(&self, amount: f64) -> (BetVector, String) {
        let per_part = amount / self.parts.len() as f64;
        let bet: BetVector = self.parts.iter().map(|p| p.bet(per_part)).sum();
        (bet, self.label())
    }
}

impl std::str::FromStr for BetSpec {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for BetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse `spec` and stake `amount` on it in one go.
pub fn build_bet_from_spec(
    spec: Option<&str>,
    amount: f64,
) -> Result<(BetVector, String), BetError> {
    Ok(BetSpec::parse(spec)?.build(amount))
}
