//! Bet vectors.
//!
//! A bet of any kind is represented as the stake placed on each of the
//! 38 pockets. Category bets split their amount evenly across member
//! pockets, compound bets are the element-wise sum of their parts, and
//! a single payout formula settles all of them.

pub mod category;
pub mod spec;

use std::iter::Sum;
use std::ops::{Add, Index};

use crate::types::BetError;
use crate::wheel::{Pocket, POCKETS};

pub use category::BetCategory;
pub use spec::{build_bet_from_spec, BetPart, BetSpec};

// ---------------------------------------------------------------------------
// BetVector
// ---------------------------------------------------------------------------

/// Stake per pocket, indexed by [`Pocket::index`].
///
/// Entries are finite and non-negative. The type is a plain value: it
/// is `Copy` and never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetVector([f64; POCKETS]);

impl BetVector {
    /// All-zero stakes.
    pub fn empty() -> Self {
        BetVector([0.0; POCKETS])
    }

    /// Validate an externally supplied array of stakes.
    pub fn from_slice(values: &[f64]) -> Result<Self, BetError> {
        validate_bet_array(values)?;
        let mut stakes = [0.0; POCKETS];
        stakes.copy_from_slice(values);
        Ok(BetVector(stakes))
    }

    /// Put `amount / pockets.len()` on each pocket.
    pub fn spread(pockets: impl IntoIterator<Item = Pocket>, amount: f64) -> Self {
        let pockets: Vec<Pocket> = pockets.into_iter().collect();
        let mut stakes = [0.0; POCKETS];
        if pockets.is_empty() {
            return BetVector(stakes);
        }
        let per_slot = amount / pockets.len() as f64;
        for pocket in pockets {
            stakes[pocket.index()] = per_slot;
        }
        BetVector(stakes)
    }

    pub fn stakes(&self) -> &[f64; POCKETS] {
        &self.0
    }

    pub fn stake(&self, pocket: Pocket) -> f64 {
        self.0[pocket.index()]
    }

    /// Total amount staked across the table.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Pockets carrying a non-zero stake.
    pub fn covered(&self) -> impl Iterator<Item = Pocket> + '_ {
        Pocket::all().filter(|p| self.stake(*p) > 0.0)
    }

    /// Rescale stakes that sum to `from_total` so they sum to `to_total`.
    ///
    /// Each stake is divided by `from_total` first, so a tiny (even
    /// subnormal) `from_total` cannot overflow the factor.
    pub fn rescaled(&self, from_total: f64, to_total: f64) -> Self {
        BetVector(self.0.map(|v| to_total * (v / from_total)))
    }
}

impl Default for BetVector {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for BetVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Add for BetVector {
    type Output = BetVector;

    fn add(self, rhs: BetVector) -> BetVector {
        let mut stakes = self.0;
        for (stake, other) in stakes.iter_mut().zip(rhs.0) {
            *stake += other;
        }
        BetVector(stakes)
    }
}

impl Sum for BetVector {
    fn sum<I: Iterator<Item = BetVector>>(iter: I) -> Self {
        iter.fold(BetVector::empty(), Add::add)
    }
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

pub fn empty_bet() -> BetVector {
    BetVector::empty()
}

/// Full `amount` on a single tile ("0", "00" or "1".."36").
pub fn bet_one(tile: &str, amount: f64) -> Result<BetVector, BetError> {
    let pocket: Pocket = tile.parse()?;
    Ok(BetVector::spread([pocket], amount))
}

pub fn bet_red(amount: f64) -> BetVector {
    BetCategory::Red.bet(amount)
}

pub fn bet_black(amount: f64) -> BetVector {
    BetCategory::Black.bet(amount)
}

pub fn bet_green(amount: f64) -> BetVector {
    BetCategory::Green.bet(amount)
}

pub fn bet_even(amount: f64) -> BetVector {
    BetCategory::Even.bet(amount)
}

pub fn bet_odd(amount: f64) -> BetVector {
    BetCategory::Odd.bet(amount)
}

pub fn bet_low(amount: f64) -> BetVector {
    BetCategory::Low.bet(amount)
}

pub fn bet_high(amount: f64) -> BetVector {
    BetCategory::High.bet(amount)
}

pub fn bet_1st_12(amount: f64) -> BetVector {
    BetCategory::First12.bet(amount)
}

pub fn bet_2nd_12(amount: f64) -> BetVector {
    BetCategory::Second12.bet(amount)
}

pub fn bet_3rd_12(amount: f64) -> BetVector {
    BetCategory::Third12.bet(amount)
}

pub fn bet_column_a(amount: f64) -> BetVector {
    BetCategory::ColumnA.bet(amount)
}

pub fn bet_column_b(amount: f64) -> BetVector {
    BetCategory::ColumnB.bet(amount)
}

pub fn bet_column_c(amount: f64) -> BetVector {
    BetCategory::ColumnC.bet(amount)
}

// ---------------------------------------------------------------------------
// Combination & validation
// ---------------------------------------------------------------------------

/// Element-wise sum of bet vectors. Every `BetVector` has exactly 38
/// slots, so there is no length to mismatch.
pub fn combine_bets(bets: &[BetVector]) -> BetVector {
    bets.iter().copied().sum()
}

/// Check an array has 38 finite, non-negative stakes.
pub fn validate_bet_array(values: &[f64]) -> Result<(), BetError> {
    if values.len() != POCKETS {
        return Err(BetError::InvalidLength(values.len()));
    }
    for (slot, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(BetError::InvalidValue(format!("slot {slot} is {v}")));
        }
        if v < 0.0 {
            return Err(BetError::InvalidValue(format!("slot {slot} is negative ({v})")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
