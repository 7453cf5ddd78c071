//! Payout engine.
//!
//! Every bet is a stake per pocket, so one rule settles all of them:
//! the stake on the winning pocket comes back 36-fold (35 to 1 plus the
//! stake itself) and everything staked is lost.
//!
//! ```text
//! net = stake[winner] * 36 - total_staked
//! ```
//!
//! Category bets get their usual odds for free: 18 pockets at 1/18 of
//! the wager each pay `36/18 = 2x` (even money), 12 pockets pay `3x`
//! (2 to 1).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bet::BetVector;
use crate::wheel::{Pocket, POCKETS};

/// Gross return per unit staked on the winning pocket.
pub const STRAIGHT_UP_RETURN: f64 = 36.0;

/// Net result of a bet given the winning pocket. No rounding is applied.
pub fn payout(bet: &BetVector, winner: Pocket) -> f64 {
    bet.stake(winner) * STRAIGHT_UP_RETURN - bet.total()
}

/// Breakdown of a single settled bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub staked: f64,
    pub returned: f64,
    pub net: f64,
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        self.net > 0.0
    }
}

pub fn settle(bet: &BetVector, winner: Pocket) -> Settlement {
    let staked = bet.total();
    let returned = bet.stake(winner) * STRAIGHT_UP_RETURN;
    let net = payout(bet, winner);
    debug!(winner = %winner, staked, returned, net, "Bet settled");
    Settlement { staked, returned, net }
}

/// Expected net result over a fair spin of all 38 pockets.
///
/// For any bet this is `-total * 2/38`: the two green pockets are the
/// house edge.
pub fn expected_net(bet: &BetVector) -> f64 {
    Pocket::all().map(|p| payout(bet, p)).sum::<f64>() / POCKETS as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::{bet_1st_12, bet_green, bet_one, bet_red, build_bet_from_spec};

    const EPS: f64 = 1e-9;

    fn pocket(index: usize) -> Pocket {
        Pocket::from_index(index).unwrap()
    }

    #[test]
    fn test_red_wins_even_money() {
        // index 2 is number 1, red
        assert!((payout(&bet_red(18.0), pocket(2)) - 18.0).abs() < EPS);
    }

    #[test]
    fn test_red_loses_on_black() {
        // index 3 is number 2, black
        assert_eq!(payout(&bet_red(18.0), pocket(3)), -18.0);
    }

    #[test]
    fn test_red_loses_on_green() {
        assert_eq!(payout(&bet_red(18.0), Pocket::ZERO), -18.0);
        assert_eq!(payout(&bet_red(18.0), Pocket::DOUBLE_ZERO), -18.0);
    }

    #[test]
    fn test_straight_up_pays_35_to_1() {
        let bet = bet_one("17", 10.0).unwrap();
        assert_eq!(payout(&bet, pocket(18)), 350.0);
        assert_eq!(payout(&bet, pocket(17)), -10.0);
    }

    #[test]
    fn test_dozen_pays_2_to_1() {
        let bet = bet_1st_12(12.0);
        assert!((payout(&bet, pocket(2)) - 24.0).abs() < EPS);
        assert_eq!(payout(&bet, pocket(30)), -12.0);
    }

    #[test]
    fn test_green_split() {
        let bet = bet_green(2.0);
        assert_eq!(payout(&bet, Pocket::DOUBLE_ZERO), 34.0);
    }

    #[test]
    fn test_hedged_bet_breaks_even() {
        let (bet, _) = build_bet_from_spec(Some("red+black"), 36.0).unwrap();
        assert!(payout(&bet, pocket(2)).abs() < EPS);
        assert_eq!(payout(&bet, Pocket::ZERO), -36.0);
    }

    #[test]
    fn test_fractional_stakes_are_exact() {
        let bet = bet_red(1.0);
        let expected = (1.0 / 18.0) * 36.0 - bet.total();
        assert_eq!(payout(&bet, pocket(2)), expected);
    }

    #[test]
    fn test_settlement_breakdown() {
        let s = settle(&bet_red(18.0), pocket(2));
        assert!((s.staked - 18.0).abs() < EPS);
        assert!((s.returned - 36.0).abs() < EPS);
        assert!(s.is_win());
        let s = settle(&bet_red(18.0), pocket(3));
        assert_eq!(s.returned, 0.0);
        assert!(!s.is_win());
    }

    #[test]
    fn test_expected_net_is_house_edge() {
        for spec in ["red", "number:7", "col_b+green", "odd+2nd12"] {
            let (bet, _) = build_bet_from_spec(Some(spec), 38.0).unwrap();
            assert!((expected_net(&bet) + 2.0).abs() < EPS, "{spec}");
        }
        assert_eq!(expected_net(&BetVector::empty()), 0.0);
    }
}
