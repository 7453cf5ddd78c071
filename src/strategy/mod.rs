//! Strategy engine: wager progression and the per-round state machine.
//!
//! [`StrategyState`] owns the bankroll for one run. Each call to
//! [`StrategyState::play_round`] clamps the wager, stakes the bet spec,
//! settles it against the outcome and advances the progression. The
//! driver loop lives in [`martingale`].

pub mod martingale;

use tracing::{debug, info};

use crate::bet::BetSpec;
use crate::engine::payout::settle;
use crate::types::{RoundOutcome, RoundRecord, TerminalState};

/// Balances closer to zero than this are treated as exactly zero.
pub const BALANCE_DUST: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Wager progression: reset to `base_wager` on a win, multiply on a loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionConfig {
    /// Opening wager, and the wager after every win.
    pub base_wager: f64,
    /// Factor applied to the wager after a round with no profit.
    pub loss_multiplier: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_wager: 1.0,
            loss_multiplier: 2.0, // classic Martingale doubling
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Bankroll and progression state of a single run.
#[derive(Debug, Clone)]
pub struct StrategyState {
    pub balance: f64,
    pub target_balance: f64,
    /// Wager the progression asks for next round (before clamping).
    pub wager: f64,
    pub rounds: u64,
    progression: ProgressionConfig,
}

impl StrategyState {
    pub fn new(initial_balance: f64, buyout: f64, progression: ProgressionConfig) -> Self {
        Self {
            balance: initial_balance,
            target_balance: initial_balance + buyout,
            wager: progression.base_wager,
            rounds: 0,
            progression,
        }
    }

    pub fn progression(&self) -> &ProgressionConfig {
        &self.progression
    }

    /// `Success` or `Bust` once the balance crosses a boundary, `None`
    /// while the run can continue.
    pub fn boundary(&self) -> Option<TerminalState> {
        if self.balance >= self.target_balance {
            Some(TerminalState::Success)
        } else if self.balance <= 0.0 {
            Some(TerminalState::Bust)
        } else {
            None
        }
    }

    pub fn is_running(&self) -> bool {
        self.boundary().is_none()
    }

    /// Stake for the coming round and whether it is an all-in clamp.
    pub fn next_stake(&self) -> (f64, bool) {
        if self.wager > self.balance {
            (self.balance, true)
        } else {
            (self.wager, false)
        }
    }

    /// Play one round against an already resolved outcome.
    pub fn play_round(&mut self, spec: &BetSpec, outcome: RoundOutcome) -> RoundRecord {
        self.rounds += 1;

        let (stake, all_in) = self.next_stake();
        if all_in {
            info!(
                round = self.rounds,
                wanted = format!("${:.2}", self.wager),
                stake = format!("${:.2}", stake),
                "Can't afford wager, going all-in"
            );
            self.wager = stake;
        }

        let (bet, bet_label) = spec.build(stake);
        let settlement = settle(&bet, outcome.pocket);

        self.balance += settlement.net;
        if self.balance.abs() < BALANCE_DUST {
            self.balance = 0.0;
        }

        self.wager = if settlement.is_win() {
            self.progression.base_wager
        } else {
            self.wager * self.progression.loss_multiplier
        };

        debug!(
            round = self.rounds,
            winner = %outcome.label,
            net = settlement.net,
            balance = self.balance,
            next_wager = self.wager,
            "Round played"
        );

        RoundRecord {
            round: self.rounds,
            bet_label,
            wager: stake,
            winning_label: outcome.label,
            winning_index: outcome.pocket.index(),
            color: outcome.color,
            net: settlement.net,
            balance: self.balance,
            all_in,
            next_wager: self.wager,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::Pocket;

    fn red() -> BetSpec {
        BetSpec::parse(Some("red")).unwrap()
    }

    fn red_hit() -> RoundOutcome {
        RoundOutcome::from_pocket(Pocket::for_number(1).unwrap())
    }

    fn black_hit() -> RoundOutcome {
        RoundOutcome::from_pocket(Pocket::for_number(2).unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = StrategyState::new(100.0, 50.0, ProgressionConfig::default());
        assert_eq!(state.target_balance, 150.0);
        assert_eq!(state.wager, 1.0);
        assert_eq!(state.rounds, 0);
        assert!(state.is_running());
    }

    #[test]
    fn test_boundaries() {
        let cfg = ProgressionConfig::default();
        assert_eq!(StrategyState::new(0.0, 10.0, cfg).boundary(), Some(TerminalState::Bust));
        assert_eq!(StrategyState::new(-5.0, 10.0, cfg).boundary(), Some(TerminalState::Bust));
        assert_eq!(StrategyState::new(10.0, 0.0, cfg).boundary(), Some(TerminalState::Success));
        assert_eq!(StrategyState::new(10.0, 1.0, cfg).boundary(), None);
    }

    #[test]
    fn test_loss_doubles_wager() {
        let mut state = StrategyState::new(100.0, 50.0, ProgressionConfig::default());
        let spec = red();
        let r1 = state.play_round(&spec, black_hit());
        assert_eq!(r1.wager, 1.0);
        assert_eq!(r1.next_wager, 2.0);
        let r2 = state.play_round(&spec, black_hit());
        assert_eq!(r2.wager, 2.0);
        assert_eq!(r2.next_wager, 4.0);
        assert!((state.balance - 97.0).abs() < 1e-9);
        assert_eq!(r2.round, 2);
        assert_eq!(r2.bet_label, "Red");
        assert_eq!(r2.winning_label, "2");
    }

    #[test]
    fn test_win_resets_wager() {
        let mut state = StrategyState::new(100.0, 50.0, ProgressionConfig::default());
        let spec = red();
        state.play_round(&spec, black_hit());
        state.play_round(&spec, black_hit());
        let r = state.play_round(&spec, red_hit());
        assert_eq!(r.wager, 4.0);
        assert!((r.net - 4.0).abs() < 1e-9);
        assert_eq!(r.next_wager, 1.0);
        assert!((state.balance - 101.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_in_clamp() {
        let mut state = StrategyState::new(3.0, 50.0, ProgressionConfig::default());
        state.wager = 8.0;
        assert_eq!(state.next_stake(), (3.0, true));

        let r = state.play_round(&red(), black_hit());
        assert!(r.all_in);
        assert_eq!(r.wager, 3.0);
        assert_eq!(state.balance, 0.0);
        assert_eq!(state.boundary(), Some(TerminalState::Bust));
    }

    #[test]
    fn test_all_in_win_resets_to_base() {
        let mut state = StrategyState::new(3.0, 50.0, ProgressionConfig::default());
        state.wager = 8.0;
        let r = state.play_round(&red(), red_hit());
        assert!(r.all_in);
        assert!((state.balance - 6.0).abs() < 1e-9);
        assert_eq!(r.next_wager, 1.0);
    }

    #[test]
    fn test_break_even_round_counts_as_loss() {
        let spec = BetSpec::parse(Some("red+black")).unwrap();
        let mut state = StrategyState::new(100.0, 50.0, ProgressionConfig::default());
        let r = state.play_round(&spec, red_hit());
        assert!(r.net.abs() < 1e-9);
        assert_eq!(r.next_wager, 2.0);
    }

    #[test]
    fn test_dust_balance_snaps_to_zero() {
        // 0.1 split 18 ways rarely sums back to exactly 0.1
        let mut state = StrategyState::new(0.1, 50.0, ProgressionConfig::default());
        state.play_round(&red(), black_hit());
        assert_eq!(state.balance, 0.0);
    }

    #[test]
    fn test_custom_progression() {
        let cfg = ProgressionConfig {
            base_wager: 5.0,
            loss_multiplier: 3.0,
        };
        let mut state = StrategyState::new(100.0, 50.0, cfg);
        let r = state.play_round(&red(), black_hit());
        assert_eq!(r.wager, 5.0);
        assert_eq!(r.next_wager, 15.0);
        let r = state.play_round(&red(), red_hit());
        assert_eq!(r.next_wager, 5.0);
        assert_eq!(state.progression().loss_multiplier, 3.0);
    }
}
