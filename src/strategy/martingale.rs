//! Martingale runner.
//!
//! Drives [`StrategyState`] round by round until the balance reaches the
//! buyout target (SUCCESS), hits zero (BUST), or a recorded sequence
//! runs out (DONE). Outcomes come from the recorded sequence when one
//! is supplied, otherwise from a live [`SpinSource`].

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{ProgressionConfig, StrategyState};
use crate::bet::BetSpec;
use crate::types::{BetError, RecordedSpin, RoundOutcome, RunReport, TerminalState};
use crate::wheel::{RngSpinner, SpinSource};

pub struct Martingale {
    spec: BetSpec,
    initial_balance: f64,
    buyout: f64,
    progression: ProgressionConfig,
}

impl Martingale {
    /// Parses the bet spec up front so a bad spec fails before any round.
    pub fn new(initial_balance: f64, buyout: f64, bet_spec: Option<&str>) -> Result<Self, BetError> {
        Ok(Self {
            spec: BetSpec::parse(bet_spec)?,
            initial_balance,
            buyout,
            progression: ProgressionConfig::default(),
        })
    }

    pub fn with_progression(mut self, progression: ProgressionConfig) -> Self {
        self.progression = progression;
        self
    }

    pub fn target_balance(&self) -> f64 {
        self.initial_balance + self.buyout
    }

    pub fn bet_label(&self) -> String {
        self.spec.label()
    }

    pub fn spec(&self) -> &BetSpec {
        &self.spec
    }

    /// Play until a terminal state.
    ///
    /// A non-empty `outcomes` slice is replayed in order and `spinner` is
    /// never consulted; an empty slice means live play.
    pub fn run(&self, outcomes: &[RecordedSpin], spinner: &mut dyn SpinSource) -> RunReport {
        let mut state = StrategyState::new(self.initial_balance, self.buyout, self.progression);
        let replay = (!outcomes.is_empty()).then_some(outcomes);
        let mut rounds = Vec::new();

        info!(
            balance = self.initial_balance,
            target = state.target_balance,
            bet = %self.spec,
            replay_len = outcomes.len(),
            "Starting Martingale"
        );

        while state.is_running() {
            let outcome = match replay {
                Some(sequence) => match sequence.get(rounds.len()) {
                    Some(spin) => RoundOutcome::from_recorded(spin),
                    None => break,
                },
                None => RoundOutcome::from_pocket(spinner.spin()),
            };
            rounds.push(state.play_round(&self.spec, outcome));
        }

        let terminal = state.boundary().unwrap_or(TerminalState::Done);
        info!(
            terminal = %terminal,
            rounds = state.rounds,
            balance = format!("${:.2}", state.balance),
            "Martingale finished"
        );

        RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            bet_label: self.spec.label(),
            initial_balance: self.initial_balance,
            target_balance: state.target_balance,
            final_balance: state.balance,
            round_count: state.rounds,
            terminal,
            rounds,
        }
    }
}

/// One-shot entry point: parse the spec, then run against the recorded
/// outcomes (if any) or the given spinner (entropy-seeded if none).
pub fn run_strategy(
    initial_balance: f64,
    buyout: f64,
    bet_spec: Option<&str>,
    outcomes: Option<&[RecordedSpin]>,
    spinner: Option<&mut dyn SpinSource>,
) -> Result<RunReport, BetError> {
    let martingale = Martingale::new(initial_balance, buyout, bet_spec)?;
    let mut fallback;
    let spinner: &mut dyn SpinSource = match spinner {
        Some(spinner) => spinner,
        None => {
            fallback = RngSpinner::from_entropy();
            &mut fallback
        }
    };
    Ok(martingale.run(outcomes.unwrap_or_default(), spinner))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
