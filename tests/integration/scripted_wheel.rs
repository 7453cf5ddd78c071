//! Scripted wheel for integration testing.
//!
//! Deterministic `SpinSource` that lands on a fixed list of pockets and
//! counts how often it was spun.

use roulette::wheel::{Pocket, SpinSource};

pub struct ScriptedWheel {
    pockets: Vec<Pocket>,
    next: usize,
}

impl ScriptedWheel {
    /// Panics on a label that is not a wheel tile.
    pub fn from_labels(labels: &[&str]) -> Self {
        Self {
            pockets: labels.iter().map(|l| l.parse().unwrap()).collect(),
            next: 0,
        }
    }

    pub fn spins(&self) -> usize {
        self.next
    }
}

impl SpinSource for ScriptedWheel {
    fn spin(&mut self) -> Pocket {
        let pocket = self.pockets[self.next % self.pockets.len()];
        self.next += 1;
        pocket
    }
}
