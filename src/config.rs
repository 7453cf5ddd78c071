//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section and field is optional; anything missing falls back to
//! the defaults below. Command-line flags override loaded values.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::strategy::ProgressionConfig;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub strategy: StrategyConfig,
    pub wheel: WheelConfig,
    pub output: OutputConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StrategyConfig {
    pub base_wager: f64,
    pub wager_multiplier: f64,
    /// Bet spec used when none is given on the command line.
    pub default_bet: String,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            base_wager: 1.0,
            wager_multiplier: 2.0,
            default_bet: "red".to_string(),
        }
    }
}

impl StrategyConfig {
    /// A progression that can stall (zero stake) or shrink after a loss
    /// would never reach a terminal state.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.base_wager.is_finite() && self.base_wager > 0.0,
            "strategy.base_wager must be a finite positive number, got {}",
            self.base_wager
        );
        ensure!(
            self.wager_multiplier.is_finite() && self.wager_multiplier >= 1.0,
            "strategy.wager_multiplier must be a finite number >= 1, got {}",
            self.wager_multiplier
        );
        Ok(())
    }

    pub fn progression(&self) -> ProgressionConfig {
        ProgressionConfig {
            base_wager: self.base_wager,
            loss_multiplier: self.wager_multiplier,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WheelConfig {
    /// Seed for live spins; entropy when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub sequences_dir: PathBuf,
    /// Save the full run report as JSON next to the results CSV.
    pub save_report_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("strat_data"),
            sequences_dir: PathBuf::from("sequences"),
            save_report_json: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    pub max_spins: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { max_spins: 100_000 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.strategy.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.strategy.base_wager, 1.0);
        assert_eq!(cfg.strategy.wager_multiplier, 2.0);
        assert_eq!(cfg.strategy.default_bet, "red");
        assert_eq!(cfg.wheel.seed, None);
        assert_eq!(cfg.output.results_dir, PathBuf::from("strat_data"));
        assert!(cfg.output.save_report_json);
        assert_eq!(cfg.generator.max_spins, 100_000);
        assert_eq!(cfg.strategy.progression(), ProgressionConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = AppConfig::parse(
            r#"
            [strategy]
            default_bet = "black+number:0"

            [wheel]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.strategy.default_bet, "black+number:0");
        assert_eq!(cfg.strategy.base_wager, 1.0);
        assert_eq!(cfg.wheel.seed, Some(42));
        assert_eq!(cfg.output.sequences_dir, PathBuf::from("sequences"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(AppConfig::parse("[strategy]\nbase_wager = \"lots\"").is_err());
    }

    #[test]
    fn test_stalling_progression_rejected() {
        for bad in [
            "base_wager = 0.0",
            "base_wager = -1.0",
            "base_wager = nan",
            "wager_multiplier = 0.5",
            "wager_multiplier = inf",
        ] {
            let err = AppConfig::parse(&format!("[strategy]\n{bad}")).unwrap_err();
            assert!(err.to_string().starts_with("strategy."), "{bad}: {err}");
        }
        assert!(AppConfig::parse("[strategy]\nwager_multiplier = 1.0").is_ok());
    }

    #[test]
    fn test_load_config() {
        // Uses the repository's config.toml when run from the crate root.
        if let Ok(cfg) = AppConfig::load(Path::new("config.toml")) {
            assert!(cfg.strategy.base_wager > 0.0);
            assert!(cfg.strategy.wager_multiplier >= 1.0);
            assert!(cfg.generator.max_spins > 0);
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let cfg = AppConfig::load_or_default(Path::new("/tmp/roulette_no_such_config.toml")).unwrap();
        assert_eq!(cfg.generator.max_spins, 100_000);
    }
}
