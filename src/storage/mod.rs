//! Persistence layer.
//!
//! Sequence files and result logs are plain CSV; the full run report
//! is saved as JSON next to the results.
//!
//! Sequence schema: `Round, Winning Number, Winning Index, Color`.
//! Results schema: `Round, Bet, Winning Number, Color, Net, Balance`.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::types::{Color, RecordedSpin, RunReport};
use crate::wheel::Pocket;

// ---------------------------------------------------------------------------
// Row schemas
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SequenceRow {
    #[serde(rename = "Round", default)]
    round: Option<u64>,
    #[serde(rename = "Winning Number")]
    winning_number: String,
    #[serde(rename = "Winning Index")]
    winning_index: i64,
    #[serde(rename = "Color", default)]
    color: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    #[serde(rename = "Round")]
    round: u64,
    #[serde(rename = "Bet")]
    bet: &'a str,
    #[serde(rename = "Winning Number")]
    winning_number: &'a str,
    #[serde(rename = "Color")]
    color: String,
    #[serde(rename = "Net")]
    net: String,
    #[serde(rename = "Balance")]
    balance: String,
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

/// Load a recorded sequence. A missing path or file yields an empty
/// sequence, which the runner treats as live play.
pub fn load_sequence(path: Option<&Path>) -> Result<Vec<RecordedSpin>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        info!(path = %path.display(), "No sequence file found, playing live");
        return Ok(Vec::new());
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open sequence {}", path.display()))?;
    let spins = read_sequence(file)
        .with_context(|| format!("Failed to parse sequence {}", path.display()))?;

    info!(path = %path.display(), rounds = spins.len(), "Sequence loaded");
    Ok(spins)
}

/// Parse sequence CSV from any reader.
pub fn read_sequence<R: io::Read>(reader: R) -> Result<Vec<RecordedSpin>> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut spins = Vec::new();
    for (i, row) in csv.deserialize::<SequenceRow>().enumerate() {
        let line = i + 2; // header is line 1
        let row = row.with_context(|| format!("Malformed sequence row at line {line}"))?;

        let pocket = usize::try_from(row.winning_index)
            .ok()
            .and_then(Pocket::from_index)
            .ok_or_else(|| {
                anyhow!(
                    "Line {line}: winning index {} is not a wheel position (0-37)",
                    row.winning_index
                )
            })?;

        let color = match row.color.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<Color>().unwrap_or_else(|_| {
                warn!(line, color = text, "Unrecognised color, recording as Unknown");
                Color::Unknown
            })),
        };

        spins.push(RecordedSpin {
            round: row.round.unwrap_or(i as u64 + 1),
            pocket,
            label: row.winning_number,
            color,
        });
    }
    Ok(spins)
}

/// Write a sequence CSV, creating parent directories as needed.
pub fn write_sequence(spins: &[RecordedSpin], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create sequence {}", path.display()))?;
    write_sequence_to(spins, file)
        .with_context(|| format!("Failed to write sequence {}", path.display()))?;
    debug!(path = %path.display(), rounds = spins.len(), "Sequence written");
    Ok(())
}

pub fn write_sequence_to<W: io::Write>(spins: &[RecordedSpin], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for spin in spins {
        csv.serialize(SequenceRow {
            round: Some(spin.round),
            winning_number: spin.label.clone(),
            winning_index: spin.pocket.index() as i64,
            color: spin.color.map(|c| c.to_string()),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn sequence_filename(spins: u64) -> String {
    format!("roulette_sequence_{spins}.csv")
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Write the round log of `report` as `dir/filename`. Returns the path.
pub fn write_results(report: &RunReport, dir: &Path, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let path = dir.join(filename);
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create results {}", path.display()))?;
    write_results_to(report, file)
        .with_context(|| format!("Failed to write results {}", path.display()))?;
    info!(path = %path.display(), rounds = report.rounds.len(), "Results saved");
    Ok(path)
}

pub fn write_results_to<W: io::Write>(report: &RunReport, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for r in &report.rounds {
        csv.serialize(ResultRow {
            round: r.round,
            bet: &r.bet_label,
            winning_number: &r.winning_label,
            color: r.color.to_string(),
            net: format!("{:+.2}", r.net),
            balance: format!("{:.2}", r.balance),
        })?;
    }
    if report.rounds.is_empty() {
        csv.write_record(["Round", "Bet", "Winning Number", "Color", "Net", "Balance"])?;
    }
    csv.flush()?;
    Ok(())
}

/// Keep ASCII alphanumerics, `-` and `_`.
pub fn slugify_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// `martingale_<N>n<M>m<slug>.csv`, N and M truncated to integers.
pub fn results_filename(initial_balance: f64, buyout: f64, bet_label: &str) -> String {
    format!(
        "martingale_{}n{}m{}.csv",
        initial_balance.trunc() as i64,
        buyout.trunc() as i64,
        slugify_label(bet_label),
    )
}

// ---------------------------------------------------------------------------
// Run reports
// ---------------------------------------------------------------------------

pub fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialise run report")?;
    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    debug!(path = %path.display(), run_id = %report.run_id, "Report saved");
    Ok(())
}

pub fn load_report(path: &Path) -> Result<RunReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse report from {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
