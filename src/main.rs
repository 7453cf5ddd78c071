//! ROULETTE: American roulette Martingale simulator.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! then either runs the Martingale strategy (against a recorded
//! sequence or live spins) or generates a spin sequence file.

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;
use tracing::{info, warn};

use roulette::config::AppConfig;
use roulette::engine::expected_net;
use roulette::storage;
use roulette::strategy::martingale::Martingale;
use roulette::types::{RunReport, TerminalState};
use roulette::wheel::{self, RngSpinner};

#[derive(Parser)]
#[command(name = "roulette", version, about = "American roulette Martingale simulator")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play the Martingale strategy until success, bust, or end of sequence.
    Run(RunArgs),
    /// Spin the wheel and save the outcomes as a sequence CSV.
    Generate {
        /// Number of spins to record.
        spins: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Starting bankroll (N). Prompted for when omitted.
    #[arg(long)]
    balance: Option<f64>,
    /// Target profit (M); the run succeeds at N + M. Prompted for when omitted.
    #[arg(long)]
    buyout: Option<f64>,
    /// Sequence CSV to replay instead of spinning live.
    #[arg(long)]
    sequence: Option<PathBuf>,
    /// Bet spec, e.g. "red", "1st12+col_a", "number:17".
    #[arg(long)]
    bet: Option<String>,
    /// Seed for live spins.
    #[arg(long)]
    seed: Option<u64>,
    /// Don't write results files.
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Run(args) => run(&cfg, args),
        Command::Generate { spins, seed } => generate(&cfg, spins, seed),
    }
}

fn run(cfg: &AppConfig, args: RunArgs) -> Result<()> {
    let interactive = args.balance.is_none();
    let balance = match args.balance {
        Some(b) => b,
        None => prompt("Enter initial balance (N)")?,
    };
    let buyout = match args.buyout {
        Some(m) => m,
        None => prompt("Enter target profit (M)")?,
    };
    ensure!(balance.is_finite() && balance >= 0.0, "Initial balance must be a non-negative number");
    ensure!(buyout.is_finite(), "Target profit must be a number");

    let (sequence, bet) = if interactive && args.sequence.is_none() && args.bet.is_none() {
        let sequence = prompt_optional("Enter sequence CSV path (or press Enter for live)")?;
        let bet = prompt_optional(&format!("Enter bet spec (default {})", cfg.strategy.default_bet))?;
        (sequence.map(PathBuf::from), bet)
    } else {
        (args.sequence, args.bet)
    };
    let bet = bet.unwrap_or_else(|| cfg.strategy.default_bet.clone());

    let outcomes = storage::load_sequence(sequence.as_deref())?;
    let martingale = Martingale::new(balance, buyout, Some(&bet))?
        .with_progression(cfg.strategy.progression());

    let spec = martingale.spec();
    info!(
        bet = %spec,
        expected_net_per_unit = format!("{:.4}", expected_net(&spec.build(1.0).0)),
        "Bet parsed"
    );

    let seed = args.seed.or(cfg.wheel.seed);
    let mut spinner = RngSpinner::with_seed(seed);
    if outcomes.is_empty() {
        info!(seed = ?seed, "Playing live spins");
    }

    println!(
        "\nStarting Martingale: Balance ${balance}, Target ${} - 🟢",
        martingale.target_balance()
    );
    let report = martingale.run(&outcomes, &mut spinner);
    print_rounds(&report);
    println!("{}", summary_line(&report));

    if !args.no_save {
        save_outputs(cfg, &report, balance, buyout)?;
    }

    info!(
        terminal = %report.terminal,
        rounds = report.round_count,
        wins = report.wins(),
        losses = report.losses(),
        max_wager = format!("${:.2}", report.max_wager()),
        low_water = format!("${:.2}", report.low_water_mark()),
        "Run complete"
    );
    Ok(())
}

fn generate(cfg: &AppConfig, spins: u64, seed: Option<u64>) -> Result<()> {
    ensure!(spins > 0, "Please enter a positive number of spins.");
    let max = cfg.generator.max_spins;
    let spins = if spins > max {
        warn!(requested = spins, max, "Spin count clamped");
        println!("Limit exceeded. Setting spins to {max}.");
        max
    } else {
        spins
    };

    let mut spinner = RngSpinner::with_seed(seed.or(cfg.wheel.seed));
    let sequence = wheel::generate_sequence(spins, &mut spinner);
    let path = cfg.output.sequences_dir.join(storage::sequence_filename(spins));
    storage::write_sequence(&sequence, &path)?;

    println!("Successfully generated {spins} rolls in '{}'.", path.display());
    Ok(())
}

fn print_rounds(report: &RunReport) {
    for round in &report.rounds {
        if round.all_in {
            println!("Can't afford wager. Going all-in with ${:.2} - 🟡", round.wager);
        }
        println!("{round}");
    }
}

fn summary_line(report: &RunReport) -> String {
    let rounds = report.round_count;
    match report.terminal {
        TerminalState::Success => format!("SUCCESS: Hit buyout target in {rounds} rounds! - 🔴"),
        TerminalState::Done => format!("DONE: Reached end of sequence in {rounds} rounds. - 🔴"),
        TerminalState::Bust => format!("BUST: Bankroll hit zero in {rounds} rounds. - 🔴"),
    }
}

fn save_outputs(cfg: &AppConfig, report: &RunReport, balance: f64, buyout: f64) -> Result<()> {
    let filename = storage::results_filename(balance, buyout, &report.bet_label);
    let path = storage::write_results(report, &cfg.output.results_dir, &filename)?;
    println!("\nSaved results to {}", path.display());

    if cfg.output.save_report_json {
        let json_path = path.with_extension("json");
        storage::save_report(report, &json_path)?;
        println!("Saved run report to {}", json_path.display());
    }
    Ok(())
}

fn prompt(text: &str) -> Result<f64> {
    Ok(Input::<f64>::new().with_prompt(text).interact_text()?)
}

fn prompt_optional(text: &str) -> Result<Option<String>> {
    let answer: String = Input::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roulette=info"));

    let json_logging = std::env::var("ROULETTE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
