use std::path::PathBuf;

use roulette::storage;
use roulette::strategy::martingale::{run_strategy, Martingale};
use roulette::types::{Color, TerminalState};
use roulette::wheel::{generate_sequence, RngSpinner};

use crate::scripted_wheel::ScriptedWheel;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("roulette_it_{}", uuid::Uuid::new_v4()))
}

const LOSING_STREAK: &str = "Round,Winning Number,Winning Index,Color\n\
                             1,2,3,Black\n\
                             2,4,5,Black\n\
                             3,0,0,Green\n\
                             4,00,1,Green\n\
                             5,6,7,Black\n\
                             6,8,9,Black\n\
                             7,10,11,Black\n\
                             8,1,2,Red\n";

#[test]
fn test_recorded_losing_streak_busts() {
    let sequence = storage::read_sequence(LOSING_STREAK.as_bytes()).unwrap();
    let mut wheel = ScriptedWheel::from_labels(&["1"]);
    let report = Martingale::new(100.0, 50.0, Some("red"))
        .unwrap()
        .run(&sequence, &mut wheel);

    assert_eq!(wheel.spins(), 0);
    assert_eq!(report.terminal, TerminalState::Bust);
    assert_eq!(report.round_count, 7);
    assert!(report.final_balance.abs() < 1e-9);
    assert!(report.rounds[6].all_in);
    assert_eq!(report.rounds[2].color, Color::Green);
    assert_eq!(report.rounds[3].winning_label, "00");
}

#[test]
fn test_recovery_after_losses_then_done() {
    // two losses then a win on red: -1 -2 +4 nets +1, wager back to base
    let csv = "Round,Winning Number,Winning Index,Color\n1,2,3,Black\n2,0,0,Green\n3,1,2,Red\n";
    let sequence = storage::read_sequence(csv.as_bytes()).unwrap();
    let report = Martingale::new(100.0, 50.0, None)
        .unwrap()
        .run(&sequence, &mut ScriptedWheel::from_labels(&["1"]));

    assert_eq!(report.terminal, TerminalState::Done);
    assert_eq!(report.wins(), 1);
    assert_eq!(report.losses(), 2);
    assert!((report.final_balance - 101.0).abs() < 1e-9);
    assert_eq!(report.rounds[2].next_wager, 1.0);
    assert_eq!(report.max_wager(), 4.0);
}

#[test]
fn test_generate_write_load_run_pipeline() {
    let dir = temp_dir();
    let path = dir.join(storage::sequence_filename(250));

    let generated = generate_sequence(250, &mut RngSpinner::seeded(2024));
    storage::write_sequence(&generated, &path).unwrap();
    let loaded = storage::load_sequence(Some(path.as_path())).unwrap();
    assert_eq!(loaded, generated);

    let martingale = Martingale::new(40.0, 20.0, Some("1st12+col_a")).unwrap();
    let first = martingale.run(&loaded, &mut ScriptedWheel::from_labels(&["0"]));
    let second = martingale.run(&loaded, &mut ScriptedWheel::from_labels(&["0"]));

    assert_eq!(first.rounds, second.rounds);
    assert!(first.round_count <= 250);
    for (record, spin) in first.rounds.iter().zip(&loaded) {
        assert_eq!(record.winning_label, spin.label);
    }
    match first.terminal {
        TerminalState::Done => assert_eq!(first.round_count, 250),
        TerminalState::Success => assert!(first.final_balance >= 60.0),
        TerminalState::Bust => assert!(first.final_balance <= 0.0),
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_sequence_plays_live() {
    let outcomes = storage::load_sequence(Some(temp_dir().join("absent.csv").as_path())).unwrap();
    assert!(outcomes.is_empty());

    let mut wheel = ScriptedWheel::from_labels(&["17"]);
    let report = run_strategy(5.0, 100.0, Some("number:17"), Some(&outcomes), Some(&mut wheel)).unwrap();

    // 5 + 35 + 35 + 35 clears 105
    assert_eq!(report.terminal, TerminalState::Success);
    assert_eq!(report.round_count, 3);
    assert_eq!(wheel.spins(), 3);
    assert_eq!(report.final_balance, 110.0);
}

#[test]
fn test_results_files_written() {
    let sequence = storage::read_sequence(LOSING_STREAK.as_bytes()).unwrap();
    let report = Martingale::new(100.0, 50.0, Some("red"))
        .unwrap()
        .run(&sequence, &mut ScriptedWheel::from_labels(&["1"]));

    let dir = temp_dir();
    let filename = storage::results_filename(100.0, 50.0, &report.bet_label);
    assert_eq!(filename, "martingale_100n50mRed.csv");

    let path = storage::write_results(&report, &dir, &filename).unwrap();
    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["Round", "Bet", "Winning Number", "Color", "Net", "Balance"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(&rows[0][1], "Red");
    assert_eq!(&rows[0][4], "-1.00");
    assert_eq!(&rows[0][5], "99.00");
    assert_eq!(&rows[6][5], "0.00");

    let json_path = path.with_extension("json");
    storage::save_report(&report, &json_path).unwrap();
    let restored = storage::load_report(&json_path).unwrap();
    assert_eq!(restored.run_id, report.run_id);
    assert_eq!(restored.terminal, TerminalState::Bust);

    let _ = std::fs::remove_dir_all(&dir);
}
