//! Trajectory builder behavior over multi-period inputs.

use holdlab_core::analysis::analyze_trajectories;
use holdlab_core::domain::{PeriodSnapshot, SecurityId, TransitionType};
use holdlab_core::AnalysisError;

fn four_quarters() -> Vec<PeriodSnapshot> {
    vec![
        PeriodSnapshot::from_rows(
            "2024-11-14",
            [
                ("DEC", "Decliner", 400, 40),
                ("NEW", "Newcomer", 500, 50),
                ("ACC", "Accumulator", 1500, 150),
            ],
        ),
        PeriodSnapshot::from_rows(
            "2024-08-14",
            [
                ("DEC", "Decliner", 600, 60),
                ("ACC", "Accumulator", 1200, 120),
                ("OLD", "Exited", 900, 90),
            ],
        ),
        PeriodSnapshot::from_rows(
            "2024-05-15",
            [
                ("DEC", "Decliner", 800, 80),
                ("ACC", "Accumulator", 1000, 100),
                ("OLD", "Exited", 900, 90),
            ],
        ),
        PeriodSnapshot::from_rows(
            "2024-02-14",
            [("DEC", "Decliner", 1000, 100), ("OLD", "Exited", 900, 90)],
        ),
    ]
}

#[test]
fn empty_snapshot_list_fails() {
    assert_eq!(analyze_trajectories(&[]).unwrap_err(), AnalysisError::EmptyHistory);
}

#[test]
fn every_security_has_period_count_minus_one_transitions() {
    let snaps = four_quarters();
    let map = analyze_trajectories(&snaps).unwrap();
    assert_eq!(map.len(), 4);
    for rec in map.values() {
        assert_eq!(rec.history.len(), snaps.len());
        assert_eq!(rec.transitions.len(), snaps.len() - 1);
    }
}

#[test]
fn history_follows_input_order() {
    let map = analyze_trajectories(&four_quarters()).unwrap();
    let dates: Vec<&str> = map[&SecurityId::from("DEC")]
        .history
        .iter()
        .map(|o| o.date.as_str())
        .collect();
    assert_eq!(dates, ["2024-11-14", "2024-08-14", "2024-05-15", "2024-02-14"]);
}

#[test]
fn steady_decline_counts_three() {
    let map = analyze_trajectories(&four_quarters()).unwrap();
    let dec = &map[&SecurityId::from("DEC")];
    assert_eq!(dec.consecutive_decreases, 3);
    assert_eq!(dec.consecutive_increases, 0);
    assert!(dec.transitions.iter().all(|t| t.kind == TransitionType::Decrease));
    assert!((dec.transitions[0].percent - (-100.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn newcomer_has_new_then_unchanged_zeroes() {
    let map = analyze_trajectories(&four_quarters()).unwrap();
    let new = &map[&SecurityId::from("NEW")];
    let kinds: Vec<TransitionType> = new.transitions.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [TransitionType::New, TransitionType::Unchanged, TransitionType::Unchanged]
    );
    assert_eq!(new.consecutive_increases, 1);
    assert_eq!(new.history[3].shares, 0);
    assert_eq!(new.history[3].name, None);
}

#[test]
fn accumulator_counts_new_in_run() {
    let map = analyze_trajectories(&four_quarters()).unwrap();
    let acc = &map[&SecurityId::from("ACC")];
    assert_eq!(acc.consecutive_increases, 3);
    assert_eq!(acc.transitions[2].kind, TransitionType::New);
    assert_eq!(acc.current_shares, 1500);
    assert_eq!(acc.current_value, 150);
}

#[test]
fn exited_position_ends_in_liquidation() {
    let map = analyze_trajectories(&four_quarters()).unwrap();
    let old = &map[&SecurityId::from("OLD")];
    assert_eq!(old.transitions[0].kind, TransitionType::Liquidated);
    assert_eq!(old.transitions[0].percent, -100.0);
    assert_eq!(old.consecutive_decreases, 1);
    assert_eq!(old.current_shares, 0);
    assert_eq!(old.previous_value(), 90);
    assert_eq!(old.name, "Exited");
}

#[test]
fn security_only_in_oldest_period_still_gets_record() {
    let snaps = vec![
        PeriodSnapshot::from_rows("q3", [("A", "A", 1, 1)]),
        PeriodSnapshot::from_rows("q2", [("A", "A", 1, 1)]),
        PeriodSnapshot::from_rows("q1", [("Z", "Zed", 10, 1)]),
    ];
    let map = analyze_trajectories(&snaps).unwrap();
    let z = &map[&SecurityId::from("Z")];
    let kinds: Vec<TransitionType> = z.transitions.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, [TransitionType::Unchanged, TransitionType::Liquidated]);
    assert_eq!(z.consecutive_decreases, 0);
    assert_eq!(z.name, "Zed");
}

#[test]
fn single_period_has_no_transitions() {
    let snaps = vec![PeriodSnapshot::from_rows("q1", [("A", "A", 5, 1)])];
    let map = analyze_trajectories(&snaps).unwrap();
    let a = &map[&SecurityId::from("A")];
    assert!(a.transitions.is_empty());
    assert_eq!(a.consecutive_decreases, 0);
    assert_eq!(a.consecutive_increases, 0);
}
