//! Candidate scoring against a CSV-loaded roster

use crate::test_utils::{grid_source, TestRoster};
use fleetmatch_core::Config;
use fleetmatch_domain::PilotStatus;
use fleetmatch_roster::RosterStore;
use fleetmatch_scoring::{score_candidates, CheckKind, FeasibilityScorer, Recommendation};

/// Arjun flying D001 on PRJ001 passes every check
#[test]
fn test_arjun_d001_prj001_scores_100() {
    let store = TestRoster::new().store();
    let snapshot = store.snapshot();

    let result = FeasibilityScorer::new().score_pair(
        &snapshot,
        snapshot.mission("PRJ001").unwrap(),
        snapshot.pilot("P001").unwrap(),
        snapshot.drone("D001").unwrap(),
    );

    assert_eq!(result.score, 100);
    assert_eq!(result.recommendation, Recommendation::Recommended);
    assert!(result.reasoning.ends_with("No major conflicts detected"));
}

/// Neha lacks Mapping, is based in Mumbai and is booked on overlapping PRJ002
#[test]
fn test_neha_prj001_scores_10() {
    let store = TestRoster::new().store();
    let snapshot = store.snapshot();

    let result = FeasibilityScorer::new().score_pair(
        &snapshot,
        snapshot.mission("PRJ001").unwrap(),
        snapshot.pilot("P002").unwrap(),
        snapshot.drone("D001").unwrap(),
    );

    let kinds: Vec<CheckKind> = result.findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CheckKind::SkillMismatch,
            CheckKind::PilotLocationMismatch,
            CheckKind::PilotUnavailable,
        ]
    );
    assert_eq!(result.score, 10);
    assert_eq!(result.recommendation, Recommendation::NotRecommended);
}

/// Ranking over the whole roster is sorted and stable across calls
#[test]
fn test_score_candidates_over_roster() {
    let store = TestRoster::new().store();
    let snapshot = store.snapshot();
    let mission = snapshot.mission("PRJ001").unwrap();

    let ranked = score_candidates(&snapshot, mission, snapshot.pilots(), snapshot.drones());
    assert_eq!(ranked.len(), 16);
    assert_eq!((ranked[0].pilot_id.as_str(), ranked[0].drone_id.as_str()), ("P001", "D001"));
    assert!(ranked.windows(2).all(|w| {
        w[0].score > w[1].score
            || (w[0].score == w[1].score
                && (&w[0].pilot_id, &w[0].drone_id) <= (&w[1].pilot_id, &w[1].drone_id))
    }));
    assert_eq!(ranked, score_candidates(&snapshot, mission, snapshot.pilots(), snapshot.drones()));
}

/// A configured threshold changes which pairings are recommended
#[test]
fn test_threshold_from_config() {
    let store = TestRoster::new().store();
    let snapshot = store.snapshot();
    let mission = snapshot.mission("PRJ001").unwrap();

    let mut config = Config::default();
    config.scoring.feasibility_threshold = 90;
    let strict = FeasibilityScorer::from_config(&config.scoring);
    let recommended = strict.recommend(&snapshot, mission, snapshot.pilots(), snapshot.drones());

    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].pilot_id, "P001");
    assert!(FeasibilityScorer::new()
        .recommend(&snapshot, mission, snapshot.pilots(), snapshot.drones())
        .len()
        > 1);
}

/// Committing the best pairing is written back and survives a reload
#[test]
fn test_apply_best_assignment_round_trip() {
    let roster = TestRoster::new();
    let mut store = roster.store();
    let snapshot = store.snapshot();

    let best = FeasibilityScorer::new()
        .best_assignment(
            &snapshot,
            snapshot.mission("PRJ003").unwrap(),
            &store.available_pilots().into_iter().cloned().collect::<Vec<_>>(),
            &store.available_drones().into_iter().cloned().collect::<Vec<_>>(),
        )
        .unwrap();
    assert_eq!((best.pilot_id.as_str(), best.drone_id.as_str()), ("P003", "D004"));

    store
        .apply_assignment(&best.mission_id, &best.pilot_id, &best.drone_id)
        .unwrap();
    store.write_csv(&roster.paths).unwrap();

    let reloaded = roster.store();
    assert_eq!(reloaded.pilot("P003").unwrap().status, PilotStatus::Assigned);
    assert_eq!(reloaded.snapshot().drones_assigned_to("PRJ003").count(), 1);
    // The snapshot taken before the update is unchanged
    assert!(snapshot.pilot("P003").unwrap().is_available());
}

/// CSV and value-grid sources produce identical snapshots
#[test]
fn test_grid_source_matches_csv() {
    let csv_store = TestRoster::new().store();
    let grid_store = RosterStore::load(grid_source()).unwrap();

    assert_eq!(
        csv_store.snapshot().fingerprint().unwrap(),
        grid_store.snapshot().fingerprint().unwrap()
    );
    assert!(grid_store
        .mission("PRJ002")
        .unwrap()
        .required_capabilities
        .contains("thermal"));
}
