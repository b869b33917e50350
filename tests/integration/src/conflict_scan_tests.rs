//! Whole-roster conflict scans

use crate::test_utils::{date, TestRoster, DRONES_CSV, PILOTS_CSV};
use fleetmatch_core::ScoringConfig;
use fleetmatch_scoring::{scan_conflicts, CheckKind, ConflictScanner, Severity};

/// PRJ003 starts in two days with nothing assigned; alternatives come only
/// from available pilots and drones
#[test]
fn test_imminent_mission_with_suggestions() {
    let store = TestRoster::new().store();
    let snapshot = store.snapshot();

    let report = scan_conflicts(&snapshot, date("2026-02-12"));
    assert_eq!(report.total, 1);

    let conflict = &report.conflicts[0];
    assert_eq!(conflict.finding.kind, CheckKind::ImminentIncompleteMission);
    assert_eq!(conflict.finding.severity, Severity::High);
    assert_eq!(conflict.finding.mission_id.as_deref(), Some("PRJ003"));

    let pairs: Vec<(&str, &str, u8)> = conflict
        .suggestions
        .iter()
        .map(|s| (s.pilot_id.as_str(), s.drone_id.as_str(), s.score))
        .collect();
    assert_eq!(pairs, vec![("P003", "D004", 100), ("P003", "D001", 85), ("P001", "D004", 70)]);
    for suggestion in &conflict.suggestions {
        assert!(snapshot.pilot(&suggestion.pilot_id).unwrap().is_available());
        assert!(snapshot.drone(&suggestion.drone_id).unwrap().is_available());
    }
}

/// Suggestion count follows the configured limit
#[test]
fn test_suggestion_limit_from_config() {
    let store = TestRoster::new().store();
    let config = ScoringConfig {
        max_suggestions: 1,
        ..ScoringConfig::default()
    };

    let report = ConflictScanner::from_config(&config).scan(&store.snapshot(), date("2026-02-04"));
    assert_eq!(report.high, 1);
    assert_eq!(report.conflicts[0].finding.mission_id.as_deref(), Some("PRJ001"));
    assert_eq!(report.conflicts[0].suggestions.len(), 1);
    assert_eq!(report.conflicts[0].suggestions[0].pilot_id, "P001");
}

/// Staffing the imminent mission clears the finding on the next scan
#[test]
fn test_assignment_resolves_imminent_finding() {
    let mut store = TestRoster::new().store();
    let today = date("2026-02-04");
    assert_eq!(scan_conflicts(&store.snapshot(), today).high, 1);

    store.apply_assignment("PRJ001", "P001", "D001").unwrap();
    let report = scan_conflicts(&store.snapshot(), today);
    assert!(report.is_clean(), "{:?}", report.conflicts);
}

/// Broken references and inconsistent statuses are reported below High
#[test]
fn test_data_quality_findings_from_csv() {
    let pilots = format!(
        "{}P005,Kiran,Mapping,DGCA,Pune,Assigned,PRJ999,2026-01-01\n\
         P006,Asha,Mapping,DGCA,Pune,Available,,2026-04-01\n",
        PILOTS_CSV
    );
    let drones = format!("{}D004,Duplicate,RGB,Available,Pune,,\n", DRONES_CSV);
    let missions = "\
project_id,client,location,required_skills,required_certs,start_date,end_date,priority
PRJ002,Client B,Mumbai,\"Inspection, Thermal\",DGCA,2026-02-01,2026-02-10,Standard
PRJ007,Client G,Pune,Mapping,DGCA,2026-06-10,2026-06-01,Standard
";
    let store = TestRoster::with_tables(&pilots, &drones, missions).store();

    let report = scan_conflicts(&store.snapshot(), date("2026-02-20"));
    let kinds: Vec<(CheckKind, Severity)> = report
        .iter()
        .map(|c| (c.finding.kind, c.finding.severity))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (CheckKind::AssignmentMismatch, Severity::Medium),
            (CheckKind::DuplicateRecord, Severity::Low),
            (CheckKind::InvalidDateRange, Severity::Low),
            (CheckKind::StatusInconsistent, Severity::Low),
        ]
    );
    assert!(report.iter().all(|c| c.suggestions.is_empty()));
}

/// Reports serialize with the finding fields flattened
#[test]
fn test_report_json_shape() {
    let store = TestRoster::new().store();
    let report = scan_conflicts(&store.snapshot(), date("2026-02-12"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["high"], 1);
    assert_eq!(json["conflicts"][0]["kind"], "imminent_incomplete_mission");
    assert_eq!(json["conflicts"][0]["suggestions"][0]["score"], 100);
    assert!(json["conflicts"][0]["recommendation"]
        .as_str()
        .unwrap()
        .contains("P003"));
}
