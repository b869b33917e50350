//! Plain-text rendering for terminal output

use fleetmatch_domain::{Drone, Mission, Pilot, DATE_FORMAT};
use fleetmatch_roster::RosterStats;
use fleetmatch_scoring::{ConflictReport, FeasibilityResult};
use std::fmt::Write;

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn status(stats: &RosterStats, fingerprint: &str) -> String {
    let last_sync = stats
        .last_sync
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    format!(
        "Source:    {}\nLast sync: {}\n\
         Pilots:    {} ({} available)\nDrones:    {} ({} available)\n\
         Missions:  {} ({} active)\nSnapshot:  {}\n",
        stats.data_source,
        last_sync,
        stats.total_pilots,
        stats.available_pilots,
        stats.total_drones,
        stats.available_drones,
        stats.total_missions,
        stats.active_missions,
        fingerprint,
    )
}

pub fn pilots(pilots: &[&Pilot]) -> String {
    let mut out = String::new();
    for p in pilots {
        let _ = writeln!(
            out,
            "{:<6} {:<16} {:<10} {:<12} {:<8} from {}  skills: {}  certs: {}",
            p.id,
            p.name,
            p.status,
            p.location,
            or_dash(p.current_assignment.as_deref()),
            date_or_dash(p.available_from),
            p.skills,
            p.certifications,
        );
    }
    if pilots.is_empty() {
        out.push_str("No pilots match\n");
    }
    out
}

pub fn drones(drones: &[&Drone]) -> String {
    let mut out = String::new();
    for d in drones {
        let _ = writeln!(
            out,
            "{:<6} {:<16} {:<12} {:<12} {:<8} maintenance {}  capabilities: {}",
            d.id,
            d.model,
            d.status,
            d.location,
            or_dash(d.current_assignment.as_deref()),
            date_or_dash(d.maintenance_due),
            d.capabilities,
        );
    }
    if drones.is_empty() {
        out.push_str("No drones match\n");
    }
    out
}

pub fn missions(missions: &[Mission]) -> String {
    let mut out = String::new();
    for m in missions {
        let _ = writeln!(
            out,
            "{:<8} {:<16} {:<12} {} to {} {:<8} skills: {}  certs: {}  capabilities: {}",
            m.id,
            m.client,
            m.location,
            m.start_date.format(DATE_FORMAT),
            m.end_date.format(DATE_FORMAT),
            m.priority,
            m.required_skills,
            m.required_certs,
            m.required_capabilities,
        );
    }
    out
}

pub fn feasibility(mission: &Mission, results: &[FeasibilityResult]) -> String {
    let mut out = format!("Mission {} ({}, {})\n", mission.id, mission.client, mission.location);
    if results.is_empty() {
        out.push_str("  No pairings to show\n");
    }
    for r in results {
        let _ = writeln!(
            out,
            "  {:>3}%  {} + {}  {}",
            r.score, r.pilot_id, r.drone_id, r.reasoning
        );
    }
    out
}

pub fn conflicts(report: &ConflictReport) -> String {
    let mut out = format!(
        "{} conflict(s) as of {}: {} high, {} medium, {} low\n",
        report.total,
        report.today.format(DATE_FORMAT),
        report.high,
        report.medium,
        report.low
    );
    for conflict in report.iter() {
        let _ = writeln!(out, "  {}", conflict.finding);
        if let Some(recommendation) = &conflict.recommendation {
            let _ = writeln!(out, "      -> {}", recommendation);
        }
        for s in &conflict.suggestions {
            let _ = writeln!(out, "         {:>3}%  {} + {}", s.score, s.pilot_id, s.drone_id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmatch_domain::{parse_date, MissionPriority, PilotStatus, RosterSnapshot, TagSet};
    use fleetmatch_scoring::scan_conflicts;

    fn create_test_mission() -> Mission {
        Mission {
            id: "PRJ001".to_string(),
            client: "Client A".to_string(),
            location: "Bangalore".to_string(),
            required_skills: TagSet::parse_list("Mapping"),
            required_certs: TagSet::new(),
            required_capabilities: TagSet::new(),
            start_date: parse_date("2026-02-06").unwrap(),
            end_date: parse_date("2026-02-08").unwrap(),
            priority: MissionPriority::High,
        }
    }

    #[test]
    fn test_pilot_line() {
        let pilot = Pilot {
            id: "P001".to_string(),
            name: "Arjun".to_string(),
            skills: TagSet::parse_list("Mapping, Survey"),
            certifications: TagSet::parse_list("DGCA"),
            location: "Bangalore".to_string(),
            status: PilotStatus::OnLeave,
            current_assignment: None,
            available_from: None,
        };
        let text = pilots(&[&pilot]);
        assert!(text.contains("On Leave"));
        assert!(text.contains("skills: Mapping, Survey"));
        assert!(text.contains("from -"));
        assert_eq!(pilots(&[]), "No pilots match\n");
    }

    #[test]
    fn test_conflict_summary() {
        let snapshot = RosterSnapshot::new(vec![], vec![], vec![create_test_mission()]);
        let report = scan_conflicts(&snapshot, parse_date("2026-02-05").unwrap());
        let text = conflicts(&report);
        assert!(text.starts_with("1 conflict(s) as of 2026-02-05: 1 high, 0 medium, 0 low\n"));
        assert!(text.contains("imminent_incomplete_mission"));
        assert!(text.contains("-> No recommended alternative"));
    }
}
