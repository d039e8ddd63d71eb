#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Leaderboard and distribution statistics over hazard reports.
//!
//! Feeds the public state leaderboard (which states leave the most hazards
//! unresolved) and the admin dashboard's status and jurisdiction charts.
//! All functions are pure folds over report snapshots.

use std::collections::BTreeMap;

use hazard_map_hazard_models::{Jurisdiction, Report, ReportStatus};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of reports in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// The status.
    pub status: ReportStatus,
    /// Reports in that status.
    pub count: u64,
}

/// Number of reports assigned to one jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionCount {
    /// The jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Reports assigned to it.
    pub count: u64,
}

/// One row of the state leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateStat {
    /// 1-based rank; rank 1 is the most dangerous state.
    pub rank: u32,
    /// State name as first seen in the input.
    pub state: String,
    /// All reports in the state.
    pub total_reports: u64,
    /// Reports still awaiting verification.
    pub unverified_reports: u64,
    /// Reports confirmed fixed.
    pub fixed_reports: u64,
    /// Mean days from creation to the last transition of fixed reports,
    /// if any fixed report carries a transition time.
    pub avg_fix_time_days: Option<f64>,
    /// 0-100, higher is worse.
    pub danger_score: u8,
}

/// Counts reports per status, in lifecycle order, including zeros.
#[must_use]
pub fn status_distribution(reports: &[Report]) -> Vec<StatusCount> {
    ReportStatus::all()
        .iter()
        .map(|&status| StatusCount {
            status,
            count: reports.iter().filter(|r| r.status == status).count() as u64,
        })
        .collect()
}

/// Counts reports per jurisdiction, including zeros.
#[must_use]
pub fn jurisdiction_distribution(reports: &[Report]) -> Vec<JurisdictionCount> {
    Jurisdiction::all()
        .iter()
        .map(|&jurisdiction| JurisdictionCount {
            jurisdiction,
            count: reports
                .iter()
                .filter(|r| r.jurisdiction == jurisdiction)
                .count() as u64,
        })
        .collect()
}

#[derive(Default)]
struct StateAccumulator {
    display_name: String,
    total: u64,
    unverified: u64,
    fixed: u64,
    open_severity: u64,
    fix_days_sum: f64,
    fix_days_samples: u32,
}

/// Builds the state leaderboard.
///
/// States are grouped case-insensitively. The danger score is the share of
/// the maximum possible severity still open:
/// `round(100 * sum(severity of non-fixed reports) / (5 * total))`.
/// Rows are ranked by danger score, then by total reports (both
/// descending), then by state name.
#[must_use]
pub fn state_leaderboard(reports: &[Report]) -> Vec<StateStat> {
    let mut by_state: BTreeMap<String, StateAccumulator> = BTreeMap::new();

    for report in reports {
        let key = report.state.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }

        let acc = by_state.entry(key).or_insert_with(|| StateAccumulator {
            display_name: report.state.trim().to_string(),
            ..StateAccumulator::default()
        });

        acc.total += 1;
        match report.status {
            ReportStatus::Unverified => acc.unverified += 1,
            ReportStatus::Fixed => acc.fixed += 1,
            ReportStatus::Verified | ReportStatus::FixPending => {}
        }

        if report.status == ReportStatus::Fixed {
            if let Some(fixed_at) = report.updated_at {
                #[allow(clippy::cast_precision_loss)]
                let days = (fixed_at - report.created_at).num_seconds() as f64 / SECONDS_PER_DAY;
                acc.fix_days_sum += days.max(0.0);
                acc.fix_days_samples += 1;
            }
        } else {
            acc.open_severity += u64::from(report.severity_level.value());
        }
    }

    let mut rows: Vec<(String, StateStat)> = by_state
        .into_iter()
        .map(|(key, acc)| {
            let stat = StateStat {
                rank: 0,
                danger_score: danger_score(acc.open_severity, acc.total),
                avg_fix_time_days: (acc.fix_days_samples > 0)
                    .then(|| acc.fix_days_sum / f64::from(acc.fix_days_samples)),
                state: acc.display_name,
                total_reports: acc.total,
                unverified_reports: acc.unverified,
                fixed_reports: acc.fixed,
            };
            (key, stat)
        })
        .collect();

    rows.sort_by(|(a_key, a), (b_key, b)| {
        b.danger_score
            .cmp(&a.danger_score)
            .then_with(|| b.total_reports.cmp(&a.total_reports))
            .then_with(|| a_key.cmp(b_key))
    });

    rows.into_iter()
        .zip(1u32..)
        .map(|((_, stat), rank)| StateStat { rank, ..stat })
        .collect()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn danger_score(open_severity: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = (100.0 * open_severity as f64 / (5.0 * total as f64)).round();
    score.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone as _, Utc};
    use hazard_map_hazard_models::{Coordinates, HazardSeverity};

    use super::*;

    fn report(state: &str, status: ReportStatus, severity: u8) -> Report {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Report {
            id: format!("{state}-{status}-{severity}"),
            reporter_id: "reporter".to_string(),
            title: "Pothole".to_string(),
            description: String::new(),
            location: Coordinates::new(6.5, 3.4).unwrap(),
            address: "Somewhere".to_string(),
            state: state.to_string(),
            lga: None,
            jurisdiction: Jurisdiction::State,
            severity_level: HazardSeverity::from_value(severity).unwrap(),
            status,
            verification_count: 0,
            verified_by: Vec::new(),
            image_url: "https://img.example/a.jpg".to_string(),
            after_image_url: None,
            social_post_id: None,
            created_at,
            updated_at: (status == ReportStatus::Fixed).then(|| created_at + Duration::days(10)),
        }
    }

    #[test]
    fn status_distribution_includes_zeros() {
        let reports = [
            report("Lagos", ReportStatus::Unverified, 3),
            report("Lagos", ReportStatus::Unverified, 3),
            report("Ogun", ReportStatus::Fixed, 3),
        ];
        let dist = status_distribution(&reports);
        assert_eq!(dist.len(), 4);
        assert_eq!(dist[0].status, ReportStatus::Unverified);
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[1].count, 0);
        assert_eq!(dist[3].count, 1);
    }

    #[test]
    fn jurisdiction_distribution_counts() {
        let mut federal = report("Lagos", ReportStatus::Verified, 4);
        federal.jurisdiction = Jurisdiction::Federal;
        let reports = [federal, report("Lagos", ReportStatus::Verified, 2)];
        let dist = jurisdiction_distribution(&reports);
        assert_eq!(dist[0].count, 1);
        assert_eq!(dist[1].count, 1);
        assert_eq!(dist[2].count, 0);
    }

    #[test]
    fn leaderboard_ranks_by_danger() {
        let reports = [
            report("Rivers", ReportStatus::Unverified, 5),
            report("Rivers", ReportStatus::Verified, 5),
            report("Lagos", ReportStatus::Fixed, 5),
            report("Lagos", ReportStatus::Unverified, 1),
        ];
        let board = state_leaderboard(&reports);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].state, "Rivers");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].danger_score, 100);
        assert_eq!(board[0].avg_fix_time_days, None);

        assert_eq!(board[1].state, "Lagos");
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].danger_score, 10);
        assert_eq!(board[1].fixed_reports, 1);
        assert_eq!(board[1].unverified_reports, 1);
        assert!((board[1].avg_fix_time_days.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn states_group_case_insensitively() {
        let reports = [
            report("Kano", ReportStatus::Unverified, 2),
            report("KANO ", ReportStatus::Unverified, 2),
        ];
        let board = state_leaderboard(&reports);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].state, "Kano");
        assert_eq!(board[0].total_reports, 2);
    }

    #[test]
    fn ties_break_on_total_then_name() {
        let reports = [
            report("Oyo", ReportStatus::Unverified, 5),
            report("Edo", ReportStatus::Unverified, 5),
            report("Abia", ReportStatus::Unverified, 5),
            report("Abia", ReportStatus::Unverified, 5),
        ];
        let board = state_leaderboard(&reports);
        let names: Vec<&str> = board.iter().map(|s| s.state.as_str()).collect();
        assert_eq!(names, ["Abia", "Edo", "Oyo"]);
    }

    #[test]
    fn empty_input_is_empty_board() {
        assert!(state_leaderboard(&[]).is_empty());
    }
}
