//! File stability indicators.
//!
//! Measures how violently a file's modification history oscillates: the
//! shake index (changes per day of observed lifespan), the time spread,
//! and the standard deviation of inter-modification gaps.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Ceiling for the shake index.
const SHAKE_CEILING: f64 = 10.0;
/// Minimum changes before stability is assessed.
const MIN_CHANGES: usize = 2;

/// Stability band for one file.
///
/// # Examples
///
/// ```
/// use gitscope_health::StabilityLevel;
///
/// let level: StabilityLevel = serde_json::from_str("\"unstable\"").unwrap();
/// assert_eq!(level, StabilityLevel::Unstable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StabilityLevel {
    /// Shake index above 2 with gap deviation above 3 days.
    HighlyUnstable,
    /// Shake index above 1 with gap deviation above 1.5 days.
    Unstable,
    /// Shake index above 0.5.
    Moderate,
    /// Everything else.
    Stable,
}

impl fmt::Display for StabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityLevel::HighlyUnstable => write!(f, "highly unstable"),
            StabilityLevel::Unstable => write!(f, "unstable"),
            StabilityLevel::Moderate => write!(f, "moderate"),
            StabilityLevel::Stable => write!(f, "stable"),
        }
    }
}

/// Stability metrics for one file.
///
/// # Examples
///
/// ```
/// use gitscope_health::{StabilityIndicator, StabilityLevel};
///
/// let indicator = StabilityIndicator {
///     file_path: "src/cache.rs".into(),
///     shake_index: 2.4,
///     time_spread_days: 12.5,
///     modification_gap_days: 3.1,
///     stability_level: StabilityLevel::HighlyUnstable,
/// };
/// assert!(indicator.shake_index <= 10.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityIndicator {
    /// File path relative to repo root.
    pub file_path: String,
    /// Changes per day of observed lifespan, capped at 10.
    pub shake_index: f64,
    /// Days between the first and last modification.
    pub time_spread_days: f64,
    /// Standard deviation of inter-modification gaps, in days.
    pub modification_gap_days: f64,
    /// Joint classification of the above.
    pub stability_level: StabilityLevel,
}

/// Assess stability for every file touched at least twice.
///
/// Results are sorted by shake index descending (path ascending on ties)
/// and capped at `max_results`.
///
/// # Examples
///
/// ```
/// use gitscope_health::assess_stability;
///
/// assert!(assess_stability(&[], 15).is_empty());
/// ```
pub fn assess_stability(commits: &[CommitRecord], max_results: usize) -> Vec<StabilityIndicator> {
    let mut file_changes: BTreeMap<String, Vec<DateTime<FixedOffset>>> = BTreeMap::new();
    for commit in commits {
        for file in &commit.files {
            file_changes
                .entry(file.clone())
                .or_default()
                .push(commit.timestamp);
        }
    }

    let mut indicators: Vec<StabilityIndicator> = file_changes
        .into_iter()
        .filter(|(_, changes)| changes.len() >= MIN_CHANGES)
        .map(|(path, mut changes)| {
            changes.sort();
            let shake_index = shake_index(&changes);
            let time_spread_days = span_hours(&changes) / 24.0;
            let modification_gap_days = gap_deviation_days(&changes);
            StabilityIndicator {
                file_path: path,
                shake_index,
                time_spread_days,
                modification_gap_days,
                stability_level: classify(shake_index, modification_gap_days),
            }
        })
        .collect();

    indicators.sort_by(|a, b| {
        b.shake_index
            .partial_cmp(&a.shake_index)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    indicators.truncate(max_results);
    indicators
}

fn span_hours(changes: &[DateTime<FixedOffset>]) -> f64 {
    match (changes.first(), changes.last()) {
        (Some(first), Some(last)) => (*last - *first).num_seconds() as f64 / 3600.0,
        _ => 0.0,
    }
}

/// Changes per day of observed lifespan, capped at [`SHAKE_CEILING`].
/// A zero span (all changes at one instant) degenerates to the change
/// count, still capped.
fn shake_index(changes: &[DateTime<FixedOffset>]) -> f64 {
    let span = span_hours(changes);
    if span == 0.0 {
        return (changes.len() as f64).min(SHAKE_CEILING);
    }
    (changes.len() as f64 / (span / 24.0)).min(SHAKE_CEILING)
}

/// Population standard deviation of inter-arrival gaps, converted to days.
/// Zero when fewer than three samples exist.
fn gap_deviation_days(changes: &[DateTime<FixedOffset>]) -> f64 {
    if changes.len() < 3 {
        return 0.0;
    }
    let gaps: Vec<f64> = changes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 3600.0)
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let variance = gaps
        .iter()
        .map(|gap| (gap - mean) * (gap - mean))
        .sum::<f64>()
        / gaps.len() as f64;
    variance.sqrt() / 24.0
}

fn classify(shake_index: f64, gap_days: f64) -> StabilityLevel {
    if shake_index > 2.0 && gap_days > 3.0 {
        StabilityLevel::HighlyUnstable
    } else if shake_index > 1.0 && gap_days > 1.5 {
        StabilityLevel::Unstable
    } else if shake_index > 0.5 {
        StabilityLevel::Moderate
    } else {
        StabilityLevel::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_commit(when: &str, files: Vec<&str>) -> CommitRecord {
        CommitRecord {
            hash: format!("hash_{when}"),
            author: "alice".into(),
            email: "alice@example.com".into(),
            timestamp: when.parse().unwrap(),
            subject: "test".into(),
            body: String::new(),
            parents: vec![],
            files: files.into_iter().map(String::from).collect(),
            additions: 5,
            deletions: 2,
        }
    }

    #[test]
    fn single_change_files_are_skipped() {
        let commits = vec![make_commit("2024-03-01T10:00:00+00:00", vec!["once.rs"])];
        assert!(assess_stability(&commits, 15).is_empty());
    }

    #[test]
    fn shake_index_counts_changes_per_day() {
        // 4 changes over 2 days -> shake = 4 / 2 = 2.0
        let commits = vec![
            make_commit("2024-03-01T00:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-01T16:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-02T08:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-03T00:00:00+00:00", vec!["x.rs"]),
        ];

        let indicators = assess_stability(&commits, 15);
        assert_eq!(indicators.len(), 1);
        assert!((indicators[0].shake_index - 2.0).abs() < 1e-9);
        assert!((indicators[0].time_spread_days - 2.0).abs() < 1e-9);
    }

    #[test]
    fn shake_index_caps_at_ceiling() {
        // 30 changes inside one hour
        let commits: Vec<CommitRecord> = (0..30)
            .map(|i| make_commit(&format!("2024-03-01T10:{:02}:00+00:00", i), vec!["x.rs"]))
            .collect();

        let indicators = assess_stability(&commits, 15);
        assert_eq!(indicators[0].shake_index, 10.0);
    }

    #[test]
    fn gap_deviation_zero_under_three_samples() {
        let commits = vec![
            make_commit("2024-03-01T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-09T10:00:00+00:00", vec!["x.rs"]),
        ];

        let indicators = assess_stability(&commits, 15);
        assert_eq!(indicators[0].modification_gap_days, 0.0);
    }

    #[test]
    fn regular_cadence_has_zero_gap_deviation() {
        let commits: Vec<CommitRecord> = (1..=5)
            .map(|day| make_commit(&format!("2024-03-0{day}T10:00:00+00:00"), vec!["x.rs"]))
            .collect();

        let indicators = assess_stability(&commits, 15);
        assert_eq!(indicators[0].modification_gap_days, 0.0);
        assert_eq!(indicators[0].stability_level, StabilityLevel::Moderate);
    }

    #[test]
    fn dense_bursts_need_large_gap_deviation_for_worst_band() {
        // Two dense bursts separated by a quiet stretch: high change rate,
        // but the gap deviation stays around a day.
        let commits = vec![
            make_commit("2024-03-01T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-01T11:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-01T12:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-04T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-04T11:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-04T12:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-04T13:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-04T14:00:00+00:00", vec!["x.rs"]),
        ];

        let indicators = assess_stability(&commits, 15);
        let x = &indicators[0];
        assert!(x.shake_index > 2.0, "shake {}", x.shake_index);
        assert!(x.modification_gap_days < 3.0);
        // Gap deviation stays under 3 days here, so it's not the worst band
        assert_ne!(x.stability_level, StabilityLevel::HighlyUnstable);
    }

    #[test]
    fn results_sorted_by_shake_and_capped() {
        let mut commits = Vec::new();
        // fast.rs: 5 changes in one day
        for i in 0..5 {
            commits.push(make_commit(
                &format!("2024-03-01T{:02}:00:00+00:00", 10 + i),
                vec!["fast.rs"],
            ));
        }
        // slow.rs: 2 changes a month apart
        commits.push(make_commit("2024-02-01T10:00:00+00:00", vec!["slow.rs"]));
        commits.push(make_commit("2024-03-02T10:00:00+00:00", vec!["slow.rs"]));

        let indicators = assess_stability(&commits, 15);
        assert_eq!(indicators[0].file_path, "fast.rs");
        assert_eq!(indicators[1].file_path, "slow.rs");
        assert_eq!(indicators[1].stability_level, StabilityLevel::Stable);

        let capped = assess_stability(&commits, 1);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].file_path, "fast.rs");
    }
}
