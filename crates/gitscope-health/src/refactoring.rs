//! Refactoring-pressure signals.
//!
//! A file changed at least three times inside the trailing window is under
//! active rework; the signal strength is the ratio of windowed changes to
//! the distinct local days they landed on.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Minimum windowed changes before a signal is raised.
const MIN_WINDOW_CHANGES: usize = 3;

/// Intensity band for a refactoring signal.
///
/// # Examples
///
/// ```
/// use gitscope_health::SignalStrength;
///
/// assert_eq!(SignalStrength::Strong.to_string(), "strong");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    /// At least 3 changes per active day.
    Strong,
    /// At least 2 changes per active day.
    Medium,
    /// Anything slower.
    Weak,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::Strong => write!(f, "strong"),
            SignalStrength::Medium => write!(f, "medium"),
            SignalStrength::Weak => write!(f, "weak"),
        }
    }
}

/// One file under recent intensive modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactoringSignal {
    /// File path relative to repo root.
    pub file_path: String,
    /// Distinct local calendar days with changes inside the window.
    pub intensive_days: u32,
    /// Changes inside the window.
    pub window_changes: u32,
    /// Intensity band.
    pub strength: SignalStrength,
    /// Window length used, in days.
    pub window_days: i64,
    /// First windowed change.
    pub first_change: DateTime<FixedOffset>,
    /// Last windowed change.
    pub last_change: DateTime<FixedOffset>,
}

/// Detect files changed at least three times within the trailing
/// `window_days` before `reference_time`.
///
/// Results are sorted by windowed change count descending (path ascending
/// on ties) and are not capped.
///
/// # Examples
///
/// ```
/// use gitscope_health::detect_refactoring;
///
/// let now = "2024-03-15T12:00:00+00:00".parse().unwrap();
/// assert!(detect_refactoring(&[], now, 7).is_empty());
/// ```
pub fn detect_refactoring(
    commits: &[CommitRecord],
    reference_time: DateTime<FixedOffset>,
    window_days: i64,
) -> Vec<RefactoringSignal> {
    let cutoff = reference_time - Duration::days(window_days);

    let mut windowed: BTreeMap<String, Vec<DateTime<FixedOffset>>> = BTreeMap::new();
    for commit in commits {
        if commit.timestamp <= cutoff {
            continue;
        }
        for file in &commit.files {
            windowed
                .entry(file.clone())
                .or_default()
                .push(commit.timestamp);
        }
    }

    let mut signals: Vec<RefactoringSignal> = windowed
        .into_iter()
        .filter(|(_, changes)| changes.len() >= MIN_WINDOW_CHANGES)
        .map(|(path, mut changes)| {
            changes.sort();
            // Author-local calendar days: a 23:30+02:00 change belongs to
            // the author's evening, not the UTC morning after.
            let days: BTreeSet<NaiveDate> =
                changes.iter().map(|ts| ts.date_naive()).collect();
            let intensive_days = days.len() as u32;
            let window_changes = changes.len() as u32;
            RefactoringSignal {
                file_path: path,
                intensive_days,
                window_changes,
                strength: strength(window_changes, intensive_days),
                window_days,
                first_change: changes[0],
                last_change: changes[changes.len() - 1],
            }
        })
        .collect();

    signals.sort_by(|a, b| {
        b.window_changes
            .cmp(&a.window_changes)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    signals
}

fn strength(window_changes: u32, intensive_days: u32) -> SignalStrength {
    let ratio = window_changes as f64 / intensive_days.max(1) as f64;
    if ratio >= 3.0 {
        SignalStrength::Strong
    } else if ratio >= 2.0 {
        SignalStrength::Medium
    } else {
        SignalStrength::Weak
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

    fn now() -> DateTime<FixedOffset> {
        "2024-03-15T12:00:00+00:00".parse().unwrap()
    }

    #[test]
    fn changes_outside_window_are_ignored() {
        let commits = vec![
            make_commit("2024-03-01T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-02T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-03T10:00:00+00:00", vec!["x.rs"]),
        ];
        assert!(detect_refactoring(&commits, now(), 7).is_empty());
    }

    #[test]
    fn cutoff_boundary_is_exclusive() {
        // Exactly at the cutoff instant: excluded. One second later: counted.
        let commits = vec![
            make_commit("2024-03-08T12:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-08T12:00:01+00:00", vec!["x.rs"]),
            make_commit("2024-03-09T12:00:01+00:00", vec!["x.rs"]),
            make_commit("2024-03-10T12:00:01+00:00", vec!["x.rs"]),
        ];
        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].window_changes, 3);
    }

    #[test]
    fn fewer_than_three_windowed_changes_no_signal() {
        let commits = vec![
            make_commit("2024-03-13T10:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T10:00:00+00:00", vec!["x.rs"]),
        ];
        assert!(detect_refactoring(&commits, now(), 7).is_empty());
    }

    #[test]
    fn six_changes_over_two_days_is_strong() {
        let commits = vec![
            make_commit("2024-03-13T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-13T11:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-13T15:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T11:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T15:00:00+00:00", vec!["x.rs"]),
        ];

        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals.len(), 1);
        let signal = &signals[0];
        assert_eq!(signal.window_changes, 6);
        assert_eq!(signal.intensive_days, 2);
        assert_eq!(signal.strength, SignalStrength::Strong);
        assert_eq!(
            signal.first_change,
            "2024-03-13T09:00:00+00:00"
                .parse::<DateTime<FixedOffset>>()
                .unwrap()
        );
        assert_eq!(
            signal.last_change,
            "2024-03-14T15:00:00+00:00"
                .parse::<DateTime<FixedOffset>>()
                .unwrap()
        );
    }

    #[test]
    fn four_changes_over_two_days_is_medium() {
        let commits = vec![
            make_commit("2024-03-13T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-13T11:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-14T11:00:00+00:00", vec!["x.rs"]),
        ];

        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals[0].strength, SignalStrength::Medium);
    }

    #[test]
    fn spread_out_changes_are_weak() {
        let commits = vec![
            make_commit("2024-03-11T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-12T09:00:00+00:00", vec!["x.rs"]),
            make_commit("2024-03-13T09:00:00+00:00", vec!["x.rs"]),
        ];

        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals[0].strength, SignalStrength::Weak);
    }

    #[test]
    fn intensive_days_use_author_local_dates() {
        // 23:30 at +02:00 is still the same local day as 09:00 at +02:00.
        let commits = vec![
            make_commit("2024-03-13T09:00:00+02:00", vec!["x.rs"]),
            make_commit("2024-03-13T23:30:00+02:00", vec!["x.rs"]),
            make_commit("2024-03-14T09:00:00+02:00", vec!["x.rs"]),
        ];

        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals[0].intensive_days, 2);
    }

    #[test]
    fn signals_sorted_by_change_count() {
        let mut commits = Vec::new();
        for hour in [9, 10, 11, 12, 13] {
            commits.push(make_commit(
                &format!("2024-03-14T{hour:02}:00:00+00:00"),
                vec!["busy.rs"],
            ));
        }
        for hour in [9, 10, 11] {
            commits.push(make_commit(
                &format!("2024-03-14T{hour:02}:00:00+00:00"),
                vec!["calm.rs"],
            ));
        }

        let signals = detect_refactoring(&commits, now(), 7);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].file_path, "busy.rs");
        assert_eq!(signals[1].file_path, "calm.rs");
    }
}
