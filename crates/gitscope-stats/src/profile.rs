//! Per-author work-style profiles.
//!
//! Heuristic classification of how each contributor works: cadence, commit
//! size, burstiness, and clock preferences. All outcomes are bounded
//! categorical or scalar signals; authors with too little history are
//! explicitly [`WorkStyle::Unknown`] rather than guessed.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Minimum commits before a work style is inferred.
const MIN_COMMITS_FOR_STYLE: usize = 5;

/// Coarse work-style archetype inferred from commit cadence.
///
/// # Examples
///
/// ```
/// use gitscope_stats::WorkStyle;
///
/// let style: WorkStyle = serde_json::from_str("\"burst\"").unwrap();
/// assert_eq!(style, WorkStyle::Burst);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStyle {
    /// Evenly spaced commits.
    Steady,
    /// Work concentrated in short sessions.
    Burst,
    /// A mix of sessions and spaced commits.
    Balanced,
    /// Not enough history to classify.
    Unknown,
}

/// Work-style profile for one author.
///
/// # Examples
///
/// ```
/// use gitscope_stats::{DeveloperProfile, WorkStyle};
///
/// let profile = DeveloperProfile {
///     name: "alice".into(),
///     email: "alice@example.com".into(),
///     commit_count: 3,
///     commits_per_day: 0.4,
///     average_commit_size: 55.0,
///     burst_ratio: 0.2,
///     night_owl: false,
///     early_bird: true,
///     weekend_worker: false,
///     preferred_hours: vec![8, 9, 10],
///     work_style: WorkStyle::Unknown,
/// };
/// assert_eq!(profile.work_style, WorkStyle::Unknown);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProfile {
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Commits by this author.
    pub commit_count: u32,
    /// Commits per day over the whole observed history span.
    pub commits_per_day: f64,
    /// Average lines changed (added + deleted) per commit.
    pub average_commit_size: f64,
    /// Share of commits made within two hours of the author's previous one.
    pub burst_ratio: f64,
    /// More than 30% of commits between 22:00 and 06:00 local time.
    pub night_owl: bool,
    /// More than 30% of commits between 05:00 and 09:00 local time.
    pub early_bird: bool,
    /// More than 20% of commits on Saturday or Sunday.
    pub weekend_worker: bool,
    /// Up to three most-used hours of day, busiest first.
    pub preferred_hours: Vec<u32>,
    /// Cadence archetype.
    pub work_style: WorkStyle,
}

/// Build work-style profiles for every author in the history.
///
/// Returns profiles sorted by commit count descending, then by author key
/// for determinism. Classification is approximate by design; only the
/// signal shape (bounded scalars, explicit `Unknown`) is contractual.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitRecord;
/// use gitscope_stats::analyze_profiles;
///
/// let commits = vec![CommitRecord {
///     hash: "abc".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     subject: "init".into(),
///     body: String::new(),
///     parents: vec![],
///     files: vec![],
///     additions: 10,
///     deletions: 2,
/// }];
/// let profiles = analyze_profiles(&commits);
/// assert_eq!(profiles.len(), 1);
/// assert_eq!(profiles[0].commit_count, 1);
/// ```
pub fn analyze_profiles(commits: &[CommitRecord]) -> Vec<DeveloperProfile> {
    let mut by_author: BTreeMap<String, Vec<&CommitRecord>> = BTreeMap::new();
    for commit in commits {
        by_author.entry(commit.author_key()).or_default().push(commit);
    }

    let span_days = history_span_days(commits);

    let mut profiles: Vec<DeveloperProfile> = by_author
        .into_values()
        .map(|mut authored| {
            authored.sort_by_key(|c| c.timestamp);
            profile_author(&authored, span_days)
        })
        .collect();

    profiles.sort_by(|a, b| {
        b.commit_count
            .cmp(&a.commit_count)
            .then_with(|| a.email.cmp(&b.email))
    });
    profiles
}

fn history_span_days(commits: &[CommitRecord]) -> f64 {
    let first = commits.iter().map(|c| c.timestamp).min();
    let last = commits.iter().map(|c| c.timestamp).max();
    match (first, last) {
        (Some(first), Some(last)) => {
            let days = (last - first).num_seconds() as f64 / 86_400.0;
            days.max(1.0)
        }
        _ => 1.0,
    }
}

fn profile_author(authored: &[&CommitRecord], span_days: f64) -> DeveloperProfile {
    let count = authored.len();
    let lines_changed: u64 = authored.iter().map(|c| c.additions + c.deletions).sum();

    let mut hour_counts = [0u32; 24];
    let mut night = 0usize;
    let mut early = 0usize;
    let mut weekend = 0usize;
    for commit in authored {
        let hour = commit.timestamp.hour();
        hour_counts[hour as usize] += 1;
        if hour >= 22 || hour < 6 {
            night += 1;
        }
        if (5..9).contains(&hour) {
            early += 1;
        }
        let weekday = commit.timestamp.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            weekend += 1;
        }
    }

    let burst_ratio = burst_ratio(authored);
    let commits_per_day = count as f64 / span_days;

    DeveloperProfile {
        name: authored[0].author.clone(),
        email: authored[0].email.clone(),
        commit_count: count as u32,
        commits_per_day,
        average_commit_size: lines_changed as f64 / count as f64,
        burst_ratio,
        night_owl: night as f64 / count as f64 > 0.3,
        early_bird: early as f64 / count as f64 > 0.3,
        weekend_worker: weekend as f64 / count as f64 > 0.2,
        preferred_hours: preferred_hours(&hour_counts),
        work_style: classify_style(count, burst_ratio),
    }
}

/// Share of commits landing within two hours of the same author's previous
/// commit. Input must be sorted by timestamp ascending.
fn burst_ratio(authored: &[&CommitRecord]) -> f64 {
    if authored.len() < 2 {
        return 0.0;
    }
    let bursts = authored
        .windows(2)
        .filter(|pair| (pair[1].timestamp - pair[0].timestamp).num_hours() < 2)
        .count();
    bursts as f64 / (authored.len() - 1) as f64
}

fn preferred_hours(hour_counts: &[u32; 24]) -> Vec<u32> {
    let mut hours: Vec<(u32, u32)> = hour_counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(hour, count)| (hour as u32, *count))
        .collect();
    hours.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    hours.into_iter().take(3).map(|(hour, _)| hour).collect()
}

fn classify_style(count: usize, burst_ratio: f64) -> WorkStyle {
    if count < MIN_COMMITS_FOR_STYLE {
        return WorkStyle::Unknown;
    }
    if burst_ratio > 0.6 {
        WorkStyle::Burst
    } else if burst_ratio < 0.3 {
        WorkStyle::Steady
    } else {
        WorkStyle::Balanced
    }
}
