//! Single-pass aggregation of author, file, frequency, and time statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use gitscope_core::{Result, ScopeError};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Accumulated statistics for one author, keyed by `"<name> <email>"`.
///
/// # Examples
///
/// ```
/// use gitscope_stats::AuthorStat;
///
/// let stat = AuthorStat {
///     name: "alice".into(),
///     email: "alice@example.com".into(),
///     commit_count: 12,
///     additions: 340,
///     deletions: 120,
///     first_commit: "2024-01-05T09:00:00+00:00".parse().unwrap(),
///     last_commit: "2024-03-01T17:30:00+00:00".parse().unwrap(),
///     files: Default::default(),
/// };
/// assert!(stat.first_commit < stat.last_commit);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStat {
    /// Display name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Commits by this author.
    pub commit_count: u32,
    /// Total lines added.
    pub additions: u64,
    /// Total lines deleted.
    pub deletions: u64,
    /// Timestamp of this author's oldest commit.
    pub first_commit: DateTime<FixedOffset>,
    /// Timestamp of this author's newest commit.
    pub last_commit: DateTime<FixedOffset>,
    /// Per-file touch counts for this author.
    pub files: BTreeMap<String, u32>,
}

/// Time-based statistics over the whole history.
///
/// Hour and weekday histograms follow each commit author's local clock.
/// Weekday index 0 is Monday. Active-week counting uses ISO-8601 week
/// numbering (the week containing the year's first Thursday).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStat {
    /// Oldest commit in the history.
    pub first_commit: DateTime<FixedOffset>,
    /// Newest commit in the history.
    pub last_commit: DateTime<FixedOffset>,
    /// Distinct calendar days with at least one commit.
    pub active_days: usize,
    /// Distinct ISO weeks with at least one commit.
    pub active_weeks: usize,
    /// Distinct calendar months with at least one commit.
    pub active_months: usize,
    /// Commits per hour of day (0–23).
    pub hourly: [u32; 24],
    /// Commits per weekday (Monday = 0).
    pub weekday: [u32; 7],
}

/// Aggregate contribution statistics for a commit sequence.
///
/// Maps are ordered (`BTreeMap`) so serialized output is byte-identical
/// across runs over the same history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    /// Total number of ingested commits.
    pub total_commits: usize,
    /// Per-author statistics keyed by `"<name> <email>"`.
    pub authors: BTreeMap<String, AuthorStat>,
    /// Time summary and activity histograms.
    pub time: TimeStat,
    /// Global per-file touch counts.
    pub file_touches: BTreeMap<String, u32>,
    /// Commits per calendar day, keyed `YYYY-MM-DD`.
    pub commit_frequency: BTreeMap<String, u32>,
}

/// Compute author, file, frequency, and time statistics in one pass.
///
/// Commits whose diff stats were unavailable contribute zero lines and no
/// file touches but still count toward commit totals.
///
/// # Errors
///
/// Returns [`ScopeError::EmptyHistory`] for an empty commit sequence — no
/// meaningful statistics exist, so the whole analysis is aborted.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitRecord;
/// use gitscope_stats::aggregate;
///
/// let commits = vec![CommitRecord {
///     hash: "abc".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     subject: "init".into(),
///     body: String::new(),
///     parents: vec![],
///     files: vec!["src/main.rs".into()],
///     additions: 50,
///     deletions: 0,
/// }];
/// let stats = aggregate(&commits).unwrap();
/// assert_eq!(stats.total_commits, 1);
/// assert_eq!(stats.file_touches["src/main.rs"], 1);
/// ```
pub fn aggregate(commits: &[CommitRecord]) -> Result<RepoStats> {
    if commits.is_empty() {
        return Err(ScopeError::EmptyHistory);
    }

    let mut authors: BTreeMap<String, AuthorStat> = BTreeMap::new();
    let mut file_touches: BTreeMap<String, u32> = BTreeMap::new();
    let mut commit_frequency: BTreeMap<String, u32> = BTreeMap::new();
    let mut hourly = [0u32; 24];
    let mut weekday = [0u32; 7];

    for commit in commits {
        let stat = authors
            .entry(commit.author_key())
            .or_insert_with(|| AuthorStat {
                name: commit.author.clone(),
                email: commit.email.clone(),
                commit_count: 0,
                additions: 0,
                deletions: 0,
                first_commit: commit.timestamp,
                last_commit: commit.timestamp,
                files: BTreeMap::new(),
            });

        stat.commit_count += 1;
        // Strict comparisons: ties keep the existing bound.
        if commit.timestamp < stat.first_commit {
            stat.first_commit = commit.timestamp;
        }
        if commit.timestamp > stat.last_commit {
            stat.last_commit = commit.timestamp;
        }
        stat.additions += commit.additions;
        stat.deletions += commit.deletions;
        for file in &commit.files {
            *stat.files.entry(file.clone()).or_default() += 1;
            *file_touches.entry(file.clone()).or_default() += 1;
        }

        *commit_frequency.entry(day_key(&commit.timestamp)).or_default() += 1;
        hourly[commit.timestamp.hour() as usize] += 1;
        weekday[commit.timestamp.weekday().num_days_from_monday() as usize] += 1;
    }

    let time = time_stats(commits, hourly, weekday);

    Ok(RepoStats {
        total_commits: commits.len(),
        authors,
        time,
        file_touches,
        commit_frequency,
    })
}

fn time_stats(commits: &[CommitRecord], hourly: [u32; 24], weekday: [u32; 7]) -> TimeStat {
    let mut first = commits[0].timestamp;
    let mut last = commits[0].timestamp;
    let mut days: BTreeSet<String> = BTreeSet::new();
    let mut weeks: BTreeSet<String> = BTreeSet::new();
    let mut months: BTreeSet<String> = BTreeSet::new();

    for commit in commits {
        if commit.timestamp < first {
            first = commit.timestamp;
        }
        if commit.timestamp > last {
            last = commit.timestamp;
        }
        days.insert(day_key(&commit.timestamp));
        weeks.insert(week_key(&commit.timestamp));
        months.insert(commit.timestamp.format("%Y-%m").to_string());
    }

    TimeStat {
        first_commit: first,
        last_commit: last,
        active_days: days.len(),
        active_weeks: weeks.len(),
        active_months: months.len(),
        hourly,
        weekday,
    }
}

fn day_key(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn week_key(timestamp: &DateTime<FixedOffset>) -> String {
    let week = timestamp.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_commit(
        author: &str,
        when: &str,
        files: Vec<&str>,
        additions: u64,
    ) -> CommitRecord {
        CommitRecord {
            hash: format!("hash_{author}_{when}"),
            author: author.into(),
            email: format!("{author}@example.com"),
            timestamp: when.parse().unwrap(),
            subject: "test commit".into(),
            body: String::new(),
            parents: vec![],
            files: files.into_iter().map(String::from).collect(),
            additions,
            deletions: 0,
        }
    }

    #[test]
    fn empty_history_is_fatal() {
        let result = aggregate(&[]);
        assert!(matches!(result, Err(ScopeError::EmptyHistory)));
    }

    #[test]
    fn three_commits_two_authors_scenario() {
        let commits = vec![
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec!["x.go"], 10),
            make_commit("alice", "2024-03-02T11:00:00+00:00", vec!["x.go"], 5),
            make_commit("bob", "2024-03-03T12:00:00+00:00", vec!["x.go", "y.go"], 2),
        ];

        let stats = aggregate(&commits).unwrap();
        assert_eq!(stats.total_commits, 3);
        assert_eq!(stats.authors["alice <alice@example.com>"].commit_count, 2);
        assert_eq!(stats.authors["alice <alice@example.com>"].additions, 15);
        assert_eq!(stats.authors["bob <bob@example.com>"].commit_count, 1);
        assert_eq!(stats.file_touches["x.go"], 3);
        assert_eq!(stats.file_touches["y.go"], 1);
    }

    #[test]
    fn author_counts_sum_to_total_commits() {
        let commits = vec![
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec![], 0),
            make_commit("bob", "2024-03-01T11:00:00+00:00", vec![], 0),
            make_commit("carol", "2024-03-02T10:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-04T10:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        let summed: u32 = stats.authors.values().map(|a| a.commit_count).sum();
        assert_eq!(summed as usize, stats.total_commits);
    }

    #[test]
    fn active_days_bounded_by_span() {
        let commits = vec![
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-01T18:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-05T10:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        let span_days =
            (stats.time.last_commit - stats.time.first_commit).num_days() as usize + 1;
        assert!(stats.time.active_days <= span_days);
        assert_eq!(stats.time.active_days, 2);
    }

    #[test]
    fn first_and_last_bounds_use_strict_comparison() {
        // Same-instant commits must not flip the established bounds.
        let commits = vec![
            make_commit("alice", "2024-03-02T10:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-02T10:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        let alice = &stats.authors["alice <alice@example.com>"];
        assert_eq!(
            alice.first_commit,
            "2024-03-01T10:00:00+00:00"
                .parse::<DateTime<FixedOffset>>()
                .unwrap()
        );
        assert_eq!(
            alice.last_commit,
            "2024-03-02T10:00:00+00:00"
                .parse::<DateTime<FixedOffset>>()
                .unwrap()
        );
    }

    #[test]
    fn iso_week_labels_follow_iso_8601() {
        // 2016-01-01 falls in ISO week 53 of 2015.
        let commits = vec![
            make_commit("alice", "2016-01-01T10:00:00+00:00", vec![], 0),
            // 2016-01-04 is the Monday of 2016-W01.
            make_commit("alice", "2016-01-04T10:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        assert_eq!(stats.time.active_weeks, 2);
        assert_eq!(week_key(&commits[0].timestamp), "2015-W53");
        assert_eq!(week_key(&commits[1].timestamp), "2016-W01");
    }

    #[test]
    fn histograms_use_local_clock() {
        // 23:30 in +02:00 — hour bucket 23, not 21.
        let commits = vec![make_commit(
            "alice",
            "2024-03-01T23:30:00+02:00",
            vec![],
            0,
        )];

        let stats = aggregate(&commits).unwrap();
        assert_eq!(stats.time.hourly[23], 1);
        assert_eq!(stats.time.hourly.iter().sum::<u32>(), 1);
        // 2024-03-01 is a Friday (weekday index 4)
        assert_eq!(stats.time.weekday[4], 1);
    }

    #[test]
    fn statless_commit_counts_but_contributes_nothing() {
        let commits = vec![
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec!["a.rs"], 7),
            make_commit("alice", "2024-03-02T10:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        assert_eq!(stats.total_commits, 2);
        let alice = &stats.authors["alice <alice@example.com>"];
        assert_eq!(alice.commit_count, 2);
        assert_eq!(alice.additions, 7);
        assert_eq!(stats.file_touches.len(), 1);
    }

    #[test]
    fn frequency_map_keys_calendar_days() {
        let commits = vec![
            make_commit("alice", "2024-03-01T10:00:00+00:00", vec![], 0),
            make_commit("alice", "2024-03-01T18:00:00+00:00", vec![], 0),
            make_commit("bob", "2024-03-02T09:00:00+00:00", vec![], 0),
        ];

        let stats = aggregate(&commits).unwrap();
        assert_eq!(stats.commit_frequency["2024-03-01"], 2);
        assert_eq!(stats.commit_frequency["2024-03-02"], 1);
    }
}
