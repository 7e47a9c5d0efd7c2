//! Per-branch summaries.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset};
use gitscope_core::Result;
use gitscope_history::CommitSource;
use serde::{Deserialize, Serialize};

/// How many dominant authors to keep per branch.
const TOP_AUTHORS: usize = 3;

/// Summary of one branch.
///
/// # Examples
///
/// ```
/// use gitscope_topology::BranchInfo;
///
/// let info = BranchInfo {
///     name: "feature/login".into(),
///     commit_count: 14,
///     first_commit: "2024-01-05T09:00:00+00:00".parse().unwrap(),
///     last_commit: "2024-02-20T17:30:00+00:00".parse().unwrap(),
///     is_active: false,
///     main_authors: vec!["alice <alice@example.com>".into()],
/// };
/// assert_eq!(info.commit_count, 14);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    /// Branch name.
    pub name: String,
    /// Commits reachable from the branch tip.
    pub commit_count: usize,
    /// Oldest commit on the branch.
    pub first_commit: DateTime<FixedOffset>,
    /// Newest commit on the branch.
    pub last_commit: DateTime<FixedOffset>,
    /// Whether the newest commit falls within the activity window.
    pub is_active: bool,
    /// Up to three dominant authors by commit count.
    pub main_authors: Vec<String>,
}

/// Summarize every resolvable branch.
///
/// A branch whose commits cannot be read is skipped, not fatal. Activity is
/// judged against the passed-in `now`: a branch is active if its newest
/// commit is within `activity_window_days` of it.
///
/// # Errors
///
/// Fails only if branch enumeration itself fails.
pub fn summarize_branches(
    source: &dyn CommitSource,
    now: DateTime<FixedOffset>,
    activity_window_days: i64,
) -> Result<Vec<BranchInfo>> {
    let cutoff = now - Duration::days(activity_window_days);
    let mut summaries = Vec::new();

    for name in source.branches()? {
        // A failing branch is skipped, not fatal.
        let Ok(commits) = source.branch_commits(&name) else {
            continue;
        };
        if commits.is_empty() {
            continue;
        }

        let mut first = commits[0].timestamp;
        let mut last = commits[0].timestamp;
        let mut author_counts: HashMap<String, usize> = HashMap::new();
        for commit in &commits {
            if commit.timestamp < first {
                first = commit.timestamp;
            }
            if commit.timestamp > last {
                last = commit.timestamp;
            }
            *author_counts.entry(commit.author_key()).or_default() += 1;
        }

        let mut ranked: Vec<(String, usize)> = author_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        summaries.push(BranchInfo {
            name,
            commit_count: commits.len(),
            first_commit: first,
            last_commit: last,
            is_active: last > cutoff,
            main_authors: ranked
                .into_iter()
                .take(TOP_AUTHORS)
                .map(|(author, _)| author)
                .collect(),
        });
    }

    Ok(summaries)
}
