//! Merge detection and best-effort provenance extraction.

use chrono::{DateTime, FixedOffset};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Metadata for one merge commit.
///
/// Source and target branches are extracted from the merge message and are
/// `None` when the message doesn't follow a recognizable shape — callers
/// must tolerate missing provenance.
///
/// # Examples
///
/// ```
/// use gitscope_topology::MergeInfo;
///
/// let info = MergeInfo {
///     merge_commit: "abc123".into(),
///     source_branch: Some("feature/login".into()),
///     target_branch: None,
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     author: "alice".into(),
///     commit_count: 1,
/// };
/// assert!(info.target_branch.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeInfo {
    /// Hash of the merge commit.
    pub merge_commit: String,
    /// Branch the changes came from, when the message reveals it.
    pub source_branch: Option<String>,
    /// Branch the changes landed on, when the message reveals it.
    pub target_branch: Option<String>,
    /// Merge time.
    pub timestamp: DateTime<FixedOffset>,
    /// Author of the merge commit.
    pub author: String,
    /// Simplified merged-commit count attribute.
    pub commit_count: u32,
}

/// Collect merge metadata for every multi-parent commit.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitRecord;
/// use gitscope_topology::detect_merges;
///
/// let commits = vec![CommitRecord {
///     hash: "m1".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     subject: "Merge branch 'feature/login' into main".into(),
///     body: String::new(),
///     parents: vec!["p1".into(), "p2".into()],
///     files: vec![],
///     additions: 0,
///     deletions: 0,
/// }];
/// let merges = detect_merges(&commits);
/// assert_eq!(merges[0].source_branch.as_deref(), Some("feature/login"));
/// assert_eq!(merges[0].target_branch.as_deref(), Some("main"));
/// ```
pub fn detect_merges(commits: &[CommitRecord]) -> Vec<MergeInfo> {
    commits
        .iter()
        .filter(|commit| commit.is_merge())
        .map(|commit| {
            let (source_branch, target_branch) = extract_merge_branches(&commit.subject);
            MergeInfo {
                merge_commit: commit.hash.clone(),
                source_branch,
                target_branch,
                timestamp: commit.timestamp,
                author: commit.author.clone(),
                commit_count: 1,
            }
        })
        .collect()
}

/// Extract `(source, target)` branch names from a merge message.
///
/// Recognized shapes:
/// - `Merge branch 'X' into Y`
/// - `Merge branch 'X'` (target stays unknown)
/// - `Merge pull request #N from X` (target stays unknown)
/// - `Merge remote-tracking branch 'origin/X' into Y`
///
/// Anything else yields `(None, None)`.
fn extract_merge_branches(subject: &str) -> (Option<String>, Option<String>) {
    let source = quoted_branch(subject).or_else(|| pull_request_source(subject));
    if source.is_none() {
        return (None, None);
    }

    let target = subject
        .rsplit_once(" into ")
        .map(|(_, rest)| rest.trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|t| !t.is_empty())
        .map(String::from);

    (source, target)
}

/// The first single-quoted token after "Merge", e.g.
/// `Merge branch 'feature/x' into main` -> `feature/x`.
fn quoted_branch(subject: &str) -> Option<String> {
    if !subject.starts_with("Merge ") {
        return None;
    }
    let start = subject.find('\'')?;
    let rest = &subject[start + 1..];
    let end = rest.find('\'')?;
    let name = &rest[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// The head reference of a GitHub-style message, e.g.
/// `Merge pull request #12 from owner/feature-x` -> `owner/feature-x`.
fn pull_request_source(subject: &str) -> Option<String> {
    if !subject.starts_with("Merge pull request #") {
        return None;
    }
    let (_, rest) = subject.split_once(" from ")?;
    let name = rest.split_whitespace().next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_merge(subject: &str) -> CommitRecord {
        CommitRecord {
            hash: "m1".into(),
            author: "alice".into(),
            email: "alice@example.com".into(),
            timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
            subject: subject.into(),
            body: String::new(),
            parents: vec!["p1".into(), "p2".into()],
            files: vec![],
            additions: 0,
            deletions: 0,
        }
    }

    #[test]
    fn merge_branch_into_target() {
        let (source, target) =
            extract_merge_branches("Merge branch 'feature/login' into develop");
        assert_eq!(source.as_deref(), Some("feature/login"));
        assert_eq!(target.as_deref(), Some("develop"));
    }

    #[test]
    fn merge_branch_without_target() {
        let (source, target) = extract_merge_branches("Merge branch 'hotfix'");
        assert_eq!(source.as_deref(), Some("hotfix"));
        assert!(target.is_none());
    }

    #[test]
    fn github_pull_request_message() {
        let (source, target) =
            extract_merge_branches("Merge pull request #42 from owner/feature-x");
        assert_eq!(source.as_deref(), Some("owner/feature-x"));
        assert!(target.is_none());
    }

    #[test]
    fn remote_tracking_merge() {
        let (source, target) =
            extract_merge_branches("Merge remote-tracking branch 'origin/main' into release");
        assert_eq!(source.as_deref(), Some("origin/main"));
        assert_eq!(target.as_deref(), Some("release"));
    }

    #[test]
    fn unrecognized_message_yields_unknown() {
        let (source, target) = extract_merge_branches("Weekly sync of upstream changes");
        assert!(source.is_none());
        assert!(target.is_none());
    }

    #[test]
    fn only_multi_parent_commits_are_merges() {
        let mut regular = make_merge("regular commit");
        regular.parents.pop();
        let merge = make_merge("Merge branch 'a' into b");

        let merges = detect_merges(&[regular, merge]);
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].merge_commit, "m1");
    }

    #[test]
    fn merge_with_unparseable_message_still_reported() {
        let merge = make_merge("octopus merge of three topic branches");
        let merges = detect_merges(&[merge]);
        assert_eq!(merges.len(), 1);
        assert!(merges[0].source_branch.is_none());
        assert!(merges[0].target_branch.is_none());
    }
}
