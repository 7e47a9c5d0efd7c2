//! Immutable commit data as produced by a [`crate::CommitSource`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One historical change-set: identity, authorship, timestamp, message,
/// parent links, and file/line deltas.
///
/// Records are created once by the source and read-only thereafter. The
/// timestamp carries the author's UTC offset so calendar-day and
/// hour-of-day bucketing follows the author's local clock.
///
/// A record whose per-commit diff stats were unavailable carries an empty
/// file list and zero line counts; it still counts toward commit totals.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitRecord;
///
/// let record = CommitRecord {
///     hash: "a1b2c3d4".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2024-03-01T10:30:00+02:00".parse().unwrap(),
///     subject: "fix: auth bug".into(),
///     body: String::new(),
///     parents: vec![],
///     files: vec!["src/auth.rs".into()],
///     additions: 10,
///     deletions: 3,
/// };
/// assert!(!record.is_merge());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Commit time with the author's UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    /// First line of the commit message.
    pub subject: String,
    /// Remainder of the commit message.
    pub body: String,
    /// Parent commit hashes.
    pub parents: Vec<String>,
    /// Paths changed in this commit.
    pub files: Vec<String>,
    /// Lines added in this commit.
    pub additions: u64,
    /// Lines deleted in this commit.
    pub deletions: u64,
}

impl CommitRecord {
    /// Returns `true` if this commit has more than one parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitscope_history::CommitRecord;
    ///
    /// let mut record = CommitRecord {
    ///     hash: "abc".into(),
    ///     author: "alice".into(),
    ///     email: "alice@example.com".into(),
    ///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
    ///     subject: "Merge branch 'feature' into main".into(),
    ///     body: String::new(),
    ///     parents: vec!["p1".into(), "p2".into()],
    ///     files: vec![],
    ///     additions: 0,
    ///     deletions: 0,
    /// };
    /// assert!(record.is_merge());
    /// record.parents.pop();
    /// assert!(!record.is_merge());
    /// ```
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// The key under which this commit's author is aggregated:
    /// `"<name> <email>"`.
    pub fn author_key(&self) -> String {
        format!("{} <{}>", self.author, self.email)
    }

    /// Shortened commit hash (first 8 characters).
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(8)]
    }
}

/// Per-commit diff statistics, fetched separately from the commit list
/// because their retrieval can fail independently.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitStats;
///
/// let stats = CommitStats {
///     additions: 15,
///     deletions: 3,
///     files: vec!["src/main.rs".into(), "Cargo.toml".into()],
/// };
/// assert_eq!(stats.files.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
    /// Paths changed.
    pub files: Vec<String>,
}
