//! Two-phase commit graph construction and layout.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Branch label used when membership cannot be resolved.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Horizontal spacing between branch columns, in layout units.
const COLUMN_SPACING: i32 = 50;

/// One commit in the graph, with derived child edges and layout
/// coordinates.
///
/// Child links are not locally known from a single commit record, so the
/// graph is built in two passes: create nodes, then back-fill children.
///
/// # Examples
///
/// ```
/// use gitscope_topology::CommitNode;
///
/// let node = CommitNode {
///     hash: "a1b2c3d4e5".into(),
///     short_hash: "a1b2c3d4".into(),
///     message: "fix: auth bug".into(),
///     author: "alice".into(),
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     branch: "main".into(),
///     parents: vec!["p1".into(), "p2".into()],
///     children: vec![],
///     x: 0,
///     y: 3,
///     is_merge: true,
/// };
/// assert!(node.is_merge);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    /// Full commit hash.
    pub hash: String,
    /// First 8 characters of the hash.
    pub short_hash: String,
    /// First line of the commit message.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Commit time.
    pub timestamp: DateTime<FixedOffset>,
    /// Resolved branch label, `"unknown"` when unresolvable.
    pub branch: String,
    /// Parent commit hashes, copied verbatim.
    pub parents: Vec<String>,
    /// Child commit hashes, derived in the back-fill pass.
    pub children: Vec<String>,
    /// Horizontal layout coordinate (`column * spacing`).
    pub x: i32,
    /// Ordinal position in the commit sequence.
    pub y: i32,
    /// Whether this commit has more than one parent.
    pub is_merge: bool,
}

/// Build the commit graph in two passes.
///
/// Pass 1 creates one node per commit with empty children, resolving each
/// commit's branch label through `resolve`. Pass 2 appends each node's hash
/// to the children of every parent present in the analyzed set; parents
/// missing from the set (history truncation) are silently ignored.
///
/// The hash index is builder-local and dropped on return. Layout
/// coordinates start zeroed; call [`assign_layout`] to fill them.
///
/// # Examples
///
/// ```
/// use gitscope_history::CommitRecord;
/// use gitscope_topology::build_commit_graph;
///
/// let commits = vec![CommitRecord {
///     hash: "child".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     subject: "work".into(),
///     body: String::new(),
///     parents: vec!["missing-parent".into()],
///     files: vec![],
///     additions: 0,
///     deletions: 0,
/// }];
/// let nodes = build_commit_graph(&commits, |_| Some("main".into()));
/// assert_eq!(nodes[0].branch, "main");
/// assert!(nodes[0].children.is_empty());
/// ```
pub fn build_commit_graph<F>(commits: &[CommitRecord], mut resolve: F) -> Vec<CommitNode>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut nodes: Vec<CommitNode> = commits
        .iter()
        .enumerate()
        .map(|(ordinal, commit)| CommitNode {
            hash: commit.hash.clone(),
            short_hash: commit.short_hash().to_string(),
            message: commit.subject.clone(),
            author: commit.author.clone(),
            timestamp: commit.timestamp,
            branch: resolve(&commit.hash).unwrap_or_else(|| UNKNOWN_BRANCH.to_string()),
            parents: commit.parents.clone(),
            children: Vec::new(),
            x: 0,
            y: ordinal as i32,
            is_merge: commit.is_merge(),
        })
        .collect();

    // Transient hash -> position index for the back-fill pass.
    let index: HashMap<&str, usize> = commits
        .iter()
        .enumerate()
        .map(|(position, commit)| (commit.hash.as_str(), position))
        .collect();

    for child_position in 0..commits.len() {
        let child_hash = commits[child_position].hash.clone();
        for parent in &commits[child_position].parents {
            if let Some(&parent_position) = index.get(parent.as_str()) {
                nodes[parent_position].children.push(child_hash.clone());
            }
        }
    }

    nodes
}

/// Assign 2-D layout coordinates.
///
/// Each branch gets a monotonically increasing column in order of first
/// encounter; `x = column * spacing`, `y` keeps the commit's ordinal
/// position. This is a presentation aid only — no planarity or
/// crossing-minimization is claimed.
pub fn assign_layout(nodes: &mut [CommitNode]) {
    let mut columns: HashMap<String, i32> = HashMap::new();
    let mut next_column = 0;

    for node in nodes.iter_mut() {
        let column = *columns.entry(node.branch.clone()).or_insert_with(|| {
            let column = next_column;
            next_column += 1;
            column
        });
        node.x = column * COLUMN_SPACING;
    }
}
