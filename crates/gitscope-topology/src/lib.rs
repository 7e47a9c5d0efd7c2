//! Commit-graph and branch-topology model.
//!
//! Builds a directed acyclic graph of commits (parent/child edges), branch
//! summaries, and merge metadata from a commit sequence plus a best-effort
//! branch-membership resolver. Everything here is optional for the overall
//! analysis: failures degrade to "no branch data" instead of aborting.

pub mod branches;
pub mod graph;
pub mod merges;

use chrono::{DateTime, FixedOffset};
use gitscope_core::Result;
use gitscope_history::{CommitRecord, CommitSource};
use serde::{Deserialize, Serialize};

pub use branches::{summarize_branches, BranchInfo};
pub use graph::{assign_layout, build_commit_graph, CommitNode};
pub use merges::{detect_merges, MergeInfo};

/// Branch structure and commit relationships for one repository snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchData {
    /// Per-branch summaries.
    pub branches: Vec<BranchInfo>,
    /// The commit graph with layout coordinates.
    pub commit_graph: Vec<CommitNode>,
    /// Detected merge commits with best-effort provenance.
    pub merge_patterns: Vec<MergeInfo>,
}

/// Build the full topology model for a commit sequence.
///
/// Branch membership is resolved through `source`; unresolvable commits are
/// labeled `"unknown"`. Branch activity is judged against `now` and
/// `activity_window_days` rather than a hidden wall-clock read.
///
/// # Errors
///
/// Fails only if branch enumeration fails. Callers treat that as a
/// degradation and proceed without branch data.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use chrono::Utc;
/// use gitscope_history::{CommitSource, GitRepository};
/// use gitscope_topology::analyze_topology;
///
/// let repo = GitRepository::open(Path::new(".")).unwrap();
/// let commits = repo.commits().unwrap();
/// let now = Utc::now().fixed_offset();
/// let data = analyze_topology(&repo, &commits, now, 30).unwrap();
/// println!("{} branches, {} merges", data.branches.len(), data.merge_patterns.len());
/// ```
pub fn analyze_topology(
    source: &dyn CommitSource,
    commits: &[CommitRecord],
    now: DateTime<FixedOffset>,
    activity_window_days: i64,
) -> Result<BranchData> {
    let branches = summarize_branches(source, now, activity_window_days)?;

    let mut commit_graph = build_commit_graph(commits, |hash| source.resolve_branch(hash));
    assign_layout(&mut commit_graph);

    let merge_patterns = detect_merges(commits);

    Ok(BranchData {
        branches,
        commit_graph,
        merge_patterns,
    })
}
