//! git2-backed commit source.
//!
//! Walks the repository with a revwalk and computes per-commit diff
//! statistics from tree-to-tree diffs against the first parent.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{BranchType, DiffOptions, Repository, Sort};
use gitscope_core::{Result, ScopeError};

use crate::record::{CommitRecord, CommitStats};
use crate::source::CommitSource;

/// A local git repository opened for history analysis.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gitscope_history::{CommitSource, GitRepository};
///
/// let repo = GitRepository::open(Path::new(".")).unwrap();
/// let commits = repo.commits().unwrap();
/// for c in commits.iter().take(5) {
///     println!("{}: {} ({})", c.short_hash(), c.subject, c.author);
/// }
/// ```
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Git`] if `path` is not a git repository.
    pub fn open(path: &std::path::Path) -> Result<Self> {
        let repo = Repository::open(path)
            .map_err(|e| ScopeError::Git(format!("failed to open repository: {e}")))?;
        Ok(Self { repo })
    }

    fn walk_from(&self, oid: git2::Oid) -> Result<Vec<CommitRecord>> {
        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| ScopeError::Git(format!("failed to create revwalk: {e}")))?;
        revwalk.set_sorting(Sort::TIME).ok();
        revwalk
            .push(oid)
            .map_err(|e| ScopeError::Git(format!("failed to push oid: {e}")))?;

        let mut records = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(|e| ScopeError::Git(format!("revwalk error: {e}")))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| ScopeError::Git(format!("failed to find commit: {e}")))?;
            records.push(to_record(&commit));
        }
        Ok(records)
    }
}

impl CommitSource for GitRepository {
    fn commits(&self) -> Result<Vec<CommitRecord>> {
        let head = self
            .repo
            .head()
            .map_err(|e| ScopeError::Git(format!("failed to resolve HEAD: {e}")))?;
        let oid = head
            .target()
            .ok_or_else(|| ScopeError::Git("HEAD has no target".into()))?;
        self.walk_from(oid)
    }

    fn commit_stats(&self, hash: &str) -> Result<CommitStats> {
        let oid: git2::Oid = hash
            .parse()
            .map_err(|e: git2::Error| ScopeError::Git(format!("invalid commit hash: {e}")))?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| ScopeError::Git(format!("failed to find commit: {e}")))?;

        let commit_tree = commit
            .tree()
            .map_err(|e| ScopeError::Git(format!("failed to get commit tree: {e}")))?;
        // Diff against the first parent; root commits diff against nothing.
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(
                parent
                    .tree()
                    .map_err(|e| ScopeError::Git(format!("failed to get parent tree: {e}")))?,
            ),
            Err(_) => None,
        };

        let mut diff_opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), Some(&mut diff_opts))
            .map_err(|e| ScopeError::Git(format!("failed to compute diff: {e}")))?;

        let stats = diff
            .stats()
            .map_err(|e| ScopeError::Git(format!("failed to compute diff stats: {e}")))?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string());
            if let Some(path) = path {
                if !path.is_empty() {
                    files.push(path);
                }
            }
        }

        Ok(CommitStats {
            additions: stats.insertions() as u64,
            deletions: stats.deletions() as u64,
            files,
        })
    }

    fn branches(&self) -> Result<Vec<String>> {
        let branches = self
            .repo
            .branches(Some(BranchType::Local))
            .map_err(|e| ScopeError::Git(format!("failed to list branches: {e}")))?;

        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) =
                branch.map_err(|e| ScopeError::Git(format!("failed to read branch: {e}")))?;
            if let Ok(Some(name)) = branch.name() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn branch_commits(&self, branch: &str) -> Result<Vec<CommitRecord>> {
        let reference = self
            .repo
            .resolve_reference_from_short_name(branch)
            .map_err(|e| ScopeError::Git(format!("failed to resolve branch '{branch}': {e}")))?;
        let oid = reference
            .target()
            .ok_or_else(|| ScopeError::Git(format!("branch '{branch}' has no target")))?;
        self.walk_from(oid)
    }

    fn resolve_branch(&self, hash: &str) -> Option<String> {
        let oid: git2::Oid = hash.parse().ok()?;
        let branches = self.repo.branches(Some(BranchType::Local)).ok()?;
        for branch in branches.flatten() {
            let (branch, _) = branch;
            let Some(tip) = branch.get().target() else {
                continue;
            };
            let contains =
                tip == oid || self.repo.graph_descendant_of(tip, oid).unwrap_or(false);
            if contains {
                if let Ok(Some(name)) = branch.name() {
                    return Some(name.to_string());
                }
            }
        }
        None
    }
}

fn to_record(commit: &git2::Commit<'_>) -> CommitRecord {
    let author = commit.author();
    CommitRecord {
        hash: commit.id().to_string(),
        author: author.name().unwrap_or("unknown").to_string(),
        email: author.email().unwrap_or("unknown").to_string(),
        timestamp: commit_datetime(&commit.time()),
        subject: commit.summary().unwrap_or("").to_string(),
        body: commit.body().unwrap_or("").to_string(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        files: Vec::new(),
        additions: 0,
        deletions: 0,
    }
}

fn commit_datetime(time: &git2::Time) -> DateTime<FixedOffset> {
    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(time.seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset)
}
