//! The narrow interface through which the analysis engines consume history.

use gitscope_core::Result;

use crate::record::{CommitRecord, CommitStats};

/// Supplier of an ordered commit sequence and optional branch data.
///
/// Failure semantics follow the analysis error taxonomy:
/// - [`commits`](CommitSource::commits) failing is fatal for the whole
///   analysis.
/// - [`commit_stats`](CommitSource::commit_stats) failing is non-fatal; the
///   commit contributes zero additions/deletions/files but still counts.
/// - [`branches`](CommitSource::branches) failing disables topology output.
/// - [`branch_commits`](CommitSource::branch_commits) failing skips that
///   branch only.
/// - [`resolve_branch`](CommitSource::resolve_branch) is best-effort and
///   never fails; unresolvable commits yield `None`.
pub trait CommitSource {
    /// The full commit sequence, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the history cannot be read at all.
    fn commits(&self) -> Result<Vec<CommitRecord>>;

    /// Diff statistics for one commit.
    ///
    /// # Errors
    ///
    /// Fails if the diff for `hash` cannot be computed. Callers treat this
    /// as a recoverable, silent degradation.
    fn commit_stats(&self, hash: &str) -> Result<CommitStats>;

    /// Names of all local branches.
    ///
    /// # Errors
    ///
    /// Fails if branches cannot be enumerated; callers degrade to "no
    /// branch data".
    fn branches(&self) -> Result<Vec<String>>;

    /// The commit sequence reachable from `branch`, newest first.
    ///
    /// # Errors
    ///
    /// Fails if the branch cannot be walked; callers skip the branch.
    fn branch_commits(&self, branch: &str) -> Result<Vec<CommitRecord>>;

    /// Best-effort branch label for a commit, `None` when unresolvable.
    fn resolve_branch(&self, hash: &str) -> Option<String>;
}
