//! The analysis pipeline: fetch, enrich, fan out, join.

use std::thread;

use chrono::{DateTime, FixedOffset};
use gitscope_core::{AnalysisConfig, Language, Result, ScopeError};
use gitscope_health::{CodeHealthMetrics, HealthOptions};
use gitscope_history::CommitSource;
use gitscope_stats::{aggregate, analyze_profiles, DeveloperProfile, RepoStats};
use gitscope_topology::{analyze_topology, BranchData};
use serde::{Deserialize, Serialize};

/// Parameters for one analysis run.
///
/// The reference time is explicit so that two runs over the same history
/// produce byte-identical serialized output.
///
/// # Examples
///
/// ```
/// use gitscope_report::AnalysisOptions;
///
/// let opts = AnalysisOptions::new("2024-03-15T12:00:00+00:00".parse().unwrap());
/// assert_eq!(opts.analysis.branch_activity_days, 30);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// "Now" for all recency judgments.
    pub reference_time: DateTime<FixedOffset>,
    /// Heuristic thresholds and recency windows.
    pub analysis: AnalysisConfig,
    /// Language for the health summary.
    pub language: Language,
}

impl AnalysisOptions {
    /// Default thresholds anchored at `reference_time`.
    pub fn new(reference_time: DateTime<FixedOffset>) -> Self {
        Self {
            reference_time,
            analysis: AnalysisConfig::default(),
            language: Language::default(),
        }
    }
}

/// Joined results of all three engines for one repository snapshot.
///
/// Topology and health are optional: their absence means the corresponding
/// component degraded, not that the analysis failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Contribution and time statistics.
    pub repo: RepoStats,
    /// Code health metrics.
    pub health: Option<CodeHealthMetrics>,
    /// Branch topology, `None` when branch enumeration failed.
    pub branches: Option<BranchData>,
    /// Per-author work-style profiles, most commits first.
    pub profiles: Vec<DeveloperProfile>,
}

/// Run the full analysis pipeline over `source`.
///
/// Commits are fetched once and enriched with per-commit diff stats; a
/// commit whose stats cannot be retrieved contributes zero lines and no
/// file touches but still counts toward totals. Health and aggregation
/// run on worker threads over the shared slice while topology, which
/// needs the source itself, runs on the calling thread. A topology
/// failure degrades to `branches: None`.
///
/// # Errors
///
/// Returns the underlying error if the commit list cannot be retrieved,
/// or [`ScopeError::EmptyHistory`] if it is empty.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use chrono::Utc;
/// use gitscope_history::GitRepository;
/// use gitscope_report::{analyze, AnalysisOptions};
///
/// let repo = GitRepository::open(Path::new(".")).unwrap();
/// let options = AnalysisOptions::new(Utc::now().fixed_offset());
/// let stats = analyze(&repo, &options).unwrap();
/// println!("{} commits", stats.repo.total_commits);
/// ```
pub fn analyze(source: &dyn CommitSource, options: &AnalysisOptions) -> Result<Statistics> {
    let mut commits = source.commits()?;
    if commits.is_empty() {
        return Err(ScopeError::EmptyHistory);
    }

    for commit in &mut commits {
        if let Ok(stats) = source.commit_stats(&commit.hash) {
            commit.additions = stats.additions;
            commit.deletions = stats.deletions;
            commit.files = stats.files;
        }
    }

    let health_options = HealthOptions {
        reference_time: options.reference_time,
        refactor_window_days: options.analysis.refactor_window_days,
        max_hotspots: options.analysis.max_hotspots,
        max_stability: options.analysis.max_stability,
        language: options.language,
    };

    // The source is only used on this thread; the workers share nothing
    // but the immutable commit slice.
    let (repo, profiles, health, branches) = thread::scope(|scope| {
        let commits = commits.as_slice();
        let health_handle = scope.spawn(|| gitscope_health::analyze(commits, &health_options));
        let stats_handle = scope.spawn(|| (aggregate(commits), analyze_profiles(commits)));

        let branches = analyze_topology(
            source,
            commits,
            options.reference_time,
            options.analysis.branch_activity_days,
        )
        .ok();

        let (repo, profiles) = match stats_handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        let health = match health_handle.join() {
            Ok(metrics) => metrics,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        (repo, profiles, health, branches)
    });

    Ok(Statistics {
        repo: repo?,
        health: Some(health),
        branches,
        profiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscope_history::{CommitRecord, CommitStats};

    /// In-memory source with per-commit stats and two branches.
    struct FakeSource {
        commits: Vec<CommitRecord>,
        stats_fail: bool,
        branches_fail: bool,
    }

    impl FakeSource {
        fn new(commits: Vec<CommitRecord>) -> Self {
            Self {
                commits,
                stats_fail: false,
                branches_fail: false,
            }
        }
    }

    impl CommitSource for FakeSource {
        fn commits(&self) -> Result<Vec<CommitRecord>> {
            Ok(self
                .commits
                .iter()
                .map(|c| CommitRecord {
                    files: vec![],
                    additions: 0,
                    deletions: 0,
                    ..c.clone()
                })
                .collect())
        }

        fn commit_stats(&self, hash: &str) -> Result<CommitStats> {
            if self.stats_fail {
                return Err(ScopeError::Git("stats unavailable".into()));
            }
            let commit = self
                .commits
                .iter()
                .find(|c| c.hash == hash)
                .ok_or_else(|| ScopeError::Git(format!("unknown commit {hash}")))?;
            Ok(CommitStats {
                additions: commit.additions,
                deletions: commit.deletions,
                files: commit.files.clone(),
            })
        }

        fn branches(&self) -> Result<Vec<String>> {
            if self.branches_fail {
                return Err(ScopeError::Git("no refs".into()));
            }
            Ok(vec!["main".into()])
        }

        fn branch_commits(&self, _branch: &str) -> Result<Vec<CommitRecord>> {
            Ok(self.commits.clone())
        }

        fn resolve_branch(&self, _hash: &str) -> Option<String> {
            Some("main".into())
        }
    }

    fn make_commit(author: &str, day: u32, files: Vec<&str>) -> CommitRecord {
        CommitRecord {
            hash: format!("hash_{author}_{day}"),
            author: author.into(),
            email: format!("{author}@example.com"),
            timestamp: format!("2024-01-{day:02}T10:00:00+00:00").parse().unwrap(),
            subject: "test".into(),
            body: String::new(),
            parents: vec![],
            files: files.into_iter().map(String::from).collect(),
            additions: 10,
            deletions: 4,
        }
    }

    fn opts() -> AnalysisOptions {
        AnalysisOptions::new("2024-03-15T12:00:00+00:00".parse().unwrap())
    }

    #[test]
    fn empty_history_is_fatal() {
        let source = FakeSource::new(vec![]);
        let result = analyze(&source, &opts());
        assert!(matches!(result, Err(ScopeError::EmptyHistory)));
    }

    #[test]
    fn pipeline_joins_all_engines() {
        let source = FakeSource::new(vec![
            make_commit("alice", 1, vec!["x.rs"]),
            make_commit("alice", 2, vec!["x.rs"]),
            make_commit("bob", 3, vec!["x.rs", "y.rs"]),
        ]);

        let stats = analyze(&source, &opts()).unwrap();
        assert_eq!(stats.repo.total_commits, 3);
        assert_eq!(stats.repo.file_touches["x.rs"], 3);
        assert_eq!(stats.repo.file_touches["y.rs"], 1);
        assert!(stats.health.is_some());
        let branches = stats.branches.unwrap();
        assert_eq!(branches.branches.len(), 1);
        assert_eq!(branches.commit_graph.len(), 3);
        assert_eq!(stats.profiles.len(), 2);
    }

    #[test]
    fn stats_failure_contributes_zeros_but_counts() {
        let mut source = FakeSource::new(vec![
            make_commit("alice", 1, vec!["x.rs"]),
            make_commit("bob", 2, vec!["y.rs"]),
        ]);
        source.stats_fail = true;

        let stats = analyze(&source, &opts()).unwrap();
        assert_eq!(stats.repo.total_commits, 2);
        assert!(stats.repo.file_touches.is_empty());
        assert_eq!(stats.repo.authors["alice <alice@example.com>"].additions, 0);
    }

    #[test]
    fn branch_failure_degrades_to_none() {
        let mut source = FakeSource::new(vec![make_commit("alice", 1, vec!["x.rs"])]);
        source.branches_fail = true;

        let stats = analyze(&source, &opts()).unwrap();
        assert!(stats.branches.is_none());
        assert_eq!(stats.repo.total_commits, 1);
    }

    #[test]
    fn repeated_runs_serialize_identically() {
        let source = FakeSource::new(vec![
            make_commit("alice", 1, vec!["x.rs"]),
            make_commit("bob", 2, vec!["x.rs", "y.rs"]),
            make_commit("carol", 3, vec!["z.rs"]),
        ]);
        let options = opts();

        let first = serde_json::to_string(&analyze(&source, &options).unwrap()).unwrap();
        let second = serde_json::to_string(&analyze(&source, &options).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
