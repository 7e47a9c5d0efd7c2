//! Display-ready report data.
//!
//! Turns joined [`Statistics`](crate::Statistics) into deterministically
//! ordered top-N lists with localized section labels. No rendering happens
//! here; text and JSON presentation belong to the binary.

use gitscope_core::{Language, ReportConfig};
use gitscope_health::CodeHealthMetrics;
use gitscope_stats::DeveloperProfile;
use gitscope_topology::BranchData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Statistics;

/// Report shaping parameters.
///
/// # Examples
///
/// ```
/// use gitscope_report::ReportOptions;
///
/// let opts = ReportOptions::default();
/// assert_eq!(opts.top_authors, 10);
/// assert_eq!(opts.top_hours, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Language for section labels.
    pub language: Language,
    /// Contributors to list.
    pub top_authors: usize,
    /// Most-modified files to list.
    pub top_files: usize,
    /// Most-active hours to list.
    pub top_hours: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportConfig::default().into()
    }
}

impl From<ReportConfig> for ReportOptions {
    fn from(config: ReportConfig) -> Self {
        Self {
            language: config.language,
            top_authors: config.top_authors,
            top_files: config.top_files,
            top_hours: config.top_hours,
        }
    }
}

/// Localized section headings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLabels {
    pub overview: String,
    pub contributors: String,
    pub files: String,
    pub activity: String,
    pub health: String,
    pub branches: String,
    pub profiles: String,
}

impl SectionLabels {
    fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                overview: "Repository overview".into(),
                contributors: "Top contributors".into(),
                files: "Most modified files".into(),
                activity: "Activity patterns".into(),
                health: "Code health".into(),
                branches: "Branch topology".into(),
                profiles: "Developer profiles".into(),
            },
            Language::Zh => Self {
                overview: "仓库概览".into(),
                contributors: "主要贡献者".into(),
                files: "修改最频繁的文件".into(),
                activity: "活动模式".into(),
                health: "代码健康度".into(),
                branches: "分支拓扑".into(),
                profiles: "开发者画像".into(),
            },
        }
    }
}

/// One contributor line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorEntry {
    pub name: String,
    pub email: String,
    pub commit_count: u32,
    pub additions: u64,
    pub deletions: u64,
}

/// One most-modified-file line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    pub touches: u32,
}

/// One most-active-hour line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourEntry {
    /// Hour of day, 0–23, in each author's local clock.
    pub hour: u32,
    pub commits: u32,
}

/// Everything a renderer needs, already sorted and truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Localized section headings.
    pub labels: SectionLabels,
    /// Total ingested commits.
    pub total_commits: usize,
    /// Oldest commit, RFC 3339.
    pub first_commit: String,
    /// Newest commit, RFC 3339.
    pub last_commit: String,
    /// Distinct calendar days with commits.
    pub active_days: usize,
    /// Distinct ISO weeks with commits.
    pub active_weeks: usize,
    /// Distinct calendar months with commits.
    pub active_months: usize,
    /// Top contributors, most commits first.
    pub top_authors: Vec<AuthorEntry>,
    /// Most-modified files, most touches first.
    pub top_files: Vec<FileEntry>,
    /// Most-active hours, most commits first.
    pub top_hours: Vec<HourEntry>,
    /// Commits per weekday, Monday first.
    pub weekday: [u32; 7],
    /// Commits per calendar day, keyed `YYYY-MM-DD`.
    pub commit_frequency: BTreeMap<String, u32>,
    /// Health metrics pass-through.
    pub health: Option<CodeHealthMetrics>,
    /// Branch topology pass-through.
    pub branches: Option<BranchData>,
    /// Work-style profiles, most commits first.
    pub profiles: Vec<DeveloperProfile>,
}

impl ReportData {
    /// Shape joined statistics into display-ready lists.
    ///
    /// All orderings break ties deterministically (author key, file path,
    /// hour index), so assembling the same statistics twice yields
    /// byte-identical serialized output.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use chrono::Utc;
    /// use gitscope_history::GitRepository;
    /// use gitscope_report::{analyze, AnalysisOptions, ReportData, ReportOptions};
    ///
    /// let repo = GitRepository::open(Path::new(".")).unwrap();
    /// let stats = analyze(&repo, &AnalysisOptions::new(Utc::now().fixed_offset())).unwrap();
    /// let report = ReportData::assemble(&stats, &ReportOptions::default());
    /// println!("{}", report.total_commits);
    /// ```
    pub fn assemble(stats: &Statistics, options: &ReportOptions) -> Self {
        let repo = &stats.repo;

        let mut top_authors: Vec<(&String, AuthorEntry)> = repo
            .authors
            .iter()
            .map(|(key, stat)| {
                (
                    key,
                    AuthorEntry {
                        name: stat.name.clone(),
                        email: stat.email.clone(),
                        commit_count: stat.commit_count,
                        additions: stat.additions,
                        deletions: stat.deletions,
                    },
                )
            })
            .collect();
        top_authors.sort_by(|(a_key, a), (b_key, b)| {
            b.commit_count
                .cmp(&a.commit_count)
                .then_with(|| a_key.cmp(b_key))
        });
        let top_authors: Vec<AuthorEntry> = top_authors
            .into_iter()
            .take(options.top_authors)
            .map(|(_, entry)| entry)
            .collect();

        let mut top_files: Vec<FileEntry> = repo
            .file_touches
            .iter()
            .map(|(path, touches)| FileEntry {
                path: path.clone(),
                touches: *touches,
            })
            .collect();
        top_files.sort_by(|a, b| b.touches.cmp(&a.touches).then_with(|| a.path.cmp(&b.path)));
        top_files.truncate(options.top_files);

        let mut top_hours: Vec<HourEntry> = repo
            .time
            .hourly
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(hour, count)| HourEntry {
                hour: hour as u32,
                commits: *count,
            })
            .collect();
        top_hours.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.hour.cmp(&b.hour)));
        top_hours.truncate(options.top_hours);

        ReportData {
            labels: SectionLabels::for_language(options.language),
            total_commits: repo.total_commits,
            first_commit: repo.time.first_commit.to_rfc3339(),
            last_commit: repo.time.last_commit.to_rfc3339(),
            active_days: repo.time.active_days,
            active_weeks: repo.time.active_weeks,
            active_months: repo.time.active_months,
            top_authors,
            top_files,
            top_hours,
            weekday: repo.time.weekday,
            commit_frequency: repo.commit_frequency.clone(),
            health: stats.health.clone(),
            branches: stats.branches.clone(),
            profiles: stats.profiles.clone(),
        }
    }
}
