//! Change-concentration issues.
//!
//! Flags files absorbing a disproportionate share of the repository's
//! total churn. The ratio denominator is total file touches across the
//! whole history, so the ratios of all files sum to one.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Share of total churn above which a file is always flagged.
const RATIO_FLOOR: f64 = 0.10;
/// Absolute change count above which a file is flagged regardless of ratio.
const CHANGE_FLOOR: u32 = 20;

/// How concentrated the churn on a file is.
///
/// # Examples
///
/// ```
/// use gitscope_health::ConcentrationLevel;
///
/// assert_eq!(ConcentrationLevel::Severe.to_string(), "severe");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcentrationLevel {
    /// Ratio above 0.3, or more than 50 changes.
    Severe,
    /// Ratio above 0.2, or more than 30 changes.
    High,
    /// Ratio above 0.1, or more than 20 changes.
    Moderate,
    /// Flagged but under every band threshold.
    Mild,
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationLevel::Severe => write!(f, "severe"),
            ConcentrationLevel::High => write!(f, "high"),
            ConcentrationLevel::Moderate => write!(f, "moderate"),
            ConcentrationLevel::Mild => write!(f, "mild"),
        }
    }
}

/// Blast radius of the concentrated churn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// More than 30 changes by more than 3 authors.
    High,
    /// More than 20 changes, or more than 2 authors.
    Medium,
    /// Everything else.
    Low,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactLevel::High => write!(f, "high"),
            ImpactLevel::Medium => write!(f, "medium"),
            ImpactLevel::Low => write!(f, "low"),
        }
    }
}

/// One file absorbing a disproportionate share of churn.
///
/// # Examples
///
/// ```
/// use gitscope_health::{CodeConcentrationIssue, ConcentrationLevel, ImpactLevel};
///
/// let issue = CodeConcentrationIssue {
///     file_path: "src/state.rs".into(),
///     change_count: 34,
///     change_ratio: 0.21,
///     unique_authors: 4,
///     concentration_level: ConcentrationLevel::High,
///     impact_level: ImpactLevel::High,
/// };
/// assert!(issue.change_ratio <= 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeConcentrationIssue {
    /// File path relative to repo root.
    pub file_path: String,
    /// Commits touching this file.
    pub change_count: u32,
    /// This file's share of all file touches, in [0, 1].
    pub change_ratio: f64,
    /// Distinct authors who touched this file.
    pub unique_authors: u32,
    /// Churn-share band.
    pub concentration_level: ConcentrationLevel,
    /// Blast-radius band.
    pub impact_level: ImpactLevel,
}

struct FileChurn {
    authors: HashSet<String>,
    changes: u32,
}

/// Detect change-concentration issues.
///
/// A file is flagged when its churn share exceeds 10% or its absolute
/// change count exceeds 20. Results are sorted by ratio descending (path
/// ascending on ties) and are not capped.
///
/// # Examples
///
/// ```
/// use gitscope_health::detect_concentration;
///
/// assert!(detect_concentration(&[]).is_empty());
/// ```
pub fn detect_concentration(commits: &[CommitRecord]) -> Vec<CodeConcentrationIssue> {
    let mut churn: BTreeMap<String, FileChurn> = BTreeMap::new();
    let mut total_touches: u64 = 0;

    for commit in commits {
        for file in &commit.files {
            let entry = churn.entry(file.clone()).or_insert_with(|| FileChurn {
                authors: HashSet::new(),
                changes: 0,
            });
            entry.authors.insert(commit.author.clone());
            entry.changes += 1;
            total_touches += 1;
        }
    }

    if total_touches == 0 {
        return Vec::new();
    }

    let mut issues: Vec<CodeConcentrationIssue> = churn
        .into_iter()
        .filter_map(|(path, stat)| {
            let ratio = stat.changes as f64 / total_touches as f64;
            if ratio <= RATIO_FLOOR && stat.changes <= CHANGE_FLOOR {
                return None;
            }
            Some(CodeConcentrationIssue {
                file_path: path,
                change_count: stat.changes,
                change_ratio: ratio,
                unique_authors: stat.authors.len() as u32,
                concentration_level: concentration_level(ratio, stat.changes),
                impact_level: impact_level(stat.changes, stat.authors.len()),
            })
        })
        .collect();

    issues.sort_by(|a, b| {
        b.change_ratio
            .partial_cmp(&a.change_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    issues
}

fn concentration_level(ratio: f64, changes: u32) -> ConcentrationLevel {
    if ratio > 0.3 || changes > 50 {
        ConcentrationLevel::Severe
    } else if ratio > 0.2 || changes > 30 {
        ConcentrationLevel::High
    } else if ratio > 0.1 || changes > 20 {
        ConcentrationLevel::Moderate
    } else {
        ConcentrationLevel::Mild
    }
}

fn impact_level(changes: u32, authors: usize) -> ImpactLevel {
    if changes > 30 && authors > 3 {
        ImpactLevel::High
    } else if changes > 20 || authors > 2 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}
