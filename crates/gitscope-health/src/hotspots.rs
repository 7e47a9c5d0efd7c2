//! Technical-debt hotspot detection.
//!
//! A hotspot is a file changed often and by many hands. The risk score
//! weighs modification frequency at 60% and author diversity at 40%, each
//! saturating at a fixed ceiling.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, FixedOffset};
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

/// Changes at which the frequency sub-score saturates.
const CHANGE_SATURATION: f64 = 20.0;
/// Authors at which the diversity sub-score saturates.
const AUTHOR_SATURATION: f64 = 5.0;
/// Minimum changes before a file is considered at all.
const MIN_CHANGES: u32 = 3;
/// Risk score below which a file is not reported.
const RISK_FLOOR: f64 = 0.3;

/// Why a file was classified as a hotspot.
///
/// # Examples
///
/// ```
/// use gitscope_health::DebtReason;
///
/// assert_eq!(DebtReason::MultiAuthor.to_string(), "multi-author");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebtReason {
    /// More than 15 recorded changes.
    FrequentChanges,
    /// More than 3 distinct authors.
    MultiAuthor,
    /// Risk score above 0.7.
    HighRisk,
    /// Past the floor without tripping a specific threshold.
    LatentDebt,
}

impl fmt::Display for DebtReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtReason::FrequentChanges => write!(f, "frequent changes"),
            DebtReason::MultiAuthor => write!(f, "multi-author"),
            DebtReason::HighRisk => write!(f, "high risk"),
            DebtReason::LatentDebt => write!(f, "latent debt"),
        }
    }
}

/// A file with elevated technical-debt risk.
///
/// # Examples
///
/// ```
/// use gitscope_health::{DebtReason, TechnicalDebtHotspot};
///
/// let hotspot = TechnicalDebtHotspot {
///     file_path: "src/session.rs".into(),
///     modification_freq: 18,
///     unique_authors: 4,
///     risk_score: 0.86,
///     last_modified: "2024-03-01T10:30:00+00:00".parse().unwrap(),
///     reasons: vec![DebtReason::FrequentChanges, DebtReason::MultiAuthor],
/// };
/// assert!(hotspot.risk_score <= 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDebtHotspot {
    /// File path relative to repo root.
    pub file_path: String,
    /// Number of commits touching this file.
    pub modification_freq: u32,
    /// Distinct authors who touched this file.
    pub unique_authors: u32,
    /// Bounded risk score in [0, 1].
    pub risk_score: f64,
    /// Timestamp of the most recent change.
    pub last_modified: DateTime<FixedOffset>,
    /// Reason tags for the classification.
    pub reasons: Vec<DebtReason>,
}

struct FileActivity {
    authors: HashSet<String>,
    changes: u32,
    last_modified: DateTime<FixedOffset>,
}

/// Detect technical-debt hotspots.
///
/// Files with fewer than 3 changes are ignored; surviving files are scored,
/// filtered at `risk > 0.3`, sorted by risk descending (path ascending on
/// ties), and capped at `max_results`.
///
/// # Examples
///
/// ```
/// use gitscope_health::detect_hotspots;
///
/// let hotspots = detect_hotspots(&[], 10);
/// assert!(hotspots.is_empty());
/// ```
pub fn detect_hotspots(commits: &[CommitRecord], max_results: usize) -> Vec<TechnicalDebtHotspot> {
    let mut activity: BTreeMap<String, FileActivity> = BTreeMap::new();

    for commit in commits {
        for file in &commit.files {
            let entry = activity.entry(file.clone()).or_insert_with(|| FileActivity {
                authors: HashSet::new(),
                changes: 0,
                last_modified: commit.timestamp,
            });
            entry.authors.insert(commit.author.clone());
            entry.changes += 1;
            if commit.timestamp > entry.last_modified {
                entry.last_modified = commit.timestamp;
            }
        }
    }

    let mut hotspots: Vec<TechnicalDebtHotspot> = activity
        .into_iter()
        .filter(|(_, stat)| stat.changes >= MIN_CHANGES)
        .filter_map(|(path, stat)| {
            let risk = risk_score(stat.changes, stat.authors.len());
            if risk <= RISK_FLOOR {
                return None;
            }
            Some(TechnicalDebtHotspot {
                file_path: path,
                modification_freq: stat.changes,
                unique_authors: stat.authors.len() as u32,
                risk_score: risk,
                last_modified: stat.last_modified,
                reasons: reasons(stat.changes, stat.authors.len(), risk),
            })
        })
        .collect();

    hotspots.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    hotspots.truncate(max_results);
    hotspots
}

fn risk_score(changes: u32, authors: usize) -> f64 {
    let frequency = (changes as f64 / CHANGE_SATURATION).min(1.0);
    let diversity = (authors as f64 / AUTHOR_SATURATION).min(1.0);
    (frequency * 0.6 + diversity * 0.4).clamp(0.0, 1.0)
}

fn reasons(changes: u32, authors: usize, risk: f64) -> Vec<DebtReason> {
    let mut tags = Vec::new();
    if changes > 15 {
        tags.push(DebtReason::FrequentChanges);
    }
    if authors > 3 {
        tags.push(DebtReason::MultiAuthor);
    }
    if risk > 0.7 {
        tags.push(DebtReason::HighRisk);
    }
    if tags.is_empty() {
        tags.push(DebtReason::LatentDebt);
    }
    tags
}
