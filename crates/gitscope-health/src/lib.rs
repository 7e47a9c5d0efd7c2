//! Code health risk signals from per-file change history.
//!
//! Four independent signal families — technical-debt hotspots, stability
//! indicators, refactoring pressure, and change concentration — plus one
//! composite health score in [0, 1]. Each family builds its own per-file
//! statistics from the same read-only commit sequence; none of them share
//! mutable state, and none of them can fail: classification is total over
//! already-validated in-memory data.

pub mod concentration;
pub mod hotspots;
pub mod refactoring;
pub mod stability;

use chrono::{DateTime, FixedOffset};
use gitscope_core::Language;
use gitscope_history::CommitRecord;
use serde::{Deserialize, Serialize};

pub use concentration::{detect_concentration, CodeConcentrationIssue, ConcentrationLevel, ImpactLevel};
pub use hotspots::{detect_hotspots, DebtReason, TechnicalDebtHotspot};
pub use refactoring::{detect_refactoring, RefactoringSignal, SignalStrength};
pub use stability::{assess_stability, StabilityIndicator, StabilityLevel};

/// Score deduction per technical-debt hotspot.
const HOTSPOT_PENALTY: f64 = 0.05;
/// Score deduction per refactoring signal.
const REFACTOR_PENALTY: f64 = 0.08;
/// Score deduction per concentration issue.
const CONCENTRATION_PENALTY: f64 = 0.10;
/// Score deduction per file in one of the two worst stability bands.
const INSTABILITY_PENALTY: f64 = 0.03;

/// Parameters for a health analysis run.
///
/// The reference time and recency windows are explicit so that analyses
/// are reproducible — no component reads the wall clock on its own.
///
/// # Examples
///
/// ```
/// use gitscope_health::HealthOptions;
///
/// let opts = HealthOptions::new("2024-03-15T12:00:00+00:00".parse().unwrap());
/// assert_eq!(opts.refactor_window_days, 7);
/// assert_eq!(opts.max_hotspots, 10);
/// ```
#[derive(Debug, Clone)]
pub struct HealthOptions {
    /// "Now" for all recency judgments.
    pub reference_time: DateTime<FixedOffset>,
    /// Trailing window for refactoring-pressure detection (default: 7).
    pub refactor_window_days: i64,
    /// Cap on reported hotspots (default: 10).
    pub max_hotspots: usize,
    /// Cap on reported stability indicators (default: 15).
    pub max_stability: usize,
    /// Language for the human-readable summary (default: English).
    pub language: Language,
}

impl HealthOptions {
    /// Default thresholds anchored at `reference_time`.
    pub fn new(reference_time: DateTime<FixedOffset>) -> Self {
        Self {
            reference_time,
            refactor_window_days: 7,
            max_hotspots: 10,
            max_stability: 15,
            language: Language::default(),
        }
    }
}

/// Qualitative health band derived from the composite score.
///
/// # Examples
///
/// ```
/// use gitscope_health::HealthLevel;
///
/// assert_eq!(HealthLevel::from_score(0.85), HealthLevel::Healthy);
/// assert_eq!(HealthLevel::from_score(0.1), HealthLevel::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    /// Score >= 0.8.
    Healthy,
    /// Score >= 0.6.
    Moderate,
    /// Score >= 0.4.
    Poor,
    /// Everything below.
    Critical,
}

impl HealthLevel {
    /// Map a composite score to its band.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            HealthLevel::Healthy
        } else if score >= 0.6 {
            HealthLevel::Moderate
        } else if score >= 0.4 {
            HealthLevel::Poor
        } else {
            HealthLevel::Critical
        }
    }
}

/// All code-health analysis results for one repository snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHealthMetrics {
    /// Files with elevated technical-debt risk, highest risk first.
    pub technical_debt_hotspots: Vec<TechnicalDebtHotspot>,
    /// File stability metrics, most volatile first.
    pub stability_indicators: Vec<StabilityIndicator>,
    /// Files under recent intensive modification, busiest first.
    pub refactoring_signals: Vec<RefactoringSignal>,
    /// Files absorbing a disproportionate share of churn, largest first.
    pub code_concentration_issues: Vec<CodeConcentrationIssue>,
    /// Composite score in [0, 1]; higher is healthier.
    pub health_score: f64,
    /// Qualitative band for the score.
    pub health_level: HealthLevel,
    /// Human-readable one-paragraph summary.
    pub health_summary: String,
}

/// Run all four signal families and compute the composite score.
///
/// Infallible: an empty or degenerate history yields empty signal lists
/// and a perfect score rather than an error — emptiness is the
/// aggregation engine's concern.
///
/// # Examples
///
/// ```
/// use gitscope_health::{analyze, HealthOptions};
///
/// let opts = HealthOptions::new("2024-03-15T12:00:00+00:00".parse().unwrap());
/// let metrics = analyze(&[], &opts);
/// assert_eq!(metrics.health_score, 1.0);
/// assert!(metrics.technical_debt_hotspots.is_empty());
/// ```
pub fn analyze(commits: &[CommitRecord], options: &HealthOptions) -> CodeHealthMetrics {
    let hotspots = detect_hotspots(commits, options.max_hotspots);
    let stability = assess_stability(commits, options.max_stability);
    let refactoring = detect_refactoring(
        commits,
        options.reference_time,
        options.refactor_window_days,
    );
    let concentration = detect_concentration(commits);

    let unstable_files = stability
        .iter()
        .filter(|s| {
            matches!(
                s.stability_level,
                StabilityLevel::HighlyUnstable | StabilityLevel::Unstable
            )
        })
        .count();

    let health_score = composite_score(
        hotspots.len(),
        refactoring.len(),
        concentration.len(),
        unstable_files,
    );
    let health_level = HealthLevel::from_score(health_score);
    let health_summary = summary(
        health_score,
        health_level,
        hotspots.len(),
        refactoring.len(),
        concentration.len(),
        options.language,
    );

    CodeHealthMetrics {
        technical_debt_hotspots: hotspots,
        stability_indicators: stability,
        refactoring_signals: refactoring,
        code_concentration_issues: concentration,
        health_score,
        health_level,
        health_summary,
    }
}

/// Composite score: start at 1.0, subtract per finding, clamp to [0, 1].
fn composite_score(
    hotspots: usize,
    signals: usize,
    issues: usize,
    unstable_files: usize,
) -> f64 {
    let score = 1.0
        - hotspots as f64 * HOTSPOT_PENALTY
        - signals as f64 * REFACTOR_PENALTY
        - issues as f64 * CONCENTRATION_PENALTY
        - unstable_files as f64 * INSTABILITY_PENALTY;
    score.clamp(0.0, 1.0)
}

fn summary(
    score: f64,
    level: HealthLevel,
    hotspots: usize,
    signals: usize,
    issues: usize,
    language: Language,
) -> String {
    match language {
        Language::En => {
            let (label, description) = match level {
                HealthLevel::Healthy => ("healthy", "code quality is good and maintainable"),
                HealthLevel::Moderate => {
                    ("moderate", "some quality issues deserve attention")
                }
                HealthLevel::Poor => ("poor", "quality issues are piling up"),
                HealthLevel::Critical => ("critical", "urgent refactoring is advised"),
            };
            format!(
                "Code health: {label} ({:.0}/100) - {description}. \
                 Found {hotspots} technical-debt hotspots, {signals} refactoring signals, \
                 {issues} concentration issues.",
                score * 100.0
            )
        }
        Language::Zh => {
            let (label, description) = match level {
                HealthLevel::Healthy => ("健康", "代码质量良好，维护性强"),
                HealthLevel::Moderate => ("中等", "存在一些质量问题，建议关注"),
                HealthLevel::Poor => ("较差", "代码质量问题较多，需要改进"),
                HealthLevel::Critical => ("差", "代码质量堪忧，急需重构"),
            };
            format!(
                "代码健康等级：{label}（{:.0}分）- {description}。\
                 发现{hotspots}个技术债务热点，{signals}个重构信号，{issues}个代码集中度问题。",
                score * 100.0
            )
        }
    }
}
