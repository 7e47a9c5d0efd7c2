use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScopeError;
use crate::types::Language;

/// Top-level configuration loaded from `.gitscope.toml`.
///
/// CLI flags override config values, which override the built-in defaults.
///
/// # Examples
///
/// ```
/// use gitscope_core::ScopeConfig;
///
/// let config = ScopeConfig::default();
/// assert_eq!(config.analysis.refactor_window_days, 7);
/// assert_eq!(config.report.top_authors, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Heuristic thresholds and recency windows.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Report shaping settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl ScopeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Io`] if the file cannot be read, or
    /// [`ScopeError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitscope_core::ScopeConfig;
    /// use std::path::Path;
    ///
    /// let config = ScopeConfig::from_file(Path::new(".gitscope.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ScopeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitscope_core::ScopeConfig;
    ///
    /// let toml = r#"
    /// [report]
    /// top_authors = 5
    /// "#;
    /// let config = ScopeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.report.top_authors, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ScopeError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Recency windows and caps used by the analysis engines.
///
/// Windows are explicit parameters rather than hidden wall-clock reads so
/// that analyses are reproducible under a pinned reference time.
///
/// # Examples
///
/// ```
/// use gitscope_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.branch_activity_days, 30);
/// assert_eq!(config.max_hotspots, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A branch counts as active if its newest commit is within this many
    /// days of the reference time (default: 30).
    #[serde(default = "default_branch_activity_days")]
    pub branch_activity_days: i64,
    /// Trailing window for refactoring-pressure detection (default: 7).
    #[serde(default = "default_refactor_window_days")]
    pub refactor_window_days: i64,
    /// Maximum technical-debt hotspots to report (default: 10).
    #[serde(default = "default_max_hotspots")]
    pub max_hotspots: usize,
    /// Maximum stability indicators to report (default: 15).
    #[serde(default = "default_max_stability")]
    pub max_stability: usize,
}

fn default_branch_activity_days() -> i64 {
    30
}

fn default_refactor_window_days() -> i64 {
    7
}

fn default_max_hotspots() -> usize {
    10
}

fn default_max_stability() -> usize {
    15
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            branch_activity_days: default_branch_activity_days(),
            refactor_window_days: default_refactor_window_days(),
            max_hotspots: default_max_hotspots(),
            max_stability: default_max_stability(),
        }
    }
}

/// Report shaping configuration.
///
/// # Examples
///
/// ```
/// use gitscope_core::{Language, ReportConfig};
///
/// let config = ReportConfig::default();
/// assert_eq!(config.language, Language::En);
/// assert_eq!(config.top_files, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Language for report labels (default: English).
    #[serde(default)]
    pub language: Language,
    /// Number of top contributors to list (default: 10).
    #[serde(default = "default_top_authors")]
    pub top_authors: usize,
    /// Number of most-modified files to list (default: 10).
    #[serde(default = "default_top_files")]
    pub top_files: usize,
    /// Number of most-active hours to list (default: 5).
    #[serde(default = "default_top_hours")]
    pub top_hours: usize,
}

fn default_top_authors() -> usize {
    10
}

fn default_top_files() -> usize {
    10
}

fn default_top_hours() -> usize {
    5
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            top_authors: default_top_authors(),
            top_files: default_top_files(),
            top_hours: default_top_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = ScopeConfig::default();
        assert_eq!(config.analysis.branch_activity_days, 30);
        assert_eq!(config.analysis.refactor_window_days, 7);
        assert_eq!(config.analysis.max_hotspots, 10);
        assert_eq!(config.analysis.max_stability, 15);
        assert_eq!(config.report.language, Language::En);
        assert_eq!(config.report.top_authors, 10);
        assert_eq!(config.report.top_files, 10);
        assert_eq!(config.report.top_hours, 5);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[analysis]
refactor_window_days = 14
"#;
        let config = ScopeConfig::from_toml(toml).unwrap();
        assert_eq!(config.analysis.refactor_window_days, 14);
        // Unset fields keep their defaults
        assert_eq!(config.analysis.branch_activity_days, 30);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[analysis]
branch_activity_days = 60
refactor_window_days = 7
max_hotspots = 5
max_stability = 8

[report]
language = "zh"
top_authors = 3
top_files = 20
top_hours = 24
"#;
        let config = ScopeConfig::from_toml(toml).unwrap();
        assert_eq!(config.analysis.branch_activity_days, 60);
        assert_eq!(config.analysis.max_hotspots, 5);
        assert_eq!(config.report.language, Language::Zh);
        assert_eq!(config.report.top_files, 20);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ScopeConfig::from_toml("").unwrap();
        assert_eq!(config.analysis.max_hotspots, 10);
        assert_eq!(config.report.top_authors, 10);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = ScopeConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }
}
