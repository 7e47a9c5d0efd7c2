use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format for command results.
///
/// # Examples
///
/// ```
/// use gitscope_core::OutputFormat;
///
/// let f: OutputFormat = "json".parse().unwrap();
/// assert_eq!(f, OutputFormat::Json);
/// assert_eq!(OutputFormat::default(), OutputFormat::Text);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Language for report labels.
///
/// The analysis engines are language-agnostic; only the report assembler
/// consumes this, and it receives the value explicitly rather than reading
/// process-wide state.
///
/// # Examples
///
/// ```
/// use gitscope_core::Language;
///
/// let lang: Language = "zh".parse().unwrap();
/// assert_eq!(lang, Language::Zh);
/// assert_eq!(Language::default(), Language::En);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zh,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Zh => write!(f, "zh"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "chinese" => Ok(Language::Zh),
            other => Err(format!("unknown language: {other}")),
        }
    }
}
