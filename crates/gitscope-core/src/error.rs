/// Errors that can occur across the gitscope workspace.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette::Report` at the boundary.
///
/// Only two conditions are fatal for a whole analysis: a repository whose
/// history cannot be read at all ([`ScopeError::Git`] from the commit list)
/// and a history with zero commits ([`ScopeError::EmptyHistory`]). Per-commit
/// and per-branch failures are absorbed by the component that detects them.
///
/// # Examples
///
/// ```
/// use gitscope_core::ScopeError;
///
/// let err = ScopeError::Config("missing language".into());
/// assert!(err.to_string().contains("missing language"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    Git(String),

    /// The repository has no commits, so no statistics exist.
    #[error("no commits found in repository")]
    EmptyHistory,

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
