//! Core types, configuration, and error handling for gitscope.
//!
//! This crate provides the shared foundation used by all other gitscope
//! crates:
//! - [`ScopeError`] — unified error type using `thiserror`
//! - [`ScopeConfig`] — configuration loaded from `.gitscope.toml`
//! - Shared types: [`OutputFormat`], [`Language`]

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, ReportConfig, ScopeConfig};
pub use error::ScopeError;
pub use types::{Language, OutputFormat};

/// A convenience `Result` type for gitscope operations.
pub type Result<T> = std::result::Result<T, ScopeError>;
