//! Commit history access for gitscope.
//!
//! Defines the immutable [`CommitRecord`] data model, the [`CommitSource`]
//! trait through which the analysis engines consume history, and
//! [`GitRepository`], a git2-backed implementation of that trait.

pub mod git;
pub mod record;
pub mod source;

pub use git::GitRepository;
pub use record::{CommitRecord, CommitStats};
pub use source::CommitSource;
