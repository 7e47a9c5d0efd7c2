//! Contribution and time statistics over a commit sequence.
//!
//! One pass over the history produces per-author statistics, per-file touch
//! counts, a date frequency map, and hour/weekday activity histograms. A
//! second, sort-free normalization pass derives the time summary. The
//! supplemental [`profile`] module classifies per-author work styles from
//! the same data.

pub mod aggregate;
pub mod profile;

pub use aggregate::{aggregate, AuthorStat, RepoStats, TimeStat};
pub use profile::{analyze_profiles, DeveloperProfile, WorkStyle};
