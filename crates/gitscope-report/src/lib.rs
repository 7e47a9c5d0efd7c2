//! Pipeline orchestration and report data assembly.
//!
//! [`analyze`] runs the three engines over one immutable commit sequence
//! and joins their results into [`Statistics`]; [`ReportData::assemble`]
//! then shapes those statistics into display-ready, deterministically
//! ordered top-N lists.

pub mod assemble;
pub mod pipeline;

pub use assemble::{ReportData, ReportOptions};
pub use pipeline::{analyze, AnalysisOptions, Statistics};
