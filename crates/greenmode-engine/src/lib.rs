//! greenmode-engine
//!
//! Green mode proper: given a project and a set of bears, find the setting
//! values every bear is green with and turn them into config sections.
//! - `languages`: splitting project files by language
//! - `kwargs`: candidate values per setting
//! - `search` / `pool`: trial passes, sequential or on a worker pool
//! - `sections`: sections and file globs from aggregated records
//! - `pipeline`: the end-to-end run over a project directory

pub mod kwargs;
pub mod languages;
pub mod pipeline;
pub mod pool;
pub mod search;
pub mod sections;

pub use crate::pipeline::{Diagnostic, DiagnosticLevel, GreenMode, GreenReport, RunStats};
pub use crate::search::{BearOutcome, SearchEngine};
pub use crate::sections::{GreenSections, Section};
