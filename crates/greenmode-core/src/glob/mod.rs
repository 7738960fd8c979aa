//! Glob matching, glob synthesis and filename affix detection.

pub mod affixes;
pub mod pattern;
pub mod synth;

pub use affixes::{common_affixes, Affixes};
pub use pattern::{fnmatch, glob_match, matches_any};
pub use synth::{FileLister, GlobSet, GlobSynthesizer};
