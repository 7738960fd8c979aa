//! greenmode-plugins
//!
//! The bear interface and everything that inspects bears without running a
//! search:
//! - `plugin`: the `Bear` trait, call signatures and trial inputs
//! - `introspect`: signature helpers (all args, defaults, decorator unwrapping)
//! - `settings`: setting classification and the setting-type table
//! - `registry` / `spec`: bear metadata and lookup by language
//! - `builtin`: bears, the quickstart fact scanner and the ignore-marker provider

pub mod introspect;
pub mod plugin;
pub mod registry;
pub mod settings;
pub mod spec;

#[cfg(feature = "builtin")]
pub mod builtin;

pub use crate::plugin::{Bear, BearKind, Entry, TrialInput};
pub use crate::registry::BearRegistry;
pub use crate::spec::BearSpec;
