//! Built-in bears, ignore-marker provider and project fact scanner.
//!
//! The built-in set is small and self-contained so that green mode can run
//! without external analysis plugins; hosts register their own bears next to
//! (or instead of) these.

#![cfg(feature = "builtin")]

use std::sync::Arc;

use anyhow::Result;

use crate::registry::BearRegistry;
use crate::spec::BearSpec;

pub mod bears;
pub mod ignore_markers;
pub mod quickstart;

pub use bears::{DuplicateContentBear, LineCountBear, LineLengthBear, SpaceConsistencyBear};
pub use ignore_markers::MarkerIgnoreProvider;
pub use quickstart::{FileFacts, QuickstartBear};

/// Register every built-in bear.
pub fn register(registry: &mut BearRegistry) -> Result<()> {
    registry.register(
        BearSpec::new(LineLengthBear::NAME)
            .language("all")
            .detects("Formatting")
            .meta("category", "style"),
        Arc::new(LineLengthBear),
    )?;
    registry.register(
        BearSpec::new(LineCountBear::NAME)
            .language("all")
            .detects("Formatting")
            .meta("category", "size"),
        Arc::new(LineCountBear),
    )?;
    registry.register(
        BearSpec::new(SpaceConsistencyBear::NAME)
            .language("all")
            .detects("Formatting")
            .meta("category", "style"),
        Arc::new(SpaceConsistencyBear),
    )?;
    registry.register(
        BearSpec::new(DuplicateContentBear::NAME)
            .language("all")
            .detects("Duplication")
            .meta("category", "project"),
        Arc::new(DuplicateContentBear),
    )?;
    Ok(())
}

/// Registry holding the built-in bears only.
pub fn default_registry() -> Result<BearRegistry> {
    let mut registry = BearRegistry::new();
    register(&mut registry)?;
    Ok(registry)
}
