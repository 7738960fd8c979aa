//! Error types for green mode.
//!
//! Every fallible operation in the workspace reports a `GreenError`. Higher
//! level crates (CLI) wrap it into `anyhow::Error` for display.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type GreenResult<T> = Result<T, GreenError>;

#[derive(Debug, Error)]
pub enum GreenError {
    /// Caller supplied an argument that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal consistency rule was broken.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Setting classification was asked for with an unknown trigger mode.
    #[error("invalid trigger type: {0}")]
    InvalidTrigger(String),

    /// A bear raised while a trial was being evaluated. The whole search for
    /// that bear is aborted.
    #[error("bear {bear} failed during trial: {message}")]
    Bear { bear: String, message: String },

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GreenError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn bear(bear: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Bear {
            bear: bear.into(),
            message: format!("{err:#}"),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::Serialization(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bear_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("boom").context("running LineLengthBear");
        let err = GreenError::bear("LineLengthBear", &inner);
        let text = err.to_string();
        assert!(text.contains("LineLengthBear"));
        assert!(text.contains("boom"));
    }
}
