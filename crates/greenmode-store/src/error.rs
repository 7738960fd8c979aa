use std::path::PathBuf;

use greenmode_core::GreenError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid project data in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for GreenError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { path, source } => GreenError::io(path, source),
            StoreError::NotADirectory(path) => {
                GreenError::invalid_argument(format!("not a directory: {}", path.display()))
            }
            other => GreenError::serialization(other),
        }
    }
}
