//! Loading file contents for trials.

use std::fs;

use bytesize::ByteSize;
use tracing::debug;

use greenmode_core::model::{split_lines, FileDict};

use crate::error::{StoreError, StoreResult};

/// Read every file into a [`FileDict`], lines keeping their terminators.
///
/// Files that are not valid UTF-8 are decoded lossily.
pub fn load_file_dict(paths: &[String]) -> StoreResult<FileDict> {
    let mut out = FileDict::new();
    let mut bytes = 0u64;
    for path in paths {
        let raw = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        bytes += raw.len() as u64;
        let text = String::from_utf8_lossy(&raw);
        out.insert(path.clone(), split_lines(&text));
    }
    debug!(files = out.len(), size = %ByteSize::b(bytes), "file contents loaded");
    Ok(out)
}
