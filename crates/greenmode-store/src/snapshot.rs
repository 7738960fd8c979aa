//! Project directory snapshot.
//!
//! Produces the `dir_structure` of the project data: entries of every
//! directory in file-name order, files as bare names, directories as
//! single-key mappings to their own entries. An entry is skipped when its
//! full path matches one of the ignore globs (shell-style, `*` crosses `/`);
//! a directory is also skipped when its path with a trailing `/` matches, so
//! `<dir>/.git/**` removes the `.git` directory itself.

use std::path::Path;

use bytesize::ByteSize;
use tracing::debug;
use walkdir::WalkDir;

use greenmode_core::glob::fnmatch;
use greenmode_core::project::DirEntry;

use crate::error::{StoreError, StoreResult};

/// Counters collected while taking a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub files: usize,
    pub dirs: usize,
    pub skipped: usize,
    pub bytes: u64,
}

impl SnapshotStats {
    pub fn size(&self) -> ByteSize {
        ByteSize::b(self.bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub dir_structure: Vec<DirEntry>,
    pub stats: SnapshotStats,
}

/// Snapshot `root`, leaving out entries that match `ignore_globs`.
pub fn snapshot(root: &Path, ignore_globs: &[String]) -> StoreResult<Snapshot> {
    if !root.is_dir() {
        return Err(StoreError::NotADirectory(root.to_path_buf()));
    }
    let mut stats = SnapshotStats::default();
    let root_str = root.to_string_lossy();
    let dir_structure = walk_dir(root, root_str.trim_end_matches('/'), ignore_globs, &mut stats)?;
    debug!(
        root = %root.display(),
        files = stats.files,
        dirs = stats.dirs,
        skipped = stats.skipped,
        size = %stats.size(),
        "project snapshot taken"
    );
    Ok(Snapshot {
        dir_structure,
        stats,
    })
}

pub(crate) fn ignored(path: &str, is_dir: bool, ignore_globs: &[String]) -> bool {
    ignore_globs.iter().any(|glob| {
        fnmatch(path, glob) || (is_dir && fnmatch(&format!("{path}/"), glob))
    })
}

fn walk_dir(
    dir: &Path,
    dir_str: &str,
    ignore_globs: &[String],
    stats: &mut SnapshotStats,
) -> StoreResult<Vec<DirEntry>> {
    let mut out = Vec::new();
    let listing = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in listing {
        let entry = entry.map_err(|source| StoreError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = format!("{dir_str}/{name}");
        let is_dir = entry.file_type().is_dir();

        if ignored(&path, is_dir, ignore_globs) {
            stats.skipped += 1;
            continue;
        }

        if is_dir {
            stats.dirs += 1;
            let children = walk_dir(entry.path(), &path, ignore_globs, stats)?;
            out.push(DirEntry::dir(name, children));
        } else {
            stats.files += 1;
            stats.bytes += entry
                .metadata()
                .map(|m| m.len())
                .unwrap_or_default();
            out.push(DirEntry::File(name));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    fn globs(root: &Path, items: &[&str]) -> Vec<String> {
        let root = root.to_string_lossy();
        items.iter().map(|g| format!("{root}/{g}")).collect()
    }

    #[test]
    fn lists_files_and_dirs_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.py", "x\n");
        touch(tmp.path(), "a.py", "y\n");
        touch(tmp.path(), "src/c.py", "z\n");

        let snap = snapshot(tmp.path(), &[]).unwrap();
        assert_eq!(
            snap.dir_structure,
            vec![
                DirEntry::File("a.py".to_string()),
                DirEntry::File("b.py".to_string()),
                DirEntry::dir("src", vec![DirEntry::File("c.py".to_string())]),
            ]
        );
        assert_eq!(snap.stats.files, 3);
        assert_eq!(snap.stats.dirs, 1);
        assert_eq!(snap.stats.bytes, 6);
    }

    #[test]
    fn ignore_globs_skip_entries() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.py", "");
        touch(tmp.path(), "a.pyc", "");
        touch(tmp.path(), "__pycache__/a.cpython.pyc", "");
        touch(tmp.path(), "pkg/b.py", "");
        touch(tmp.path(), "pkg/b.pyc", "");

        let ignore = vec!["*pycache*".to_string(), "**.pyc".to_string()];
        let snap = snapshot(tmp.path(), &ignore).unwrap();
        assert_eq!(
            snap.dir_structure,
            vec![
                DirEntry::File("a.py".to_string()),
                DirEntry::dir("pkg", vec![DirEntry::File("b.py".to_string())]),
            ]
        );
        assert_eq!(snap.stats.skipped, 3);
    }

    #[test]
    fn recursive_dir_glob_removes_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), ".git/HEAD", "ref\n");
        touch(tmp.path(), "main.py", "");

        let snap = snapshot(tmp.path(), &globs(tmp.path(), &[".git/**"])).unwrap();
        assert_eq!(snap.dir_structure, vec![DirEntry::File("main.py".to_string())]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = snapshot(&tmp.path().join("nope"), &[]).unwrap_err();
        assert!(matches!(err, StoreError::NotADirectory(_)));
    }
}
