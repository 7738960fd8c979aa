//! On-disk [`FileLister`] for glob synthesis.
//!
//! Every file is listed, dotfiles included, except entries matching the
//! lister's ignore globs. Those are the same globs the snapshot left out, so
//! the listing and the trial inputs agree on what the project holds.

use std::path::Path;

use walkdir::WalkDir;

use greenmode_core::glob::FileLister;

use crate::snapshot::ignored;

#[derive(Debug, Clone, Default)]
pub struct FsLister {
    ignore_globs: Vec<String>,
}

impl FsLister {
    pub fn new(ignore_globs: Vec<String>) -> Self {
        Self { ignore_globs }
    }

    /// Also leave out `path`, e.g. the project data file written by the run.
    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.ignore_globs.push(path.into());
        self
    }

    fn list(&self, dir: &str, max_depth: usize) -> Vec<String> {
        if !Path::new(dir).is_dir() {
            return Vec::new();
        }
        let dir = dir.trim_end_matches('/');
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let path = e.path().to_string_lossy();
                !ignored(&path, e.file_type().is_dir(), &self.ignore_globs)
            })
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_string_lossy().into_owned())
            .collect()
    }
}

impl FileLister for FsLister {
    fn list_recursive(&self, dir: &str) -> Vec<String> {
        self.list(dir, usize::MAX)
    }

    fn list_direct(&self, dir: &str) -> Vec<String> {
        self.list(dir, 1)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn lists_recursive_and_direct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("src/pkg")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("a.py"), "").unwrap();
        fs::write(root.join("src/b.py"), "").unwrap();
        fs::write(root.join("src/pkg/c.py"), "").unwrap();
        fs::write(root.join(".git/HEAD"), "").unwrap();
        fs::write(root.join(".hidden.py"), "").unwrap();

        let dir = root.to_string_lossy().into_owned();
        let lister = FsLister::new(vec![format!("{dir}/.git/**")]);
        let rec = lister.list_recursive(&dir);
        assert_eq!(
            rec,
            vec![
                format!("{dir}/.hidden.py"),
                format!("{dir}/a.py"),
                format!("{dir}/src/b.py"),
                format!("{dir}/src/pkg/c.py"),
            ]
        );
        assert_eq!(
            lister.list_direct(&dir),
            vec![format!("{dir}/.hidden.py"), format!("{dir}/a.py")]
        );
        assert!(lister.list_direct(&format!("{dir}/missing")).is_empty());
    }

    #[test]
    fn excluded_paths_are_not_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.py"), "").unwrap();
        fs::write(root.join(".project_data.yaml"), "").unwrap();

        let dir = root.to_string_lossy().into_owned();
        let lister = FsLister::default().excluding(format!("{dir}/.project_data.yaml"));
        assert_eq!(lister.list_recursive(&dir), vec![format!("{dir}/a.py")]);
    }
}
