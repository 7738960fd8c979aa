//! Glob synthesis.
//!
//! Given the concrete list of files that share one setting combination, find
//! a short list of include globs plus an ignore list that reproduces it. The
//! input files are arranged in a directory tree and every directory is
//! compared with what is really on disk:
//!
//! 1. `dir/**` when the subtree covers enough of the real recursive listing;
//!    the subtree is then done.
//! 2. otherwise `dir/**.ext` for each extension that clears the same test;
//!    descendants skip those extensions.
//! 3. `dir/*` against the direct listing, otherwise `dir/*.ext`.
//! 4. recurse into child directories.
//!
//! Files whose extension an ancestor already promoted are considered covered,
//! so a directory holding only such files is skipped.
//!
//! "Enough" means the covered fraction reaches `coverage_ratio`, or at most
//! `max_ignore_files` real files are left uncovered. Uncovered files go to
//! the ignore list.

use std::collections::BTreeSet;

use crate::glob::pattern::glob_match;

/// Source of the real on-disk listing of a directory.
///
/// Paths are returned as `dir/relative/path` with `/` separators, in the same
/// form the synthesizer builds for the input files.
pub trait FileLister {
    /// Every file below `dir`, recursively.
    fn list_recursive(&self, dir: &str) -> Vec<String>;
    /// Files directly inside `dir`.
    fn list_direct(&self, dir: &str) -> Vec<String>;
}

/// Include globs plus the files to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobSet {
    pub globs: Vec<String>,
    pub ignore: Vec<String>,
}

#[derive(Debug, Default)]
struct DirNode {
    name: String,
    children: Vec<DirNode>,
}

impl DirNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn insert(&mut self, parts: &[&str]) {
        let Some((first, rest)) = parts.split_first() else {
            return;
        };
        let idx = match self.children.iter().position(|c| c.name == *first) {
            Some(idx) => idx,
            None => {
                self.children.push(DirNode::named(first));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(rest);
    }

    /// Every leaf below this node as `prefix/...`.
    fn files(&self, prefix: &str, out: &mut Vec<String>) {
        for child in &self.children {
            let path = format!("{prefix}/{}", child.name);
            if child.is_leaf() {
                out.push(path);
            } else {
                child.files(&path, out);
            }
        }
    }

    /// Leaves directly below this node as `prefix/name`.
    fn direct_files(&self, prefix: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|c| c.is_leaf())
            .map(|c| format!("{prefix}/{}", c.name))
            .collect()
    }
}

/// Extension including the dot, or `""` (`a/b.tar.gz` → `.gz`, `a/.rc` → `""`).
fn extension(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(idx) if !base[..idx].chars().all(|c| c == '.') => &base[idx..],
        _ => "",
    }
}

/// Group paths by extension, keeping first-seen extension order.
fn by_extension(paths: &[String]) -> Vec<(&str, Vec<&String>)> {
    let mut groups: Vec<(&str, Vec<&String>)> = Vec::new();
    for path in paths {
        let ext = extension(path);
        match groups.iter_mut().find(|(e, _)| *e == ext) {
            Some((_, items)) => items.push(path),
            None => groups.push((ext, vec![path])),
        }
    }
    groups
}

fn is_handled(path: &str, handled: &[String]) -> bool {
    let ext = extension(path);
    !ext.is_empty() && handled.iter().any(|h| h == ext)
}

/// Result of comparing the files a glob would cover with the real listing.
struct Coverage {
    real: usize,
    covered: usize,
    uncovered: Vec<String>,
}

impl Coverage {
    fn measure<'a>(real: impl IntoIterator<Item = &'a String>, section: &BTreeSet<&str>) -> Self {
        let mut out = Coverage {
            real: 0,
            covered: 0,
            uncovered: Vec::new(),
        };
        for file in real {
            out.real += 1;
            if section.contains(file.as_str()) {
                out.covered += 1;
            } else {
                out.uncovered.push(file.clone());
            }
        }
        out
    }
}

/// Greedy glob synthesizer over an injected [`FileLister`].
pub struct GlobSynthesizer<'a, L: FileLister + ?Sized> {
    lister: &'a L,
    max_ignore_files: usize,
    coverage_ratio: f64,
}

struct Walk {
    files: Vec<String>,
    ignore: Vec<String>,
}

impl Walk {
    /// Replace every entry the new glob subsumes by the glob itself.
    fn promote(&mut self, glob: String, uncovered: Vec<String>) {
        self.files.retain(|entry| !subsumes(&glob, entry));
        self.files.push(glob);
        for file in uncovered {
            if !self.ignore.contains(&file) {
                self.ignore.push(file);
            }
        }
    }
}

/// A recursive entry can only be subsumed by another recursive glob.
fn subsumes(glob: &str, entry: &str) -> bool {
    if entry.contains("**") && !glob.contains("**") {
        return false;
    }
    glob_match(entry, glob)
}

impl<'a, L: FileLister + ?Sized> GlobSynthesizer<'a, L> {
    pub fn new(lister: &'a L, max_ignore_files: usize, coverage_ratio: f64) -> Self {
        Self {
            lister,
            max_ignore_files,
            coverage_ratio,
        }
    }

    fn clears(&self, c: &Coverage) -> bool {
        if c.real == 0 {
            return false;
        }
        c.covered as f64 / c.real as f64 >= self.coverage_ratio
            || c.uncovered.len() <= self.max_ignore_files
    }

    /// Synthesize globs for `files`, all located under `project_dir`.
    ///
    /// Files outside `project_dir` are passed through untouched.
    pub fn synthesize(&self, files: &[String], project_dir: &str) -> GlobSet {
        let root_path = project_dir.trim_end_matches('/');
        let mut root = DirNode::named(root_path);
        for file in files {
            let Some(rel) = file
                .strip_prefix(root_path)
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                continue;
            };
            let parts: Vec<&str> = rel.split('/').filter(|p| !p.is_empty()).collect();
            root.insert(&parts);
        }

        let mut walk = Walk {
            files: files.to_vec(),
            ignore: Vec::new(),
        };
        if !root.is_leaf() {
            self.visit(&root, root_path, &[], &mut walk);
        }

        GlobSet {
            globs: walk.files,
            ignore: walk.ignore,
        }
    }

    fn visit(&self, node: &DirNode, dir: &str, handled_ext: &[String], walk: &mut Walk) {
        let mut section = Vec::new();
        node.files(dir, &mut section);
        if section.iter().all(|f| is_handled(f, handled_ext)) {
            return;
        }
        let section_set: BTreeSet<&str> = section.iter().map(String::as_str).collect();
        let real = self.lister.list_recursive(dir);

        let whole = Coverage::measure(&real, &section_set);
        if self.clears(&whole) {
            walk.promote(format!("{dir}/**"), whole.uncovered);
            return;
        }

        let mut handled: Vec<String> = handled_ext.to_vec();
        let real_by_ext = by_extension(&real);
        for (ext, _) in by_extension(&section) {
            if ext.is_empty() || handled.iter().any(|h| h == ext) {
                continue;
            }
            let real_files = real_by_ext
                .iter()
                .find(|(e, _)| *e == ext)
                .map(|(_, items)| items.clone())
                .unwrap_or_default();
            let cov = Coverage::measure(real_files, &section_set);
            if self.clears(&cov) {
                walk.promote(format!("{dir}/**{ext}"), cov.uncovered);
                handled.push(ext.to_string());
            }
        }

        let direct_section = node.direct_files(dir);
        if direct_section.iter().all(|f| is_handled(f, &handled)) {
            self.visit_children(node, dir, &handled, walk);
            return;
        }
        let direct_set: BTreeSet<&str> = direct_section.iter().map(String::as_str).collect();
        let direct_real = self.lister.list_direct(dir);

        let direct = Coverage::measure(&direct_real, &direct_set);
        if self.clears(&direct) {
            walk.promote(format!("{dir}/*"), direct.uncovered);
        } else {
            let real_by_ext = by_extension(&direct_real);
            for (ext, _) in by_extension(&direct_section) {
                if ext.is_empty() || handled.iter().any(|h| h == ext) {
                    continue;
                }
                let real_files = real_by_ext
                    .iter()
                    .find(|(e, _)| *e == ext)
                    .map(|(_, items)| items.clone())
                    .unwrap_or_default();
                let cov = Coverage::measure(real_files, &direct_set);
                if self.clears(&cov) {
                    walk.promote(format!("{dir}/*{ext}"), cov.uncovered);
                }
            }
        }

        self.visit_children(node, dir, &handled, walk);
    }

    fn visit_children(&self, node: &DirNode, dir: &str, handled: &[String], walk: &mut Walk) {
        for child in node.children.iter().filter(|c| !c.is_leaf()) {
            let path = format!("{dir}/{}", child.name);
            self.visit(child, &path, handled, walk);
        }
    }
}
