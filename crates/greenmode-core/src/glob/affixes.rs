//! Common filename prefix/suffix detection.
//!
//! File base names are inserted into a character trie. A prefix is reported
//! when enough files share it and it is long enough. Suffixes are found by
//! running the same search over reversed names.

use std::collections::BTreeMap;

#[derive(Debug)]
struct TrieNode {
    ch: Option<char>,
    count: usize,
    // Insertion order matters for discovery order.
    children: Vec<TrieNode>,
}

impl TrieNode {
    fn new(ch: Option<char>) -> Self {
        Self {
            ch,
            count: 1,
            children: Vec::new(),
        }
    }

    fn insert(&mut self, rest: &[char]) {
        let Some((&first, tail)) = rest.split_first() else {
            return;
        };
        let idx = match self.children.iter().position(|c| c.ch == Some(first)) {
            Some(idx) => {
                self.children[idx].count += 1;
                idx
            }
            None => {
                self.children.push(TrieNode::new(Some(first)));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(tail);
    }
}

/// Character trie over file names.
#[derive(Debug)]
pub struct Trie {
    root: TrieNode,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(None),
        }
    }

    pub fn insert(&mut self, word: &str) {
        let chars: Vec<char> = word.chars().collect();
        self.root.insert(&chars);
    }

    /// Prefixes at least `min_length` long shared by at least `min_files`
    /// words, sorted by (count, prefix) descending.
    ///
    /// Below the first level a prefix only grows while every word under it
    /// continues along the same path. A longer prefix replaces any stored
    /// prefix it contains.
    pub fn prefixes(&self, min_length: usize, min_files: usize) -> Vec<(String, usize)> {
        let mut found: BTreeMap<String, usize> = BTreeMap::new();
        let mut path = String::new();
        discover(&self.root, &mut path, 0, min_length, min_files, &mut found);

        let mut out: Vec<(String, usize)> = found.into_iter().collect();
        out.sort_by(|a, b| (b.1, &b.0).cmp(&(a.1, &a.0)));
        out
    }
}

fn discover(
    node: &TrieNode,
    path: &mut String,
    depth: usize,
    min_length: usize,
    min_files: usize,
    found: &mut BTreeMap<String, usize>,
) {
    if node.ch.is_some() && node.count < min_files {
        return;
    }
    if let Some(ch) = node.ch {
        path.push(ch);
    }

    if depth >= min_length {
        let current = path.clone();
        found.retain(|stored, _| !current.contains(stored.as_str()));
        found.insert(current, node.count);
    }

    let at_root = node.ch.is_none();
    for child in &node.children {
        if at_root || child.count >= node.count {
            discover(child, path, depth + 1, min_length, min_files, found);
        }
    }

    if node.ch.is_some() {
        path.pop();
    }
}

/// Name without directories and without its last extension.
fn stem(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    strip_ext(base)
}

fn strip_ext(name: &str) -> &str {
    match name.rfind('.') {
        // A leading dot starts the name, it is not an extension.
        Some(idx) if idx > 0 && !name[..idx].chars().all(|c| c == '.') => &name[..idx],
        _ => name,
    }
}

/// Detected filename affixes. Empty detections are reported as `[""]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affixes {
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
}

/// Find common prefixes and suffixes of the given file names.
pub fn common_affixes(names: &[String], min_length: usize, min_files: usize) -> Affixes {
    let mut forward = Trie::new();
    let mut backward = Trie::new();
    for name in names {
        let s = stem(name);
        forward.insert(s);
        // Suffixes ignore one more extension level (`a_test.tar.gz` → `a_test`).
        backward.insert(&strip_ext(s).chars().rev().collect::<String>());
    }

    let mut prefixes: Vec<String> = forward
        .prefixes(min_length, min_files)
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    let mut suffixes: Vec<String> = backward
        .prefixes(min_length, min_files)
        .into_iter()
        .map(|(p, _)| p.chars().rev().collect())
        .collect();

    if prefixes.is_empty() {
        prefixes.push(String::new());
    }
    if suffixes.is_empty() {
        suffixes.push(String::new());
    }

    Affixes { prefixes, suffixes }
}
