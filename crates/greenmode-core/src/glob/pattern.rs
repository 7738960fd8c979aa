//! Small deterministic shell-style matcher.
//!
//! Supported forms:
//! - `*` matches any sequence, including path separators (so `**` behaves
//!   the same as `*`)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[!abc]` character classes
//!
//! Matching is case-sensitive. [`fnmatch`] is used to test snapshot ignore
//! globs. [`glob_match`] is the path-aware variant used to decide which
//! entries a freshly promoted glob subsumes.

/// Returns true if `path` matches `pattern`.
pub fn fnmatch(path: &str, pattern: &str) -> bool {
    // Quick path: exact match
    if path == pattern {
        return true;
    }

    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = path.chars().collect();

    let mut pi = 0usize;
    let mut si = 0usize;
    let mut star: Option<usize> = None;
    let mut match_i = 0usize;

    while si < s.len() {
        if pi < p.len() {
            match p[pi] {
                '*' => {
                    while pi < p.len() && p[pi] == '*' {
                        pi += 1;
                    }
                    star = Some(pi);
                    match_i = si;
                    continue;
                }
                '?' => {
                    pi += 1;
                    si += 1;
                    continue;
                }
                '[' => {
                    if let Some((matched, next)) = match_class(&p, pi, s[si]) {
                        if matched {
                            pi = next;
                            si += 1;
                            continue;
                        }
                    } else if s[si] == '[' {
                        // Unterminated class: treat '[' literally.
                        pi += 1;
                        si += 1;
                        continue;
                    }
                }
                c if c == s[si] => {
                    pi += 1;
                    si += 1;
                    continue;
                }
                _ => {}
            }
        }

        if let Some(st) = star {
            pi = st;
            match_i += 1;
            si = match_i;
            continue;
        }

        return false;
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Match `c` against the class starting at `p[start] == '['`.
///
/// Returns `(matched, index after the class)`, or `None` when the class is
/// not terminated.
fn match_class(p: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negate = i < p.len() && p[i] == '!';
    if negate {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    while i < p.len() {
        if p[i] == ']' && !first {
            return Some((matched != negate, i + 1));
        }
        first = false;
        if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            if p[i] <= c && c <= p[i + 2] {
                matched = true;
            }
            i += 3;
        } else {
            if p[i] == c {
                matched = true;
            }
            i += 1;
        }
    }
    None
}

/// Path-aware matching: `*` and `?` stop at `/`, `**` crosses it.
pub fn glob_match(path: &str, pattern: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = path.chars().collect();
    glob_match_at(&p, &s)
}

fn glob_match_at(p: &[char], s: &[char]) -> bool {
    match p.first() {
        None => s.is_empty(),
        Some('*') if p.get(1) == Some(&'*') => {
            let rest = &p[2..];
            (0..=s.len()).any(|i| glob_match_at(rest, &s[i..]))
        }
        Some('*') => {
            let rest = &p[1..];
            for i in 0..=s.len() {
                if glob_match_at(rest, &s[i..]) {
                    return true;
                }
                if i < s.len() && s[i] == '/' {
                    break;
                }
            }
            false
        }
        Some('?') => matches!(s.first(), Some(c) if *c != '/') && glob_match_at(&p[1..], &s[1..]),
        Some('[') => match (s.first(), s.first().and_then(|c| match_class(p, 0, *c))) {
            (Some(_), Some((matched, next))) => matched && glob_match_at(&p[next..], &s[1..]),
            (Some('['), None) => glob_match_at(&p[1..], &s[1..]),
            _ => false,
        },
        Some(c) => s.first() == Some(c) && glob_match_at(&p[1..], &s[1..]),
    }
}

/// True if any pattern in `patterns` matches `path`.
pub fn matches_any(path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| fnmatch(path, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_crosses_separators() {
        assert!(fnmatch("/proj/src/a/b.py", "/proj/src/*"));
        assert!(fnmatch("/proj/src/a/b.py", "/proj/**.py"));
        assert!(!fnmatch("/proj/src/a/b.c", "/proj/**.py"));
    }

    #[test]
    fn globs_subsume_other_globs_as_strings() {
        assert!(fnmatch("/proj/src/**", "/proj/**"));
        assert!(fnmatch("/proj/src/*.py", "/proj/**"));
        assert!(!fnmatch("/proj/**", "/proj/src/**"));
    }

    #[test]
    fn question_mark_and_classes() {
        assert!(fnmatch("a1.py", "a?.py"));
        assert!(!fnmatch("a.py", "a?.py"));
        assert!(fnmatch("b.py", "[ab].py"));
        assert!(fnmatch("q.py", "[a-z].py"));
        assert!(!fnmatch("b.py", "[!ab].py"));
        assert!(fnmatch("c.py", "[!ab].py"));
    }

    #[test]
    fn ignore_style_patterns() {
        assert!(fnmatch("/proj/__pycache__", "*pycache*"));
        assert!(fnmatch("/proj/x/y.pyc", "**.pyc"));
        assert!(fnmatch("/proj/.git/config", "/proj/.git/**"));
        assert!(!fnmatch("/proj/.git", "/proj/.git/**"));
    }

    #[test]
    fn path_aware_star_stops_at_separator() {
        assert!(glob_match("/proj/src/a.py", "/proj/src/*"));
        assert!(!glob_match("/proj/src/pkg/a.py", "/proj/src/*"));
        assert!(glob_match("/proj/src/pkg/a.py", "/proj/src/**"));
        assert!(glob_match("/proj/src/pkg/a.py", "/proj/**.py"));
        assert!(!glob_match("/proj/src/pkg/a.c", "/proj/**.py"));
        assert!(glob_match("/proj/a1.py", "/proj/[a-z]?.py"));
        assert!(!glob_match("/proj/a/.py", "/proj/a?.py"));
    }

    #[test]
    fn unterminated_class_is_literal() {
        assert!(fnmatch("[x", "[x"));
        assert!(fnmatch("a[b", "a[*"));
    }
}
