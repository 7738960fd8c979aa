//! Ignore ranges from comment markers.
//!
//! Recognized markers, after `#` or `//`:
//!
//! - `noqa [bears]`: the marker line.
//! - `ignore [bears]`: the marker line and the one after it.
//! - `start ignoring [bears]` ... `stop ignoring`: every line in between,
//!   both marker lines included. An unterminated block runs to the end of the
//!   file.
//!
//! Bear names are separated by commas or spaces; none, or `all`, means every
//! bear.

use greenmode_core::model::{FileDict, IgnoreRange, SourceRange};

use crate::plugin::IgnoreRangeProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerIgnoreProvider;

#[derive(Debug, PartialEq, Eq)]
enum Marker {
    Noqa(Vec<String>),
    Ignore(Vec<String>),
    Start(Vec<String>),
    Stop,
}

fn comment(line: &str) -> Option<&str> {
    let hash = line.find('#').map(|i| (i, 1));
    let slashes = line.find("//").map(|i| (i, 2));
    let (start, len) = match (hash, slashes) {
        (Some(a), Some(b)) => a.min(b),
        (a, b) => a.or(b)?,
    };
    Some(line[start + len..].trim())
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn bear_names(rest: &str) -> Vec<String> {
    let names: Vec<String> = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        return Vec::new();
    }
    names
}

fn parse_marker(line: &str) -> Option<Marker> {
    let text = comment(line)?;
    if let Some(rest) = strip_keyword(text, "start ignoring") {
        return Some(Marker::Start(bear_names(rest)));
    }
    if strip_keyword(text, "stop ignoring").is_some() {
        return Some(Marker::Stop);
    }
    if let Some(rest) = strip_keyword(text, "noqa") {
        return Some(Marker::Noqa(bear_names(rest)));
    }
    strip_keyword(text, "ignore").map(|rest| Marker::Ignore(bear_names(rest)))
}

fn column(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Columns count chars, tabs included as one, the unit bears report in.
fn end_column(file: &[String], line_no: usize) -> u32 {
    file.get(line_no.saturating_sub(1))
        .map_or(1, |l| column(l.chars().count().saturating_add(1)))
}

fn span(filename: &str, file: &[String], first: usize, last: usize) -> SourceRange {
    SourceRange::from_values(filename, column(first), 1, column(last), end_column(file, last))
}

impl MarkerIgnoreProvider {
    fn file_ranges(filename: &str, file: &[String], out: &mut Vec<IgnoreRange>) {
        let mut open: Option<(usize, Vec<String>)> = None;
        for (idx, line) in file.iter().enumerate() {
            let line_no = idx + 1;
            match parse_marker(line) {
                Some(Marker::Start(bears)) => {
                    if open.is_none() {
                        open = Some((line_no, bears));
                    }
                }
                Some(Marker::Stop) => {
                    if let Some((first, bears)) = open.take() {
                        out.push(IgnoreRange {
                            bears,
                            range: span(filename, file, first, line_no),
                        });
                    }
                }
                Some(Marker::Noqa(bears)) => out.push(IgnoreRange {
                    bears,
                    range: span(filename, file, line_no, line_no),
                }),
                Some(Marker::Ignore(bears)) => {
                    let last = (line_no + 1).min(file.len());
                    out.push(IgnoreRange {
                        bears,
                        range: span(filename, file, line_no, last),
                    });
                }
                None => {}
            }
        }
        if let Some((first, bears)) = open {
            out.push(IgnoreRange {
                bears,
                range: span(filename, file, first, file.len()),
            });
        }
    }
}

impl IgnoreRangeProvider for MarkerIgnoreProvider {
    fn ignore_ranges(&self, files: &FileDict) -> Vec<IgnoreRange> {
        let mut out = Vec::new();
        for (filename, file) in files {
            Self::file_ranges(filename, file, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(name: &str, lines: &[&str]) -> FileDict {
        let mut d = FileDict::new();
        d.insert(name.to_string(), lines.iter().map(|l| l.to_string()).collect());
        d
    }

    #[test]
    fn parses_markers() {
        assert_eq!(parse_marker("x = 1  # noqa"), Some(Marker::Noqa(vec![])));
        assert_eq!(
            parse_marker("// Ignore LineLengthBear, SpaceConsistencyBear"),
            Some(Marker::Ignore(vec![
                "LineLengthBear".to_string(),
                "SpaceConsistencyBear".to_string()
            ]))
        );
        assert_eq!(parse_marker("# start ignoring all"), Some(Marker::Start(vec![])));
        assert_eq!(parse_marker("# stop ignoring"), Some(Marker::Stop));
        assert_eq!(parse_marker("# ignored files are listed below"), None);
        assert_eq!(parse_marker("x = 1"), None);
    }

    #[test]
    fn noqa_covers_its_line() {
        let files = dict("a.py", &["a\n", "long_line  # noqa\n"]);
        let ranges = MarkerIgnoreProvider.ignore_ranges(&files);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range, SourceRange::from_values("a.py", 2, 1, 2, 19));
        assert!(ranges[0].bears.is_empty());
    }

    #[test]
    fn ignore_covers_the_next_line() {
        let files = dict("a.py", &["# ignore LineLengthBear\n", "long\n", "x\n"]);
        let ranges = MarkerIgnoreProvider.ignore_ranges(&files);
        assert_eq!(ranges[0].range, SourceRange::from_values("a.py", 1, 1, 2, 6));
        assert_eq!(ranges[0].bears, vec!["LineLengthBear"]);
    }

    #[test]
    fn ignore_on_last_line_stays_in_file() {
        let files = dict("a.py", &["x\n", "y  # ignore\n"]);
        let ranges = MarkerIgnoreProvider.ignore_ranges(&files);
        assert_eq!(ranges[0].range, SourceRange::from_values("a.py", 2, 1, 2, 13));
    }

    #[test]
    fn start_stop_blocks() {
        let files = dict(
            "a.py",
            &["a\n", "# start ignoring\n", "b\n", "# stop ignoring\n", "c\n"],
        );
        let ranges = MarkerIgnoreProvider.ignore_ranges(&files);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range, SourceRange::from_values("a.py", 2, 1, 4, 17));
    }

    #[test]
    fn unterminated_block_runs_to_end() {
        let files = dict("a.py", &["# start ignoring\n", "b\n", "cc\n"]);
        let ranges = MarkerIgnoreProvider.ignore_ranges(&files);
        assert_eq!(ranges[0].range, SourceRange::from_values("a.py", 1, 1, 3, 4));
    }
}
