//! Source positions, findings and the green acceptance rule.

use serde::{Deserialize, Serialize};

/// A position inside a file. Line and column are 1-based; either may be
/// unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl SourcePosition {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    fn line_col(&self) -> Option<(u32, u32)> {
        Some((self.line?, self.column?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceRange {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Range spanning `start_line:start_col` to `end_line:end_col` in `file`.
    pub fn from_values(
        file: impl Into<String>,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        let file = file.into();
        Self {
            start: SourcePosition::new(file.clone(), start_line, start_col),
            end: SourcePosition::new(file, end_line, end_col),
        }
    }

    /// Whether `self` lies entirely inside `bigger`.
    ///
    /// Both ranges must be in the same file and fully positioned; positions
    /// compare as `(line, column)` pairs.
    pub fn contained_in(&self, bigger: &SourceRange) -> bool {
        if self.start.file != bigger.start.file {
            return false;
        }
        let (Some(s), Some(e), Some(bs), Some(be)) = (
            self.start.line_col(),
            self.end.line_col(),
            bigger.start.line_col(),
            bigger.end.line_col(),
        ) else {
            return false;
        };
        s >= bs && e <= be
    }
}

/// A single problem reported by a bear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the bear that produced the finding.
    pub origin: String,
    pub message: String,
    /// Source ranges the finding points at. May be empty.
    pub affected: Vec<SourceRange>,
}

impl Finding {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            affected: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.affected.push(range);
        self
    }
}

/// A region exempted from findings, e.g. code between ignore markers.
///
/// `bears` is the kind of the ignore: the bear names it was written for, empty
/// meaning every bear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRange {
    pub bears: Vec<String>,
    pub range: SourceRange,
}

impl IgnoreRange {
    pub fn all(range: SourceRange) -> Self {
        Self {
            bears: Vec::new(),
            range,
        }
    }

    pub fn for_bears(bears: &[&str], range: SourceRange) -> Self {
        Self {
            bears: bears.iter().map(|b| b.to_string()).collect(),
            range,
        }
    }

    /// Bear names compare case-insensitively.
    pub fn applies_to(&self, bear: &str) -> bool {
        self.bears.is_empty() || self.bears.iter().any(|b| b.eq_ignore_ascii_case(bear))
    }
}

/// Green acceptance rule for a trial.
///
/// No findings is always green. Otherwise at least one ignore range must
/// exist and every affected range of every finding must lie inside some
/// ignore range written for the finding's bear.
pub fn findings_are_green(findings: &[Finding], ignores: &[IgnoreRange]) -> bool {
    if findings.is_empty() {
        return true;
    }
    if ignores.is_empty() {
        return false;
    }
    findings.iter().all(|finding| {
        finding.affected.iter().all(|r| {
            ignores
                .iter()
                .any(|ig| ig.applies_to(&finding.origin) && r.contained_in(&ig.range))
        })
    })
}
