//! Line length check.

use greenmode_core::model::{line_body, Assignment, Finding, SourceRange};

use crate::plugin::{Annotation, Bear, Entry, FunctionSig, Param, SettingsExt, TrialInput};

#[derive(Debug, Clone, Copy, Default)]
pub struct LineLengthBear;

impl LineLengthBear {
    pub const NAME: &'static str = "LineLengthBear";
}

fn char_width(c: char, tab_width: i64) -> i64 {
    if c == '\t' {
        tab_width
    } else {
        1
    }
}

fn display_width(body: &str, tab_width: i64) -> i64 {
    body.chars()
        .fold(0i64, |acc, c| acc.saturating_add(char_width(c, tab_width)))
}

/// Character columns of the overflow: the first char ending past `max`
/// display columns, and the column after the last char. Columns count chars,
/// the same unit ignore ranges use.
fn overflow_columns(body: &str, max: i64, tab_width: i64) -> (usize, usize) {
    let mut width = 0i64;
    let mut start = None;
    let mut count = 0usize;
    for (idx, c) in body.chars().enumerate() {
        width = width.saturating_add(char_width(c, tab_width));
        if start.is_none() && width > max {
            start = Some(idx + 1);
        }
        count = idx + 1;
    }
    (start.unwrap_or(count + 1), count + 1)
}

fn column(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Bear for LineLengthBear {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn entry(&self) -> Entry {
        Entry::Run(
            FunctionSig::new("run")
                .param(Param::required("filename"))
                .param(Param::required("file"))
                .param(Param::required("max_line_length").annotated(Annotation::Int))
                .param(Param::optional("tab_width", 4i64).annotated(Annotation::Int)),
        )
    }

    fn run(&self, settings: &Assignment, input: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>> {
        let TrialInput::Local { filename, file } = *input else {
            anyhow::bail!("{} runs on single files", Self::NAME);
        };
        let max = settings.require_int("max_line_length")?;
        let tab_width = settings.int_or("tab_width", 4)?;

        let mut out = Vec::new();
        for (idx, line) in file.iter().enumerate() {
            let body = line_body(line);
            let width = display_width(body, tab_width);
            if width > max {
                let line_no = column(idx + 1);
                let (start, end) = overflow_columns(body, max, tab_width);
                out.push(
                    Finding::new(Self::NAME, format!("Line is longer than allowed. ({width} > {max})"))
                        .with_range(SourceRange::from_values(
                            filename,
                            line_no,
                            column(start),
                            line_no,
                            column(end),
                        )),
                );
            }
        }
        Ok(out)
    }
}
