//! File length check.

use greenmode_core::model::{line_body, Assignment, Finding, SourcePosition, SourceRange};

use crate::plugin::{Annotation, Bear, Entry, FunctionSig, Param, SettingsExt, TrialInput};

#[derive(Debug, Clone, Copy, Default)]
pub struct LineCountBear;

impl LineCountBear {
    pub const NAME: &'static str = "LineCountBear";
}

/// A range naming the whole file without positions. It is never covered by an
/// ignore range.
fn whole_file(filename: &str) -> SourceRange {
    let pos = SourcePosition {
        file: filename.to_string(),
        line: None,
        column: None,
    };
    SourceRange::new(pos.clone(), pos)
}

impl Bear for LineCountBear {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn entry(&self) -> Entry {
        Entry::Run(
            FunctionSig::new("run")
                .param(Param::required("filename"))
                .param(Param::required("file"))
                .param(Param::required("max_lines_per_file").annotated(Annotation::Int))
                .param(Param::optional("min_lines_per_file", 1i64).annotated(Annotation::Int))
                .param(Param::optional("exclude_blank_lines", false).annotated(Annotation::Bool)),
        )
    }

    fn run(&self, settings: &Assignment, input: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>> {
        let TrialInput::Local { filename, file } = *input else {
            anyhow::bail!("{} runs on single files", Self::NAME);
        };
        let max = settings.require_int("max_lines_per_file")?;
        let min = settings.int_or("min_lines_per_file", 1)?;
        let exclude_blank = settings.bool_or("exclude_blank_lines", false)?;

        let count = file
            .iter()
            .filter(|line| !exclude_blank || !line_body(line).trim().is_empty())
            .count() as i64;

        let mut out = Vec::new();
        if count > max {
            out.push(
                Finding::new(Self::NAME, format!("This file had {count} lines, which is {} lines more than the maximum limit specified.", count - max))
                    .with_range(whole_file(filename)),
            );
        }
        if count < min {
            out.push(
                Finding::new(Self::NAME, format!("This file had {count} lines, less than the minimum of {min}."))
                    .with_range(whole_file(filename)),
            );
        }
        Ok(out)
    }
}
