//! Project-wide duplicate file detection.

use std::collections::BTreeMap;

use greenmode_core::model::{Assignment, Finding, SourceRange};

use crate::plugin::{Annotation, Bear, BearKind, Entry, FunctionSig, Param, SettingsExt, TrialInput};

#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateContentBear;

impl DuplicateContentBear {
    pub const NAME: &'static str = "DuplicateContentBear";
}

impl Bear for DuplicateContentBear {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> BearKind {
        BearKind::Global
    }

    fn entry(&self) -> Entry {
        Entry::Run(
            FunctionSig::new("run")
                .param(Param::optional("ignore_empty_files", true).annotated(Annotation::Bool))
                .param(Param::optional("min_file_lines", 1i64).annotated(Annotation::Int)),
        )
    }

    fn run(&self, settings: &Assignment, input: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>> {
        let TrialInput::Global { files } = *input else {
            anyhow::bail!("{} runs on the whole project", Self::NAME);
        };
        let ignore_empty = settings.bool_or("ignore_empty_files", true)?;
        let min_lines = settings.int_or("min_file_lines", 1)?.max(0) as usize;

        let mut first_seen: BTreeMap<&[String], &str> = BTreeMap::new();
        let mut out = Vec::new();
        for (name, lines) in files.iter() {
            if lines.len() < min_lines || (ignore_empty && lines.is_empty()) {
                continue;
            }
            match first_seen.get(lines.as_slice()) {
                Some(original) => {
                    let last = lines.len().max(1) as u32;
                    let end_col = lines.last().map_or(1, |l| l.chars().count() as u32 + 1);
                    out.push(
                        Finding::new(Self::NAME, format!("File has the same content as {original}."))
                            .with_range(SourceRange::from_values(name.as_str(), 1, 1, last, end_col)),
                    );
                }
                None => {
                    first_seen.insert(lines.as_slice(), name.as_str());
                }
            }
        }
        Ok(out)
    }
}
