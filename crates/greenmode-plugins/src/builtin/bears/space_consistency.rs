//! Indentation and whitespace consistency.

use greenmode_core::model::{line_body, Assignment, Finding, SourceRange};

use crate::plugin::{Annotation, Bear, Entry, FunctionSig, Param, SettingsExt, TrialInput};

#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceConsistencyBear;

impl SpaceConsistencyBear {
    pub const NAME: &'static str = "SpaceConsistencyBear";
}

fn leading_whitespace(body: &str) -> &str {
    let end = body
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(body.len(), |(i, _)| i);
    &body[..end]
}

fn width(s: &str) -> u32 {
    s.chars().count() as u32
}

impl Bear for SpaceConsistencyBear {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn entry(&self) -> Entry {
        Entry::Run(
            FunctionSig::new("run")
                .param(Param::required("filename"))
                .param(Param::required("file"))
                .param(Param::required("use_spaces").annotated(Annotation::Bool))
                .param(Param::optional("allow_trailing_whitespace", false).annotated(Annotation::Bool))
                .param(Param::optional("indent_size", 4i64).annotated(Annotation::Int))
                .param(Param::optional("enforce_newline_at_EOF", true).annotated(Annotation::Bool)),
        )
    }

    fn run(&self, settings: &Assignment, input: &TrialInput<'_>) -> anyhow::Result<Vec<Finding>> {
        let TrialInput::Local { filename, file } = *input else {
            anyhow::bail!("{} runs on single files", Self::NAME);
        };
        let use_spaces = settings
            .get("use_spaces")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| anyhow::anyhow!("missing required setting use_spaces"))?;
        let allow_trailing = settings.bool_or("allow_trailing_whitespace", false)?;
        let indent_size = settings.int_or("indent_size", 4)?;
        let newline_at_eof = settings.bool_or("enforce_newline_at_EOF", true)?;
        if indent_size <= 0 {
            anyhow::bail!("indent_size must be positive, got {indent_size}");
        }
        let spaces = " ".repeat(indent_size as usize);

        let mut out = Vec::new();
        for (idx, line) in file.iter().enumerate() {
            let line_no = idx as u32 + 1;
            let body = line_body(line);
            let indent = leading_whitespace(body);

            let inconsistent = if use_spaces {
                indent.contains('\t')
            } else {
                indent.contains(spaces.as_str())
            };
            if inconsistent {
                out.push(
                    Finding::new(Self::NAME, "Line contains inconsistent indentation.")
                        .with_range(SourceRange::from_values(
                            filename,
                            line_no,
                            1,
                            line_no,
                            width(indent) + 1,
                        )),
                );
            }

            if !allow_trailing {
                let trimmed = body.trim_end_matches([' ', '\t']);
                if trimmed.len() != body.len() {
                    out.push(
                        Finding::new(Self::NAME, "Line contains trailing whitespace.")
                            .with_range(SourceRange::from_values(
                                filename,
                                line_no,
                                width(trimmed) + 1,
                                line_no,
                                width(body) + 1,
                            )),
                    );
                }
            }
        }

        if newline_at_eof {
            if let Some(last) = file.last() {
                if !last.ends_with('\n') {
                    let line_no = file.len() as u32;
                    out.push(
                        Finding::new(Self::NAME, "File does not end with a newline.").with_range(
                            SourceRange::from_values(
                                filename,
                                line_no,
                                1,
                                line_no,
                                width(last) + 1,
                            ),
                        ),
                    );
                }
            }
        }
        Ok(out)
    }
}
