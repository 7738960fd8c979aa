use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use greenmode_core::GREEN_CONFIG_FILE;
use greenmode_engine::GreenSections;

/// Render sections as a coafile: `[name]` headers followed by `key = value`
/// lines, sections separated by one blank line, `all` first.
pub fn render_coafile(sections: &GreenSections) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", section.name());
        for (key, value) in section.entries() {
            let _ = writeln!(out, "{key} = {value}");
        }
    }
    out
}

pub fn green_config_path(project_dir: &Path, suffix: &str) -> PathBuf {
    project_dir.join(format!("{GREEN_CONFIG_FILE}{suffix}"))
}

pub fn write_coafile(project_dir: &Path, suffix: &str, text: &str) -> Result<PathBuf> {
    let path = green_config_path(project_dir, suffix);
    fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use greenmode_engine::Section;

    fn sections() -> GreenSections {
        let mut all = Section::new("all");
        all.set("ignore", "/p/.git/**");
        let mut bear = Section::new("all.LineLengthBear1");
        bear.set("max_line_length", "80");
        bear.set("files", "/p/**");
        bear.set("bears", "LineLengthBear");
        GreenSections {
            all: Some(all),
            bears: BTreeMap::from([("LineLengthBear".to_string(), vec![bear])]),
        }
    }

    #[test]
    fn renders_sections_in_order() {
        let text = render_coafile(&sections());
        assert_eq!(
            text,
            "[all]\nignore = /p/.git/**\n\n[all.LineLengthBear1]\nmax_line_length = 80\nfiles = /p/**\nbears = LineLengthBear\n"
        );
    }

    #[test]
    fn empty_sections_render_nothing() {
        assert_eq!(render_coafile(&GreenSections::default()), "");
    }

    #[test]
    fn suffix_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_coafile(dir.path(), ".bak", "[all]\n").unwrap();
        assert_eq!(path.file_name().unwrap(), ".coafile.green.bak");
        assert_eq!(fs::read_to_string(path).unwrap(), "[all]\n");
    }
}
