//! External editor surface: `$VISUAL` / `$EDITOR` on a temporary file.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{EditorSurface, tty};
use crate::model::EditorResult;

/// The human's own editor, run against a temporary Markdown file.
///
/// A non-zero exit from the editor or an empty file counts as cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalEditor {
    /// The editor named by `$VISUAL`, then `$EDITOR`, if it resolves to a
    /// program on `PATH`.
    pub fn from_env() -> Option<Self> {
        let path = env::var_os("PATH");
        ["VISUAL", "EDITOR"].iter().find_map(|var| {
            let command = env::var(var).ok()?;
            Self::parse(&command, path.as_deref())
        })
    }

    /// Parse an editor command line such as `code --wait`, resolving the
    /// program against `path`.
    fn parse(command: &str, path: Option<&OsStr>) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = resolve(parts.next()?, path)?;
        Some(Self {
            program,
            args: parts.map(String::from).collect(),
        })
    }
}

impl EditorSurface for ExternalEditor {
    fn name(&self) -> &'static str {
        "external"
    }

    fn edit(&self, initial: &str) -> io::Result<EditorResult> {
        let mut file = tempfile::Builder::new()
            .prefix("checkpoint-")
            .suffix(".md")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        let (tty_in, tty_out) = tty::open()?;
        let tty_err = tty_out.try_clone()?;

        debug!(program = %self.program.display(), file = %file.path().display(), "opening editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(tty_in)
            .stdout(tty_out)
            .stderr(tty_err)
            .status()?;

        if !status.success() {
            debug!(%status, "editor exited without saving");
            return Ok(EditorResult::Cancelled);
        }

        let content = fs::read_to_string(file.path())?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(EditorResult::Cancelled);
        }

        Ok(EditorResult::Text(content.to_string()))
    }
}

/// Find `program` as given when it contains a path, otherwise in `path`.
fn resolve(program: &str, path: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    env::split_paths(path?).find_map(|dir| {
        let exact = dir.join(program);
        if exact.is_file() {
            return Some(exact);
        }
        let exe = dir.join(format!("{program}{}", env::consts::EXE_SUFFIX));
        exe.is_file().then_some(exe)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::ffi::OsString;

    use tempfile::TempDir;

    fn path_with(dir: &TempDir, program: &str) -> OsString {
        fs::write(dir.path().join(program), "").unwrap();
        env::join_paths([dir.path()]).unwrap()
    }

    #[test]
    fn parses_program_and_arguments() {
        let dir = TempDir::new().unwrap();
        let path = path_with(&dir, "fake-editor");

        let editor =
            ExternalEditor::parse("fake-editor --wait -n", Some(path.as_os_str())).unwrap();

        assert_eq!(editor.program, dir.path().join("fake-editor"));
        assert_eq!(editor.args, vec!["--wait".to_string(), "-n".to_string()]);
    }

    #[test]
    fn unknown_program_is_not_available() {
        let dir = TempDir::new().unwrap();
        let path = path_with(&dir, "fake-editor");

        assert_eq!(ExternalEditor::parse("missing-editor", Some(path.as_os_str())), None);
        assert_eq!(ExternalEditor::parse("fake-editor", None), None);
    }

    #[test]
    fn blank_command_is_not_available() {
        assert_eq!(ExternalEditor::parse("   ", None), None);
    }

    #[test]
    fn explicit_path_is_checked_directly() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("fake-editor");
        fs::write(&program, "").unwrap();

        let editor = ExternalEditor::parse(&program.display().to_string(), None).unwrap();

        assert_eq!(editor.program, program);
    }
}
