//! Terminal surface: line-by-line entry with formatting shortcuts.

use std::io::{self, BufRead, BufReader, Write};

use super::{EditorSurface, tty};
use crate::model::EditorResult;
use crate::session::{Line, read_one};

const HELP: &str = "\
  .         submit             /cancel   cancel
  /b text   • bullet           /n text   1. numbered item
  /s text   → sub-item         /c text   ☐ checkbox
  /sep      --- separator      /clear    start over
  /show     show the draft";

/// Plain line entry on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSurface;

impl EditorSurface for TerminalSurface {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn edit(&self, initial: &str) -> io::Result<EditorResult> {
        let (tty_in, mut tty_out) = tty::open()?;
        self.edit_with(&mut BufReader::new(tty_in), &mut tty_out, initial)
    }
}

impl TerminalSurface {
    /// Run the editing loop over arbitrary input and output.
    pub fn edit_with(
        &self,
        input: &mut impl BufRead,
        out: &mut impl Write,
        initial: &str,
    ) -> io::Result<EditorResult> {
        let mut draft = Draft::from_text(initial);

        writeln!(out, "\n📝 Detailed Instructions Editor")?;
        writeln!(out, "Write your instructions line by line.\n{HELP}")?;
        if !draft.is_empty() {
            writeln!(out, "\nCurrent draft:\n{}", draft.text())?;
        }

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let line = match read_one(input)? {
                Line::Text(line) => line,
                Line::End(_) => return Ok(EditorResult::Cancelled),
            };

            match line.trim() {
                "." => {
                    if draft.is_empty() {
                        writeln!(out, "⚠️ Please enter some instructions.")?;
                        continue;
                    }
                    return Ok(EditorResult::Text(draft.text()));
                }
                "/cancel" => return Ok(EditorResult::Cancelled),
                "/clear" => draft = Draft::default(),
                "/show" => writeln!(out, "{}", draft.text())?,
                "/sep" => draft.push("---".to_string()),
                _ => draft.push_formatted(&line),
            }
        }
    }
}

/// The text being written.
#[derive(Debug, Default)]
struct Draft {
    lines: Vec<String>,
    /// Highest number used by a numbered item so far.
    numbered: usize,
}

impl Draft {
    fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let numbered = lines
            .iter()
            .filter_map(|line| item_number(line))
            .max()
            .unwrap_or(0);
        Self { lines, numbered }
    }

    fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    fn text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Apply a formatting shortcut, or keep the line as written.
    fn push_formatted(&mut self, line: &str) {
        let formatted = if let Some(rest) = line.strip_prefix("/b ") {
            format!("• {rest}")
        } else if let Some(rest) = line.strip_prefix("/n ") {
            self.numbered += 1;
            format!("{}. {rest}", self.numbered)
        } else if let Some(rest) = line.strip_prefix("/s ") {
            format!("  → {rest}")
        } else if let Some(rest) = line.strip_prefix("/c ") {
            format!("☐ {rest}")
        } else {
            line.to_string()
        };
        self.push(formatted);
    }
}

/// `Some(3)` for a line like `3. do the thing`.
fn item_number(line: &str) -> Option<usize> {
    let (number, _) = line.trim_start().split_once(". ")?;
    number.parse().ok()
}
