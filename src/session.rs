//! The checkpoint session: prompt, classify, record, respond.
//!
//! One session is one checkpoint. It shows the banner, prompts until it
//! gets an instruction that is not a help request, logs it, prints the
//! response block, and ends. Continuing means running the program again.

mod display;
mod input;

use std::io::{self, Write};

use tracing::{info, warn};

use crate::bridge::{self, Edited, Editor};
use crate::classify::Classifier;
use crate::config::Config;
use crate::model::{Intent, LogEntry};
use crate::respond::{self, ContinueMode};
use crate::storage::LogStore;

pub use input::{EndOfInput, Input, Line, TerminalInput, read_one};

/// Words at the prompt that open the editor instead of being an instruction.
const EDITOR_KEYWORDS: &[&str] = &["gui", "edit", "editor"];

/// Instruction recorded when input ends in single-shot mode.
const INTERRUPTED_INSTRUCTION: &str = "finish";

/// Errors that end a session early.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A response block was printed.
    Responded { intent: Intent, instruction: String },

    /// Input ended in continuous mode; nothing was printed or logged.
    Terminated,
}

/// What the prompt produced.
enum Prompted {
    Instruction(String),
    Ended(EndOfInput),
}

/// A single checkpoint run.
pub struct Session<'a, I: Input, W: Write> {
    config: &'a Config,
    classifier: Classifier,
    continue_mode: ContinueMode,
    store: &'a LogStore,
    editor: Option<&'a dyn Editor>,
    input: I,
    out: W,
}

impl<'a, I: Input, W: Write> Session<'a, I, W> {
    /// Creates a session. `editor` is ignored unless the config enables it.
    pub fn new(
        config: &'a Config,
        store: &'a LogStore,
        editor: Option<&'a dyn Editor>,
        input: I,
        out: W,
    ) -> Self {
        let continue_mode = if config.finish {
            ContinueMode::SingleShot
        } else {
            ContinueMode::Continuous {
                rerun_command: rerun_command(config),
            }
        };

        Self {
            config,
            classifier: Classifier::from_config(config),
            continue_mode,
            store,
            editor: editor.filter(|_| config.gui),
            input,
            out,
        }
    }

    /// Runs the checkpoint to completion.
    pub fn run(&mut self) -> Result<Outcome, SessionError> {
        let now = jiff::Zoned::now().strftime("%H:%M:%S").to_string();
        display::banner(&mut self.out, self.config, &now)?;
        display::options(&mut self.out, self.config)?;

        loop {
            let (intent, instruction) = match self.prompt()? {
                Prompted::Instruction(text) => (self.classifier.classify(&text), text),
                Prompted::Ended(end) => {
                    self.announce_end(end)?;
                    if !self.config.finish {
                        info!(?end, "input ended, terminating without a response");
                        return Ok(Outcome::Terminated);
                    }
                    (Intent::Finish, INTERRUPTED_INSTRUCTION.to_string())
                }
            };

            if intent == Intent::Help {
                display::help(&mut self.out, self.config)?;
                continue;
            }

            self.record(intent, &instruction)?;

            let response = respond::render(intent, &instruction, &self.continue_mode);
            write!(self.out, "{}", respond::envelope(&response))?;
            self.out.flush()?;

            return Ok(Outcome::Responded {
                intent,
                instruction,
            });
        }
    }

    /// Prompt until there is a non-empty instruction or input ends.
    fn prompt(&mut self) -> io::Result<Prompted> {
        loop {
            if self.editor.is_some() {
                write!(self.out, "\n👤 Your instruction (or 'gui' for editor): ")?;
            } else {
                write!(self.out, "\n👤 Your instruction: ")?;
            }
            self.out.flush()?;

            let text = match self.input.read_line()? {
                Line::Text(text) => text,
                Line::End(end) => return Ok(Prompted::Ended(end)),
            };
            let text = text.trim();

            if text.is_empty() {
                writeln!(self.out, "⚠️  Please enter an instruction...")?;
                continue;
            }

            if let Some(editor) = self.editor
                && is_editor_keyword(text)
            {
                match bridge::edit_until_accepted(editor, &mut self.input, &mut self.out, "")? {
                    Edited::Accepted(content) => return Ok(Prompted::Instruction(content)),
                    Edited::Fallback => continue,
                    Edited::Ended(end) => return Ok(Prompted::Ended(end)),
                }
            }

            return Ok(Prompted::Instruction(text.to_string()));
        }
    }

    fn announce_end(&mut self, end: EndOfInput) -> io::Result<()> {
        match end {
            EndOfInput::Interrupted => writeln!(self.out, "\n\n⚠️  Session interrupted by user"),
            EndOfInput::Closed => writeln!(self.out, "\n\n⚠️  Input stream ended"),
        }
    }

    /// Append to the session log. Failures are reported and never fatal.
    fn record(&mut self, intent: Intent, instruction: &str) -> io::Result<()> {
        let entry = LogEntry::now(intent, instruction);
        if let Err(e) = self.store.append(&entry) {
            warn!(path = %self.store.path().display(), error = %e, "session log not saved");
            writeln!(self.out, "⚠️  Could not save log: {e}")?;
        }
        Ok(())
    }
}

fn is_editor_keyword(text: &str) -> bool {
    EDITOR_KEYWORDS
        .iter()
        .any(|keyword| text.eq_ignore_ascii_case(keyword))
}

/// The command the assistant runs for the next checkpoint.
fn rerun_command(config: &Config) -> String {
    if let Some(command) = &config.rerun_command {
        return command.clone();
    }
    std::env::current_exe().map_or_else(
        |_| env!("CARGO_PKG_NAME").to_string(),
        |exe| exe.display().to_string(),
    )
}
