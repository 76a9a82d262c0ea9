//! Editor bridge: run the editor in its own process and read back the result.
//!
//! The editor process gets the current content as its final argument and
//! answers on stdout using the [marker protocol](crate::protocol). Its
//! stderr is captured and shown when it fails. Only one editor process runs
//! at a time, and the caller blocks until it exits or the timeout expires.

use std::env;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::config::Config;
use crate::model::EditorResult;
use crate::protocol::{self, ProtocolError};
use crate::session::{EndOfInput, Input, Line};

/// Errors from a single editor invocation.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("could not launch editor {program}: {source}")]
    Launch { program: String, source: io::Error },

    #[error("failed waiting for editor: {0}")]
    Wait(#[from] io::Error),

    #[error("editor timed out after {0:?}")]
    TimedOut(Duration),

    #[error("editor process failed ({status}): {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    #[error("{source}")]
    Protocol {
        source: ProtocolError,
        stderr: String,
    },
}

impl BridgeError {
    /// Captured stderr of an editor that exited cleanly but answered with
    /// something other than the marker protocol.
    fn unreported_stderr(&self) -> Option<&str> {
        match self {
            Self::Protocol { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Something that can edit text and report the outcome.
pub trait Editor {
    fn open(&self, initial: &str) -> Result<EditorResult, BridgeError>;
}

/// Runs the editor as a child process.
#[derive(Debug, Clone)]
pub struct ProcessEditor {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ProcessEditor {
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Builds the editor from the configured `editor-command`, or from this
    /// executable's `surface` subcommand when none is configured.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let timeout = config.editor_timeout();

        if let Some((program, args)) = config
            .editor_command
            .as_deref()
            .and_then(<[String]>::split_first)
        {
            return Ok(Self::new(program, args, timeout));
        }

        let exe = env::current_exe()?;
        Ok(Self::new(exe, ["surface", "--"], timeout))
    }

    fn describe(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Editor for ProcessEditor {
    fn open(&self, initial: &str) -> Result<EditorResult, BridgeError> {
        debug!(program = %self.describe(), timeout = ?self.timeout, "launching editor");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(initial)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BridgeError::Launch {
                program: self.describe(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BridgeError::TimedOut(timeout));
                }
            },
            None => child.wait()?,
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !status.success() {
            return Err(BridgeError::Exited {
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        protocol::decode(&stdout).map_err(|source| BridgeError::Protocol {
            source,
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Read a child pipe to the end on its own thread so a chatty child
/// cannot block on a full pipe while we wait for it.
fn drain(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: JoinHandle<String>) -> String {
    reader.join().unwrap_or_default()
}

/// Open the editor once, turning every failure into a warning and
/// [`EditorResult::Cancelled`].
pub fn open_editor<E: Editor + ?Sized>(
    editor: &E,
    initial: &str,
    out: &mut impl Write,
) -> io::Result<EditorResult> {
    match editor.open(initial) {
        Ok(result) => Ok(result),
        Err(e) => {
            warn!(error = %e, "editor failed");
            writeln!(out, "⚠️ {e}")?;
            if let Some(stderr) = e.unreported_stderr() {
                writeln!(out, "{stderr}")?;
            }
            Ok(EditorResult::Cancelled)
        }
    }
}

/// How an editing round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edited {
    /// The human accepted this text as the instruction.
    Accepted(String),

    /// The editor was cancelled or failed; prompt on the terminal instead.
    Fallback,

    /// Input ended while waiting for the accept/edit choice.
    Ended(EndOfInput),
}

/// Open the editor, show what came back, and let the human accept it or
/// type `edit` to reopen the editor with the same text.
pub fn edit_until_accepted<E: Editor + ?Sized>(
    editor: &E,
    input: &mut impl Input,
    out: &mut impl Write,
    initial: &str,
) -> io::Result<Edited> {
    let mut current = initial.to_string();

    loop {
        writeln!(out, "🔄 Opening editor...")?;
        out.flush()?;

        let content = match open_editor(editor, &current, out)? {
            EditorResult::Cancelled => {
                writeln!(out, "❌ Editor cancelled")?;
                return Ok(Edited::Fallback);
            }
            EditorResult::Text(content) => content,
        };

        let rule = "=".repeat(60);
        writeln!(out, "\n✅ Instructions received from editor:")?;
        writeln!(out, "{rule}\n{content}\n{rule}")?;
        writeln!(out, "📋 Press Enter to execute these instructions")?;
        writeln!(out, "    or type 'edit' and press Enter to modify them...")?;
        write!(out, "👤 Your choice: ")?;
        out.flush()?;

        match input.read_line()? {
            Line::Text(choice) if choice.trim().eq_ignore_ascii_case("edit") => {
                writeln!(out, "🔄 Reopening editor with current content...")?;
                current = content;
            }
            Line::Text(_) => return Ok(Edited::Accepted(content)),
            Line::End(end) => return Ok(Edited::Ended(end)),
        }
    }
}
