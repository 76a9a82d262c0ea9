//! Line input for the session prompt.
//!
//! [`TerminalInput`] reads stdin on a helper thread, one line per request,
//! so nothing is reading the terminal while an editor owns it. Ctrl+C is
//! delivered through the same channel as an [`EndOfInput::Interrupted`] line.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Why no more input is coming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfInput {
    /// Ctrl+C.
    Interrupted,

    /// stdin reached end of file.
    Closed,
}

/// One read from the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line of text without its line terminator.
    Text(String),

    End(EndOfInput),
}

/// Source of prompt lines.
pub trait Input {
    fn read_line(&mut self) -> io::Result<Line>;
}

/// Reads lines from the process's stdin and listens for Ctrl+C.
pub struct TerminalInput {
    requests: Sender<()>,
    lines: Receiver<io::Result<Line>>,
}

impl TerminalInput {
    /// Starts the reader thread and installs the Ctrl+C handler.
    ///
    /// The handler can only be installed once per process.
    pub fn spawn() -> Result<Self, ctrlc::Error> {
        let (line_tx, lines) = mpsc::channel();
        let (requests, request_rx) = mpsc::channel::<()>();

        let interrupt_tx = line_tx.clone();
        ctrlc::set_handler(move || {
            let _ = interrupt_tx.send(Ok(Line::End(EndOfInput::Interrupted)));
        })?;

        thread::spawn(move || {
            let stdin = io::stdin();
            for () in request_rx {
                let line = read_one(&mut stdin.lock());
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self { requests, lines })
    }
}

impl Input for TerminalInput {
    fn read_line(&mut self) -> io::Result<Line> {
        let stopped = || io::Error::other("input reader stopped");
        self.requests.send(()).map_err(|_| stopped())?;
        self.lines.recv().map_err(|_| stopped())?
    }
}

/// Read one line, mapping end of file to [`EndOfInput::Closed`].
pub fn read_one(reader: &mut impl BufRead) -> io::Result<Line> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Ok(Line::End(EndOfInput::Closed));
    }
    let trimmed = buf.trim_end_matches(['\r', '\n']).len();
    buf.truncate(trimmed);
    Ok(Line::Text(buf))
}
