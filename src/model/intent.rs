//! Intent: what the human wants the assistant to do next.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The classified purpose of an instruction.
///
/// Serialized lower-case (`"continue"`, `"finish"`, `"help"`) as the
/// `action` field of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// End the session and ask for a summary.
    Finish,

    /// Show the help text and prompt again.
    Help,

    /// Implement the instruction.
    Continue,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finish => "finish",
            Self::Help => "help",
            Self::Continue => "continue",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
