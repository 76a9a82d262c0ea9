//! Marker protocol between the editor process and the checkpoint.
//!
//! The editor process reports its outcome on stdout only:
//!
//! ```text
//! GUI_RESULT_CANCELLED          # the human closed the editor
//!
//! GUI_RESULT_START              # the human submitted text
//! <content>
//! GUI_RESULT_END
//! ```
//!
//! Anything else on stdout around the markers is ignored.

use crate::model::EditorResult;

pub const CANCELLED: &str = "GUI_RESULT_CANCELLED";
pub const START: &str = "GUI_RESULT_START";
pub const END: &str = "GUI_RESULT_END";

/// Ways editor output can fail to carry a usable result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("no content received from editor")]
    EmptyContent,

    #[error("unexpected editor output")]
    UnexpectedOutput,
}

/// Encode a result the way an editor process prints it.
pub fn encode(result: &EditorResult) -> String {
    match result {
        EditorResult::Cancelled => format!("{CANCELLED}\n"),
        EditorResult::Text(content) => format!("{START}\n{content}\n{END}\n"),
    }
}

/// Decode captured editor stdout.
///
/// A line consisting of the cancel marker wins over everything else.
/// Otherwise the content runs from the end of the first start marker to the
/// first end marker after it, trimmed. Empty content is an error.
pub fn decode(output: &str) -> Result<EditorResult, ProtocolError> {
    if output.lines().any(|line| line.trim() == CANCELLED) {
        return Ok(EditorResult::Cancelled);
    }

    let start = output.find(START).ok_or(ProtocolError::UnexpectedOutput)? + START.len();
    let len = output[start..]
        .find(END)
        .ok_or(ProtocolError::UnexpectedOutput)?;

    let content = output[start..start + len].trim();
    if content.is_empty() {
        return Err(ProtocolError::EmptyContent);
    }

    Ok(EditorResult::Text(content.to_string()))
}
