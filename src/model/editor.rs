//! Editor result: what came back from one editor session.

/// Outcome of a single editor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorResult {
    /// The human closed the editor without submitting.
    Cancelled,

    /// The submitted text.
    Text(String),
}
