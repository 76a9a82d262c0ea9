//! Core data model for checkpoint.
//!
//! These types are shared by every stage of a checkpoint:
//! the classified intent, the audit record written to the log,
//! and the result handed back by an editor surface.

mod editor;
mod entry;
mod intent;

pub use editor::EditorResult;
pub use entry::LogEntry;
pub use intent::Intent;
