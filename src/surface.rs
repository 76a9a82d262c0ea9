//! Editor surfaces: the child side of the editor bridge.
//!
//! `checkpoint surface <content>` runs in its own process, lets the human
//! edit `<content>`, and prints the outcome using the
//! [marker protocol](crate::protocol). The surface is chosen by probing:
//!
//! 1. [`ExternalEditor`] when `$VISUAL` or `$EDITOR` names a program on `PATH`.
//! 2. [`TerminalSurface`] otherwise: line-by-line entry on the terminal.
//!
//! Both talk to the terminal directly, since stdout belongs to the protocol.

mod external;
mod terminal;
mod tty;

use std::io::{self, Write};

use tracing::debug;

use crate::model::EditorResult;
use crate::protocol;

pub use external::ExternalEditor;
pub use terminal::TerminalSurface;

/// A way for the human to edit text.
pub trait EditorSurface {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Edit `initial`, returning the submitted text or a cancellation.
    fn edit(&self, initial: &str) -> io::Result<EditorResult>;
}

/// Pick the best available surface.
pub fn probe() -> Box<dyn EditorSurface> {
    match ExternalEditor::from_env() {
        Some(editor) => Box::new(editor),
        None => Box::new(TerminalSurface),
    }
}

/// Entry point for the `surface` subcommand.
pub fn run(initial: &str) -> io::Result<()> {
    let surface = probe();
    respond(surface.as_ref(), initial, &mut io::stdout().lock())
}

/// Edit on `surface` and write the outcome to `out` as protocol markers.
fn respond(surface: &dyn EditorSurface, initial: &str, out: &mut impl Write) -> io::Result<()> {
    debug!(surface = surface.name(), "editing");

    let result = surface.edit(initial)?;

    out.write_all(protocol::encode(&result).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    /// Appends to whatever it is given, or cancels.
    struct Appending {
        suffix: Option<&'static str>,
        seen: RefCell<Option<String>>,
    }

    impl EditorSurface for Appending {
        fn name(&self) -> &'static str {
            "appending"
        }

        fn edit(&self, initial: &str) -> io::Result<EditorResult> {
            *self.seen.borrow_mut() = Some(initial.to_string());
            Ok(match self.suffix {
                Some(suffix) => EditorResult::Text(format!("{initial}{suffix}")),
                None => EditorResult::Cancelled,
            })
        }
    }

    fn respond_with(suffix: Option<&'static str>, initial: &str) -> (String, Option<String>) {
        let surface = Appending {
            suffix,
            seen: RefCell::new(None),
        };
        let mut out = Vec::new();
        respond(&surface, initial, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), surface.seen.into_inner())
    }

    #[test]
    fn submitted_text_is_printed_between_markers() {
        let (out, seen) = respond_with(Some("\n• Fix docs"), "• Add tests");

        assert_eq!(seen.as_deref(), Some("• Add tests"));
        assert_eq!(
            out,
            format!("{}\n• Add tests\n• Fix docs\n{}\n", protocol::START, protocol::END)
        );
        assert_eq!(
            protocol::decode(&out).unwrap(),
            EditorResult::Text("• Add tests\n• Fix docs".into())
        );
    }

    #[test]
    fn cancellation_is_printed_as_the_cancel_marker() {
        let (out, _) = respond_with(None, "draft");

        assert_eq!(protocol::decode(&out).unwrap(), EditorResult::Cancelled);
        assert!(out.contains(protocol::CANCELLED));
    }
}
