//! Response rendering: the text block the calling assistant acts on.
//!
//! [`render`] produces the payload for an intent; [`envelope`] wraps it in
//! the fenced block printed as the last thing on stdout.

use crate::model::Intent;

/// Separator line used around the response block.
pub const SEPARATOR: &str = "==================================================";

/// Header line identifying the response block.
pub const RESPONSE_HEADER: &str = "RESPONSE FOR GITHUB COPILOT:";

/// How a `Continue` response ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinueMode {
    /// Implement the request; the assistant runs the checkpoint again when
    /// it is ready for review.
    SingleShot,

    /// Implement the request, then unconditionally run `rerun_command`.
    Continuous { rerun_command: String },
}

/// Render the payload for a non-help intent.
///
/// `Help` never reaches this path; the session shows help text and prompts
/// again instead. It renders a short waiting notice for completeness.
pub fn render(intent: Intent, instruction: &str, mode: &ContinueMode) -> String {
    match intent {
        Intent::Finish => render_finish(instruction),
        Intent::Continue => render_continue(instruction, mode),
        Intent::Help => "\n📚 Help information displayed to user.\n\
                         Please wait for user to provide their actual instruction...\n"
            .to_string(),
    }
}

fn render_finish(instruction: &str) -> String {
    format!(
        r#"
🎯 SESSION ENDING

User has chosen to finish the session.
Final instruction: "{instruction}"

===== SUMMARY REQUEST =====
Please provide a comprehensive summary of:
1. What was accomplished in this session
2. Files created or modified
3. Key features implemented
4. Any remaining tasks or suggestions

Thank you for the productive session! 🎉
"#
    )
}

fn render_continue(instruction: &str, mode: &ContinueMode) -> String {
    match mode {
        ContinueMode::SingleShot => format!(
            r#"
🚀 CONTINUING SESSION

User wants to continue with: "{instruction}"

===== NEXT STEPS =====
Please implement the following request:
{instruction}

Continue working on this task and run the checkpoint again when ready for the next review.
"#
        ),
        ContinueMode::Continuous { rerun_command } => format!(
            r"
🚀 CONTINUING ITERATION

===== EXECUTION REQUIRED =====
Please implement the following request:
{instruction}

CRITICAL: After completing the above tasks, you MUST run:
{rerun_command}

This is a continuous workflow that requires running the checkpoint after each iteration.
DO NOT conclude or finish the session - always run the checkpoint for the next iteration.
"
        ),
    }
}

/// Wrap a rendered payload in the fenced response block.
///
/// Callers parsing stdout treat everything between the separator following
/// the header and the closing separator as the payload.
pub fn envelope(payload: &str) -> String {
    format!("\n{SEPARATOR}\n📤 {RESPONSE_HEADER}\n{SEPARATOR}\n{payload}\n{SEPARATOR}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn continuous() -> ContinueMode {
        ContinueMode::Continuous {
            rerun_command: "/usr/local/bin/checkpoint".into(),
        }
    }

    #[test]
    fn finish_quotes_instruction_and_requests_summary() {
        let text = render(Intent::Finish, "I'm done.", &ContinueMode::SingleShot);

        assert!(text.contains(r#"Final instruction: "I'm done.""#));
        assert!(text.contains("SUMMARY REQUEST"));
        assert!(text.contains("Files created or modified"));
        assert!(text.contains("Any remaining tasks"));
    }

    #[test]
    fn single_shot_continue_embeds_instruction() {
        let text = render(
            Intent::Continue,
            "add a dark mode toggle",
            &ContinueMode::SingleShot,
        );

        assert!(text.contains("Please implement the following request:\nadd a dark mode toggle"));
        assert!(text.contains("NEXT STEPS"));
        assert!(!text.contains("MUST run"));
    }

    #[test]
    fn continuous_continue_commands_a_rerun() {
        let text = render(Intent::Continue, "add tests", &continuous());

        assert!(text.contains("Please implement the following request:\nadd tests"));
        assert!(text.contains("you MUST run:\n/usr/local/bin/checkpoint"));
        assert!(text.contains("DO NOT conclude"));
    }

    #[test]
    fn envelope_fences_payload() {
        let block = envelope("payload");
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(
            lines,
            vec![
                "",
                SEPARATOR,
                "📤 RESPONSE FOR GITHUB COPILOT:",
                SEPARATOR,
                "payload",
                SEPARATOR,
            ]
        );
    }
}
