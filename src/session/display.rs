//! Banner, options menu, and help text.

use std::io::{self, Write};

use crate::config::Config;

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

/// Print the checkpoint banner with the given local time.
pub(super) fn banner(out: &mut impl Write, config: &Config, time: &str) -> io::Result<()> {
    let (title, status) = if config.finish {
        ("🔄 GITHUB COPILOT REVIEW CHECKPOINT", "📍 Current task completed")
    } else {
        ("🔄 GITHUB COPILOT CONTINUOUS CHECKPOINT", "📍 Ready for next iteration")
    };

    writeln!(out, "\n{RULE}\n{title}\n{RULE}")?;
    writeln!(out, "⏰ Time: {time}")?;
    writeln!(out, "{status}\n{THIN_RULE}")
}

/// Print the menu of things the human can type.
pub(super) fn options(out: &mut impl Write, config: &Config) -> io::Result<()> {
    writeln!(out, "\n💬 What would you like to do next?")?;
    writeln!(out, "\n📋 Options:")?;
    writeln!(
        out,
        "   🔄 Continue: Describe changes, improvements, or new features"
    )?;
    if config.gui {
        writeln!(
            out,
            "   📝 Editor: Type 'gui' or 'edit' to open the detailed instruction editor"
        )?;
    }
    if config.finish {
        writeln!(
            out,
            "   ✅ Finish: Type {} to complete the session",
            quoted_list(config.finish_policy.keywords())
        )?;
    }
    writeln!(out, "   ❓ Help: Type 'help' for more options")?;
    writeln!(out, "\n{THIN_RULE}")
}

/// Print the help text for the enabled features.
pub(super) fn help(out: &mut impl Write, config: &Config) -> io::Result<()> {
    let title = if config.finish {
        "📚 HELP - How to use this review checkpoint:"
    } else {
        "📚 HELP - Continuous Flow System"
    };
    writeln!(out, "\n{RULE}\n{title}\n{RULE}")?;

    writeln!(out, "\n🔄 TO CONTINUE:")?;
    writeln!(out, "   - Describe what you want to change or add")?;
    writeln!(out, "   - Example: 'Add a dark mode toggle'")?;
    writeln!(out, "   - Example: 'Fix the responsive design issues'")?;
    writeln!(out, "   - Example: 'Add more animations'")?;

    if config.gui {
        writeln!(out, "\n📝 DETAILED INSTRUCTIONS (EDITOR):")?;
        writeln!(out, "   - Type: 'gui', 'edit', or 'editor' to open the editor")?;
        writeln!(out, "   - Write detailed instructions with bullets and formatting")?;
        writeln!(
            out,
            "   - After submitting, you can type 'edit' to modify the same content"
        )?;
    }

    if config.finish {
        writeln!(out, "\n✅ TO FINISH:")?;
        writeln!(
            out,
            "   - Type: {}",
            quoted_list(config.finish_policy.keywords())
        )?;
        writeln!(out, "   - The session will end with a summary")?;
    } else {
        writeln!(out, "\n⚠️ IMPORTANT:")?;
        writeln!(
            out,
            "   - This is a continuous workflow - it never ends automatically"
        )?;
        writeln!(out, "   - To stop: Cancel the terminal command (Ctrl+C)")?;
        writeln!(out, "   - Each iteration runs the checkpoint again")?;
    }

    writeln!(out, "\n💡 TIPS:")?;
    writeln!(out, "   - Be specific about what you want")?;
    writeln!(out, "   - You can ask for multiple changes at once")?;
    writeln!(
        out,
        "   - GitHub Copilot will continue from where it left off"
    )?;
    writeln!(out, "\n{THIN_RULE}")
}

/// `'a', 'b', or 'c'`
fn quoted_list(words: &[&str]) -> String {
    let quoted: Vec<String> = words.iter().map(|w| format!("'{w}'")).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::classify::FinishPolicy;

    fn render(f: impl Fn(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn quoted_list_joins_with_or() {
        assert_eq!(quoted_list(&["done"]), "'done'");
        assert_eq!(quoted_list(&["done", "finish"]), "'done' or 'finish'");
        assert_eq!(
            quoted_list(&["done", "finish", "end"]),
            "'done', 'finish', or 'end'"
        );
    }

    #[test]
    fn banner_shows_time_and_mode() {
        let config = Config::default();
        let text = render(|out| banner(out, &config, "09:41:00"));

        assert!(text.contains("REVIEW CHECKPOINT"));
        assert!(text.contains("⏰ Time: 09:41:00"));

        let continuous = Config {
            finish: false,
            ..Config::default()
        };
        let text = render(|out| banner(out, &continuous, "09:41:00"));
        assert!(text.contains("CONTINUOUS CHECKPOINT"));
    }

    #[test]
    fn help_lists_policy_keywords() {
        let config = Config {
            finish_policy: FinishPolicy::Substring,
            ..Config::default()
        };
        let text = render(|out| help(out, &config));

        assert!(text.contains("'quit'"));
        assert!(text.contains("TO FINISH"));
        assert!(text.contains("'gui', 'edit', or 'editor'"));
    }

    #[test]
    fn continuous_help_explains_how_to_stop() {
        let config = Config {
            finish: false,
            gui: false,
            ..Config::default()
        };
        let text = render(|out| help(out, &config));

        assert!(!text.contains("TO FINISH"));
        assert!(!text.contains("EDITOR"));
        assert!(text.contains("Ctrl+C"));
    }

    #[test]
    fn options_hide_disabled_features() {
        let config = Config {
            finish: false,
            gui: false,
            ..Config::default()
        };
        let text = render(|out| options(out, &config));

        assert!(!text.contains("Finish:"));
        assert!(!text.contains("Editor:"));
        assert!(text.contains("Help:"));
    }
}
