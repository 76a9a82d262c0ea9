//! CLI interface for checkpoint.
//!
//! Run with no arguments from an assistant's terminal tool. The program
//! prompts the human, logs the decision, and prints one response block for
//! the assistant to act on. Behavior is fixed by the config file, not flags.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::bridge::{Editor, ProcessEditor};
use crate::config::Config;
use crate::session::{Outcome, Session, TerminalInput};
use crate::storage::LogStore;
use crate::surface;

/// Checkpoint: pause an assistant and ask the human what comes next.
#[derive(Debug, Parser)]
#[command(name = "checkpoint", version, after_long_help = CONFIG_HELP)]
pub struct Cli {
    /// Config file to use instead of `~/.checkpoint/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

const CONFIG_HELP: &str = r#"Config (~/.checkpoint/config.toml, every key optional):
  finish = true                  # false: continuous mode, never finishes
  gui = true                     # 'gui' / 'edit' / 'editor' opens the editor
  finish-policy = "whole-word"   # or "substring"
  editor-timeout-secs = 600      # 0 waits forever
  editor-command = ["python3", "gui_helper.py"]
  log-file = "~/.checkpoint/session_log.json"
  rerun-command = "checkpoint"

Set CHECKPOINT_LOG=debug for diagnostics on stderr."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit text and print the result markers on stdout.
    ///
    /// Run by the checkpoint itself as its editor process.
    #[command(hide = true)]
    Surface {
        /// Initial content.
        #[arg(default_value = "")]
        content: String,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Surface { content }) => {
            surface::run(&content).map_err(|e| format!("editor surface failed: {e}"))
        }
        None => cmd_checkpoint(cli.config.as_deref()),
    }
}

fn cmd_checkpoint(config_path: Option<&Path>) -> Result<(), String> {
    let config = Config::load(config_path).map_err(|e| e.to_string())?;
    let store = LogStore::new(config.log_path());

    let editor = if config.gui {
        match ProcessEditor::from_config(&config) {
            Ok(editor) => Some(editor),
            Err(e) => {
                warn!(error = %e, "editor unavailable, using terminal input only");
                None
            }
        }
    } else {
        None
    };

    let input = TerminalInput::spawn()
        .map_err(|e| format!("could not install the Ctrl+C handler: {e}"))?;

    let stdout = io::stdout();
    let outcome = Session::new(
        &config,
        &store,
        editor.as_ref().map(|e| e as &dyn Editor),
        input,
        stdout.lock(),
    )
    .run()
    .map_err(|e| e.to_string())?;

    match outcome {
        Outcome::Responded {
            intent,
            instruction,
        } => info!(%intent, chars = instruction.len(), "checkpoint answered"),
        Outcome::Terminated => info!("checkpoint ended without a response"),
    }

    Ok(())
}
