//! Input classification: turn a free-text instruction into an [`Intent`].
//!
//! Rules, in order:
//!
//! 1. `Finish` when finishing is enabled and a finish keyword matches
//!    (see [`FinishPolicy`]).
//! 2. `Help` when the text contains `help` anywhere. This is a substring
//!    match on purpose: "this is helpful" and "that would help" both ask
//!    for help.
//! 3. `Continue` otherwise.
//!
//! Matching runs on the trimmed, lower-cased text and never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::Intent;

/// Keywords matched anywhere in the text under [`FinishPolicy::Substring`].
pub const SUBSTRING_FINISH_KEYWORDS: &[&str] =
    &["done", "finish", "end", "complete", "stop", "exit", "quit"];

/// Keywords matched as whole words under [`FinishPolicy::WholeWord`].
pub const WHOLE_WORD_FINISH_KEYWORDS: &[&str] = &["done", "finish"];

static WHOLE_WORD_FINISH: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = WHOLE_WORD_FINISH_KEYWORDS
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect();
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
        .expect("escaped keywords form a valid regex")
});

/// How finish keywords are recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishPolicy {
    /// Any of [`SUBSTRING_FINISH_KEYWORDS`] anywhere in the text.
    ///
    /// Over-matches inside larger words: "append" contains "end",
    /// "unfinished" contains "finish".
    Substring,

    /// [`WHOLE_WORD_FINISH_KEYWORDS`] bounded by non-word characters.
    #[default]
    WholeWord,
}

impl FinishPolicy {
    /// The keywords this policy recognizes, for display in help text.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Substring => SUBSTRING_FINISH_KEYWORDS,
            Self::WholeWord => WHOLE_WORD_FINISH_KEYWORDS,
        }
    }

    fn matches(self, normalized: &str) -> bool {
        match self {
            Self::Substring => SUBSTRING_FINISH_KEYWORDS
                .iter()
                .any(|keyword| normalized.contains(keyword)),
            Self::WholeWord => WHOLE_WORD_FINISH.is_match(normalized),
        }
    }
}

/// Maps instructions to intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    /// `None` disables the finish rule entirely (continuous mode).
    finish: Option<FinishPolicy>,
}

impl Classifier {
    pub fn new(finish: Option<FinishPolicy>) -> Self {
        Self { finish }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.finish.then_some(config.finish_policy))
    }

    /// Classify a raw instruction.
    pub fn classify(&self, raw: &str) -> Intent {
        let normalized = raw.trim().to_lowercase();

        if self.finish.is_some_and(|policy| policy.matches(&normalized)) {
            return Intent::Finish;
        }

        if normalized.contains("help") {
            return Intent::Help;
        }

        Intent::Continue
    }
}
