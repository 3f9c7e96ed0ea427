//! Trigger phrase tables
//!
//! Each table is tested by plain substring containment, so a phrase that
//! occurs inside a longer word still matches ("start" in "restart").

use regex::Regex;

use super::IntentKind;

/// Phrases that wake the assistant
pub const WAKE_WORDS: &[&str] = &["jarvis", "জারভিস"];

pub const EXIT_WORDS: &[&str] = &["exit", "quit", "stop", "bye", "বন্ধ কর"];
pub const SHUTDOWN_WORDS: &[&str] = &["shutdown", "turn off"];
pub const OPEN_APP_WORDS: &[&str] = &["open", "launch", "start"];
pub const SEARCH_WORDS: &[&str] = &["search", "google", "look up"];
pub const PLAY_WORDS: &[&str] = &["play", "stream"];
pub const NOTE_WORDS: &[&str] = &["note", "make a note", "remember this"];
pub const SCREENSHOT_WORDS: &[&str] = &["screenshot"];

/// An ordered set of trigger phrases for one intent
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub kind: IntentKind,
    pub phrases: &'static [&'static str],
}

impl KeywordSet {
    pub const fn new(kind: IntentKind, phrases: &'static [&'static str]) -> Self {
        Self { kind, phrases }
    }

    /// Check whether any phrase occurs in the (already lower-cased) text
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| text.contains(phrase))
    }
}

/// Sets in the order they are tested; Freeform has no set.
pub const PRIORITY: [KeywordSet; 7] = [
    KeywordSet::new(IntentKind::Exit, EXIT_WORDS),
    KeywordSet::new(IntentKind::Shutdown, SHUTDOWN_WORDS),
    KeywordSet::new(IntentKind::OpenApp, OPEN_APP_WORDS),
    KeywordSet::new(IntentKind::Search, SEARCH_WORDS),
    KeywordSet::new(IntentKind::Play, PLAY_WORDS),
    KeywordSet::new(IntentKind::Note, NOTE_WORDS),
    KeywordSet::new(IntentKind::Screenshot, SCREENSHOT_WORDS),
];

/// Check for a wake phrase
pub fn contains_wake_word(text: &str) -> bool {
    let text = text.to_lowercase();
    WAKE_WORDS.iter().any(|word| text.contains(word))
}

/// Whole-word, case-insensitive matcher for a list of phrases
#[derive(Debug, Clone)]
pub struct WordPattern {
    re: Regex,
}

impl WordPattern {
    pub fn new(words: &[&str]) -> Result<Self, regex::Error> {
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");

        let re = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?;
        Ok(Self { re })
    }

    /// Remove every occurrence, then trim separators and collapse spaces.
    ///
    /// Unlike `KeywordSet::matches`, this respects word boundaries so that
    /// "note" is not cut out of "notepad".
    pub fn strip(&self, text: &str) -> String {
        let stripped = self.re.replace_all(text, " ");
        stripped
            .trim_matches(|c: char| !c.is_alphanumeric())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
