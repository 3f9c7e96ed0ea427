//! Keyword router over the fixed intent priority order

use tracing::debug;

use super::keywords::{KeywordSet, WordPattern, PRIORITY};
use super::{Intent, IntentKind};

/// One keyword set with its compiled argument patterns
#[derive(Debug, Clone)]
struct Rule {
    set: KeywordSet,
    triggers: WordPattern,
    filler: Option<WordPattern>,
}

impl Rule {
    fn new(set: KeywordSet) -> Result<Self, regex::Error> {
        let filler = match set.kind.filler_words() {
            [] => None,
            words => Some(WordPattern::new(words)?),
        };

        Ok(Self {
            set,
            triggers: WordPattern::new(set.phrases)?,
            filler,
        })
    }

    fn argument(&self, utterance: &str) -> String {
        let without_triggers = self.triggers.strip(utterance);
        match &self.filler {
            Some(filler) => filler.strip(&without_triggers),
            None => without_triggers,
        }
    }
}

/// Maps an utterance to exactly one intent.
///
/// Sets are tested in priority order and the first set with any phrase
/// contained in the utterance wins, regardless of where in the utterance the
/// phrase occurs.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<Rule>,
}

impl IntentRouter {
    /// Compile the argument patterns for every keyword set
    pub fn new() -> Result<Self, regex::Error> {
        let rules = PRIORITY
            .iter()
            .copied()
            .map(Rule::new)
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    pub fn classify(&self, utterance: &str) -> Intent {
        let normalized = utterance.to_lowercase();

        let intent = match self.rules.iter().find(|rule| rule.set.matches(&normalized)) {
            Some(rule) => Intent::new(rule.set.kind, utterance, rule.argument(utterance)),
            None => Intent::new(IntentKind::Freeform, utterance, utterance.trim()),
        };

        debug!(kind = %intent.kind, utterance, "utterance classified");
        intent
    }
}
