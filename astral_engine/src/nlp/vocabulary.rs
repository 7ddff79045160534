//! Intent vocabulary tables.
//!
//! Verb lists, context words and priorities per [`CommandIntent`], plus the
//! priority override table. Loaded once at startup from `data/vocabulary.toml`
//! (embedded in the binary) and never mutated afterward.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use crate::command::CommandIntent;

const BUILTIN_VOCABULARY: &str = include_str!("../../data/vocabulary.toml");

/// Problems found while loading a vocabulary table.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary table is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("intent {0} is listed more than once")]
    DuplicateIntent(CommandIntent),
    #[error("intent {0} has an empty verb list")]
    NoVerbs(CommandIntent),
}

/// One intent's verbs, context words and base priority.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentEntry {
    pub intent: CommandIntent,
    pub priority: u32,
    pub verbs: Vec<String>,
    #[serde(default)]
    pub context_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PriorityOverride {
    intent: CommandIntent,
    priority: u32,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    intents: Vec<IntentEntry>,
    #[serde(default)]
    priority_overrides: Vec<PriorityOverride>,
}

/// Immutable intent vocabulary with a reverse index from verb form to intents.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: BTreeMap<CommandIntent, IntentEntry>,
    overrides: BTreeMap<CommandIntent, u32>,
    by_verb: HashMap<String, Vec<CommandIntent>>,
}

impl Vocabulary {
    /// Load the vocabulary shipped with the engine.
    ///
    /// # Errors
    /// Returns an error if the embedded table is malformed.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::from_toml_str(BUILTIN_VOCABULARY)
    }

    /// Parse a vocabulary table from TOML text.
    ///
    /// # Errors
    /// Fails on invalid TOML, repeated intents or intents without verbs.
    pub fn from_toml_str(text: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = toml::from_str(text)?;

        let mut entries = BTreeMap::new();
        let mut by_verb: HashMap<String, Vec<CommandIntent>> = HashMap::new();
        for entry in file.intents {
            if entry.verbs.is_empty() {
                return Err(VocabularyError::NoVerbs(entry.intent));
            }
            for verb in &entry.verbs {
                let intents = by_verb.entry(verb.to_lowercase()).or_default();
                if !intents.contains(&entry.intent) {
                    intents.push(entry.intent);
                }
            }
            let intent = entry.intent;
            if entries.insert(intent, entry).is_some() {
                return Err(VocabularyError::DuplicateIntent(intent));
            }
        }

        let overrides = file
            .priority_overrides
            .into_iter()
            .map(|o| (o.intent, o.priority))
            .collect();

        Ok(Self {
            entries,
            overrides,
            by_verb,
        })
    }

    /// Scoring weight for an intent: the override if one exists, else the entry's own priority.
    pub fn weight(&self, intent: CommandIntent) -> f64 {
        self.overrides
            .get(&intent)
            .or_else(|| self.entries.get(&intent).map(|entry| &entry.priority))
            .map_or(0.0, |priority| f64::from(*priority))
    }

    /// Intents whose verb list contains `form` (already lower-cased).
    pub fn intents_for(&self, form: &str) -> &[CommandIntent] {
        self.by_verb.get(form).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn verbs_for(&self, intent: CommandIntent) -> &[String] {
        self.entries
            .get(&intent)
            .map(|entry| entry.verbs.as_slice())
            .unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IntentEntry> {
        self.entries.values()
    }

    /// Every verb form known to the vocabulary, sorted and deduplicated.
    pub fn all_verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.by_verb.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vocabulary_loads() {
        let vocab = Vocabulary::builtin().unwrap();
        assert!(vocab.verbs_for(CommandIntent::Move).iter().any(|v| v == "go"));
        let unlock = vocab.entries().find(|e| e.intent == CommandIntent::Unlock).unwrap();
        assert!(unlock.context_words.iter().any(|w| w == "keycard"));
    }

    #[test]
    fn overrides_take_precedence_over_base_priority() {
        let vocab = Vocabulary::builtin().unwrap();
        // base 70, override 45
        assert!((vocab.weight(CommandIntent::Move) - 45.0).abs() < f64::EPSILON);
        // no override for score
        assert!((vocab.weight(CommandIntent::Score) - 40.0).abs() < f64::EPSILON);
        assert!(vocab.weight(CommandIntent::Unknown).abs() < f64::EPSILON);
    }

    #[test]
    fn shared_verbs_map_to_every_intent() {
        let vocab = Vocabulary::builtin().unwrap();
        let put = vocab.intents_for("put");
        assert!(put.contains(&CommandIntent::Drop));
        assert!(put.contains(&CommandIntent::Put));
        let take = vocab.intents_for("take");
        assert!(take.contains(&CommandIntent::Take));
        assert!(take.contains(&CommandIntent::TakeFrom));
    }

    #[test]
    fn duplicate_intents_are_rejected() {
        let text = r#"
            [[intents]]
            intent = "look"
            priority = 1
            verbs = ["look"]

            [[intents]]
            intent = "look"
            priority = 2
            verbs = ["peer"]
        "#;
        let err = Vocabulary::from_toml_str(text).unwrap_err();
        assert!(matches!(err, VocabularyError::DuplicateIntent(CommandIntent::Look)));
    }

    #[test]
    fn empty_verb_lists_are_rejected() {
        let text = r#"
            [[intents]]
            intent = "help"
            priority = 1
            verbs = []
        "#;
        assert!(matches!(
            Vocabulary::from_toml_str(text),
            Err(VocabularyError::NoVerbs(CommandIntent::Help))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Vocabulary::from_toml_str("intents = 3"),
            Err(VocabularyError::Parse(_))
        ));
    }
}
