//! Verb-based intent scoring.

use std::collections::BTreeMap;

use super::annotation::{PartOfSpeech, TokenAnnotation};
use super::vocabulary::Vocabulary;
use crate::command::CommandIntent;

/// Accumulated score per intent plus the index of the first token that matched any verb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentScores {
    scores: BTreeMap<CommandIntent, f64>,
    trigger: Option<usize>,
}

impl IntentScores {
    pub fn get(&self, intent: CommandIntent) -> Option<f64> {
        self.scores.get(&intent).copied()
    }

    pub fn contains(&self, intent: CommandIntent) -> bool {
        self.scores.contains_key(&intent)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn trigger(&self) -> Option<usize> {
        self.trigger
    }

    pub fn add(&mut self, intent: CommandIntent, amount: f64) {
        *self.scores.entry(intent).or_insert(0.0) += amount;
    }

    /// Intents by descending score; equal scores keep `CommandIntent` declaration order.
    pub fn ranked(&self) -> Vec<(CommandIntent, f64)> {
        let mut ranked: Vec<(CommandIntent, f64)> = self.scores.iter().map(|(i, s)| (*i, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Score every intent whose verb list contains a token's lemma or lower-cased surface.
///
/// Each token adds an intent's weight at most once, however many of its forms match.
/// A noun right after a determiner ("the lock", "a light") is never read as a verb.
pub fn score_tokens(vocabulary: &Vocabulary, tokens: &[TokenAnnotation]) -> IntentScores {
    let mut scores = IntentScores::default();
    let mut previous: Option<PartOfSpeech> = None;
    for token in tokens {
        let after_determiner = previous == Some(PartOfSpeech::Det);
        previous = Some(token.pos);
        if after_determiner && token.pos == PartOfSpeech::Noun {
            continue;
        }
        let lower = token.lower();
        let mut matched: Vec<CommandIntent> = vocabulary.intents_for(&token.lemma).to_vec();
        for intent in vocabulary.intents_for(&lower) {
            if !matched.contains(intent) {
                matched.push(*intent);
            }
        }
        if matched.is_empty() {
            continue;
        }
        if scores.trigger.is_none() {
            scores.trigger = Some(token.index);
        }
        for intent in matched {
            scores.add(intent, vocabulary.weight(intent));
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::tagger::{LexiconTagger, Tagger};

    fn score(text: &str) -> IntentScores {
        let tokens = LexiconTagger::bundled().unwrap().annotate(text).unwrap();
        score_tokens(&Vocabulary::builtin().unwrap(), &tokens)
    }

    #[test]
    fn shared_verb_scores_every_intent_once() {
        let scores = score("put torch");
        assert_eq!(scores.get(CommandIntent::Put), Some(86.0));
        assert_eq!(scores.get(CommandIntent::Drop), Some(35.0));
        assert_eq!(scores.trigger(), Some(0));
        assert_eq!(scores.ranked()[0].0, CommandIntent::Put);
    }

    #[test]
    fn inflected_verbs_match_through_their_lemma() {
        let scores = score("taking the torch");
        assert!(scores.contains(CommandIntent::Take));
        assert!(scores.contains(CommandIntent::TakeFrom));
    }

    #[test]
    fn repeated_verbs_accumulate() {
        let scores = score("look look");
        assert_eq!(scores.get(CommandIntent::Look), Some(100.0));
    }

    #[test]
    fn trigger_is_first_matching_token() {
        let scores = score("please open the hatch");
        assert_eq!(scores.trigger(), Some(1));
        assert!(scores.contains(CommandIntent::Manipulate));
    }

    #[test]
    fn determined_nouns_are_not_verbs() {
        let scores = score("smash the lock on the hatch");
        assert_eq!(scores.trigger(), Some(0));
        assert!(scores.contains(CommandIntent::Environment));
        assert!(!scores.contains(CommandIntent::Lock));
    }

    #[test]
    fn nonsense_scores_nothing() {
        let scores = score("xyzzy quux");
        assert!(scores.is_empty());
        assert!(scores.trigger().is_none());
    }

    #[test]
    fn ties_fall_back_to_declaration_order() {
        let mut scores = IntentScores::default();
        scores.add(CommandIntent::Unlock, 88.0);
        scores.add(CommandIntent::Lock, 88.0);
        let ranked = scores.ranked();
        assert_eq!(ranked[0].0, CommandIntent::Lock);
    }
}
