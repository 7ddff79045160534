//! Per-token annotations and labelled entity spans shared by the NLP stages.

use serde::Serialize;
use variantly::Variantly;

/// Coarse part-of-speech class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Variantly)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Verb,
    Noun,
    Propn,
    Adj,
    Det,
    Num,
    Adp,
    Adv,
    Aux,
    Pron,
    Cconj,
    Part,
    Punct,
    X,
}

/// One token of a command with its tag and lemma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAnnotation {
    pub text: String,
    pub pos: PartOfSpeech,
    pub lemma: String,
    pub index: usize,
}

impl TokenAnnotation {
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Label attached to an entity span.
///
/// `Cardinal` and `Ordinal` are the tagger's own generic guesses; the rest come
/// from world-derived patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Variantly)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Direction,
    GameObject,
    Area,
    LockWithKey,
    UnlockWithKey,
    Cardinal,
    Ordinal,
}

impl EntityLabel {
    /// True for the lock/unlock-with-key spans, which may overlap object spans.
    pub fn is_compound(self) -> bool {
        matches!(self, EntityLabel::LockWithKey | EntityLabel::UnlockWithKey)
    }
}

/// A labelled token range `[start, end)` with its stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: EntityLabel,
    pub id: String,
    pub text: String,
}

impl EntitySpan {
    /// Build a span over `tokens[start..end]`, joining the lower-cased surfaces.
    pub fn over(tokens: &[TokenAnnotation], start: usize, end: usize, label: EntityLabel, id: &str) -> Self {
        Self {
            start,
            end,
            label,
            id: id.to_string(),
            text: join_tokens(&tokens[start..end]),
        }
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Space-joined lower-case surface text of a token run.
pub fn join_tokens<'a>(tokens: impl IntoIterator<Item = &'a TokenAnnotation>) -> String {
    tokens
        .into_iter()
        .map(TokenAnnotation::lower)
        .collect::<Vec<_>>()
        .join(" ")
}
