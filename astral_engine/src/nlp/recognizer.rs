//! Entity recognition over tagged tokens.
//!
//! The recognizer runs the tagger, then matches the compiled pattern table in two
//! layers: atomic spans (directions, objects, areas) and the compound
//! lock/unlock-with-key spans, which are allowed to overlap atomic ones. Within a
//! layer the longest match wins, then the earliest, then the most recently
//! registered pattern. Tagger guesses survive only where no pattern matched.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use super::annotation::{EntityLabel, EntitySpan, TokenAnnotation};
use super::patterns::{EntityPattern, PatternElement, Repeat};
use super::tagger::{Tagger, TaggerError};

/// Validated patterns, split by layer and kept in registration order.
#[derive(Debug, Default)]
pub struct PatternTable {
    atomic: Vec<EntityPattern>,
    compound: Vec<EntityPattern>,
}

impl PatternTable {
    /// Compile a pattern list, dropping (and warning about) unusable patterns.
    pub fn compile(patterns: Vec<EntityPattern>) -> Self {
        let mut table = Self::default();
        for pattern in patterns {
            if let Some(defect) = pattern.defect() {
                warn!(
                    "rejected {:?} pattern for '{}': {defect}",
                    pattern.label, pattern.stable_id
                );
                continue;
            }
            if pattern.label.is_compound() {
                table.compound.push(pattern);
            } else {
                table.atomic.push(pattern);
            }
        }
        if table.is_empty() {
            warn!("entity pattern table is empty; no directions or objects will be recognized");
        }
        table
    }

    pub fn len(&self) -> usize {
        self.atomic.len() + self.compound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pattern counts per label.
    pub fn counts(&self) -> HashMap<EntityLabel, usize> {
        let mut counts = HashMap::new();
        for pattern in self.atomic.iter().chain(&self.compound) {
            *counts.entry(pattern.label).or_insert(0) += 1;
        }
        counts
    }
}

/// End position of the longest match of `elements` starting at `pos`.
fn match_from(elements: &[PatternElement], tokens: &[TokenAnnotation], pos: usize) -> Option<usize> {
    let Some((first, rest)) = elements.split_first() else {
        return Some(pos);
    };
    match first.repeat {
        Repeat::Once => {
            let token = tokens.get(pos)?;
            if first.test.accepts(token) {
                match_from(rest, tokens, pos + 1)
            } else {
                None
            }
        },
        Repeat::OneOrMore => {
            let mut end = pos;
            while tokens.get(end).is_some_and(|t| first.test.accepts(t)) {
                end += 1;
            }
            while end > pos {
                if let Some(done) = match_from(rest, tokens, end) {
                    return Some(done);
                }
                end -= 1;
            }
            None
        },
    }
}

/// Non-overlapping matches for one layer of patterns.
fn match_layer(patterns: &[EntityPattern], tokens: &[TokenAnnotation]) -> Vec<EntitySpan> {
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
    for (order, pattern) in patterns.iter().enumerate() {
        for start in 0..tokens.len() {
            if let Some(end) = match_from(&pattern.elements, tokens, start)
                && end > start
            {
                candidates.push((start, end, order));
            }
        }
    }
    // longest first, then earliest, then latest registered
    candidates.sort_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)).then(a.0.cmp(&b.0)).then(b.2.cmp(&a.2)));

    let mut kept: Vec<EntitySpan> = Vec::new();
    for (start, end, order) in candidates {
        if kept.iter().any(|span| span.overlaps(start, end)) {
            continue;
        }
        let pattern = &patterns[order];
        kept.push(EntitySpan::over(tokens, start, end, pattern.label, &pattern.stable_id));
    }
    kept.sort_by_key(|span| (span.start, span.end));
    kept
}

/// Tokens and entity spans for one command.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub tokens: Vec<TokenAnnotation>,
    pub spans: Vec<EntitySpan>,
}

impl Analysis {
    pub fn first(&self, label: EntityLabel) -> Option<&EntitySpan> {
        self.spans.iter().find(|span| span.label == label)
    }

    pub fn last(&self, label: EntityLabel) -> Option<&EntitySpan> {
        self.spans.iter().rev().find(|span| span.label == label)
    }

    /// Object id of the GAME_OBJECT span whose text is exactly `text`.
    pub fn object_id_for(&self, text: &str) -> Option<&str> {
        self.spans
            .iter()
            .rev()
            .find(|span| span.label == EntityLabel::GameObject && span.text == text)
            .map(|span| span.id.as_str())
    }
}

/// Tagger plus compiled world patterns.
pub struct EntityRecognizer {
    tagger: Box<dyn Tagger + Send + Sync>,
    table: Arc<PatternTable>,
}

impl EntityRecognizer {
    pub fn new(tagger: Box<dyn Tagger + Send + Sync>, patterns: Vec<EntityPattern>) -> Self {
        Self {
            tagger,
            table: Arc::new(PatternTable::compile(patterns)),
        }
    }

    /// Replace the pattern table wholesale.
    pub fn rebuild(&mut self, patterns: Vec<EntityPattern>) {
        self.table = Arc::new(PatternTable::compile(patterns));
        debug!("entity pattern table rebuilt with {} patterns", self.table.len());
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Tag `text` and find its entity spans.
    ///
    /// # Errors
    /// Propagates tagger failures.
    pub fn analyze(&self, text: &str) -> Result<Analysis, TaggerError> {
        let tokens = self.tagger.annotate(text)?;
        let table = Arc::clone(&self.table);

        let mut spans = match_layer(&table.atomic, &tokens);
        spans.extend(match_layer(&table.compound, &tokens));

        let guesses: Vec<EntitySpan> = self
            .tagger
            .entity_guesses(&tokens)
            .into_iter()
            .filter(|guess| !spans.iter().any(|span| span.overlaps(guess.start, guess.end)))
            .collect();
        spans.extend(guesses);
        spans.sort_by_key(|span| (span.start, span.end, span.label));

        debug!(
            "entities: {:?}",
            spans
                .iter()
                .map(|s| format!("{}={:?}({})", s.text, s.label, s.id))
                .collect::<Vec<_>>()
        );
        Ok(Analysis { tokens, spans })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::patterns::{WorldSnapshot, generate_patterns};
    use crate::nlp::tagger::LexiconTagger;

    fn recognizer(world: &WorldSnapshot) -> EntityRecognizer {
        EntityRecognizer::new(
            Box::new(LexiconTagger::bundled().unwrap()),
            generate_patterns(world),
        )
    }

    fn labels(analysis: &Analysis) -> Vec<(EntityLabel, &str)> {
        analysis.spans.iter().map(|s| (s.label, s.id.as_str())).collect()
    }

    #[test]
    fn longest_match_beats_shorter_direction() {
        let world = WorldSnapshot::new().with_object("north_door", "north door", &[]);
        let analysis = recognizer(&world).analyze("open the north door").unwrap();
        assert_eq!(labels(&analysis), vec![(EntityLabel::GameObject, "north_door")]);
    }

    #[test]
    fn hyphenated_and_two_word_directions() {
        let rec = recognizer(&WorldSnapshot::new());
        let hyphen = rec.analyze("go north-east").unwrap();
        assert_eq!(labels(&hyphen), vec![(EntityLabel::Direction, "northeast")]);
        let spaced = rec.analyze("go south west").unwrap();
        assert_eq!(labels(&spaced), vec![(EntityLabel::Direction, "southwest")]);
    }

    #[test]
    fn direction_adjective_matches_by_lemma() {
        let world = WorldSnapshot::new().with_object("console", "console", &[]);
        let analysis = recognizer(&world).analyze("walk to the northern console, quickly").unwrap();
        assert_eq!(analysis.first(EntityLabel::Direction).unwrap().id, "north");
        assert_eq!(analysis.first(EntityLabel::GameObject).unwrap().id, "console");
    }

    #[test]
    fn later_registered_object_wins_identical_text() {
        let world = WorldSnapshot::new()
            .with_object("brass_key", "key", &[])
            .with_object("iron_key", "key", &[]);
        let analysis = recognizer(&world).analyze("take key").unwrap();
        assert_eq!(analysis.object_id_for("key"), Some("iron_key"));
    }

    #[test]
    fn compound_span_overlaps_object_spans() {
        let world = WorldSnapshot::new()
            .with_object("door", "door", &[])
            .with_object("keycard", "keycard", &[]);
        let analysis = recognizer(&world).analyze("unlock the door with the keycard").unwrap();
        let compound = analysis.first(EntityLabel::UnlockWithKey).unwrap();
        assert_eq!((compound.start, compound.end), (0, 6));
        assert_eq!(analysis.object_id_for("door"), Some("door"));
        assert_eq!(analysis.object_id_for("keycard"), Some("keycard"));
    }

    #[test]
    fn patterns_overwrite_tagger_guesses() {
        let world = WorldSnapshot::new().with_object("crate_two", "crate 2", &[]);
        let analysis = recognizer(&world).analyze("open crate 2 and box 3").unwrap();
        assert_eq!(
            labels(&analysis),
            vec![(EntityLabel::GameObject, "crate_two"), (EntityLabel::Cardinal, "3")]
        );
    }

    #[test]
    fn rebuild_swaps_the_table() {
        let mut rec = recognizer(&WorldSnapshot::new());
        assert!(rec.analyze("take lamp").unwrap().first(EntityLabel::GameObject).is_none());
        rec.rebuild(generate_patterns(&WorldSnapshot::new().with_object("lamp", "lamp", &[])));
        assert_eq!(rec.analyze("take lamp").unwrap().object_id_for("lamp"), Some("lamp"));
    }

    #[test]
    fn defective_patterns_are_rejected() {
        let table = PatternTable::compile(vec![EntityPattern {
            label: EntityLabel::GameObject,
            elements: Vec::new(),
            stable_id: "ghost".into(),
        }]);
        assert!(table.is_empty());
    }
}
