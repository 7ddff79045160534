//! Single-target extraction for commands without a two-object structure.

use super::annotation::{EntityLabel, PartOfSpeech, join_tokens};
use super::recognizer::Analysis;
use super::structure::TargetRef;

const TARGET_TAGS: &[PartOfSpeech] = &[
    PartOfSpeech::Noun,
    PartOfSpeech::Propn,
    PartOfSpeech::Adj,
    PartOfSpeech::Det,
    PartOfSpeech::Num,
];

/// Pick the primary target of a command.
///
/// In order: the last recognized object; else the noun-phrase tokens after the
/// trigger verb; else, when no verb matched at all, the first noun.
pub fn extract_target(analysis: &Analysis, trigger: Option<usize>) -> Option<TargetRef> {
    if let Some(span) = analysis.last(EntityLabel::GameObject) {
        return Some(TargetRef {
            text: span.text.clone(),
            object_id: Some(span.id.clone()),
        });
    }

    let text = match trigger {
        Some(trigger) => join_tokens(
            analysis
                .tokens
                .iter()
                .skip(trigger + 1)
                .filter(|t| TARGET_TAGS.contains(&t.pos)),
        ),
        None => analysis
            .tokens
            .iter()
            .find(|t| matches!(t.pos, PartOfSpeech::Noun | PartOfSpeech::Propn))
            .map(|t| t.lower())
            .unwrap_or_default(),
    };
    (!text.is_empty()).then_some(TargetRef { text, object_id: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::patterns::{WorldSnapshot, generate_patterns};
    use crate::nlp::recognizer::EntityRecognizer;
    use crate::nlp::scorer::score_tokens;
    use crate::nlp::tagger::LexiconTagger;
    use crate::nlp::vocabulary::Vocabulary;

    fn target(text: &str) -> Option<TargetRef> {
        let world = WorldSnapshot::new()
            .with_object("torch", "torch", &["lamp"])
            .with_object("wrench", "wrench", &[]);
        let recognizer = EntityRecognizer::new(Box::new(LexiconTagger::bundled().unwrap()), generate_patterns(&world));
        let analysis = recognizer.analyze(text).unwrap();
        let scores = score_tokens(&Vocabulary::builtin().unwrap(), &analysis.tokens);
        extract_target(&analysis, scores.trigger())
    }

    #[test]
    fn last_recognized_object_wins() {
        let found = target("compare the torch and the wrench").unwrap();
        assert_eq!(found.text, "wrench");
        assert_eq!(found.object_id.as_deref(), Some("wrench"));
    }

    #[test]
    fn noun_phrase_after_trigger() {
        let found = target("examine the strange device").unwrap();
        assert_eq!(found.text, "the strange device");
        assert!(found.object_id.is_none());
    }

    #[test]
    fn first_noun_without_trigger() {
        let found = target("blorp the gizmo").unwrap();
        assert_eq!(found.text, "gizmo");
    }

    #[test]
    fn nothing_to_extract() {
        assert!(target("xyzzy quux").is_none());
        assert!(target("look").is_none());
    }
}
