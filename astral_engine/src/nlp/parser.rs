//! The command parser: raw player input in, [`ParsedIntent`] out.

use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use super::annotation::{EntityLabel, PartOfSpeech, TokenAnnotation};
use super::fallback::extract_target;
use super::patterns::{WorldSnapshot, canonical_direction, generate_patterns};
use super::recognizer::{Analysis, EntityRecognizer, PatternTable};
use super::resolver::resolve_intent;
use super::scorer::score_tokens;
use super::structure::parse_structured;
use super::tagger::{LexiconTagger, Tagger, TaggerError};
use super::vocabulary::{Vocabulary, VocabularyError};
use crate::command::{CommandIntent, ParsedIntent};

/// Startup failures; the parser cannot run without its tables.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to load the tagger lexicon: {0}")]
    Tagger(#[from] TaggerError),
    #[error("failed to load the intent vocabulary: {0}")]
    Vocabulary(#[from] VocabularyError),
}

/// Single-letter commands recognized before any tagging.
fn shortcut(text: &str, original: &str) -> Option<ParsedIntent> {
    let intent = match text {
        "i" => CommandIntent::Inventory,
        "l" => CommandIntent::Look,
        "q" => CommandIntent::Quit,
        "n" | "s" | "e" | "w" | "u" | "d" => {
            return canonical_direction(text).map(|dir| ParsedIntent::movement(dir, original));
        },
        _ => return None,
    };
    Some(ParsedIntent::bare(intent, original))
}

/// Natural-language command parser owning its compiled world patterns.
pub struct CommandParser {
    recognizer: EntityRecognizer,
    vocabulary: Arc<Vocabulary>,
}

impl CommandParser {
    /// Parser with the bundled tagger and vocabulary.
    ///
    /// # Errors
    /// Fails if the bundled lexicon or vocabulary cannot be loaded.
    pub fn new(world: &WorldSnapshot) -> Result<Self, ParserError> {
        let tagger = LexiconTagger::bundled()?;
        let vocabulary = Vocabulary::builtin()?;
        Ok(Self::with_tagger(Box::new(tagger), vocabulary, world))
    }

    /// Parser with a caller-supplied tagger and vocabulary.
    pub fn with_tagger(tagger: Box<dyn Tagger + Send + Sync>, vocabulary: Vocabulary, world: &WorldSnapshot) -> Self {
        let recognizer = EntityRecognizer::new(tagger, generate_patterns(world));
        info!("command parser ready with {} entity patterns", recognizer.table().len());
        Self {
            recognizer,
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Regenerate the pattern table from a new world snapshot.
    pub fn rebuild(&mut self, world: &WorldSnapshot) {
        self.recognizer.rebuild(generate_patterns(world));
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn patterns(&self) -> &PatternTable {
        self.recognizer.table()
    }

    /// Tag and recognize entities without resolving an intent.
    ///
    /// # Errors
    /// Propagates tagger failures.
    pub fn analyze(&self, input: &str) -> Result<Analysis, TaggerError> {
        self.recognizer.analyze(&input.trim().to_lowercase())
    }

    /// Parse one line of player input.
    pub fn parse(&self, input: &str) -> ParsedIntent {
        let text = input.trim().to_lowercase();
        if text.is_empty() {
            return ParsedIntent::unknown(input);
        }
        if let Some(parsed) = shortcut(&text, input) {
            debug!("shortcut '{text}' -> {}", parsed.intent);
            return parsed;
        }

        let analysis = match self.recognizer.analyze(&text) {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!("could not analyze '{text}': {err}");
                return ParsedIntent::invalid(input);
            },
        };

        if let Some(span) = analysis.first(EntityLabel::Direction) {
            info!("direction '{}' -> MOVE {}", span.text, span.id);
            return ParsedIntent {
                action: first_verb(&analysis.tokens).map(|t| t.lemma.clone()),
                ..ParsedIntent::movement(&span.id, input)
            };
        }

        let scores = score_tokens(&self.vocabulary, &analysis.tokens);
        debug!("intent scores: {:?}", scores.ranked());
        let structured = parse_structured(&analysis, &scores);
        let intent = resolve_intent(&scores, structured.as_ref().map(|s| s.intent));

        let mut parsed = ParsedIntent::bare(intent, input);
        if let Some(cmd) = structured {
            parsed.target = Some(cmd.target.text);
            parsed.target_object_id = cmd.target.object_id;
            parsed.preposition = Some(cmd.preposition);
            parsed.secondary_target = Some(cmd.secondary.text);
            parsed.secondary_target_id = cmd.secondary.object_id;
        } else if let Some(target) = extract_target(&analysis, scores.trigger()) {
            parsed.target = Some(target.text);
            parsed.target_object_id = target.object_id;
        }

        if intent == CommandIntent::Move {
            let Some(area) = analysis.first(EntityLabel::Area) else {
                warn!("'{text}' scored as MOVE but names no direction or area");
                return ParsedIntent::unknown(input);
            };
            parsed.target = Some(area.text.clone());
            parsed.target_object_id = None;
            parsed.area_id = Some(area.id.clone());
        }

        parsed.action = self.action_lemma(&analysis.tokens, scores.trigger(), intent);
        info!(
            "parsed '{text}' -> {} action={:?} target={:?} secondary={:?}",
            parsed.intent, parsed.action, parsed.target, parsed.secondary_target
        );
        parsed
    }

    /// Verb lemma: the tagged verb, else the trigger token, else any token from the intent's verb list.
    fn action_lemma(&self, tokens: &[TokenAnnotation], trigger: Option<usize>, intent: CommandIntent) -> Option<String> {
        if let Some(verb) = first_verb(tokens) {
            return Some(verb.lemma.clone());
        }
        if let Some(token) = trigger.and_then(|i| tokens.get(i)) {
            return Some(token.lemma.clone());
        }
        if intent.is_unknown() {
            return None;
        }
        let verbs = self.vocabulary.verbs_for(intent);
        tokens
            .iter()
            .find(|t| verbs.contains(&t.lower()))
            .map(|t| t.lemma.clone())
    }
}

fn first_verb(tokens: &[TokenAnnotation]) -> Option<&TokenAnnotation> {
    tokens.iter().find(|t| t.pos == PartOfSpeech::Verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CommandParser {
        let world = WorldSnapshot::new()
            .with_object("keycard", "keycard", &["card"])
            .with_object("locker", "locker", &[])
            .with_object("torch", "torch", &[])
            .with_area("bridge", "nav_station", Some("navigation console"), &[]);
        CommandParser::new(&world).unwrap()
    }

    #[test]
    fn empty_input_is_unknown() {
        let parsed = parser().parse("   ");
        assert_eq!(parsed.intent, CommandIntent::Unknown);
        assert_eq!(parsed.original_input, "   ");
    }

    #[test]
    fn shortcuts_bypass_tagging() {
        let p = parser();
        assert_eq!(p.parse("I").intent, CommandIntent::Inventory);
        assert_eq!(p.parse("l").intent, CommandIntent::Look);
        assert_eq!(p.parse("q").intent, CommandIntent::Quit);
        assert_eq!(p.parse(" u ").direction.as_deref(), Some("up"));
    }

    #[test]
    fn direction_fast_path_keeps_the_verb() {
        let parsed = parser().parse("go south");
        assert_eq!(parsed.intent, CommandIntent::Move);
        assert_eq!(parsed.direction.as_deref(), Some("south"));
        assert_eq!(parsed.action.as_deref(), Some("go"));
    }

    #[test]
    fn move_to_area() {
        let parsed = parser().parse("go to the nav station");
        assert_eq!(parsed.intent, CommandIntent::Move);
        assert_eq!(parsed.area_id.as_deref(), Some("nav_station"));
        assert_eq!(parsed.target.as_deref(), Some("nav station"));
        assert!(parsed.direction.is_none());
    }

    #[test]
    fn move_without_destination_is_unknown() {
        let parsed = parser().parse("walk quickly");
        assert_eq!(parsed.intent, CommandIntent::Unknown);
        assert!(parsed.target.is_none());
    }

    #[test]
    fn overlong_input_is_invalid() {
        let input = vec!["look"; 80].join(" ");
        assert_eq!(parser().parse(&input).intent, CommandIntent::Invalid);
    }

    #[test]
    fn single_target_with_object_id() {
        let parsed = parser().parse("examine the keycard");
        assert_eq!(parsed.intent, CommandIntent::Look);
        assert_eq!(parsed.action.as_deref(), Some("examine"));
        assert_eq!(parsed.target.as_deref(), Some("keycard"));
        assert_eq!(parsed.target_object_id.as_deref(), Some("keycard"));
    }

    #[test]
    fn action_falls_back_to_trigger_lemma() {
        // "inventory" is not a lexicon verb, so only the trigger supplies the action
        let parsed = parser().parse("inventory");
        assert_eq!(parsed.intent, CommandIntent::Inventory);
        assert_eq!(parsed.action.as_deref(), Some("inventory"));
    }

    #[test]
    fn rebuild_picks_up_new_objects() {
        let mut p = parser();
        assert!(p.parse("take wrench").target_object_id.is_none());
        p.rebuild(&WorldSnapshot::new().with_object("wrench", "wrench", &[]));
        assert_eq!(p.parse("take wrench").target_object_id.as_deref(), Some("wrench"));
    }
}
