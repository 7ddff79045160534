//! Two-object command structures: `verb target preposition target`.
//!
//! Tried in order: a compound lock/unlock-with-key span from the recognizer, then
//! a scan for a container preposition after the trigger verb.

use log::{debug, warn};

use super::annotation::{EntityLabel, PartOfSpeech, TokenAnnotation, join_tokens};
use super::recognizer::Analysis;
use super::scorer::IntentScores;
use crate::command::CommandIntent;

/// Prepositions that introduce the second object of a container command.
pub const TARGET_PREPOSITIONS: &[&str] = &["in", "on", "into", "onto", "from"];
const KEY_PREPOSITIONS: &[&str] = &["with", "using"];
const PUT_VERBS: &[&str] = &["put", "place", "insert", "store"];
const TAKE_FROM_VERBS: &[&str] = &["take", "get", "retrieve", "remove", "extract", "withdraw"];

/// Text of a command argument plus the object id it was recognized as, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub text: String,
    pub object_id: Option<String>,
}

impl TargetRef {
    fn resolve(analysis: &Analysis, tokens: &[&TokenAnnotation]) -> Self {
        let text = join_tokens(tokens.iter().copied());
        let object_id = analysis.object_id_for(&text).map(ToString::to_string);
        Self { text, object_id }
    }
}

/// A successfully parsed two-object command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCommand {
    pub intent: CommandIntent,
    pub verb: String,
    pub target: TargetRef,
    pub preposition: String,
    pub secondary: TargetRef,
}

/// Drop a single leading determiner ("the keycard" -> "keycard").
fn strip_determiner<'a>(tokens: &'a [&'a TokenAnnotation]) -> &'a [&'a TokenAnnotation] {
    match tokens.split_first() {
        Some((first, rest)) if first.pos == PartOfSpeech::Det => rest,
        _ => tokens,
    }
}

/// Tokens of an argument segment, without adpositions or punctuation.
fn argument_tokens(range: &[TokenAnnotation]) -> Vec<&TokenAnnotation> {
    range
        .iter()
        .filter(|t| !matches!(t.pos, PartOfSpeech::Adp | PartOfSpeech::Punct))
        .collect()
}

/// Try both structured strategies; `None` if neither applies.
pub fn parse_structured(analysis: &Analysis, scores: &IntentScores) -> Option<StructuredCommand> {
    if let Some(found) = from_compound_span(analysis) {
        return Some(found);
    }
    if !(scores.contains(CommandIntent::Put) || scores.contains(CommandIntent::TakeFrom)) {
        return None;
    }
    let trigger = scores.trigger()?;
    from_preposition_scan(analysis, trigger)
}

fn from_compound_span(analysis: &Analysis) -> Option<StructuredCommand> {
    // the pattern also matches the noun in "smash the lock with the wrench"
    let span = analysis
        .spans
        .iter()
        .find(|span| span.label.is_compound() && analysis.tokens[span.start].pos == PartOfSpeech::Verb)?;
    let intent = match span.label {
        EntityLabel::LockWithKey => CommandIntent::Lock,
        EntityLabel::UnlockWithKey => CommandIntent::Unlock,
        _ => return None,
    };
    let tokens = &analysis.tokens[span.start..span.end];
    let (verb, rest) = tokens.split_first()?;
    let is_key_preposition = |t: &TokenAnnotation| KEY_PREPOSITIONS.contains(&t.lower().as_str());
    let boundary = rest.iter().position(is_key_preposition)?;
    let key_end = rest[boundary + 1..]
        .iter()
        .position(is_key_preposition)
        .map_or(rest.len(), |offset| boundary + 1 + offset);
    if key_end < rest.len() {
        debug!("ignoring '{}' after the key", join_tokens(rest[key_end..].iter()));
    }

    let before = argument_tokens(&rest[..boundary]);
    let after = argument_tokens(&rest[boundary + 1..key_end]);
    let before = strip_determiner(&before);
    let after = strip_determiner(&after);
    if before.is_empty() || after.is_empty() {
        debug!("compound {intent} span is missing a target or a key");
        return None;
    }
    Some(StructuredCommand {
        intent,
        verb: verb.lemma.clone(),
        target: TargetRef::resolve(analysis, before),
        preposition: rest[boundary].lower(),
        secondary: TargetRef::resolve(analysis, after),
    })
}

fn from_preposition_scan(analysis: &Analysis, trigger: usize) -> Option<StructuredCommand> {
    let tokens = &analysis.tokens;
    let verb = tokens.get(trigger)?;
    let prep_index = tokens
        .iter()
        .skip(trigger + 1)
        .find(|t| t.pos == PartOfSpeech::Adp && TARGET_PREPOSITIONS.contains(&t.lower().as_str()))?
        .index;
    let preposition = tokens[prep_index].lower();

    let first = argument_tokens(&tokens[trigger + 1..prep_index]);
    let second = argument_tokens(&tokens[prep_index + 1..]);
    let first = strip_determiner(&first);
    let second = strip_determiner(&second);
    if first.is_empty() || second.is_empty() {
        debug!("preposition '{preposition}' found but an argument is empty");
        return None;
    }

    let lemma = verb.lemma.as_str();
    let intent = if PUT_VERBS.contains(&lemma) && preposition != "from" {
        CommandIntent::Put
    } else if TAKE_FROM_VERBS.contains(&lemma) && preposition == "from" {
        CommandIntent::TakeFrom
    } else {
        warn!("verb '{lemma}' does not pair with preposition '{preposition}'; ignoring structure");
        return None;
    };

    Some(StructuredCommand {
        intent,
        verb: lemma.to_string(),
        target: TargetRef::resolve(analysis, first),
        preposition,
        secondary: TargetRef::resolve(analysis, second),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::patterns::{WorldSnapshot, generate_patterns};
    use crate::nlp::recognizer::EntityRecognizer;
    use crate::nlp::scorer::score_tokens;
    use crate::nlp::tagger::LexiconTagger;
    use crate::nlp::vocabulary::Vocabulary;

    fn structured(text: &str) -> Option<StructuredCommand> {
        let world = WorldSnapshot::new()
            .with_object("keycard", "keycard", &["card"])
            .with_object("locker", "locker", &[])
            .with_object("wrench", "wrench", &[])
            .with_object("toolbox", "tool box", &["toolbox"])
            .with_object("door", "door", &[]);
        let recognizer = EntityRecognizer::new(Box::new(LexiconTagger::bundled().unwrap()), generate_patterns(&world));
        let analysis = recognizer.analyze(text).unwrap();
        let scores = score_tokens(&Vocabulary::builtin().unwrap(), &analysis.tokens);
        parse_structured(&analysis, &scores)
    }

    #[test]
    fn put_in_container() {
        let cmd = structured("put the keycard in the locker").unwrap();
        assert_eq!(cmd.intent, CommandIntent::Put);
        assert_eq!(cmd.target.text, "keycard");
        assert_eq!(cmd.target.object_id.as_deref(), Some("keycard"));
        assert_eq!(cmd.preposition, "in");
        assert_eq!(cmd.secondary.text, "locker");
        assert_eq!(cmd.secondary.object_id.as_deref(), Some("locker"));
    }

    #[test]
    fn take_from_container() {
        let cmd = structured("take the wrench from the toolbox").unwrap();
        assert_eq!(cmd.intent, CommandIntent::TakeFrom);
        assert_eq!(cmd.verb, "take");
        assert_eq!(cmd.target.text, "wrench");
        assert_eq!(cmd.secondary.text, "toolbox");
        assert_eq!(cmd.secondary.object_id.as_deref(), Some("toolbox"));
    }

    #[test]
    fn unmatched_text_keeps_no_id() {
        let cmd = structured("put the spanner into the crate").unwrap();
        assert_eq!(cmd.intent, CommandIntent::Put);
        assert_eq!(cmd.target.text, "spanner");
        assert!(cmd.target.object_id.is_none());
        assert_eq!(cmd.preposition, "into");
    }

    #[test]
    fn mismatched_verb_and_preposition_fail() {
        assert!(structured("take the wrench in the toolbox").is_none());
        assert!(structured("put the wrench from the toolbox").is_none());
    }

    #[test]
    fn missing_second_argument_fails() {
        assert!(structured("put the keycard in").is_none());
        assert!(structured("put torch").is_none());
    }

    #[test]
    fn unlock_with_key_compound() {
        let cmd = structured("unlock the door with the keycard").unwrap();
        assert_eq!(cmd.intent, CommandIntent::Unlock);
        assert_eq!(cmd.verb, "unlock");
        assert_eq!(cmd.target.text, "door");
        assert_eq!(cmd.target.object_id.as_deref(), Some("door"));
        assert_eq!(cmd.preposition, "with");
        assert_eq!(cmd.secondary.text, "keycard");
        assert_eq!(cmd.secondary.object_id.as_deref(), Some("keycard"));
    }

    #[test]
    fn lock_using_key_compound() {
        let cmd = structured("lock locker using card").unwrap();
        assert_eq!(cmd.intent, CommandIntent::Lock);
        assert_eq!(cmd.target.object_id.as_deref(), Some("locker"));
        assert_eq!(cmd.preposition, "using");
        assert_eq!(cmd.secondary.object_id.as_deref(), Some("keycard"));
    }

    #[test]
    fn compound_needs_both_sides() {
        assert!(structured("unlock with the keycard").is_none());
    }

    #[test]
    fn compound_without_a_key_is_not_structured() {
        assert!(structured("unlock locker with").is_none());
        assert!(structured("lock the door using").is_none());
    }

    #[test]
    fn lock_as_a_noun_is_not_a_compound() {
        assert!(structured("smash the lock on the door with the wrench").is_none());
        assert!(structured("break the lock with the wrench").is_none());
    }

    #[test]
    fn key_stops_at_a_second_with() {
        let cmd = structured("unlock the door with the card with the keycard").unwrap();
        assert_eq!(cmd.intent, CommandIntent::Unlock);
        assert_eq!(cmd.target.text, "door");
        assert_eq!(cmd.preposition, "with");
        assert_eq!(cmd.secondary.text, "card");
        assert_eq!(cmd.secondary.object_id.as_deref(), Some("keycard"));
    }

    #[test]
    fn scan_is_skipped_without_container_intents() {
        assert!(structured("look in the locker").is_none());
    }
}
