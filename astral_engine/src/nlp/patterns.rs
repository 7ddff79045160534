//! World-derived entity patterns.
//!
//! [`generate_patterns`] turns a [`WorldSnapshot`] into the pattern list the
//! recognizer matches against: compass directions in every spelling, object
//! names and aliases, room areas, and the lock/unlock-with-key compounds.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::Serialize;

use super::annotation::{EntityLabel, PartOfSpeech, TokenAnnotation};
use super::tagger::{TokenKind, tokenize};

/// Canonical compass directions.
pub const CANONICAL_DIRECTIONS: [&str; 10] = [
    "north",
    "south",
    "east",
    "west",
    "up",
    "down",
    "northeast",
    "northwest",
    "southeast",
    "southwest",
];

/// Single- and two-letter abbreviations.
const DIRECTION_ABBREVIATIONS: [(&str, &str); 10] = [
    ("n", "north"),
    ("s", "south"),
    ("e", "east"),
    ("w", "west"),
    ("u", "up"),
    ("d", "down"),
    ("ne", "northeast"),
    ("nw", "northwest"),
    ("se", "southeast"),
    ("sw", "southwest"),
];

/// Diagonals that may also be written as two words or hyphenated.
const COMPOUND_DIRECTIONS: [(&str, &str, &str); 4] = [
    ("north", "east", "northeast"),
    ("north", "west", "northwest"),
    ("south", "east", "southeast"),
    ("south", "west", "southwest"),
];

/// Map any spelling of a direction to its canonical form.
pub fn canonical_direction(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    if let Some(canon) = CANONICAL_DIRECTIONS.iter().copied().find(|d| *d == lower) {
        return Some(canon);
    }
    if let Some((_, canon)) = DIRECTION_ABBREVIATIONS.iter().copied().find(|(abbr, _)| *abbr == lower) {
        return Some(canon);
    }
    let squashed: String = lower.chars().filter(|c| c.is_alphabetic()).collect();
    CANONICAL_DIRECTIONS.iter().find(|d| **d == squashed).copied()
}

/// Test applied to a single token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenTest {
    /// Lower-cased surface equals the literal.
    Lower(String),
    /// Lemma or lower-cased surface equals the literal.
    Lemma(String),
    /// Punctuation token with this text.
    Punct(String),
    /// Lower-cased surface is one of the literals.
    OneOf(Vec<String>),
    /// Any non-punctuation token.
    Word,
}

impl TokenTest {
    pub fn accepts(&self, token: &TokenAnnotation) -> bool {
        match self {
            TokenTest::Lower(lit) => token.lower() == *lit,
            TokenTest::Lemma(lit) => token.lemma == *lit || token.lower() == *lit,
            TokenTest::Punct(lit) => token.pos == PartOfSpeech::Punct && token.text == *lit,
            TokenTest::OneOf(options) => {
                let lower = token.lower();
                options.iter().any(|o| *o == lower)
            },
            TokenTest::Word => token.pos != PartOfSpeech::Punct,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            TokenTest::Lower(lit) | TokenTest::Lemma(lit) | TokenTest::Punct(lit) => lit.trim().is_empty(),
            TokenTest::OneOf(options) => options.is_empty(),
            TokenTest::Word => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Repeat {
    Once,
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternElement {
    pub test: TokenTest,
    pub repeat: Repeat,
}

impl PatternElement {
    pub fn once(test: TokenTest) -> Self {
        Self {
            test,
            repeat: Repeat::Once,
        }
    }

    pub fn one_or_more(test: TokenTest) -> Self {
        Self {
            test,
            repeat: Repeat::OneOrMore,
        }
    }
}

/// A labelled token-sequence pattern carrying a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPattern {
    pub label: EntityLabel,
    pub elements: Vec<PatternElement>,
    pub stable_id: String,
}

impl EntityPattern {
    /// Reason this pattern cannot be matched, if any.
    pub fn defect(&self) -> Option<&'static str> {
        if self.elements.is_empty() {
            Some("pattern has no token tests")
        } else if self.elements.iter().any(|e| e.test.is_blank()) {
            Some("pattern contains a blank token test")
        } else if self.stable_id.trim().is_empty() {
            Some("pattern has an empty id")
        } else {
            None
        }
    }
}

/// Names and aliases of one object, as seen by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotObject {
    pub name: Option<String>,
    pub synonyms: Vec<String>,
    pub command_aliases: Vec<String>,
}

/// An area inside a room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotArea {
    pub area_id: String,
    pub name: Option<String>,
    pub aliases: Vec<String>,
}

/// Read-only view of the world used to build patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldSnapshot {
    pub objects: BTreeMap<String, SnapshotObject>,
    pub rooms: BTreeMap<String, Vec<SnapshotArea>>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder helper: add an object with a name and synonyms.
    #[must_use]
    pub fn with_object(mut self, id: &str, name: &str, synonyms: &[&str]) -> Self {
        self.objects.insert(
            id.to_string(),
            SnapshotObject {
                name: Some(name.to_string()),
                synonyms: synonyms.iter().map(ToString::to_string).collect(),
                command_aliases: Vec::new(),
            },
        );
        self
    }

    /// Builder helper: add an area to a room (creating the room if needed).
    #[must_use]
    pub fn with_area(mut self, room_id: &str, area_id: &str, name: Option<&str>, aliases: &[&str]) -> Self {
        self.rooms.entry(room_id.to_string()).or_default().push(SnapshotArea {
            area_id: area_id.to_string(),
            name: name.map(ToString::to_string),
            aliases: aliases.iter().map(ToString::to_string).collect(),
        });
        self
    }
}

/// Build the full pattern list for a world: directions, objects, areas, then compounds.
///
/// Later patterns take precedence over earlier ones when two match the same span.
pub fn generate_patterns(world: &WorldSnapshot) -> Vec<EntityPattern> {
    let mut patterns = direction_patterns();
    patterns.extend(object_patterns(world));
    patterns.extend(area_patterns(world));
    patterns.extend(compound_patterns());
    debug!("generated {} entity patterns", patterns.len());
    patterns
}

fn direction_patterns() -> Vec<EntityPattern> {
    let mut patterns = Vec::new();
    let direction = |elements: Vec<PatternElement>, id: &str| EntityPattern {
        label: EntityLabel::Direction,
        elements,
        stable_id: id.to_string(),
    };
    let lemma = |word: &str| PatternElement::once(TokenTest::Lemma(word.to_string()));

    for canon in CANONICAL_DIRECTIONS {
        patterns.push(direction(vec![lemma(canon)], canon));
    }
    for (abbr, canon) in DIRECTION_ABBREVIATIONS {
        patterns.push(direction(
            vec![PatternElement::once(TokenTest::Lower(abbr.to_string()))],
            canon,
        ));
    }
    for (first, second, canon) in COMPOUND_DIRECTIONS {
        patterns.push(direction(vec![lemma(first), lemma(second)], canon));
        patterns.push(direction(
            vec![
                lemma(first),
                PatternElement::once(TokenTest::Punct("-".to_string())),
                lemma(second),
            ],
            canon,
        ));
    }
    patterns
}

/// Lower-cased tokens of a phrase, split the same way commands are.
fn phrase_tests(phrase: &str) -> Option<Vec<PatternElement>> {
    let tokens = match tokenize(&phrase.to_lowercase()) {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!("skipping phrase '{phrase}': {err}");
            return None;
        },
    };
    if tokens.is_empty() {
        return None;
    }
    Some(
        tokens
            .into_iter()
            .map(|token| match token.kind {
                TokenKind::Punct => PatternElement::once(TokenTest::Punct(token.text)),
                _ => PatternElement::once(TokenTest::Lower(token.text)),
            })
            .collect(),
    )
}

/// Deduplicated, lower-cased, non-empty phrases in first-seen order.
fn distinct_phrases<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut phrases = Vec::new();
    for candidate in candidates {
        let phrase = candidate.trim().to_lowercase();
        if !phrase.is_empty() && seen.insert(phrase.clone()) {
            phrases.push(phrase);
        }
    }
    phrases
}

fn object_patterns(world: &WorldSnapshot) -> Vec<EntityPattern> {
    let mut patterns = Vec::new();
    for (id, object) in &world.objects {
        match object.name.as_deref().map(str::trim) {
            None | Some("") => {
                debug!("object '{id}' has no usable name; only its aliases are matched");
            },
            Some(_) => {},
        }
        let candidates = object
            .name
            .iter()
            .chain(&object.synonyms)
            .chain(&object.command_aliases)
            .map(String::as_str);
        for phrase in distinct_phrases(candidates) {
            if let Some(elements) = phrase_tests(&phrase) {
                patterns.push(EntityPattern {
                    label: EntityLabel::GameObject,
                    elements,
                    stable_id: id.clone(),
                });
            }
        }
    }
    patterns
}

/// Three-letter abbreviation from the first underscore-delimited segment of an id.
fn area_abbreviation(area_id: &str) -> Option<String> {
    let first = area_id.split('_').next()?;
    (first.chars().count() >= 3).then(|| first.chars().take(3).collect())
}

fn area_patterns(world: &WorldSnapshot) -> Vec<EntityPattern> {
    let mut patterns = Vec::new();
    for (room_id, areas) in &world.rooms {
        for area in areas {
            if area.area_id.trim().is_empty() {
                debug!("skipping area with empty id in room '{room_id}'");
                continue;
            }
            let spaced = area.area_id.replace('_', " ");
            let abbreviation = area_abbreviation(&area.area_id);
            let candidates = [Some(area.area_id.as_str()), Some(spaced.as_str()), abbreviation.as_deref()]
                .into_iter()
                .flatten()
                .chain(area.name.as_deref())
                .chain(area.aliases.iter().map(String::as_str));
            for phrase in distinct_phrases(candidates) {
                if let Some(elements) = phrase_tests(&phrase) {
                    patterns.push(EntityPattern {
                        label: EntityLabel::Area,
                        elements,
                        stable_id: area.area_id.clone(),
                    });
                }
            }
        }
    }
    patterns
}

fn compound_patterns() -> Vec<EntityPattern> {
    let compound = |verb: &str, label: EntityLabel, id: &str| EntityPattern {
        label,
        elements: vec![
            PatternElement::once(TokenTest::Lemma(verb.to_string())),
            PatternElement::one_or_more(TokenTest::Word),
            PatternElement::once(TokenTest::OneOf(vec!["with".to_string(), "using".to_string()])),
            PatternElement::one_or_more(TokenTest::Word),
        ],
        stable_id: id.to_string(),
    };
    vec![
        compound("lock", EntityLabel::LockWithKey, "lock_with_key"),
        compound("unlock", EntityLabel::UnlockWithKey, "unlock_with_key"),
    ]
}
