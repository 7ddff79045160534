//! Part-of-speech tagging.
//!
//! The [`Tagger`] trait is the seam between the command pipeline and whatever
//! produces token annotations. [`LexiconTagger`] is the bundled implementation:
//! a pest tokenizer, a TOML lexicon of word classes and a handful of suffix rules
//! for lemmas and open-class tags.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::debug;
use pest::Parser;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use super::annotation::{EntityLabel, EntitySpan, PartOfSpeech, TokenAnnotation};

const BUNDLED_LEXICON: &str = include_str!("../../data/lexicon.toml");

/// Commands longer than this are rejected rather than tagged.
pub const MAX_TOKENS: usize = 64;

mod grammar {
    #[derive(pest_derive::Parser)]
    #[grammar = "nlp/command.pest"]
    pub struct CommandGrammar;
}

use grammar::{CommandGrammar, Rule};

lazy_static! {
    static ref SIBILANT_END: Regex = Regex::new(r"(s|x|z|ch|sh)$").expect("valid regex");
    static ref ADJECTIVE_SUFFIX: Regex = Regex::new(r"^[a-z]{3,}(ous|ful|ern|ish|able|ible|less|ical)$").expect("valid regex");
    static ref ADVERB_SUFFIX: Regex = Regex::new(r"^[a-z]{3,}ly$").expect("valid regex");
    static ref DIGIT_ORDINAL: Regex = Regex::new(r"^\d+(st|nd|rd|th)$").expect("valid regex");
}

/// Tags that may directly precede a verb in an imperative or declarative command.
const VERB_CONTEXT: &[PartOfSpeech] = &[
    PartOfSpeech::Pron,
    PartOfSpeech::Aux,
    PartOfSpeech::Part,
    PartOfSpeech::Cconj,
    PartOfSpeech::Adv,
    PartOfSpeech::Punct,
];

/// Tags after which an unknown word is taken to be a noun.
const NOUN_CONTEXT: &[PartOfSpeech] = &[
    PartOfSpeech::Det,
    PartOfSpeech::Adj,
    PartOfSpeech::Verb,
    PartOfSpeech::Adp,
    PartOfSpeech::Num,
    PartOfSpeech::Noun,
    PartOfSpeech::Propn,
];

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("lexicon is not valid TOML: {0}")]
    Lexicon(#[from] toml::de::Error),
    #[error("lexicon has no entries for required word class '{0}'")]
    IncompleteLexicon(&'static str),
    #[error("could not tokenize input: {0}")]
    Tokenize(String),
    #[error("command has {count} tokens, more than the limit of {limit}")]
    TooLong { count: usize, limit: usize },
}

/// Produces token annotations for a command and the tagger's own entity guesses.
pub trait Tagger {
    /// Tokenize, tag and lemmatize `text`.
    ///
    /// # Errors
    /// Returns an error when the input cannot be tokenized or tagged.
    fn annotate(&self, text: &str) -> Result<Vec<TokenAnnotation>, TaggerError>;

    /// Generic entity guesses (numbers, ordinals) that world patterns may overwrite.
    fn entity_guesses(&self, tokens: &[TokenAnnotation]) -> Vec<EntitySpan> {
        let _ = tokens;
        Vec::new()
    }
}

/// Lexical class of a raw token as produced by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    Contraction,
    Punct,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub kind: TokenKind,
}

/// Split text into raw tokens using the command grammar.
///
/// # Errors
/// Returns [`TaggerError::Tokenize`] if the grammar rejects the input.
pub fn tokenize(text: &str) -> Result<Vec<RawToken>, TaggerError> {
    let mut pairs = CommandGrammar::parse(Rule::command, text).map_err(|e| TaggerError::Tokenize(e.to_string()))?;
    let Some(command) = pairs.next() else {
        return Ok(Vec::new());
    };
    let mut tokens = Vec::new();
    for pair in command.into_inner() {
        let kind = match pair.as_rule() {
            Rule::word => TokenKind::Word,
            Rule::number => TokenKind::Number,
            Rule::contraction => TokenKind::Contraction,
            Rule::punct => TokenKind::Punct,
            Rule::other => TokenKind::Other,
            _ => continue,
        };
        tokens.push(RawToken {
            text: pair.as_str().to_string(),
            kind,
        });
    }
    Ok(tokens)
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    determiners: Vec<String>,
    adpositions: Vec<String>,
    pronouns: Vec<String>,
    conjunctions: Vec<String>,
    auxiliaries: Vec<String>,
    particles: Vec<String>,
    adverbs: Vec<String>,
    number_words: Vec<String>,
    ordinal_words: Vec<String>,
    verbs: Vec<String>,
    #[serde(default)]
    nouns: Vec<String>,
    #[serde(default)]
    adjectives: Vec<String>,
    #[serde(default)]
    lemmas: HashMap<String, String>,
}

fn word_set(words: Vec<String>) -> HashSet<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

/// Word classes used by [`LexiconTagger`].
#[derive(Debug, Clone)]
pub struct Lexicon {
    determiners: HashSet<String>,
    adpositions: HashSet<String>,
    pronouns: HashSet<String>,
    conjunctions: HashSet<String>,
    auxiliaries: HashSet<String>,
    particles: HashSet<String>,
    adverbs: HashSet<String>,
    number_words: HashSet<String>,
    ordinal_words: HashSet<String>,
    verbs: HashSet<String>,
    nouns: HashSet<String>,
    adjectives: HashSet<String>,
    lemmas: HashMap<String, String>,
}

impl Lexicon {
    /// Parse a lexicon from TOML text.
    ///
    /// # Errors
    /// Fails on invalid TOML or when a required closed class is empty.
    pub fn from_toml_str(text: &str) -> Result<Self, TaggerError> {
        let file: LexiconFile = toml::from_str(text)?;
        if file.verbs.is_empty() {
            return Err(TaggerError::IncompleteLexicon("verbs"));
        }
        if file.determiners.is_empty() {
            return Err(TaggerError::IncompleteLexicon("determiners"));
        }
        if file.adpositions.is_empty() {
            return Err(TaggerError::IncompleteLexicon("adpositions"));
        }
        Ok(Self {
            determiners: word_set(file.determiners),
            adpositions: word_set(file.adpositions),
            pronouns: word_set(file.pronouns),
            conjunctions: word_set(file.conjunctions),
            auxiliaries: word_set(file.auxiliaries),
            particles: word_set(file.particles),
            adverbs: word_set(file.adverbs),
            number_words: word_set(file.number_words),
            ordinal_words: word_set(file.ordinal_words),
            verbs: word_set(file.verbs),
            nouns: word_set(file.nouns),
            adjectives: word_set(file.adjectives),
            lemmas: file
                .lemmas
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect(),
        })
    }

    fn is_known(&self, word: &str) -> bool {
        self.verbs.contains(word) || self.nouns.contains(word) || self.adjectives.contains(word)
    }

    /// Verb lemma for an inflection stem: the stem itself, the stem plus `e`, or the
    /// stem with a doubled final consonant removed.
    fn verb_stem(&self, stem: &str) -> Option<String> {
        if stem.len() < 2 {
            return None;
        }
        if self.verbs.contains(stem) {
            return Some(stem.to_string());
        }
        let with_e = format!("{stem}e");
        if self.verbs.contains(&with_e) {
            return Some(with_e);
        }
        let mut chars = stem.chars().rev();
        if let (Some(last), Some(before)) = (chars.next(), chars.next())
            && last == before
        {
            let undoubled = &stem[..stem.len() - last.len_utf8()];
            if self.verbs.contains(undoubled) {
                return Some(undoubled.to_string());
            }
        }
        None
    }

    /// Reduce a lower-cased word to its lemma.
    pub fn lemmatize(&self, lower: &str) -> String {
        if let Some(lemma) = self.lemmas.get(lower) {
            return lemma.clone();
        }
        if lower.chars().count() <= 3 || !lower.chars().all(char::is_alphabetic) || self.is_known(lower) {
            return lower.to_string();
        }
        if let Some(stem) = lower.strip_suffix("ies")
            && stem.len() >= 3
        {
            return format!("{stem}y");
        }
        if let Some(lemma) = lower.strip_suffix("ing").and_then(|stem| self.verb_stem(stem)) {
            return lemma;
        }
        if let Some(lemma) = lower.strip_suffix("ed").and_then(|stem| self.verb_stem(stem)) {
            return lemma;
        }
        if let Some(stem) = lower.strip_suffix('s') {
            if self.is_known(stem) {
                return stem.to_string();
            }
            if let Some(es_stem) = lower.strip_suffix("es")
                && SIBILANT_END.is_match(es_stem)
            {
                return es_stem.to_string();
            }
            if !(lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is")) {
                return stem.to_string();
            }
        }
        lower.to_string()
    }
}

/// Rule-based tagger backed by a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: Lexicon,
}

impl LexiconTagger {
    /// Tagger using the lexicon embedded in the engine.
    ///
    /// # Errors
    /// Returns an error if the embedded lexicon is malformed or incomplete.
    pub fn bundled() -> Result<Self, TaggerError> {
        Self::from_toml_str(BUNDLED_LEXICON)
    }

    /// # Errors
    /// Returns an error if `text` is not a valid lexicon.
    pub fn from_toml_str(text: &str) -> Result<Self, TaggerError> {
        Ok(Self {
            lexicon: Lexicon::from_toml_str(text)?,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn closed_class(&self, lower: &str) -> Option<PartOfSpeech> {
        let lex = &self.lexicon;
        let pos = if lex.determiners.contains(lower) {
            PartOfSpeech::Det
        } else if lex.adpositions.contains(lower) {
            PartOfSpeech::Adp
        } else if lex.number_words.contains(lower) {
            PartOfSpeech::Num
        } else if lex.pronouns.contains(lower) {
            PartOfSpeech::Pron
        } else if lex.conjunctions.contains(lower) {
            PartOfSpeech::Cconj
        } else if lex.auxiliaries.contains(lower) {
            PartOfSpeech::Aux
        } else if lex.particles.contains(lower) {
            PartOfSpeech::Part
        } else if lex.adverbs.contains(lower) {
            PartOfSpeech::Adv
        } else {
            return None;
        };
        Some(pos)
    }

    fn tag_word(&self, lower: &str, lemma: &str, prev: Option<PartOfSpeech>, next_lemma: Option<&str>) -> PartOfSpeech {
        let lex = &self.lexicon;
        if lower == "to" {
            return if next_lemma.is_some_and(|next| lex.verbs.contains(next)) {
                PartOfSpeech::Part
            } else {
                PartOfSpeech::Adp
            };
        }
        if let Some(pos) = self.closed_class(lower) {
            return pos;
        }
        if lower.contains('_') {
            return PartOfSpeech::Propn;
        }
        if lex.verbs.contains(lemma) && prev.is_none_or(|p| VERB_CONTEXT.contains(&p)) {
            return PartOfSpeech::Verb;
        }
        if ADVERB_SUFFIX.is_match(lower) && !lex.verbs.contains(lemma) {
            return PartOfSpeech::Adv;
        }
        if lex.ordinal_words.contains(lower) || lex.adjectives.contains(lower) || ADJECTIVE_SUFFIX.is_match(lower) {
            return PartOfSpeech::Adj;
        }
        if lex.nouns.contains(lemma) || prev.is_some_and(|p| NOUN_CONTEXT.contains(&p)) {
            return PartOfSpeech::Noun;
        }
        PartOfSpeech::X
    }

    fn is_ordinal(&self, lower: &str) -> bool {
        self.lexicon.ordinal_words.contains(lower) || DIGIT_ORDINAL.is_match(lower)
    }
}

impl Tagger for LexiconTagger {
    fn annotate(&self, text: &str) -> Result<Vec<TokenAnnotation>, TaggerError> {
        let raw = tokenize(text)?;
        if raw.len() > MAX_TOKENS {
            return Err(TaggerError::TooLong {
                count: raw.len(),
                limit: MAX_TOKENS,
            });
        }

        let lemmas: Vec<String> = raw
            .iter()
            .map(|token| {
                let lower = token.text.to_lowercase();
                match token.kind {
                    TokenKind::Word => self.lexicon.lemmatize(&lower),
                    _ => lower,
                }
            })
            .collect();

        let mut annotations: Vec<TokenAnnotation> = Vec::with_capacity(raw.len());
        for (index, token) in raw.iter().enumerate() {
            let prev = annotations.last().map(|a| a.pos);
            let pos = match token.kind {
                TokenKind::Number => PartOfSpeech::Num,
                TokenKind::Punct => PartOfSpeech::Punct,
                TokenKind::Contraction => PartOfSpeech::Part,
                TokenKind::Other => PartOfSpeech::X,
                TokenKind::Word => {
                    let next_lemma = raw
                        .get(index + 1)
                        .filter(|next| next.kind == TokenKind::Word)
                        .map(|_| lemmas[index + 1].as_str());
                    self.tag_word(&token.text.to_lowercase(), &lemmas[index], prev, next_lemma)
                },
            };
            annotations.push(TokenAnnotation {
                text: token.text.clone(),
                pos,
                lemma: lemmas[index].clone(),
                index,
            });
        }
        debug!(
            "tagged: {:?}",
            annotations
                .iter()
                .map(|a| format!("{}/{:?}/{}", a.text, a.pos, a.lemma))
                .collect::<Vec<_>>()
        );
        Ok(annotations)
    }

    fn entity_guesses(&self, tokens: &[TokenAnnotation]) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut index = 0;
        while index < tokens.len() {
            let lower = tokens[index].lower();
            if self.is_ordinal(&lower) {
                spans.push(EntitySpan::over(tokens, index, index + 1, EntityLabel::Ordinal, &lower));
                index += 1;
            } else if tokens[index].pos.is_num() {
                let start = index;
                while index < tokens.len() && tokens[index].pos.is_num() && !self.is_ordinal(&tokens[index].lower()) {
                    index += 1;
                }
                let span = EntitySpan::over(tokens, start, index, EntityLabel::Cardinal, "");
                let id = span.text.clone();
                spans.push(EntitySpan { id, ..span });
            } else {
                index += 1;
            }
        }
        spans
    }
}
