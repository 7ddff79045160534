//! Natural-language command parsing.
//!
//! Input flows through the tagger, the entity recognizer, verb scoring, the
//! structured two-object parser and intent resolution before a fallback target
//! extraction fills in whatever structure could not.

pub mod annotation;
pub mod fallback;
pub mod parser;
pub mod patterns;
pub mod recognizer;
pub mod resolver;
pub mod scorer;
pub mod structure;
pub mod tagger;
pub mod vocabulary;

pub use annotation::{EntityLabel, EntitySpan, PartOfSpeech, TokenAnnotation};
pub use parser::{CommandParser, ParserError};
pub use patterns::{WorldSnapshot, canonical_direction, generate_patterns};
pub use recognizer::{Analysis, EntityRecognizer};
pub use tagger::{LexiconTagger, Tagger, TaggerError};
pub use vocabulary::Vocabulary;
