//! Lenient decoders for author-supplied text fields.
//!
//! World files are hand-edited, so a stray number in a synonym list or a list
//! where a name belongs should cost that one entry, not the whole load. These
//! helpers are used with `#[serde(deserialize_with = ...)]` and log what they drop.

use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

/// Decode an optional text value, discarding anything that is not a string.
///
/// # Errors
/// Only fails if the underlying deserializer fails to produce any value at all.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::<String>::deserialize(deserializer)? {
        Loose::Valid(text) => Ok(Some(text)),
        Loose::Malformed(_) => {
            warn!("discarding non-text value where a name was expected");
            Ok(None)
        },
    }
}

/// Decode a list of text values, dropping non-string members.
///
/// A value that is not a list at all decodes as an empty list.
///
/// # Errors
/// Only fails if the underlying deserializer fails to produce any value at all.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::<Vec<Loose<String>>>::deserialize(deserializer)? {
        Loose::Valid(entries) => {
            let total = entries.len();
            let kept: Vec<String> = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Loose::Valid(text) => Some(text),
                    Loose::Malformed(_) => None,
                })
                .collect();
            if kept.len() < total {
                warn!("discarded {} non-text entries from a text list", total - kept.len());
            }
            Ok(kept)
        },
        Loose::Malformed(_) => {
            warn!("discarding non-list value where a list of names was expected");
            Ok(Vec::new())
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "super::text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::text_list")]
        synonyms: Vec<String>,
    }

    #[test]
    fn well_formed_fields_pass_through() {
        let parsed: Named = ron::from_str(r#"(name: "Keycard", synonyms: ["card", "pass"])"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Keycard"));
        assert_eq!(parsed.synonyms, vec!["card".to_string(), "pass".to_string()]);
    }

    #[test]
    fn non_text_name_becomes_none() {
        let parsed: Named = ron::from_str(r#"(name: 42, synonyms: [])"#).unwrap();
        assert!(parsed.name.is_none());
    }

    #[test]
    fn non_text_list_members_are_dropped() {
        let parsed: Named = ron::from_str(r#"(name: "Torch", synonyms: ["lamp", 7, "light"])"#).unwrap();
        assert_eq!(parsed.synonyms, vec!["lamp".to_string(), "light".to_string()]);
    }

    #[test]
    fn non_list_synonyms_become_empty() {
        let parsed: Named = ron::from_str(r#"(name: "Torch", synonyms: "lamp")"#).unwrap();
        assert!(parsed.synonyms.is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let parsed: Named = ron::from_str("()").unwrap();
        assert!(parsed.name.is_none());
        assert!(parsed.synonyms.is_empty());
    }
}
