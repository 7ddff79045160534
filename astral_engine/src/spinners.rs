//! Randomized response lines.
//!
//! Each [`SpinnerType`] names a family of interchangeable messages; the world
//! holds one `gametools` spinner per family and handlers spin them for variety.

use std::collections::HashMap;

use gametools::spinners::{Spinner, Wedge};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpinnerType {
    DestinationUnknown,
    EntityNotFound,
    Movement,
    NoEffect,
    QuitMsg,
    UnrecognizedCommand,
}

impl SpinnerType {
    pub const ALL: [SpinnerType; 6] = [
        SpinnerType::DestinationUnknown,
        SpinnerType::EntityNotFound,
        SpinnerType::Movement,
        SpinnerType::NoEffect,
        SpinnerType::QuitMsg,
        SpinnerType::UnrecognizedCommand,
    ];

    /// Built-in lines for this spinner family.
    pub fn default_values(self) -> &'static [&'static str] {
        match self {
            SpinnerType::DestinationUnknown => &[
                "You can't go that way.",
                "There's nothing but bulkhead in that direction.",
                "No exit that way.",
            ],
            SpinnerType::EntityNotFound => &[
                "What's that?",
                "You don't see that here.",
                "Nothing like that is within reach.",
            ],
            SpinnerType::Movement => &[
                "You head off.",
                "You make your way over.",
                "A few steps later...",
            ],
            SpinnerType::NoEffect => &[
                "Nothing happens.",
                "That doesn't seem to do anything.",
                "You try, but nothing comes of it.",
            ],
            SpinnerType::QuitMsg => &[
                "Safe travels, spacer.",
                "The stars will wait for you.",
                "Logging off. Come back soon.",
            ],
            SpinnerType::UnrecognizedCommand => &[
                "I don't understand that.",
                "Didn't quite catch that?",
                "Could you phrase that differently?",
                "That's not something I know how to do.",
            ],
        }
    }
}

/// Spinner map holding the built-in lines for every family.
pub fn default_spinners() -> HashMap<SpinnerType, Spinner<String>> {
    let spinners: HashMap<_, _> = SpinnerType::ALL
        .iter()
        .map(|kind| {
            let wedges = kind
                .default_values()
                .iter()
                .map(|line| Wedge::new((*line).to_string()))
                .collect::<Vec<_>>();
            (*kind, Spinner::new(wedges))
        })
        .collect();
    info!("created {} spinners with default values", spinners.len());
    spinners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spinner_type_has_defaults() {
        let spinners = default_spinners();
        assert_eq!(spinners.len(), SpinnerType::ALL.len());
        for kind in SpinnerType::ALL {
            let line = spinners[&kind].spin().unwrap();
            assert!(kind.default_values().contains(&line.as_str()));
        }
    }

    #[test]
    fn spinner_type_serializes_camel_case() {
        let json = serde_json::to_string(&SpinnerType::UnrecognizedCommand).unwrap();
        assert_eq!(json, "\"unrecognizedCommand\"");
    }
}
