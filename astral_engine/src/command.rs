//! Command module
//!
//! Describes the output of the command parser: the intent categories a player
//! command can map to and the [`ParsedIntent`] record handed to the REPL handlers.

use std::fmt;

use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Coarse action category of a player command.
///
/// Declaration order doubles as the tie-break when two intents score equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Variantly)]
#[serde(rename_all = "snake_case")]
pub enum CommandIntent {
    Move,
    Look,
    Take,
    Drop,
    Use,
    Inventory,
    Help,
    Quit,
    Save,
    Load,
    Communicate,
    Combat,
    Search,
    Manipulate,
    Climb,
    Social,
    Environment,
    GatherInfo,
    Equip,
    Time,
    Complex,
    Put,
    TakeFrom,
    Lock,
    Unlock,
    Score,
    Unknown,
    Invalid,
}

impl CommandIntent {
    /// Upper-case label used in logs and developer output.
    pub fn label(self) -> &'static str {
        match self {
            CommandIntent::Move => "MOVE",
            CommandIntent::Look => "LOOK",
            CommandIntent::Take => "TAKE",
            CommandIntent::Drop => "DROP",
            CommandIntent::Use => "USE",
            CommandIntent::Inventory => "INVENTORY",
            CommandIntent::Help => "HELP",
            CommandIntent::Quit => "QUIT",
            CommandIntent::Save => "SAVE",
            CommandIntent::Load => "LOAD",
            CommandIntent::Communicate => "COMMUNICATE",
            CommandIntent::Combat => "COMBAT",
            CommandIntent::Search => "SEARCH",
            CommandIntent::Manipulate => "MANIPULATE",
            CommandIntent::Climb => "CLIMB",
            CommandIntent::Social => "SOCIAL",
            CommandIntent::Environment => "ENVIRONMENT",
            CommandIntent::GatherInfo => "GATHER_INFO",
            CommandIntent::Equip => "EQUIP",
            CommandIntent::Time => "TIME",
            CommandIntent::Complex => "COMPLEX",
            CommandIntent::Put => "PUT",
            CommandIntent::TakeFrom => "TAKE_FROM",
            CommandIntent::Lock => "LOCK",
            CommandIntent::Unlock => "UNLOCK",
            CommandIntent::Score => "SCORE",
            CommandIntent::Unknown => "UNKNOWN",
            CommandIntent::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for CommandIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured result of parsing one line of player input.
///
/// Built once by the parser and never modified afterward. Fields the parser could
/// not fill are `None`; handlers treat a missing target as "not specified".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub intent: CommandIntent,
    /// Lemma of the verb the player used ("take", "unlock").
    pub action: Option<String>,
    pub target: Option<String>,
    pub target_object_id: Option<String>,
    pub secondary_target: Option<String>,
    pub secondary_target_id: Option<String>,
    pub preposition: Option<String>,
    /// Canonical compass direction, only set for movement commands.
    pub direction: Option<String>,
    /// Area id when a movement command names an area instead of a direction.
    pub area_id: Option<String>,
    pub original_input: String,
}

impl ParsedIntent {
    /// An intent with every optional field empty.
    pub fn bare(intent: CommandIntent, original_input: &str) -> Self {
        Self {
            intent,
            action: None,
            target: None,
            target_object_id: None,
            secondary_target: None,
            secondary_target_id: None,
            preposition: None,
            direction: None,
            area_id: None,
            original_input: original_input.to_string(),
        }
    }

    pub fn unknown(original_input: &str) -> Self {
        Self::bare(CommandIntent::Unknown, original_input)
    }

    pub fn invalid(original_input: &str) -> Self {
        Self::bare(CommandIntent::Invalid, original_input)
    }

    /// Movement toward a canonical compass direction.
    pub fn movement(direction: &str, original_input: &str) -> Self {
        Self {
            direction: Some(direction.to_string()),
            ..Self::bare(CommandIntent::Move, original_input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_serialize_in_snake_case() {
        let json = serde_json::to_string(&CommandIntent::TakeFrom).unwrap();
        assert_eq!(json, "\"take_from\"");
        let back: CommandIntent = serde_json::from_str("\"gather_info\"").unwrap();
        assert_eq!(back, CommandIntent::GatherInfo);
    }

    #[test]
    fn display_uses_upper_case_labels() {
        assert_eq!(CommandIntent::TakeFrom.to_string(), "TAKE_FROM");
        assert_eq!(CommandIntent::Move.to_string(), "MOVE");
    }

    #[test]
    fn declaration_order_is_the_tie_break_order() {
        assert!(CommandIntent::Move < CommandIntent::Look);
        assert!(CommandIntent::Put < CommandIntent::TakeFrom);
        assert!(CommandIntent::Score < CommandIntent::Unknown);
    }

    #[test]
    fn movement_constructor_sets_only_direction() {
        let parsed = ParsedIntent::movement("north", "n");
        assert!(parsed.intent.is_move());
        assert_eq!(parsed.direction.as_deref(), Some("north"));
        assert!(parsed.target.is_none());
        assert_eq!(parsed.original_input, "n");
    }
}
