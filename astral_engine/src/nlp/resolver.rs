//! Final intent selection from verb scores and structured-parse outcome.

use log::debug;

use super::scorer::IntentScores;
use crate::command::CommandIntent;

/// Added to the structured intent's score; verb weights top out around 100.
pub const STRUCTURE_BONUS: f64 = 1000.0;

/// Choose the winning intent.
///
/// `structured` is the intent produced by a successful two-object parse. Without
/// one, a winning TAKE_FROM falls back to TAKE and a winning PUT to DROP (or to
/// UNKNOWN when the fallback intent was never scored).
pub fn resolve_intent(scores: &IntentScores, structured: Option<CommandIntent>) -> CommandIntent {
    if scores.is_empty() {
        return CommandIntent::Unknown;
    }
    let mut scores = scores.clone();
    if let Some(intent) = structured {
        scores.add(intent, STRUCTURE_BONUS);
    }
    let Some((winner, score)) = scores.ranked().first().copied() else {
        return CommandIntent::Unknown;
    };
    debug!("provisional intent {winner} ({score})");

    if structured.is_some() {
        return winner;
    }
    match winner {
        CommandIntent::TakeFrom => demote(&scores, CommandIntent::Take),
        CommandIntent::Put => demote(&scores, CommandIntent::Drop),
        other => other,
    }
}

fn demote(scores: &IntentScores, fallback: CommandIntent) -> CommandIntent {
    if scores.contains(fallback) {
        fallback
    } else {
        CommandIntent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(CommandIntent, f64)]) -> IntentScores {
        let mut scores = IntentScores::default();
        for (intent, amount) in entries {
            scores.add(*intent, *amount);
        }
        scores
    }

    #[test]
    fn empty_scores_are_unknown_even_with_structure() {
        assert_eq!(resolve_intent(&IntentScores::default(), None), CommandIntent::Unknown);
        assert_eq!(
            resolve_intent(&IntentScores::default(), Some(CommandIntent::Put)),
            CommandIntent::Unknown
        );
    }

    #[test]
    fn structured_intent_dominates() {
        let s = scores(&[(CommandIntent::Combat, 100.0), (CommandIntent::Put, 86.0)]);
        assert_eq!(resolve_intent(&s, Some(CommandIntent::Put)), CommandIntent::Put);
    }

    #[test]
    fn structured_intent_wins_even_if_unscored() {
        let s = scores(&[(CommandIntent::Manipulate, 85.0)]);
        assert_eq!(resolve_intent(&s, Some(CommandIntent::Unlock)), CommandIntent::Unlock);
    }

    #[test]
    fn put_without_structure_becomes_drop() {
        let s = scores(&[(CommandIntent::Put, 86.0), (CommandIntent::Drop, 35.0)]);
        assert_eq!(resolve_intent(&s, None), CommandIntent::Drop);
    }

    #[test]
    fn take_from_without_structure_becomes_take() {
        let s = scores(&[(CommandIntent::TakeFrom, 87.0), (CommandIntent::Take, 85.0)]);
        assert_eq!(resolve_intent(&s, None), CommandIntent::Take);
    }

    #[test]
    fn demotion_without_fallback_is_unknown() {
        let s = scores(&[(CommandIntent::TakeFrom, 87.0), (CommandIntent::Equip, 80.0)]);
        assert_eq!(resolve_intent(&s, None), CommandIntent::Unknown);
        let s = scores(&[(CommandIntent::Put, 86.0)]);
        assert_eq!(resolve_intent(&s, None), CommandIntent::Unknown);
    }

    #[test]
    fn other_winners_pass_through() {
        let s = scores(&[(CommandIntent::Look, 50.0), (CommandIntent::Help, 10.0)]);
        assert_eq!(resolve_intent(&s, None), CommandIntent::Look);
    }
}
