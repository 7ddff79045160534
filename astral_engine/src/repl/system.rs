//! `repl::system` module
//!
//! Contains repl loop handlers for meta commands (help, score, quit, save/load)
//! and the catch-all responses for intents without a dedicated handler.

use crate::command::{CommandIntent, ParsedIntent};
use crate::spinners::SpinnerType;
use crate::view::HelpLine;
use crate::world::AstralWorld;
use crate::{ASTRAL_VERSION, View, ViewItem, repl::ReplControl};

use log::info;

const HELP_LINES: &[(&str, &str)] = &[
    ("look / l", "describe your surroundings"),
    ("examine <thing>", "take a closer look at something"),
    ("go <direction> / n s e w u d", "move through an exit"),
    ("go to <place>", "walk over to part of the room"),
    ("take <thing>", "pick something up"),
    ("take <thing> from <container>", "take something out of a container"),
    ("put <thing> in <container>", "put something you carry into a container"),
    ("drop <thing>", "put something down here"),
    ("open / close <container>", "open or close a container"),
    ("unlock <thing> with <key>", "unlock a door or container"),
    ("lock <thing> with <key>", "lock it again"),
    ("inventory / i", "list what you carry"),
    ("score", "show your progress"),
    ("quit / q", "leave the game"),
];

/// Rank title and verdict for a fraction of the maximum score.
fn rank(score: usize, max_score: usize) -> (&'static str, &'static str) {
    #[allow(clippy::cast_precision_loss)]
    let percent = if max_score == 0 {
        0.0
    } else {
        score as f64 / max_score as f64 * 100.0
    };
    match percent {
        p if p >= 100.0 => ("Fleet Cartographer", "Every corridor charted. The ship has no secrets left."),
        p if p >= 75.0 => ("Chief Navigator", "Nearly every deck walked. Impressive."),
        p if p >= 50.0 => ("Deck Officer", "You know your way around, mostly."),
        p if p >= 25.0 => ("Ensign", "A decent start. The ship is bigger than it looks."),
        p if p > 0.0 => ("Cadet", "You left the first room. That counts."),
        _ => ("Stowaway", "Did you... move at all?"),
    }
}

/// Show the list of things to try.
pub fn help_handler(view: &mut View) {
    let lines = HELP_LINES
        .iter()
        .map(|(command, description)| HelpLine {
            command: (*command).to_string(),
            description: (*description).to_string(),
        })
        .collect();
    view.push(ViewItem::Help(lines));
}

/// Show the current score and rank.
pub fn score_handler(world: &AstralWorld, view: &mut View) {
    let (title, _) = rank(world.player.score, world.max_score);
    view.push(ViewItem::ScoreSummary {
        rank: title.to_string(),
        score: world.player.score,
        max_score: world.max_score,
        turns: world.turn_count,
    });
}

/// Quit the game.
pub fn quit_handler(world: &AstralWorld, view: &mut View) -> ReplControl {
    info!(
        "player quit with a score of {} after {} turns (engine v{ASTRAL_VERSION})",
        world.player.score, world.turn_count
    );
    info!("ending inventory: {:?}", world.inventory());
    let (title, notes) = rank(world.player.score, world.max_score);
    view.push(ViewItem::QuitSummary {
        rank: title.to_string(),
        notes: notes.to_string(),
        score: world.player.score,
        max_score: world.max_score,
        turns: world.turn_count,
    });
    view.push(ViewItem::EngineMessage(
        world.spin_spinner(SpinnerType::QuitMsg, "Goodbye."),
    ));
    ReplControl::Quit
}

/// SAVE and LOAD are recognized but not supported.
pub fn persistence_handler(view: &mut View, command: &ParsedIntent) {
    let what = if command.intent == CommandIntent::Load { "Loading" } else { "Saving" };
    view.push(ViewItem::EngineMessage(format!("{what} games isn't available in this version.")));
}

/// Generic response for intents without a dedicated handler.
pub fn attempt_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) {
    let label = command.intent.label().to_lowercase();
    let action = command.action.as_deref().unwrap_or(&label);
    match command.target.as_deref() {
        Some(target) => {
            let tail = match (&command.preposition, &command.secondary_target) {
                (Some(preposition), Some(secondary)) => format!(" {preposition} {secondary}"),
                _ => String::new(),
            };
            view.push(ViewItem::ActionSuccess(format!("You attempt to {action} {target}{tail}.")));
            view.push(ViewItem::ActionSuccess(
                world.spin_spinner(SpinnerType::NoEffect, "Nothing happens."),
            ));
            world.turn_count += 1;
        },
        None => {
            view.push(ViewItem::ActionFailure(format!("What do you want to {action}?")));
        },
    }
    info!("generic {} attempt: {:?} -> {:?}", command.intent, command.action, command.target);
}

/// Response for input the parser could not make sense of. World state is untouched.
pub fn unrecognized_handler(world: &AstralWorld, view: &mut View) {
    view.push(ViewItem::Error(
        world.spin_spinner(SpinnerType::UnrecognizedCommand, "Didn't quite catch that?"),
    ));
}
