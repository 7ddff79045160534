//! REPL and command handling utilities.
//!
//! The game runs in a read-eval-print loop. Each line is parsed into a
//! [`ParsedIntent`] and dispatched to the handler for its intent; handlers
//! live in the submodules and manipulate the [`AstralWorld`].

pub mod dev;
mod input;
pub mod inventory;
pub mod locking;
pub mod look;
pub mod movement;
pub mod system;

pub use dev::*;
pub use inventory::*;
pub use locking::*;
pub use look::*;
pub use movement::*;
pub use system::*;

use crate::command::{CommandIntent, ParsedIntent};
use crate::entity_search::{SearchError, SearchScope, find_object_match};
use crate::nlp::CommandParser;
use crate::spinners::SpinnerType;
use crate::style::GameStyle;
use crate::world::{AstralWorld, WorldModel};
use crate::{DEV_MODE, View, ViewItem};

use anyhow::{Result, bail};
use log::{error, info};

use input::{InputEvent, InputManager, completion_terms};

/// Control flow signal used by handlers to exit the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the main read–eval–print loop until the user quits.
///
/// Handler failures are logged and reported to the player; they never end the loop.
///
/// # Errors
/// Currently always returns `Ok` once the player quits.
pub fn run_repl(world: &mut AstralWorld, parser: &mut CommandParser) -> Result<()> {
    let mut view = View::new();
    let mut input_manager = InputManager::new(completion_terms(parser.vocabulary(), &world.snapshot()));

    describe_room(world, &mut view)?;
    view.flush();

    loop {
        info!("================> TURN {} <================", world.turn_count);
        let prompt = format!("\n[Turn: {}|Score: {}]>> ", world.turn_count, world.player.score)
            .prompt_style()
            .to_string();

        let Ok(input_event) = input_manager.read_line(&prompt) else {
            view.push(ViewItem::Error("Failed to read input. Try again.".to_string()));
            view.flush();
            continue;
        };

        let input = match input_event {
            InputEvent::Line(line) => line,
            InputEvent::Eof => "quit".to_string(),
            InputEvent::Interrupted => {
                view.push(ViewItem::EngineMessage("Command canceled.".to_string()));
                view.flush();
                continue;
            },
        };

        if DEV_MODE && input.trim_start().starts_with(':') {
            match dev_command_handler(world, &mut view, parser, &input) {
                Ok(true) => input_manager.set_terms(completion_terms(parser.vocabulary(), &world.snapshot())),
                Ok(false) => {},
                Err(err) => report_handler_error(&mut view, &err),
            }
            view.flush();
            continue;
        }

        let command = parser.parse(&input);
        match dispatch(world, &mut view, &command) {
            Ok(ReplControl::Quit) => {
                view.flush();
                break;
            },
            Ok(ReplControl::Continue) => {},
            Err(err) => report_handler_error(&mut view, &err),
        }
        view.flush();
    }
    Ok(())
}

fn report_handler_error(view: &mut View, err: &anyhow::Error) {
    error!("command handler failed: {err:#}");
    view.push(ViewItem::Error(
        "Something went wrong with that command. The world is as you left it.".to_string(),
    ));
}

/// Route a parsed command to the handler for its intent.
///
/// # Errors
/// Propagates handler failures, such as the player's room missing from the world.
pub fn dispatch(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<ReplControl> {
    #[allow(clippy::enum_glob_use)]
    use CommandIntent::*;
    info!("dispatching {} from '{}'", command.intent, command.original_input);
    match command.intent {
        Look => look_handler(world, view, command)?,
        Move => move_handler(world, view, command)?,
        Take => take_handler(world, view, command)?,
        TakeFrom => take_from_handler(world, view, command)?,
        Drop => drop_handler(world, view, command)?,
        Put => put_in_handler(world, view, command)?,
        Lock => lock_handler(world, view, command)?,
        Unlock => unlock_handler(world, view, command)?,
        Inventory => inv_handler(world, view),
        Help => help_handler(view),
        Score => score_handler(world, view),
        Quit => return Ok(quit_handler(world, view)),
        Save | Load => persistence_handler(view, command),
        Unknown | Invalid => unrecognized_handler(world, view),
        Manipulate => manipulate_handler(world, view, command)?,
        Use | Communicate | Combat | Search | Climb | Social | Environment | GatherInfo | Equip | Time | Complex => {
            attempt_handler(world, view, command);
        },
    }
    Ok(ReplControl::Continue)
}

/// Resolve the object a command refers to, telling the player when that fails.
///
/// Returns `Ok(None)` when the player has been asked to clarify.
///
/// # Errors
/// - if the player's room is missing from the world
pub fn resolve_object(
    world: &AstralWorld,
    view: &mut View,
    text: Option<&str>,
    hint: Option<&str>,
    scope: &SearchScope,
    verb: &str,
) -> Result<Option<String>> {
    let Some(text) = text else {
        view.push(ViewItem::ActionFailure(format!("What do you want to {verb}?")));
        return Ok(None);
    };
    match find_object_match(world, text, hint, scope) {
        Ok(id) => Ok(Some(id)),
        Err(SearchError::NoMatchingName(input)) => {
            entity_not_found(world, view, &input);
            Ok(None)
        },
        Err(SearchError::Ambiguous { input, candidates }) => {
            info!("'{input}' is ambiguous: {candidates:?}");
            view.push(ViewItem::ActionFailure(format!(
                "Which \"{input}\" do you mean: {}?",
                candidates.join(", ")
            )));
            Ok(None)
        },
        Err(err @ SearchError::InvalidRoomId(_)) => bail!(err),
    }
}

/// Feedback to player if an entity search comes up empty.
pub fn entity_not_found(world: &AstralWorld, view: &mut View, search_text: &str) {
    view.push(ViewItem::Error(format!(
        "\"{}\"? {}",
        search_text.error_style(),
        world.spin_spinner(SpinnerType::EntityNotFound, "What's that?")
    )));
}

/// Display name of an object known to exist.
pub(crate) fn object_name(world: &AstralWorld, id: &str) -> String {
    world
        .object(id)
        .map_or_else(|| id.to_string(), crate::world::GameObject::display_name)
}
