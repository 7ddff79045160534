//! `repl::movement` module
//!
//! Contains repl loop handlers for commands that change player location:
//! through a room exit by direction, or between areas of the current room.

use crate::{
    View, ViewItem,
    command::ParsedIntent,
    repl::describe_room,
    spinners::SpinnerType,
    world::{AstralWorld, WorldModel},
};

use anyhow::{Context, Result};
use log::info;

/// Move the player by direction or to a named area.
///
/// # Errors
/// Returns an error if the player's room or the exit destination is missing.
pub fn move_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    if let Some(direction) = command.direction.as_deref() {
        move_to_handler(world, view, direction)
    } else if let Some(area_id) = command.area_id.as_deref() {
        move_to_area_handler(world, view, area_id, command.target.as_deref().unwrap_or(area_id))
    } else {
        view.push(ViewItem::ActionFailure("Where do you want to go?".to_string()));
        Ok(())
    }
}

/// Move the player through the exit in `direction`, if it is open.
///
/// # Errors
/// Returns an error if the player's room or the exit destination is missing.
pub fn move_to_handler(world: &mut AstralWorld, view: &mut View, direction: &str) -> Result<()> {
    let exit = world.player_room_ref()?.exits.get(direction).cloned();
    let Some(exit) = exit else {
        view.push(ViewItem::ActionFailure(
            world.spin_spinner(SpinnerType::DestinationUnknown, "You can't go that way."),
        ));
        info!("no exit {direction} from '{}'", world.player.room);
        return Ok(());
    };

    if let Some(door) = exit.door.as_deref().and_then(|id| world.object(id))
        && door.is_locked()
    {
        let message = exit
            .barred_message
            .clone()
            .unwrap_or_else(|| format!("The {} is locked.", door.display_name()));
        view.push(ViewItem::ActionFailure(message));
        info!("player blocked by locked door '{}'", door.id);
        return Ok(());
    }

    let destination_name = world
        .room(&exit.to)
        .with_context(|| format!("invalid move destination ({})", exit.to))?
        .name
        .clone();
    view.push(ViewItem::TransitionMessage(
        world.spin_spinner(SpinnerType::Movement, "You head that way..."),
    ));
    world.player.room.clone_from(&exit.to);
    world.player.area = None;
    if world.player.visited.insert(exit.to.clone()) {
        world.player.score = world.player.score.saturating_add(1);
        view.push(ViewItem::PointsAwarded {
            amount: 1,
            reason: format!("Reached the {destination_name} for the first time."),
        });
    }
    info!("player moved {direction} to '{}'", exit.to);
    describe_room(world, view)?;
    world.turn_count += 1;
    Ok(())
}

/// Move the player to another area within the current room.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn move_to_area_handler(world: &mut AstralWorld, view: &mut View, area_id: &str, spoken: &str) -> Result<()> {
    let room = world.player_room_ref()?;
    let Some(area) = room.area(area_id) else {
        view.push(ViewItem::ActionFailure(format!("You can't get to the {spoken} from here.")));
        info!("area '{area_id}' is not in room '{}'", room.id);
        return Ok(());
    };
    if world.player.area.as_deref() == Some(area_id) {
        view.push(ViewItem::ActionFailure(format!("You're already at the {}.", area.display_name())));
        return Ok(());
    }

    view.push(ViewItem::TransitionMessage(format!("You make your way to the {}.", area.display_name())));
    world.player.area = Some(area_id.to_string());
    world.player.visited.insert(area_id.to_string());
    info!("player moved to area '{area_id}' in '{}'", world.player.room);
    describe_room(world, view)?;
    world.turn_count += 1;
    Ok(())
}
