//! Inventory and container command handlers.
//!
//! Objects move between the room, the player's inventory and containers by
//! changing their `Location`. Fixed objects never move; closed or locked
//! containers neither give nor take.

use crate::{
    View, ViewItem,
    command::ParsedIntent,
    entity_search::{SearchScope, find_object_match},
    repl::{object_name, resolve_object},
    world::{AstralWorld, GameObject, Location, WorldModel},
};

use anyhow::{Context, Result};
use astral_data::Movability;
use log::info;

/// List what the player is carrying.
pub fn inv_handler(world: &AstralWorld, view: &mut View) {
    let names = world
        .inventory()
        .into_iter()
        .map(|id| object_name(world, id))
        .collect::<Vec<_>>();
    info!("player checked inventory ({} objects)", names.len());
    view.push(ViewItem::Inventory(names));
}

/// Pick up an object from the room or an open container.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn take_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    if let Some(text) = command.target.as_deref()
        && let Ok(carried) = find_object_match(world, text, None, &SearchScope::Inventory)
    {
        view.push(ViewItem::ActionFailure(format!(
            "You already have the {}.",
            object_name(world, &carried)
        )));
        return Ok(());
    }
    let Some(object_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Reachable,
        "take",
    )?
    else {
        return Ok(());
    };
    if refuse_fixed(world, view, &object_id)? {
        return Ok(());
    }
    world.relocate(&object_id, Location::Inventory)?;
    view.push(ViewItem::ActionSuccess(format!("You take the {}.", object_name(world, &object_id))));
    world.turn_count += 1;
    Ok(())
}

/// Take an object out of a named container.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn take_from_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    let Some(container_id) = resolve_object(
        world,
        view,
        command.secondary_target.as_deref(),
        command.secondary_target_id.as_deref(),
        &SearchScope::Visible,
        "take things from",
    )?
    else {
        return Ok(());
    };
    if refuse_inaccessible(world, view, &container_id)? {
        return Ok(());
    }
    let Some(object_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Contents(container_id.clone()),
        "take",
    )?
    else {
        return Ok(());
    };
    if refuse_fixed(world, view, &object_id)? {
        return Ok(());
    }
    world.relocate(&object_id, Location::Inventory)?;
    view.push(ViewItem::ActionSuccess(format!(
        "You take the {} from the {}.",
        object_name(world, &object_id),
        object_name(world, &container_id)
    )));
    world.turn_count += 1;
    Ok(())
}

/// Drop a carried object into the current room.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn drop_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    let Some(object_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Inventory,
        "drop",
    )?
    else {
        return Ok(());
    };
    let here = Location::Room(world.player.room.clone());
    world.relocate(&object_id, here)?;
    view.push(ViewItem::ActionSuccess(format!("You drop the {}.", object_name(world, &object_id))));
    world.turn_count += 1;
    Ok(())
}

/// Put a carried object into a container.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn put_in_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    let Some(object_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Inventory,
        "put away",
    )?
    else {
        return Ok(());
    };
    let Some(container_id) = resolve_object(
        world,
        view,
        command.secondary_target.as_deref(),
        command.secondary_target_id.as_deref(),
        &SearchScope::Visible,
        "put it in",
    )?
    else {
        return Ok(());
    };
    if object_id == container_id {
        view.push(ViewItem::ActionFailure(format!(
            "You can't put the {} inside itself.",
            object_name(world, &object_id)
        )));
        return Ok(());
    }
    if is_nested_in(world, &container_id, &object_id) {
        view.push(ViewItem::ActionFailure(format!(
            "You can't put the {0} in the {1}: the {1} is inside it.",
            object_name(world, &object_id),
            object_name(world, &container_id)
        )));
        return Ok(());
    }
    if refuse_inaccessible(world, view, &container_id)? {
        return Ok(());
    }
    world.relocate(&object_id, Location::Object(container_id.clone()))?;
    let preposition = command.preposition.as_deref().unwrap_or("in");
    view.push(ViewItem::ActionSuccess(format!(
        "You put the {} {preposition} the {}.",
        object_name(world, &object_id),
        object_name(world, &container_id)
    )));
    world.turn_count += 1;
    Ok(())
}

/// True if `inner` sits somewhere inside `outer`, however deeply.
fn is_nested_in(world: &AstralWorld, inner: &str, outer: &str) -> bool {
    let mut current = inner;
    for _ in 0..world.objects.len() {
        match world.object(current).map(|o| &o.location) {
            Some(Location::Object(parent)) if parent == outer => return true,
            Some(Location::Object(parent)) => current = parent,
            _ => return false,
        }
    }
    false
}

fn lookup<'a>(world: &'a AstralWorld, id: &str) -> Result<&'a GameObject> {
    world
        .object(id)
        .with_context(|| format!("object '{id}' not found in world"))
}

/// Tell the player an object can't be moved; true if it was refused.
fn refuse_fixed(world: &AstralWorld, view: &mut View, object_id: &str) -> Result<bool> {
    let object = lookup(world, object_id)?;
    if let Movability::Fixed { reason } = &object.movability {
        view.push(ViewItem::ActionFailure(format!(
            "You can't take the {}: {reason}.",
            object.display_name()
        )));
        info!("player tried to take fixed object '{object_id}'");
        return Ok(true);
    }
    Ok(false)
}

/// Tell the player a container is unusable; true if it was refused.
fn refuse_inaccessible(world: &AstralWorld, view: &mut View, container_id: &str) -> Result<bool> {
    let container = lookup(world, container_id)?;
    let name = container.display_name();
    let refusal = if !container.is_container() {
        Some(format!("The {name} can't hold anything."))
    } else if container.is_locked() {
        Some(format!("The {name} is locked."))
    } else if !container.is_accessible_container() {
        Some(format!("The {name} is closed."))
    } else {
        None
    };
    match refusal {
        Some(message) => {
            view.push(ViewItem::ActionFailure(message));
            Ok(true)
        },
        None => Ok(false),
    }
}
