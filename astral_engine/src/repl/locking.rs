//! Lock, unlock, open and close handlers.
//!
//! A lock that names a key only turns for that key, and the key must be in the
//! player's inventory. A lock without a key works by hand.

use crate::{
    View, ViewItem,
    command::ParsedIntent,
    entity_search::SearchScope,
    repl::{attempt_handler, object_name, resolve_object},
    world::{AstralWorld, WorldModel},
};

use anyhow::{Context, Result};
use astral_data::ContainerState;
use log::info;

/// Lock something, with a key if the lock requires one.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn lock_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    set_lock(world, view, command, true)
}

/// Unlock something, with a key if the lock requires one.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn unlock_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    set_lock(world, view, command, false)
}

fn set_lock(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent, lock: bool) -> Result<()> {
    let verb = if lock { "lock" } else { "unlock" };
    let Some(target_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Visible,
        verb,
    )?
    else {
        return Ok(());
    };
    let target = world
        .object(&target_id)
        .with_context(|| format!("object '{target_id}' not found in world"))?;
    let name = target.display_name();
    let Some(current) = target.lock.clone() else {
        view.push(ViewItem::ActionFailure(format!("The {name} doesn't have a lock.")));
        return Ok(());
    };
    if current.locked == lock {
        view.push(ViewItem::ActionFailure(format!("The {name} is already {verb}ed.")));
        return Ok(());
    }

    let used_key = match (&current.key, command.secondary_target.as_deref()) {
        (None, _) => None,
        (Some(key_id), Some(key_text)) => {
            let Some(offered) = resolve_object(
                world,
                view,
                Some(key_text),
                command.secondary_target_id.as_deref(),
                &SearchScope::Inventory,
                verb,
            )?
            else {
                return Ok(());
            };
            if &offered != key_id {
                view.push(ViewItem::ActionFailure(format!(
                    "The {} doesn't fit the {name}'s lock.",
                    object_name(world, &offered)
                )));
                info!("key '{offered}' rejected by '{target_id}'");
                return Ok(());
            }
            Some(offered)
        },
        (Some(key_id), None) => {
            if !world.inventory().contains(&key_id.as_str()) {
                view.push(ViewItem::ActionFailure(format!("You need the right key to {verb} the {name}.")));
                return Ok(());
            }
            Some(key_id.clone())
        },
    };

    if let Some(lock_state) = world.get_object_mut(&target_id).and_then(|o| o.lock.as_mut()) {
        lock_state.locked = lock;
    }
    let message = match &used_key {
        Some(key) => format!("You {verb} the {name} with the {}.", object_name(world, key)),
        None => format!("You {verb} the {name}."),
    };
    view.push(ViewItem::ActionSuccess(message));
    info!("'{target_id}' {verb}ed (key {used_key:?})");
    world.turn_count += 1;
    Ok(())
}

/// MANIPULATE commands: open and close containers, otherwise a generic attempt.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn manipulate_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    let state = match command.action.as_deref() {
        Some("open") => ContainerState::Open,
        Some("close" | "shut") => ContainerState::Closed,
        _ => {
            attempt_handler(world, view, command);
            return Ok(());
        },
    };
    let verb = if state == ContainerState::Open { "open" } else { "close" };
    let Some(target_id) = resolve_object(
        world,
        view,
        command.target.as_deref(),
        command.target_object_id.as_deref(),
        &SearchScope::Visible,
        verb,
    )?
    else {
        return Ok(());
    };
    let target = world
        .object(&target_id)
        .with_context(|| format!("object '{target_id}' not found in world"))?;
    let name = target.display_name();
    if target.container_state.is_none() {
        view.push(ViewItem::ActionFailure(format!("The {name} doesn't {verb}.")));
        return Ok(());
    }
    if target.is_locked() {
        view.push(ViewItem::ActionFailure(format!("The {name} is locked.")));
        return Ok(());
    }
    if target.container_state == Some(state) {
        let already = if state == ContainerState::Open { "open" } else { "closed" };
        view.push(ViewItem::ActionFailure(format!("The {name} is already {already}.")));
        return Ok(());
    }
    if let Some(object) = world.get_object_mut(&target_id) {
        object.container_state = Some(state);
    }
    view.push(ViewItem::ActionSuccess(format!("You {verb} the {name}.")));
    info!("'{target_id}' is now {state:?}");
    world.turn_count += 1;
    Ok(())
}
