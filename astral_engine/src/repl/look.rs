//! Observation command handlers.
//!
//! - [`look_handler`] describes the surroundings, or an object or area when the
//!   command names one.
//! - [`describe_room`] is also used after movement to show the new location.

use crate::{
    View, ViewItem,
    command::ParsedIntent,
    entity_search::SearchScope,
    repl::resolve_object,
    view::ExitLine,
    world::{Area, AstralWorld, Location, WorldModel},
};

use anyhow::{Context, Result};
use astral_data::ContainerState;
use log::info;

/// Push the player's current room (and area) onto the view.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn describe_room(world: &AstralWorld, view: &mut View) -> Result<()> {
    let room = world.player_room_ref()?;
    let area = world.player.area.as_deref().and_then(|id| room.area(id));

    let mut description = room.description.clone();
    if let Some(area) = area
        && !area.description.is_empty()
    {
        description.push_str("\n\n");
        description.push_str(&area.description);
    }
    view.push(ViewItem::RoomDescription {
        name: room.name.clone(),
        area: area.map(Area::display_name),
        description,
    });

    let objects: Vec<String> = world
        .object_ids_in_location(&Location::Room(room.id.clone()))
        .into_iter()
        .filter_map(|id| world.object(id).map(crate::world::GameObject::display_name))
        .collect();
    if !objects.is_empty() {
        view.push(ViewItem::RoomObjects(objects));
    }

    let areas: Vec<String> = room
        .areas
        .iter()
        .filter(|a| Some(&a.id) != world.player.area.as_ref())
        .map(Area::display_name)
        .collect();
    if !areas.is_empty() {
        view.push(ViewItem::RoomAreas(areas));
    }

    let mut exits = Vec::new();
    for (direction, exit) in &room.exits {
        let destination = world
            .room(&exit.to)
            .with_context(|| format!("exit {direction} of '{}' leads to unknown room '{}'", room.id, exit.to))?;
        exits.push(ExitLine {
            direction: direction.clone(),
            destination: destination.name.clone(),
            exit_locked: exit.door.as_deref().and_then(|d| world.object(d)).is_some_and(|d| d.is_locked()),
            dest_visited: world.player.visited.contains(&exit.to),
        });
    }
    if !exits.is_empty() {
        view.push(ViewItem::RoomExits(exits));
    }
    Ok(())
}

/// Shows the surroundings, or the object or area named in the command.
///
/// # Errors
/// Returns an error if the player's current room cannot be resolved.
pub fn look_handler(world: &mut AstralWorld, view: &mut View, command: &ParsedIntent) -> Result<()> {
    let Some(target) = command.target.as_deref() else {
        describe_room(world, view)?;
        info!("player looked around '{}'", world.player.room);
        world.turn_count += 1;
        return Ok(());
    };

    if command.target_object_id.is_none()
        && let Some(area) = find_area(world, target)?
    {
        view.push(ViewItem::ObjectDescription {
            name: area.display_name(),
            description: if area.description.is_empty() {
                format!("Nothing remarkable about the {}.", area.display_name())
            } else {
                area.description.clone()
            },
        });
        info!("player looked at area '{}'", area.id);
        world.turn_count += 1;
        return Ok(());
    }

    let Some(object_id) = resolve_object(
        world,
        view,
        Some(target),
        command.target_object_id.as_deref(),
        &SearchScope::Visible,
        "look at",
    )?
    else {
        return Ok(());
    };
    let object = world
        .object(&object_id)
        .with_context(|| format!("object '{object_id}' vanished during look"))?;
    view.push(ViewItem::ObjectDescription {
        name: object.display_name(),
        description: object.description.clone(),
    });
    match object.container_state {
        Some(_) if object.is_locked() => {
            view.push(ViewItem::ActionSuccess(format!("The {} is locked.", object.display_name())));
        },
        Some(ContainerState::Closed) => {
            view.push(ViewItem::ActionSuccess(format!("The {} is closed.", object.display_name())));
        },
        Some(ContainerState::Open) => {
            let contents = world
                .object_ids_in_location(&Location::Object(object_id.clone()))
                .into_iter()
                .filter_map(|id| world.object(id).map(crate::world::GameObject::display_name))
                .collect();
            view.push(ViewItem::ObjectContents {
                container: object.display_name(),
                contents,
            });
        },
        None => {},
    }
    info!("player looked at '{object_id}'");
    world.turn_count += 1;
    Ok(())
}

/// Area of the current room whose id, name or alias equals `text`.
fn find_area<'a>(world: &'a AstralWorld, text: &str) -> Result<Option<&'a Area>> {
    let room = world.player_room_ref()?;
    let needle = text.trim().to_lowercase();
    Ok(room.areas.iter().find(|area| {
        area.id.replace('_', " ") == needle
            || area.name.as_deref().is_some_and(|n| n.to_lowercase() == needle)
            || area.aliases.iter().any(|a| a.to_lowercase() == needle)
    }))
}
