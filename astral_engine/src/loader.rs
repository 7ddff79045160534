//! Loader utilities for building an `AstralWorld` from serialized data.
//!
//! World content is loaded from a RON `WorldDef`, checked with
//! [`astral_data::validate_world`], then converted into runtime structs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use astral_data::{AreaDef, LocationRef, ObjectDef, RoomDef, WorldDef};
use log::info;

use crate::data_paths::data_path;
use crate::nlp::canonical_direction;
use crate::spinners::default_spinners;
use crate::world::{Area, AstralWorld, Exit, GameObject, Location, Lock, Room};

/// Load the `AstralWorld` from `world.ron` in the data directory.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or missing references.
pub fn load_world() -> Result<AstralWorld> {
    load_world_from(&data_path("world.ron"))
}

/// Load the `AstralWorld` from a specific RON file.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or missing references.
pub fn load_world_from(path: &Path) -> Result<AstralWorld> {
    let worlddef = load_worlddef(path).context("while loading worlddef from file")?;
    validate_worlddef(&worlddef)?;
    let world = build_world_from_def(&worlddef).context("while building world from worlddef")?;
    info!("{} spinners added to AstralWorld", world.spinners.len());
    info!("{} rooms added to AstralWorld", world.rooms.len());
    info!("{} objects added to AstralWorld", world.objects.len());
    info!("player starts in room '{}' (area {:?})", world.player.room, world.player.area);
    Ok(world)
}

/// Load a `WorldDef` from a RON file.
///
/// # Errors
/// - if the file cannot be read or is not valid RON for a `WorldDef`
pub fn load_worlddef(path: &Path) -> Result<WorldDef> {
    let text = fs::read_to_string(path).with_context(|| format!("reading worlddef from '{}'", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing worlddef RON from '{}'", path.display()))
}

/// Validate the WorldDef and return a single aggregated error.
fn validate_worlddef(def: &WorldDef) -> Result<()> {
    let errors = astral_data::validate_world(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("worlddef validation failed:\n{details}");
}

/// Convert a validated `WorldDef` into a populated `AstralWorld`.
///
/// # Errors
/// - if an exit names a direction that is not a compass direction
pub fn build_world_from_def(def: &WorldDef) -> Result<AstralWorld> {
    let mut world = AstralWorld::new_empty();
    world.title.clone_from(&def.game.title);
    world.intro.clone_from(&def.game.intro);
    world.spinners = default_spinners();

    for room_def in &def.rooms {
        let room = room_from_def(room_def)?;
        world.rooms.insert(room.id.clone(), room);
    }
    // every room but the starting one is worth a point on first entry
    world.max_score = world.rooms.len().saturating_sub(1);

    for object_def in &def.objects {
        let object = object_from_def(object_def);
        world.objects.insert(object.id.clone(), object);
    }

    world.player.room.clone_from(&def.game.start_room);
    world.player.area.clone_from(&def.game.start_area);
    world.player.visited.insert(def.game.start_room.clone());
    Ok(world)
}

fn room_from_def(def: &RoomDef) -> Result<Room> {
    let mut exits = std::collections::BTreeMap::new();
    for exit in &def.exits {
        let Some(direction) = canonical_direction(&exit.direction) else {
            bail!("room '{}' has an exit in unknown direction '{}'", def.id, exit.direction);
        };
        exits.insert(
            direction.to_string(),
            Exit {
                to: exit.to.clone(),
                door: exit.door.clone(),
                barred_message: exit.barred_message.clone(),
            },
        );
    }
    Ok(Room {
        id: def.id.clone(),
        name: def.name.clone(),
        description: def.desc.clone(),
        exits,
        areas: def.areas.iter().map(area_from_def).collect(),
    })
}

fn area_from_def(def: &AreaDef) -> Area {
    Area {
        id: def.id.clone(),
        name: def.name.clone(),
        aliases: def.command_aliases.clone(),
        description: def.desc.clone(),
    }
}

fn object_from_def(def: &ObjectDef) -> GameObject {
    let location = match &def.location {
        LocationRef::Inventory => Location::Inventory,
        LocationRef::Nowhere => Location::Nowhere,
        LocationRef::Room(id) => Location::Room(id.clone()),
        LocationRef::Object(id) => Location::Object(id.clone()),
    };
    GameObject {
        id: def.id.clone(),
        name: def.name.clone(),
        description: def.desc.clone(),
        synonyms: def.synonyms.clone(),
        command_aliases: def.command_aliases.clone(),
        location,
        movability: def.movability.clone(),
        container_state: def.container_state,
        lock: def.lock.as_ref().map(|lock| Lock {
            key: lock.key.clone(),
            locked: lock.locked,
        }),
    }
}
