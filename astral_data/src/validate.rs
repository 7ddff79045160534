use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a WorldDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a WorldDef.
///
/// ```
/// use astral_data::{GameDef, RoomDef, WorldDef, validate_world};
///
/// let world = WorldDef {
///     game: GameDef {
///         title: "Demo".into(),
///         intro: "Intro".into(),
///         start_room: "bridge".into(),
///         start_area: None,
///     },
///     rooms: vec![RoomDef {
///         id: "bridge".into(),
///         name: "Bridge".into(),
///         desc: "A room.".into(),
///         exits: Vec::new(),
///         areas: Vec::new(),
///     }],
///     ..WorldDef::default()
/// };
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut rooms = HashSet::new();
    let mut objects = HashSet::new();
    let mut areas = HashSet::new();

    track_ids("room", world.rooms.iter().map(|r| r.id.as_str()), &mut rooms, &mut errors);
    track_ids(
        "object",
        world.objects.iter().map(|o| o.id.as_str()),
        &mut objects,
        &mut errors,
    );
    track_ids(
        "area",
        world.rooms.iter().flat_map(|r| r.areas.iter().map(|a| a.id.as_str())),
        &mut areas,
        &mut errors,
    );

    let by_id: HashMap<&str, &ObjectDef> = world.objects.iter().map(|o| (o.id.as_str(), o)).collect();

    if world.game.start_room.trim().is_empty() {
        errors.push(ValidationError::InvalidValue {
            context: "game start room missing".to_string(),
        });
    } else {
        check_ref("room", &world.game.start_room, &rooms, "game start room".to_string(), &mut errors);
    }

    if let Some(area_id) = &world.game.start_area {
        let in_start_room = world
            .rooms
            .iter()
            .find(|r| r.id == world.game.start_room)
            .is_some_and(|r| r.areas.iter().any(|a| &a.id == area_id));
        if !in_start_room {
            errors.push(ValidationError::MissingReference {
                kind: "area",
                id: area_id.clone(),
                context: format!("game start area in room '{}'", world.game.start_room),
            });
        }
    }

    for room in &world.rooms {
        for exit in &room.exits {
            let context = format!("room '{}' exit '{}'", room.id, exit.direction);
            check_ref("room", &exit.to, &rooms, context.clone(), &mut errors);
            if let Some(door) = &exit.door {
                match by_id.get(door.as_str()) {
                    None => check_ref("object", door, &objects, context, &mut errors),
                    Some(obj) if obj.lock.is_none() => errors.push(ValidationError::InvalidValue {
                        context: format!("{context}: door '{door}' has no lock"),
                    }),
                    Some(_) => {},
                }
            }
        }
    }

    for object in &world.objects {
        let context = format!("object '{}'", object.id);
        match &object.location {
            LocationRef::Inventory | LocationRef::Nowhere => {},
            LocationRef::Room(room) => check_ref("room", room, &rooms, context.clone(), &mut errors),
            LocationRef::Object(holder) => match by_id.get(holder.as_str()) {
                None => check_ref("object", holder, &objects, context.clone(), &mut errors),
                Some(_) if holder == &object.id => errors.push(ValidationError::InvalidValue {
                    context: format!("{context} is located inside itself"),
                }),
                Some(container) if container.container_state.is_none() => {
                    errors.push(ValidationError::InvalidValue {
                        context: format!("{context} is inside '{holder}', which is not a container"),
                    });
                },
                Some(_) => {},
            },
        }
        if let Some(key) = object.lock.as_ref().and_then(|lock| lock.key.as_ref()) {
            check_ref("object", key, &objects, format!("{context} lock key"), &mut errors);
        }
    }

    errors
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id.to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<String>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}
