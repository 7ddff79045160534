//! Data structures representing the game world.
//!
//! This module defines [`AstralWorld`] and related types used at runtime to
//! track the current state of the adventure, and the [`WorldModel`] view of it
//! that the command parser and handlers query.

use crate::ASTRAL_VERSION;
use crate::nlp::WorldSnapshot;
use crate::nlp::patterns::{SnapshotArea, SnapshotObject};
use crate::spinners::SpinnerType;

use anyhow::{Result, anyhow};
use astral_data::{ContainerState, Id, Movability};
use gametools::Spinner;
use log::info;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use variantly::Variantly;

/// Kinds of places where a `GameObject` may be located.
/// Unplaced objects are located `Nowhere`.
#[derive(Debug, Default, Clone, Variantly, PartialEq, Eq, Hash)]
pub enum Location {
    Inventory,
    #[default]
    Nowhere,
    Object(Id),
    Room(Id),
}

/// A lock fitted to an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lock {
    pub key: Option<Id>,
    pub locked: bool,
}

/// Anything the player can refer to: tools, containers, doors.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: Id,
    pub name: Option<String>,
    pub description: String,
    pub synonyms: Vec<String>,
    pub command_aliases: Vec<String>,
    pub location: Location,
    pub movability: Movability,
    pub container_state: Option<ContainerState>,
    pub lock: Option<Lock>,
}
impl GameObject {
    /// Name shown to the player; objects without a usable name fall back to their id.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.replace('_', " "))
    }

    pub fn is_container(&self) -> bool {
        self.container_state.is_some()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.as_ref().is_some_and(|lock| lock.locked)
    }

    /// True if other objects can be put into or taken out of this one right now.
    pub fn is_accessible_container(&self) -> bool {
        self.container_state == Some(ContainerState::Open) && !self.is_locked()
    }

    /// Lower-cased names this object answers to.
    pub fn match_keys(&self) -> Vec<String> {
        let mut keys = vec![self.id.to_lowercase(), self.id.replace('_', " ").to_lowercase()];
        keys.extend(self.name.iter().map(|n| n.to_lowercase()));
        keys.extend(self.synonyms.iter().map(|s| s.to_lowercase()));
        keys.extend(self.command_aliases.iter().map(|a| a.to_lowercase()));
        keys.dedup();
        keys
    }
}

/// Passage from one room to another, optionally through a lockable door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub to: Id,
    pub door: Option<Id>,
    pub barred_message: Option<String>,
}

/// Named part of a room the player can step over to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub id: Id,
    pub name: Option<String>,
    pub aliases: Vec<String>,
    pub description: String,
}
impl Area {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.replace('_', " "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Id,
    pub name: String,
    pub description: String,
    /// Keyed by canonical direction.
    pub exits: BTreeMap<String, Exit>,
    pub areas: Vec<Area>,
}
impl Room {
    pub fn area(&self, area_id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == area_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub room: Id,
    pub area: Option<Id>,
    pub score: usize,
    /// Rooms and areas already visited.
    pub visited: BTreeSet<Id>,
}

/// Read-only access to world state, as needed by the parser and command handlers.
pub trait WorldModel {
    fn object(&self, id: &str) -> Option<&GameObject>;
    /// Ids of objects directly at `location`, in id order.
    fn object_ids_in_location(&self, location: &Location) -> Vec<&str>;
    fn room(&self, id: &str) -> Option<&Room>;
    fn current_room(&self) -> Option<&Room>;
    /// Names and aliases the entity recognizer compiles its patterns from.
    fn snapshot(&self) -> WorldSnapshot;
}

/// Complete state of the running game.
#[derive(Debug, Clone, Default)]
pub struct AstralWorld {
    pub title: String,
    pub intro: String,
    pub rooms: BTreeMap<Id, Room>,
    pub objects: BTreeMap<Id, GameObject>,
    pub player: Player,
    pub spinners: HashMap<SpinnerType, Spinner<String>>,
    pub max_score: usize,
    pub turn_count: usize,
    pub version: String,
}
impl AstralWorld {
    /// Create a new empty world.
    pub fn new_empty() -> AstralWorld {
        let world = Self {
            version: ASTRAL_VERSION.to_string(),
            ..Self::default()
        };
        info!("new, empty 'AstralWorld' created");
        world
    }

    /// Returns a random line from the selected spinner type, or a supplied default.
    pub fn spin_spinner(&self, spin_type: SpinnerType, default: &'static str) -> String {
        self.spinners
            .get(&spin_type)
            .and_then(gametools::Spinner::spin)
            .unwrap_or(default.to_string())
    }

    /// Obtain a reference to the room the player occupies.
    /// # Errors
    /// - if the player's room id is not found
    pub fn player_room_ref(&self) -> Result<&Room> {
        self.rooms
            .get(&self.player.room)
            .ok_or_else(|| anyhow!("player's room id ({}) not found in world", self.player.room))
    }

    /// Get mutable reference to a world object.
    pub fn get_object_mut(&mut self, object_id: &str) -> Option<&mut GameObject> {
        self.objects.get_mut(object_id)
    }

    /// Ids of everything the player carries.
    pub fn inventory(&self) -> Vec<&str> {
        self.object_ids_in_location(&Location::Inventory)
    }

    /// Move an object, returning its previous location.
    ///
    /// # Errors
    /// - if `object_id` is not in the world
    pub fn relocate(&mut self, object_id: &str, to: Location) -> Result<Location> {
        let object = self
            .objects
            .get_mut(object_id)
            .ok_or_else(|| anyhow!("object id ({object_id}) not found in world"))?;
        info!("moving '{object_id}' from {:?} to {to:?}", object.location);
        Ok(std::mem::replace(&mut object.location, to))
    }
}

impl WorldModel for AstralWorld {
    fn object(&self, id: &str) -> Option<&GameObject> {
        self.objects.get(id)
    }

    fn object_ids_in_location(&self, location: &Location) -> Vec<&str> {
        self.objects
            .values()
            .filter(|o| &o.location == location)
            .map(|o| o.id.as_str())
            .collect()
    }

    fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    fn current_room(&self) -> Option<&Room> {
        self.rooms.get(&self.player.room)
    }

    fn snapshot(&self) -> WorldSnapshot {
        let objects = self
            .objects
            .values()
            .map(|o| {
                let entry = SnapshotObject {
                    name: o.name.clone(),
                    synonyms: o.synonyms.clone(),
                    command_aliases: o.command_aliases.clone(),
                };
                (o.id.clone(), entry)
            })
            .collect();
        let rooms = self
            .rooms
            .values()
            .map(|r| {
                let areas = r
                    .areas
                    .iter()
                    .map(|a| SnapshotArea {
                        area_id: a.id.clone(),
                        name: a.name.clone(),
                        aliases: a.aliases.clone(),
                    })
                    .collect();
                (r.id.clone(), areas)
            })
            .collect();
        WorldSnapshot { objects, rooms }
    }
}
