use serde::{Deserialize, Serialize};

use crate::loose;

/// Stable identifier used across WorldDef references.
pub type Id = String;

/// Top-level world data loaded by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    pub game: GameDef,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

/// Game-level metadata and startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameDef {
    pub title: String,
    #[serde(default)]
    pub intro: String,
    pub start_room: Id,
    #[serde(default)]
    pub start_area: Option<Id>,
}

/// Room definition: description, exits and the named areas within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: Id,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub exits: Vec<ExitDef>,
    #[serde(default)]
    pub areas: Vec<AreaDef>,
}

/// Exit metadata for room navigation.
///
/// An exit with a `door` is passable only while that object is unlocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitDef {
    pub direction: String,
    pub to: Id,
    #[serde(default)]
    pub door: Option<Id>,
    #[serde(default)]
    pub barred_message: Option<String>,
}

/// A sub-location inside a room that the player can move to ("go to the nav station").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaDef {
    pub id: Id,
    #[serde(default, deserialize_with = "loose::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose::text_list")]
    pub command_aliases: Vec<String>,
    #[serde(default)]
    pub desc: String,
}

/// Object definition.
///
/// `name`, `synonyms` and `command_aliases` are decoded leniently: entries of the
/// wrong shape are dropped (with a warning) rather than failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub id: Id,
    #[serde(default, deserialize_with = "loose::text")]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: String,
    #[serde(default, deserialize_with = "loose::text_list")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "loose::text_list")]
    pub command_aliases: Vec<String>,
    pub location: LocationRef,
    #[serde(default)]
    pub movability: Movability,
    #[serde(default)]
    pub container_state: Option<ContainerState>,
    #[serde(default)]
    pub lock: Option<LockDef>,
}

/// Authoring-time reference to an object's starting location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LocationRef {
    Inventory,
    Nowhere,
    Room(Id),
    Object(Id),
}

/// Lock fitted to an object (door, locker, chest).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LockDef {
    /// Object required to operate the lock; `None` means it locks by hand.
    #[serde(default)]
    pub key: Option<Id>,
    #[serde(default)]
    pub locked: bool,
}

/// Container state for objects that can hold other objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerState {
    Open,
    Closed,
}

/// Movability constraints for objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Movability {
    Fixed {
        reason: String,
    },
    #[default]
    Free,
}
