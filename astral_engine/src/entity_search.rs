//! Entity Search Module
//!
//! Handlers take target text from a parsed command and need the id of the object
//! the player meant. The parser may already have recognized an object id, but it
//! knows nothing about where things are; the search here decides what is actually
//! in scope and whether the text is ambiguous there.
//!
//! Matching is tiered: an exact match on id, name, synonym or alias beats a
//! substring match. If several objects match in the winning tier the search
//! reports them all rather than picking one.

use thiserror::Error;

use crate::world::{AstralWorld, Location, WorldModel};

/// Which objects a search may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Everything in the room, in open containers, or carried.
    Visible,
    /// Uncarried objects in the room or in its open containers.
    Reachable,
    /// Only objects in inventory.
    Inventory,
    /// Objects directly inside the given container.
    Contents(String),
}

/// Possible errors / situations causing a failed entity search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("no entity in scope name matching user input '{0}'")]
    NoMatchingName(String),
    #[error("'{input}' could mean any of: {}", candidates.join(", "))]
    Ambiguous { input: String, candidates: Vec<String> },
    #[error("found no room with the supplied id ({0})")]
    InvalidRoomId(String),
}

/// Ids of every object in `scope`, in id order.
///
/// # Errors
/// - `InvalidRoomId` if the player's room is missing
pub fn objects_in_scope(world: &AstralWorld, scope: &SearchScope) -> Result<Vec<String>, SearchError> {
    let room_id = &world.player.room;
    if world.room(room_id).is_none() {
        return Err(SearchError::InvalidRoomId(room_id.clone()));
    }
    let mut ids: Vec<String> = match scope {
        SearchScope::Contents(container) => world
            .object_ids_in_location(&Location::Object(container.clone()))
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        SearchScope::Inventory => with_open_contents(world, world.inventory()),
        SearchScope::Reachable => with_open_contents(world, world.object_ids_in_location(&Location::Room(room_id.clone()))),
        SearchScope::Visible => {
            let mut top = world.object_ids_in_location(&Location::Room(room_id.clone()));
            top.extend(world.inventory());
            with_open_contents(world, top)
        },
    };
    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// `top` plus the contents of any accessible containers among them.
fn with_open_contents(world: &AstralWorld, top: Vec<&str>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut pending = top;
    while let Some(id) = pending.pop() {
        if found.iter().any(|f| f == id) {
            continue;
        }
        found.push(id.to_string());
        if let Some(object) = world.object(id)
            && object.is_accessible_container()
        {
            pending.extend(world.object_ids_in_location(&Location::Object(id.to_string())));
        }
    }
    found
}

/// Find the object in `scope` that `text` refers to.
///
/// `hint` is the object id the parser recognized, if any. It settles the search only
/// when that object is in scope and no other object in scope has `text` as an exact name.
///
/// # Errors
/// - `NoMatchingName` if nothing in scope matches
/// - `Ambiguous` if several objects match equally well
/// - `InvalidRoomId` if the player's room is missing
pub fn find_object_match(
    world: &AstralWorld,
    text: &str,
    hint: Option<&str>,
    scope: &SearchScope,
) -> Result<String, SearchError> {
    let haystack = objects_in_scope(world, scope)?;
    let needle = text.trim().to_lowercase();
    let keyed: Vec<(&String, Vec<String>)> = haystack
        .iter()
        .filter_map(|id| world.object(id).map(|o| (id, o.match_keys())))
        .collect();
    let exact: Vec<&String> = keyed
        .iter()
        .filter(|(_, keys)| !needle.is_empty() && keys.iter().any(|k| *k == needle))
        .map(|(id, _)| *id)
        .collect();

    // the hint only settles the search when no other object in scope answers to the same name
    if let Some(hint) = hint
        && haystack.iter().any(|id| id == hint)
        && exact.iter().all(|id| *id == hint)
    {
        return Ok(hint.to_string());
    }

    if needle.is_empty() {
        return Err(SearchError::NoMatchingName(text.to_string()));
    }
    let tier = if exact.is_empty() {
        keyed
            .iter()
            .filter(|(_, keys)| keys.iter().any(|k| k.contains(&needle)))
            .map(|(id, _)| *id)
            .collect()
    } else {
        exact
    };

    match tier.as_slice() {
        [] => Err(SearchError::NoMatchingName(text.to_string())),
        [only] => Ok((*only).clone()),
        many => Err(SearchError::Ambiguous {
            input: text.to_string(),
            candidates: many
                .iter()
                .filter_map(|id| world.object(id).map(crate::world::GameObject::display_name))
                .collect(),
        }),
    }
}
