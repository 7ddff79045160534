//! Development mode command handlers.
//!
//! Only reachable when the crate is built with the `dev-mode` feature. These
//! commands inspect the command parser and reload world data without restarting:
//!
//! - `:parse <text>` prints the parsed command as JSON
//! - `:patterns` lists the compiled entity pattern counts
//! - `:reload` reloads `world.ron` and rebuilds the parser's patterns
//!
//! All dev commands log at `warn` level to leave an audit trail.

use anyhow::{Context, Result};
use log::warn;

use crate::{
    View, ViewItem,
    loader::load_world,
    nlp::CommandParser,
    world::{AstralWorld, WorldModel},
};

/// Run a `:`-prefixed developer command.
///
/// Returns `true` when the world was replaced, so callers can refresh anything
/// derived from it.
///
/// # Errors
/// - if the parse result cannot be serialized or the world file fails to reload
pub fn dev_command_handler(
    world: &mut AstralWorld,
    view: &mut View,
    parser: &mut CommandParser,
    line: &str,
) -> Result<bool> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match command {
        ":parse" => {
            dev_parse_handler(view, parser, rest.trim())?;
            Ok(false)
        },
        ":patterns" => {
            dev_patterns_handler(view, parser);
            Ok(false)
        },
        ":reload" => {
            let fresh = load_world().context("while reloading world")?;
            dev_reload_handler(world, view, parser, fresh);
            Ok(true)
        },
        other => {
            view.push(ViewItem::Error(format!(
                "Unknown dev command '{other}'. Try :parse, :patterns or :reload."
            )));
            Ok(false)
        },
    }
}

/// Show the parser's full output for `text`.
///
/// # Errors
/// - if the result cannot be serialized
pub fn dev_parse_handler(view: &mut View, parser: &CommandParser, text: &str) -> Result<()> {
    let parsed = parser.parse(text);
    let json = serde_json::to_string_pretty(&parsed).context("serializing parse result")?;
    warn!("DEV_MODE :parse '{text}' -> {}", parsed.intent);
    view.push(ViewItem::EngineMessage(json));
    Ok(())
}

/// List the compiled pattern counts by entity label.
pub fn dev_patterns_handler(view: &mut View, parser: &CommandParser) {
    let mut counts: Vec<_> = parser.patterns().counts().into_iter().collect();
    counts.sort();
    let mut lines = vec![format!("{} entity patterns compiled", parser.patterns().len())];
    lines.extend(counts.iter().map(|(label, count)| format!("  {label:?}: {count}")));
    warn!("DEV_MODE :patterns ({} total)", parser.patterns().len());
    view.push(ViewItem::EngineMessage(lines.join("\n")));
}

/// Swap in a freshly loaded world, keeping the player's place if the room still exists.
pub fn dev_reload_handler(world: &mut AstralWorld, view: &mut View, parser: &mut CommandParser, mut fresh: AstralWorld) {
    if fresh.room(&world.player.room).is_some() {
        fresh.player = world.player.clone();
    }
    fresh.turn_count = world.turn_count;
    *world = fresh;
    parser.rebuild(&world.snapshot());
    warn!(
        "DEV_MODE :reload -- {} rooms, {} objects, {} patterns",
        world.rooms.len(),
        world.objects.len(),
        parser.patterns().len()
    );
    view.push(ViewItem::EngineMessage(format!(
        "World reloaded: {} rooms, {} objects.",
        world.rooms.len(),
        world.objects.len()
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandIntent;
    use crate::nlp::WorldSnapshot;
    use crate::world::{GameObject, Location, Room};
    use astral_data::Movability;
    use std::collections::BTreeMap;

    fn parser() -> CommandParser {
        CommandParser::new(&WorldSnapshot::new().with_object("wrench", "wrench", &[])).unwrap()
    }

    #[test]
    fn parse_command_prints_json() {
        let mut view = View::new();
        dev_parse_handler(&mut view, &parser(), "take the wrench").unwrap();
        let ViewItem::EngineMessage(json) = &view.items[0] else {
            panic!("expected engine message, got {:?}", view.items[0]);
        };
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["intent"], "take");
        assert_eq!(value["target_object_id"], "wrench");
    }

    #[test]
    fn patterns_command_reports_counts() {
        let mut view = View::new();
        dev_patterns_handler(&mut view, &parser());
        let ViewItem::EngineMessage(text) = &view.items[0] else {
            panic!("expected engine message");
        };
        assert!(text.contains("GameObject: 1"));
        assert!(text.contains("Direction"));
    }

    #[test]
    fn reload_rebuilds_patterns_and_keeps_player() {
        let mut world = AstralWorld::new_empty();
        let room = Room {
            id: "bay".into(),
            name: "Bay".into(),
            description: String::new(),
            exits: BTreeMap::new(),
            areas: vec![],
        };
        world.rooms.insert("bay".into(), room.clone());
        world.player.room = "bay".into();
        world.player.score = 3;

        let mut fresh = AstralWorld::new_empty();
        fresh.rooms.insert("bay".into(), room);
        fresh.objects.insert(
            "torch".into(),
            GameObject {
                id: "torch".into(),
                name: Some("torch".into()),
                description: String::new(),
                synonyms: vec![],
                command_aliases: vec![],
                location: Location::Room("bay".into()),
                movability: Movability::Free,
                container_state: None,
                lock: None,
            },
        );

        let mut parser = parser();
        let mut view = View::new();
        dev_reload_handler(&mut world, &mut view, &mut parser, fresh);
        assert_eq!(world.player.score, 3);
        assert!(world.objects.contains_key("torch"));
        let parsed = parser.parse("take torch");
        assert_eq!(parsed.intent, CommandIntent::Take);
        assert_eq!(parsed.target_object_id.as_deref(), Some("torch"));
    }
}
