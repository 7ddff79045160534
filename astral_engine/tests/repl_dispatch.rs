use std::path::Path;

use astral_engine::repl::ReplControl;
use astral_engine::world::GameObject;
use astral_engine::{
    AstralWorld, CommandIntent, CommandParser, Location, ParsedIntent, View, ViewItem, WorldModel, dispatch,
    load_world_from,
};

fn game() -> (AstralWorld, CommandParser) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/world.ron");
    let world = load_world_from(&path).expect("bundled world loads");
    let parser = CommandParser::new(&world.snapshot()).expect("parser builds");
    (world, parser)
}

fn run(world: &mut AstralWorld, parser: &CommandParser, text: &str) -> Vec<ViewItem> {
    let mut view = View::new();
    let command = parser.parse(text);
    let control = dispatch(world, &mut view, &command).expect("handler succeeds");
    assert_eq!(control, ReplControl::Continue, "'{text}' ended the game");
    view.items
}

fn location_of(world: &AstralWorld, id: &str) -> Location {
    world.object(id).expect("object exists").location.clone()
}

fn failure(items: &[ViewItem]) -> Option<&str> {
    items.iter().find_map(|item| match item {
        ViewItem::ActionFailure(msg) => Some(msg.as_str()),
        _ => None,
    })
}

fn success(items: &[ViewItem]) -> Option<&str> {
    items.iter().find_map(|item| match item {
        ViewItem::ActionSuccess(msg) => Some(msg.as_str()),
        _ => None,
    })
}

#[test]
fn walkthrough_to_the_torch() {
    let (mut world, parser) = game();
    assert_eq!(world.player.room, "bridge");
    assert_eq!(world.max_score, 3);

    let items = run(&mut world, &parser, "s");
    assert_eq!(world.player.room, "corridor");
    assert_eq!(world.player.score, 1);
    assert!(items.iter().any(ViewItem::is_points_awarded));

    let items = run(&mut world, &parser, "go east");
    assert_eq!(world.player.room, "corridor");
    assert_eq!(
        failure(&items),
        Some("The crew quarters door is sealed. A card reader blinks red beside it.")
    );

    run(&mut world, &parser, "d");
    assert_eq!(world.player.room, "engineering");

    let items = run(&mut world, &parser, "take the keycard from the toolbox");
    assert_eq!(success(&items), Some("You take the keycard from the toolbox."));
    assert_eq!(location_of(&world, "keycard"), Location::Inventory);

    run(&mut world, &parser, "u");
    let items = run(&mut world, &parser, "unlock the door with the keycard");
    assert_eq!(success(&items), Some("You unlock the door with the keycard."));
    assert!(!world.object("quarters_door").unwrap().is_locked());

    run(&mut world, &parser, "e");
    assert_eq!(world.player.room, "quarters");
    assert_eq!(world.player.score, 3);

    let items = run(&mut world, &parser, "take torch");
    assert!(items.iter().any(ViewItem::is_error));
    assert_eq!(location_of(&world, "torch"), Location::Object("locker".into()));

    let items = run(&mut world, &parser, "unlock locker");
    assert_eq!(success(&items), Some("You unlock the locker with the keycard."));

    let items = run(&mut world, &parser, "take torch from locker");
    assert_eq!(success(&items), Some("You take the torch from the locker."));
    assert_eq!(location_of(&world, "torch"), Location::Inventory);
}

#[test]
fn take_put_and_drop() {
    let (mut world, parser) = game();
    world.player.room = "engineering".into();

    run(&mut world, &parser, "take wrench");
    assert_eq!(location_of(&world, "wrench"), Location::Inventory);

    let items = run(&mut world, &parser, "take the wrench");
    assert_eq!(failure(&items), Some("You already have the wrench."));

    let items = run(&mut world, &parser, "put the wrench in the toolbox");
    assert_eq!(success(&items), Some("You put the wrench in the toolbox."));
    assert_eq!(location_of(&world, "wrench"), Location::Object("toolbox".into()));

    run(&mut world, &parser, "get spanner");
    assert_eq!(location_of(&world, "wrench"), Location::Inventory);

    let items = run(&mut world, &parser, "drop spanner");
    assert_eq!(success(&items), Some("You drop the wrench."));
    assert_eq!(location_of(&world, "wrench"), Location::Room("engineering".into()));
}

#[test]
fn containers_cannot_hold_their_holder() {
    let (mut world, _) = game();
    world.player.room = "engineering".into();
    let mut satchel = world.object("toolbox").unwrap().clone();
    satchel.id = "satchel".into();
    satchel.name = Some("satchel".into());
    satchel.synonyms.clear();
    satchel.location = Location::Inventory;
    world.objects.insert("satchel".into(), satchel);
    world.get_object_mut("toolbox").unwrap().location = Location::Inventory;
    let parser = CommandParser::new(&world.snapshot()).unwrap();

    let items = run(&mut world, &parser, "put the toolbox in the satchel");
    assert_eq!(success(&items), Some("You put the toolbox in the satchel."));
    assert_eq!(location_of(&world, "toolbox"), Location::Object("satchel".into()));

    let turns = world.turn_count;
    let items = run(&mut world, &parser, "put the satchel in the toolbox");
    assert_eq!(
        failure(&items),
        Some("You can't put the satchel in the toolbox: the toolbox is inside it.")
    );
    assert_eq!(location_of(&world, "satchel"), Location::Inventory);
    assert_eq!(location_of(&world, "toolbox"), Location::Object("satchel".into()));
    assert_eq!(world.turn_count, turns);
}

#[test]
fn fixed_objects_stay_put() {
    let (mut world, parser) = game();
    let turns = world.turn_count;
    let items = run(&mut world, &parser, "take the console");
    assert_eq!(failure(&items), Some("You can't take the console: it is part of the bridge."));
    assert_eq!(location_of(&world, "flight_console"), Location::Room("bridge".into()));
    assert_eq!(world.turn_count, turns);
}

#[test]
fn closed_containers_refuse_access() {
    let (mut world, parser) = game();
    world.player.room = "engineering".into();

    let items = run(&mut world, &parser, "close the toolbox");
    assert_eq!(success(&items), Some("You close the toolbox."));

    let items = run(&mut world, &parser, "take the keycard from the toolbox");
    assert_eq!(failure(&items), Some("The toolbox is closed."));
    assert_eq!(location_of(&world, "keycard"), Location::Object("toolbox".into()));

    run(&mut world, &parser, "open the toolbox");
    run(&mut world, &parser, "take keycard");
    assert_eq!(location_of(&world, "keycard"), Location::Inventory);
}

#[test]
fn wrong_key_is_rejected() {
    let (mut world, parser) = game();
    world.player.room = "corridor".into();
    world.get_object_mut("keycard").unwrap().location = Location::Inventory;
    world.get_object_mut("wrench").unwrap().location = Location::Inventory;

    run(&mut world, &parser, "unlock the door with the keycard");
    let items = run(&mut world, &parser, "lock the door with the wrench");
    assert_eq!(failure(&items), Some("The wrench doesn't fit the door's lock."));
    assert!(!world.object("quarters_door").unwrap().is_locked());

    let items = run(&mut world, &parser, "lock door with card");
    assert_eq!(success(&items), Some("You lock the door with the keycard."));
    assert!(world.object("quarters_door").unwrap().is_locked());
}

#[test]
fn moving_between_areas() {
    let (mut world, parser) = game();
    let items = run(&mut world, &parser, "go to the nav station");
    assert_eq!(world.player.area.as_deref(), Some("nav_station"));
    assert!(items.iter().any(ViewItem::is_room_description));

    let items = run(&mut world, &parser, "go to the nav station");
    assert_eq!(failure(&items), Some("You're already at the navigation station."));

    run(&mut world, &parser, "south");
    assert!(world.player.area.is_none());
    let items = run(&mut world, &parser, "go to the nav station");
    assert_eq!(failure(&items), Some("You can't get to the nav station from here."));
}

fn add_crates(world: &mut AstralWorld) {
    for (id, color) in [("red_crate", "red"), ("blue_crate", "blue")] {
        let mut crate_obj = world.object("wrench").unwrap().clone();
        crate_obj.id = id.into();
        crate_obj.name = Some("crate".into());
        crate_obj.synonyms = vec![format!("{color} crate")];
        crate_obj.location = Location::Room("bridge".into());
        world.objects.insert(id.into(), crate_obj);
    }
}

#[test]
fn parsed_shared_name_asks_which() {
    let (mut world, _) = game();
    add_crates(&mut world);
    let parser = CommandParser::new(&world.snapshot()).unwrap();
    let turns = world.turn_count;

    let command = parser.parse("take crate");
    assert_eq!(command.intent, CommandIntent::Take);
    assert!(command.target_object_id.is_some());
    let items = run(&mut world, &parser, "take crate");
    assert_eq!(failure(&items), Some("Which \"crate\" do you mean: crate, crate?"));
    assert_eq!(location_of(&world, "red_crate"), Location::Room("bridge".into()));
    assert_eq!(location_of(&world, "blue_crate"), Location::Room("bridge".into()));
    assert_eq!(world.turn_count, turns);

    let items = run(&mut world, &parser, "take the red crate");
    assert_eq!(success(&items), Some("You take the crate."));
    assert_eq!(location_of(&world, "red_crate"), Location::Inventory);
    assert_eq!(location_of(&world, "blue_crate"), Location::Room("bridge".into()));
}

#[test]
fn ambiguous_names_ask_which() {
    let (mut world, _) = game();
    add_crates(&mut world);

    let mut view = View::new();
    let command = ParsedIntent {
        target: Some("crate".into()),
        ..ParsedIntent::bare(CommandIntent::Take, "take crate")
    };
    dispatch(&mut world, &mut view, &command).unwrap();
    assert_eq!(failure(&view.items), Some("Which \"crate\" do you mean: crate, crate?"));
    assert_eq!(location_of(&world, "red_crate"), Location::Room("bridge".into()));
    assert_eq!(location_of(&world, "blue_crate"), Location::Room("bridge".into()));
}

#[test]
fn unknown_commands_change_nothing() {
    let (mut world, parser) = game();
    let objects: Vec<GameObject> = world.objects.values().cloned().collect();
    let player = world.player.clone();
    let turns = world.turn_count;

    let flood = vec!["look"; 80].join(" ");
    for text in ["xyzzy quux", "", flood.as_str()] {
        let items = run(&mut world, &parser, text);
        assert!(items.iter().all(ViewItem::is_error), "'{text}' produced {items:?}");
    }
    assert_eq!(world.objects.values().cloned().collect::<Vec<_>>(), objects);
    assert_eq!(world.player, player);
    assert_eq!(world.turn_count, turns);
}

#[test]
fn quit_ends_the_loop() {
    let (mut world, parser) = game();
    let mut view = View::new();
    let control = dispatch(&mut world, &mut view, &parser.parse("q")).unwrap();
    assert_eq!(control, ReplControl::Quit);
    assert!(view.contains(ViewItem::is_quit_summary));
}
