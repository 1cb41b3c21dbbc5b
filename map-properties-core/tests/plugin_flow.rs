use map_properties_core::{
    ActorScope, BgmAction, Direction, GameSwitches, GridMap, MapData, MapProperties,
    MapPropertiesConfig, PluginCommand, DEFAULT_PLUGIN_NAME,
};
use serde_json::{json, Value};

fn nested(v: Value) -> String {
    v.to_string()
}

fn plugin_params() -> String {
    let parallax = json!([
        nested(json!({ "p": "Field", "switch": "5", "alt": "FieldNight", "map_mode": "All Maps", "map_id": "" })),
        nested(json!({
            "p": "Field",
            "switch": "6",
            "alt": "FieldRuins",
            "map_mode": "Only Selected Maps",
            "map_id": nested(json!(["7"])),
        })),
    ]);
    let bgm = json!([nested(json!({
        "m": "Town",
        "switch": "5",
        "alt": "TownNight",
        "map_mode": "All Maps Except Selected Maps",
        "map_id": nested(json!(["4"])),
    }))]);

    json!({
        "Parallax Switch": nested(parallax),
        "Background Music Switch": nested(bgm),
        "Region Restrict All": nested(json!(["1"])),
        "Region Restrict Player": "[]",
        "Region Restrict Events": nested(json!(["9", "0"])),
        "Region Allow All": nested(json!(["12"])),
        "Region Allow Player": nested(json!(["1", "20"])),
        "Region Allow Events": "",
    })
    .to_string()
}

fn plugin() -> MapProperties {
    let config = MapPropertiesConfig::from_json_str(&plugin_params(), DEFAULT_PLUGIN_NAME).unwrap();
    MapProperties::new(config)
}

#[test]
fn config_is_filtered_at_load() {
    let plugin = plugin();
    let config = plugin.config();
    assert_eq!(config.parallax_rules.len(), 2);
    assert_eq!(config.bgm_rules.len(), 1);
    assert_eq!(config.regions.restrict_events.sorted(), vec![9]);
    assert!(config.regions.allow_events.is_empty());
    assert!(config.regions.restrict_player.is_empty());
}

#[test]
fn parallax_resolution_follows_switches_and_maps() {
    let plugin = plugin();

    let night = GameSwitches::with_on([5]);
    assert_eq!(plugin.resolve_parallax("Field", 3, &night), "FieldNight");

    let ruins = GameSwitches::with_on([5, 6]);
    assert_eq!(plugin.resolve_parallax("Field", 7, &ruins), "FieldRuins");
    assert_eq!(plugin.resolve_parallax("Field", 3, &ruins), "FieldNight");

    assert_eq!(plugin.resolve_parallax("Desert", 3, &ruins), "Desert");
}

#[test]
fn bgm_resolution_skips_excluded_map() {
    let plugin = plugin();
    let map: MapData = serde_json::from_value(json!({
        "autoplayBgm": true,
        "bgm": { "name": "Town", "volume": 70, "pitch": 100, "pan": 0 }
    }))
    .unwrap();
    let night = GameSwitches::with_on([5]);

    match plugin.autoplay(&map, 2, false, &night).bgm {
        BgmAction::Play(cue) => assert_eq!(cue.name, "TownNight"),
        other => panic!("unexpected {:?}", other),
    }
    match plugin.autoplay(&map, 4, false, &night).bgm {
        BgmAction::Play(cue) => assert_eq!(cue.name, "Town"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn region_rules_on_a_grid() {
    let plugin = plugin();
    let grid = GridMap::from_json_str(
        r#"{
            "tiles":   [".#...#.", "......."],
            "regions": [[0, 12, 9, 1, 0, 20, 0], [0, 0, 0, 0, 0, 0, 0]]
        }"#,
    )
    .unwrap();

    // Region 12 opens a blocked tile for everyone.
    for scope in [ActorScope::Player, ActorScope::Event] {
        assert!(plugin.is_map_passable(&grid, scope, 0, 0, Direction::Right));
    }
    // Region 9 keeps events out but not the player.
    assert!(!plugin.is_map_passable(&grid, ActorScope::Event, 2, 1, Direction::Up));
    assert!(plugin.is_map_passable(&grid, ActorScope::Player, 2, 1, Direction::Up));
    // Region 1 is a wall even though the player is allowed through it.
    assert!(!plugin.is_map_passable(&grid, ActorScope::Player, 3, 1, Direction::Up));
    assert!(!plugin.is_passable(&grid, 3, 0, Direction::Down));
    assert!(!plugin.is_player_passable(&grid, 3, 0, Direction::Down));
    // Region 20 is a hidden path for the player only.
    assert!(plugin.is_map_passable(&grid, ActorScope::Player, 4, 0, Direction::Right));
    assert!(!plugin.is_map_passable(&grid, ActorScope::Event, 4, 0, Direction::Right));
    // Vehicles only see the map-wide gate.
    assert!(!plugin.is_map_passable(&grid, ActorScope::Vehicle, 4, 0, Direction::Right));
    assert!(!plugin.is_map_passable(&grid, ActorScope::Vehicle, 3, 1, Direction::Up));
    assert!(plugin.is_map_passable(&grid, ActorScope::Vehicle, 0, 0, Direction::Right));
    // Scoped map checks.
    assert!(plugin.is_player_passable(&grid, 5, 0, Direction::Left));
    assert!(!plugin.is_event_passable(&grid, 2, 0, Direction::Left));
}

#[test]
fn scroll_position_survives_transfer() {
    let mut plugin = plugin();
    let switches = GameSwitches::new();
    let map = MapData {
        parallax_name: "Field".to_string(),
        parallax_loop_x: true,
        parallax_sx: 3,
        ..Default::default()
    };

    let mut live = plugin.setup_parallax(&map, 1, &switches);
    live.x = 40.0;
    live.y = 2.0;
    plugin.run_command("save_parallax_position".parse::<PluginCommand>().unwrap(), &mut live);

    let mut next = plugin.setup_parallax(&map, 2, &switches);
    plugin.run_command("load_parallax_position".parse::<PluginCommand>().unwrap(), &mut next);
    assert_eq!((next.x, next.y), (40.0, 2.0));
    assert_eq!(next.name, "Field");
}
