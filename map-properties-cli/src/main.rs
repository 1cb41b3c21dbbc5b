use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use map_properties_core::{
    resolve_override, ActorScope, Direction, GameSwitches, GridMap, MapData, MapProperties,
    MapPropertiesConfig, RegionIdSet, Result, DEFAULT_PLUGIN_NAME,
};

#[derive(Debug, Parser)]
#[command(name = "map-properties", version, about = "Inspect switch overrides and region passability rules")]
struct Args {
    /// Plugin parameters: a parameter object, a plugin list, or plugins.js.
    #[arg(long, global = true, default_value = "plugins.js")]
    params: PathBuf,

    /// Name of the plugin entry to read from a plugin list.
    #[arg(long, global = true, default_value = DEFAULT_PLUGIN_NAME)]
    plugin_name: String,

    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse the parameters and print what survived validation.
    Validate,

    /// Resolve a parallax or BGM name for a map.
    Resolve {
        #[arg(long, value_enum)]
        kind: MediaKind,
        #[arg(long)]
        name: String,
        #[arg(long)]
        map_id: u32,
        /// Switch ids that are on. Repeatable.
        #[arg(long = "switch")]
        switches: Vec<u32>,
    },

    /// Print the parallax state and autoplay plan for an engine map file.
    Setup {
        #[arg(long)]
        map: PathBuf,
        #[arg(long)]
        map_id: u32,
        #[arg(long = "switch")]
        switches: Vec<u32>,
        #[arg(long, default_value_t = false)]
        in_vehicle: bool,
    },

    /// Decide a single step on a grid map.
    CheckMove {
        #[arg(long)]
        grid: PathBuf,
        #[arg(long, value_enum)]
        actor: Actor,
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        y: i32,
        #[arg(long, value_enum)]
        dir: Dir,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MediaKind {
    Parallax,
    Bgm,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Actor {
    Player,
    Event,
    Vehicle,
    Neutral,
}

impl From<Actor> for ActorScope {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Player => ActorScope::Player,
            Actor::Event => ActorScope::Event,
            Actor::Vehicle => ActorScope::Vehicle,
            Actor::Neutral => ActorScope::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dir {
    Down,
    Left,
    Right,
    Up,
}

impl From<Dir> for Direction {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::Down => Direction::Down,
            Dir::Left => Direction::Left,
            Dir::Right => Direction::Right,
            Dir::Up => Direction::Up,
        }
    }
}

fn format_set(set: &RegionIdSet) -> String {
    let ids: Vec<String> = set.sorted().iter().map(|id| id.to_string()).collect();
    format!("[{}]", ids.join(", "))
}

fn print_summary(config: &MapPropertiesConfig) {
    println!("parallax rules: {}", config.parallax_rules.len());
    for rule in &config.parallax_rules {
        println!(
            "  {} -> {} (switch {:?}, {:?})",
            rule.default_name, rule.alternative_name, rule.switch_id, rule.map_scope
        );
    }
    println!("bgm rules: {}", config.bgm_rules.len());
    for rule in &config.bgm_rules {
        println!(
            "  {} -> {} (switch {:?}, {:?})",
            rule.default_name, rule.alternative_name, rule.switch_id, rule.map_scope
        );
    }
    let r = &config.regions;
    if r.is_empty() {
        println!("no region rules");
        return;
    }
    println!("restrict all:    {}", format_set(&r.restrict_all));
    println!("restrict player: {}", format_set(&r.restrict_player));
    println!("restrict events: {}", format_set(&r.restrict_events));
    println!("allow all:       {}", format_set(&r.allow_all));
    println!("allow player:    {}", format_set(&r.allow_player));
    println!("allow events:    {}", format_set(&r.allow_events));
}

fn run(args: Args) -> Result<()> {
    let config = MapPropertiesConfig::load(&args.params, &args.plugin_name)?;
    log::debug!("loaded plugin parameters from {:?}", args.params);

    match args.command {
        Command::Validate => print_summary(&config),
        Command::Resolve {
            kind,
            name,
            map_id,
            switches,
        } => {
            let switches = GameSwitches::with_on(switches);
            let rules = match kind {
                MediaKind::Parallax => &config.parallax_rules,
                MediaKind::Bgm => &config.bgm_rules,
            };
            println!("{}", resolve_override(&name, rules, map_id, &switches));
        }
        Command::Setup {
            map,
            map_id,
            switches,
            in_vehicle,
        } => {
            let map = MapData::load(&map)?;
            let switches = GameSwitches::with_on(switches);
            let plugin = MapProperties::new(config);
            let report = serde_json::json!({
                "parallax": plugin.setup_parallax(&map, map_id, &switches),
                "autoplay": plugin.autoplay(&map, map_id, in_vehicle, &switches),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::CheckMove {
            grid,
            actor,
            x,
            y,
            dir,
        } => {
            let grid = GridMap::load(&grid)?;
            let plugin = MapProperties::new(config);
            let passable = plugin.is_map_passable(&grid, actor.into(), x, y, dir.into());
            println!("{}", if passable { "pass" } else { "blocked" });
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
