//! arena-harness: headless driver for the SKIRMISH simulation.
//!
//! Usage:
//!   arena-harness run --config arena.json --ticks 3600 --dt 0.0166
//!   arena-harness plan --config arena.json

use std::path::PathBuf;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use skirmish_core::commands::SimCommand;
use skirmish_core::components::Health;
use skirmish_core::constants::DT;
use skirmish_core::enums::WavePhase;
use skirmish_core::events::SimEvent;
use skirmish_core::types::Position;
use skirmish_sim::world_setup;
use skirmish_sim::{SimConfig, SimulationEngine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "plan" => cmd_plan(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "arena-harness: SKIRMISH headless arena driver\n\
         \n\
         Commands:\n\
         \n\
         run       Set up the default arena and run the wave plan\n\
         \n\
           --config <path>    JSON SimConfig (optional, default: built-in plan)\n\
           --ticks <N>        Max ticks to run (default: 36000)\n\
           --dt <secs>        Seconds per tick (default: 1/60)\n\
         \n\
         plan      Print the wave plan a config resolves to, as JSON\n\
         \n\
           --config <path>    JSON SimConfig (optional)\n\
         \n\
         Set RUST_LOG=debug for per-event tracing.\n"
    );
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> SimConfig {
    let Some(path) = parse_flag(args, "--config").map(PathBuf::from) else {
        return SimConfig::from_json_str(DEFAULT_PLAN).unwrap_or_default();
    };
    match SimConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {e}", path.display());
            process::exit(1);
        }
    }
}

const DEFAULT_PLAN: &str = r#"{
    "seed": 42,
    "generate": { "count": 5, "base": { "goblin": 3, "orc": 1 }, "scaling": 0.5 }
}"#;

// --- Run command ---

#[derive(Debug, Default)]
struct RunStats {
    attacks: u32,
    crits: u32,
    damage_dealt: i64,
    deaths: u32,
    target_changes: u32,
    waves_cleared: u32,
}

impl RunStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Attacked { is_crit, .. } => {
                self.attacks += 1;
                if *is_crit {
                    self.crits += 1;
                }
            }
            SimEvent::Damaged { amount, .. } => self.damage_dealt += *amount as i64,
            SimEvent::Died { .. } => self.deaths += 1,
            SimEvent::TargetChanged { .. } => self.target_changes += 1,
            SimEvent::WaveStarted { wave } => info!(wave, "wave started"),
            SimEvent::WaveEnded { wave } => {
                self.waves_cleared += 1;
                info!(wave, "wave ended");
            }
            SimEvent::AllWavesComplete { total_kills } => {
                info!(total_kills, "all waves complete");
            }
            _ => {}
        }
    }
}

fn cmd_run(args: &[String]) {
    let config = load_config(args);
    let max_ticks = match parse_flag(args, "--ticks").map(str::parse::<u64>) {
        None => 36_000,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Error: invalid --ticks: {e}");
            process::exit(1);
        }
    };
    let dt = match parse_flag(args, "--dt").map(str::parse::<f32>) {
        None => DT,
        Some(Ok(dt)) if dt > 0.0 => dt,
        Some(_) => {
            eprintln!("Error: --dt must be a positive number");
            process::exit(1);
        }
    };

    let wave_count = config.wave_plan().len();
    if wave_count == 0 {
        eprintln!("Error: config has no waves");
        process::exit(1);
    }
    info!(seed = config.seed, waves = wave_count, dt, "starting arena");

    let mut engine = SimulationEngine::new(config);
    let (world, registry) = engine.setup_parts();
    let player = world_setup::setup_arena(world, registry, Position::new(400.0, 300.0));
    engine.queue_command(SimCommand::StartWaves);

    let mut stats = RunStats::default();
    let mut ticks = 0;
    while ticks < max_ticks {
        for event in engine.tick(dt) {
            stats.record(&event);
        }
        ticks += 1;

        let player_alive = engine
            .world()
            .get::<&Health>(player)
            .map(|h| h.is_alive())
            .unwrap_or(false);
        if !player_alive {
            info!(tick = ticks, "player died");
            break;
        }
        if engine.wave_phase() == WavePhase::Final {
            break;
        }
    }

    let player_hp = engine
        .world()
        .get::<&Health>(player)
        .map(|h| h.current)
        .unwrap_or(0);
    eprintln!(
        "Ran {ticks} ticks ({:.1}s simulated), phase {:?}",
        engine.time().elapsed_secs,
        engine.wave_phase()
    );
    eprintln!(
        "Waves cleared: {}/{wave_count}, kills: {}, player HP: {player_hp}",
        stats.waves_cleared,
        engine.waves().total_kills()
    );
    eprintln!(
        "Attacks: {} ({} crits), damage dealt: {}, deaths: {}, target changes: {}",
        stats.attacks, stats.crits, stats.damage_dealt, stats.deaths, stats.target_changes
    );

    if engine.wave_phase() != WavePhase::Final {
        process::exit(1);
    }
}

// --- Plan command ---

fn cmd_plan(args: &[String]) {
    let config = load_config(args);
    match serde_json::to_string_pretty(&config.wave_plan()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing plan: {e}");
            process::exit(1);
        }
    }
}
