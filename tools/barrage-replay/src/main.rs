//! barrage-replay: run a scenario headlessly and print what each level did.
//!
//! Usage:
//!   barrage-replay run endless --levels 20 --seed 7
//!   barrage-replay run scenarios/custom.json --kill-every 90
//!   barrage-replay list

use std::path::Path;
use std::process;

use barrage_core::commands::SessionCommand;
use barrage_core::constants::{DEFAULT_SEED, TICK_RATE};
use barrage_core::enums::SessionPhase;
use barrage_core::events::ProgressionEvent;
use barrage_sim::arena::Arena;
use barrage_sim::scenario::{ScenarioConfig, ScenarioError, BUILTIN_NAMES};
use barrage_sim::wave_source::ScoreBoard;
use barrage_sim::ProgressionEngine;

/// Upper bound on simulated time, in seconds.
const MAX_SECS: u64 = 3_600;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => {
            if let Err(err) = cmd_run(&args[2..]) {
                eprintln!("Error: {err}");
                process::exit(1);
            }
        }
        "list" => {
            for name in BUILTIN_NAMES {
                println!("{name}");
            }
        }
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
        "barrage-replay: BARRAGE progression replay tool\n\
         \n\
         Commands:\n\
         \n\
         run <scenario>   Run a builtin scenario name or a scenario .json file\n\
         \n\
           --levels <N>       Stop after N levels (default: 10)\n\
           --seed <N>         Arena RNG seed (default: 42)\n\
           --kill-every <N>   Destroy every enemy each N ticks (default: 60)\n\
         \n\
         list             Print the builtin scenario names\n\
         \n\
         Set RUST_LOG=barrage=debug for scheduler traces.\n"
    );
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|value| value.parse().ok())
}

fn load_scenario(name: &str) -> Result<ScenarioConfig, ScenarioError> {
    let path = Path::new(name);
    if path.extension().is_some_and(|ext| ext == "json") {
        ScenarioConfig::from_file(path)
    } else {
        ScenarioConfig::builtin(name)
    }
}

fn cmd_run(args: &[String]) -> Result<(), ScenarioError> {
    let Some(name) = args.first() else {
        eprintln!("Error: run needs a scenario");
        print_usage();
        process::exit(1);
    };
    let levels: i32 = parse_flag(args, "--levels").unwrap_or(10);
    let seed: u64 = parse_flag(args, "--seed").unwrap_or(DEFAULT_SEED);
    let kill_every: u64 = parse_flag::<u64>(args, "--kill-every").unwrap_or(60).max(1);

    let scenario = load_scenario(name)?;
    println!(
        "Scenario '{}' ({:?}), {} streams, {} mission waves, seed {seed}",
        scenario.name,
        scenario.mode,
        scenario.streams.len(),
        scenario.mission.len()
    );

    tracing::debug!(target: "barrage::replay", levels, kill_every, "replay configured");

    let mut engine = ProgressionEngine::new(scenario, Arena::new(seed));
    engine.queue_command(SessionCommand::StartSession);

    let max_ticks = MAX_SECS * u64::from(TICK_RATE);
    let mut level_started_at = 0u64;
    let mut levels_done = 0;

    while engine.time().tick < max_ticks {
        let tick = engine.time().tick;
        if tick > 0 && tick % kill_every == 0 {
            engine.world_mut().clear_all();
        }

        let snapshot = engine.tick();
        for event in &snapshot.events {
            match event {
                ProgressionEvent::LevelStarted { .. } => level_started_at = tick,
                ProgressionEvent::LevelEnded { level } => {
                    levels_done += 1;
                    println!(
                        "level {level:>3}  {:>7.1}s  enemies {:>6}  score {:>8}  streams {}",
                        (tick - level_started_at) as f64 / f64::from(TICK_RATE),
                        snapshot.enemies_spawned,
                        engine.world().current_score(),
                        snapshot.streams.len()
                    );
                }
                ProgressionEvent::StreamsExhausted { level } => {
                    println!("every stream exhausted after level {level}");
                }
                ProgressionEvent::MissionComplete {
                    enemies_spawned,
                    score,
                    new_high_score,
                } => {
                    println!(
                        "mission complete: {enemies_spawned} enemies, score {score}{}",
                        if *new_high_score { " (new high score)" } else { "" }
                    );
                }
                _ => {}
            }
        }

        if snapshot.phase == SessionPhase::Complete || levels_done >= levels {
            break;
        }
    }

    println!(
        "Stopped at tick {} on level {}, {} enemies spawned, high score {}",
        engine.time().tick,
        engine.level(),
        engine.enemies_spawned(),
        engine.world().high_score()
    );
    Ok(())
}
