use std::env;
use std::fs;
use std::path::Path;
use std::process;

use violin_fingering::{solve, InputEvent, SolverConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: fingering <bpm> <events.json> [config.toml] [output.json]");
        process::exit(1);
    }

    let bpm: f64 = match args[1].parse() {
        Ok(bpm) => bpm,
        Err(e) => {
            eprintln!("Invalid bpm '{}': {}", args[1], e);
            process::exit(1);
        }
    };

    let events_path = &args[2];
    let config_path = args.get(3);
    let output_path = args.get(4);

    let events_json = match fs::read_to_string(events_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", events_path, e);
            process::exit(1);
        }
    };

    let events: Vec<InputEvent> = match serde_json::from_str(&events_json) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error parsing events from '{}': {}", events_path, e);
            process::exit(1);
        }
    };

    let mut config = SolverConfig::new(bpm);
    if let Some(path) = config_path {
        let overrides = match SolverConfig::load_overrides(Path::new(path)) {
            Ok(overrides) => overrides,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path, e);
                process::exit(1);
            }
        };
        config = config.merge(overrides);
    }

    let result = match solve(&events, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Solve error: {}", e);
            process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&result) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote fingering result to {}", path);
        }
        None => {
            println!("{}", json);
        }
    }
}
