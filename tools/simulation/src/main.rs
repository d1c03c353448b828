//! Simulation runner binary
//!
//! Usage: `market-sim [seed] [rounds]`. Prints the JSON report.

use simulation::{run, SimConfig};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config = SimConfig::default();

    if let Some(seed) = args.next() {
        config.seed = seed.parse().unwrap_or_else(|_| {
            eprintln!("invalid seed '{}', using default", seed);
            SimConfig::default().seed
        });
    }
    if let Some(rounds) = args.next() {
        config.rounds = rounds.parse().unwrap_or_else(|_| {
            eprintln!("invalid rounds '{}', using default", rounds);
            SimConfig::default().rounds
        });
    }

    let report = run(config);
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}
