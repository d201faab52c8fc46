use kirana_runner::{Session, SessionConfig};
use kirana_sim::{Catalog, SimulatorConfig};
use std::time::Duration;

fn print_help() {
    eprintln!(
        r#"Kirana Runner - headless storefront session over the simulated retail network

USAGE:
    kirana-runner [OPTIONS]

OPTIONS:
    --config <PATH>     Load simulator configuration from JSON file
    --catalog <PATH>    Load seed data (products, tips, offers, requests) from JSON file
    --duration <SECS>   Seconds to run after onboarding (default: 30)
    --seed <N>          Seed the simulator's random number generator
    --search <TEXT>     Marketplace search used by the views and the shopkeeper
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with defaults
    kirana-runner

    # Reproducible two-minute run
    kirana-runner --duration 120 --seed 42

    # Verbose run with custom seed data
    RUST_LOG=debug kirana-runner --catalog catalog.json
"#
    );
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut catalog_path: Option<String> = None;
    let mut duration: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut search: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                config_path = Some(value_of(&args, i, "--config"));
            }
            "--catalog" => {
                i += 1;
                catalog_path = Some(value_of(&args, i, "--catalog"));
            }
            "--duration" | "-d" => {
                i += 1;
                duration = Some(value_of(&args, i, "--duration").parse()?);
            }
            "--seed" => {
                i += 1;
                seed = Some(value_of(&args, i, "--seed").parse()?);
            }
            "--search" => {
                i += 1;
                search = Some(value_of(&args, i, "--search"));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut simulator = match config_path {
        Some(path) => {
            log::info!("Loading simulator configuration from: {}", path);
            SimulatorConfig::from_file(&path)?
        }
        None => SimulatorConfig::default(),
    };
    if let Some(seed) = seed {
        simulator = simulator.with_seed(seed);
    }

    let catalog = match catalog_path {
        Some(path) => {
            log::info!("Loading catalog from: {}", path);
            Catalog::from_file(&path)?
        }
        None => Catalog::default(),
    };

    let mut config = SessionConfig::default()
        .with_simulator(simulator)
        .with_catalog(catalog);
    if let Some(secs) = duration {
        config = config.with_duration(Duration::from_secs(secs));
    }
    if let Some(search) = search {
        config = config.with_offer_search(search);
    }

    let report = Session::new(config).run().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
