use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};

use trainwatch::batch::Batch;
use trainwatch::config::Config;
use trainwatch::import::TleFileImporter;
use trainwatch::predict::{GroundStation, TrainPass, TrainPassFinder};

#[derive(Parser)]
#[command(name = "trainwatch")]
#[command(about = "Satellite batch plane/train classification and combined pass prediction")]
struct Cli {
    /// Configuration file (YAML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a batch into orbital planes and trains
    Classify {
        /// Multi-TLE file holding the batch
        tle_file: PathBuf,
        /// Batch tag, e.g. 6-21
        batch: String,
        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        time: Option<DateTime<Utc>>,
    },
    /// Predict combined train passes for an observer
    Passes {
        tle_file: PathBuf,
        batch: String,
        /// Observer coordinates as "lat,lon" in degrees
        #[arg(long)]
        coordinates: String,
        /// Observer altitude in meters
        #[arg(long, default_value_t = 0.0)]
        altitude: f64,
        /// Search window, e.g. 24h or 3d
        #[arg(long, default_value = "24h")]
        duration: String,
        /// Search start (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Classify {
            tle_file,
            batch,
            time,
        } => classify(&tle_file, &batch, &config, time),
        Commands::Passes {
            tle_file,
            batch,
            coordinates,
            altitude,
            duration,
            start,
            json,
        } => passes(
            &tle_file,
            &batch,
            &config,
            &coordinates,
            altitude,
            &duration,
            start,
            json,
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, trainwatch::config::ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn classify(
    tle_file: &Path,
    batch_tag: &str,
    config: &Config,
    time: Option<DateTime<Utc>>,
) -> ExitCode {
    let importer = TleFileImporter::new(tle_file.to_path_buf());
    let batch = match Batch::new(&importer, batch_tag, config, time) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Classification error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Batch {} ({}) at {}",
        batch.batch_tag(),
        batch.international_designator(),
        batch.time()
    );
    for (i, plane) in batch.planes().iter().enumerate() {
        println!(
            "Plane {} (raan {:.2} deg, {} satellites)",
            i + 1,
            plane.raan(),
            plane.len()
        );
        for satellite in plane.satellites() {
            println!(
                "  {}: raan {:.3} latitude {:.3} phase {:.3} gap {:.3} height {:.1} km",
                satellite.name(),
                satellite.raan(),
                satellite.latitude_argument(),
                satellite.phase(),
                satellite.gap(),
                satellite.height_km()
            );
        }
    }
    println!("{} trains", batch.trains().len());
    for (i, train) in batch.trains().iter().enumerate() {
        let names: Vec<_> = train.satellites().iter().map(|s| s.name()).collect();
        println!("  Train {}: {}", i + 1, names.join(", "));
    }
    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
fn passes(
    tle_file: &Path,
    batch_tag: &str,
    config: &Config,
    coordinates: &str,
    altitude_m: f64,
    duration: &str,
    start: Option<DateTime<Utc>>,
    json: bool,
) -> ExitCode {
    let station = match GroundStation::from_coordinates(coordinates, Some(altitude_m)) {
        Some(s) => s,
        None => {
            eprintln!("Invalid coordinates: {}", coordinates);
            return ExitCode::FAILURE;
        }
    };

    let duration = match humantime::parse_duration(duration) {
        Ok(d) => match Duration::from_std(d) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Duration out of range: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            eprintln!("Invalid duration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let importer = TleFileImporter::new(tle_file.to_path_buf());
    let batch = match Batch::new(&importer, batch_tag, config, None) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Classification error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if batch.trains().is_empty() {
        eprintln!("Batch {} has no trains", batch_tag);
        return ExitCode::FAILURE;
    }

    let start = start.unwrap_or_else(Utc::now);
    let mut failed = false;
    for (i, train) in batch.trains().iter().enumerate() {
        let finder = match TrainPassFinder::new(train, station) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Train {}: {}", i + 1, e);
                failed = true;
                continue;
            }
        };
        match finder.compute_pass_list(start, duration) {
            Ok(list) => print_pass_list(i + 1, &list, json),
            Err(e) => {
                eprintln!("Train {}: {}", i + 1, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_pass_list(train_number: usize, list: &[TrainPass], json: bool) {
    if json {
        match serde_json::to_string_pretty(list) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON error: {}", e),
        }
        return;
    }

    println!("Train {}: {} combined passes", train_number, list.len());
    for pass in list {
        println!(
            "  {} -> {} ({} satellites, {} s)",
            pass.rise().time,
            pass.set().time,
            pass.passes().len(),
            pass.duration().num_seconds()
        );
        for member in pass.passes() {
            let max_elevation = member
                .culmination
                .map(|c| format!("{:.1}", c.elevation_deg))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {}: rise {} set {} max el {}",
                member.satellite, member.rise.time, member.set.time, max_elevation
            );
        }
    }
}
