//! Sky report tool
//!
//! Computes where every catalog object appears for an observer and prints
//! altitude/azimuth tables, optionally stepping a simulated clock and
//! answering a pick query against the last frame.
//!
//! Usage:
//!   cargo run --bin sky_report -- --lat 51.48 --lon 0.0 --time 2024-03-20T21:00:00Z
//!   cargo run --bin sky_report -- --lat 40.7 --lon -74.0 --rate 600 --steps 4 --step-seconds 1
//!   cargo run --bin sky_report -- --lat 40.7 --lon -74.0 --pick-alt 30 --pick-az 120 --pick-radius 5

use chrono::{Duration, Utc};
use clap::{ArgAction, Parser};

use skyview::catalogs::bright_sky;
use skyview::{
    parse_timestamp, Catalog, EngineConfig, Frame, Horizontal, InfoPanel, PickIndex, Session,
};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Sky report tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prints observer-local positions of catalog objects",
    long_about = None
)]
struct Args {
    /// Observer latitude in degrees (north positive)
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Observer longitude in degrees (east positive)
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// UTC timestamp (ISO-8601); defaults to now
    #[arg(long)]
    time: Option<String>,

    /// JSON catalog file; defaults to the built-in bright sky catalog
    #[arg(long)]
    catalog: Option<String>,

    /// Simulated seconds per real second
    #[arg(long)]
    rate: Option<f64>,

    /// Number of frames to print
    #[arg(long, default_value_t = 1)]
    steps: usize,

    /// Real seconds between frames
    #[arg(long, default_value_t = 1.0)]
    step_seconds: f64,

    /// Pick query altitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "pick_az")]
    pick_alt: Option<f64>,

    /// Pick query azimuth in degrees
    #[arg(long, requires = "pick_alt")]
    pick_az: Option<f64>,

    /// Pick search radius in degrees
    #[arg(long)]
    pick_radius: Option<f64>,

    /// Only list objects above the horizon
    #[arg(long, action = ArgAction::SetTrue)]
    above_horizon: bool,

    /// JSON engine config file
    #[arg(long)]
    config: Option<String>,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name, value);
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if args.above_horizon {
        config = config.with_min_altitude(0.0);
    }
    if let Some(radius) = args.pick_radius {
        config.pick_radius_deg = radius;
    }
    config.validate()?;
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    match &args.catalog {
        Some(path) => Ok(Catalog::from_file(path)?),
        None => Ok(bright_sky().clone()),
    }
}

fn print_frame(frame: &Frame, catalog: &Catalog) -> Result<()> {
    print_section_header(&format!("Sky at {}", frame.state.timestamp.to_rfc3339()));
    let observer = frame.state.observer;
    print_named_value(
        "Observer",
        format!(
            "lat {:.4}°, lon {:.4}°",
            observer.latitude_deg(),
            observer.longitude_deg()
        ),
    );
    print_named_value("Time scales", frame.time_scales);
    print_named_value(
        "Local sidereal time",
        format!("{:.4}°", frame.time_scales.local_sidereal_deg(observer.longitude_deg())),
    );
    print_named_value("Objects", frame.directions.len());

    println!();
    println!("{:<20} {:<8} {:>7} {:>9} {:>9}", "Name", "Type", "Mag", "Alt", "Az");
    for direction in &frame.directions {
        let object = catalog.get(direction.object_id)?;
        println!(
            "{:<20} {:<8} {:>7.2} {:>9.3} {:>9.3}",
            object.name,
            object.kind.to_string(),
            object.magnitude,
            direction.altitude_deg,
            direction.azimuth_deg
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    log::info!("Loaded {} objects from {}", catalog.len(), catalog.description());

    let timestamp = match &args.time {
        Some(time) => parse_timestamp(time)?,
        None => Utc::now(),
    };

    if !args.step_seconds.is_finite() || args.step_seconds < 0.0 {
        return Err(format!("--step-seconds must be non-negative, got {}", args.step_seconds).into());
    }
    let step = Duration::milliseconds((args.step_seconds * 1000.0).round() as i64);

    let mut session = Session::new(args.lat, args.lon, timestamp)?.with_config(config.clone());
    if let Some(rate) = args.rate {
        session.start(rate)?;
    }

    let mut last_frame = None;
    for i in 0..args.steps.max(1) {
        if i > 0 {
            session.advance(step)?;
        }
        let frame = session.tick(&catalog)?;
        print_frame(&frame, &catalog)?;
        last_frame = Some(frame);
    }
    session.stop();

    if let (Some(alt), Some(az), Some(frame)) = (args.pick_alt, args.pick_az, last_frame) {
        let query = Horizontal::new(alt, az);
        let index = PickIndex::build(&frame.directions, config.pick_cell_deg);

        let mut panel = InfoPanel::new();
        match index.nearest(&query, config.pick_radius_deg) {
            Some(hit) => {
                panel.select(catalog.get(hit.object_id)?);
                print_section_header(&format!(
                    "Pick at alt {:.3}° az {:.3}° ({:.3}° away)",
                    query.altitude_deg, query.azimuth_deg, hit.separation_deg
                ));
            }
            None => print_section_header(&format!(
                "Pick at alt {:.3}° az {:.3}°",
                query.altitude_deg, query.azimuth_deg
            )),
        }
        for line in panel.lines().iter().filter(|line| !line.is_empty()) {
            println!("{}", line);
        }
    }

    Ok(())
}
