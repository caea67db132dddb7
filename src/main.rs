use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use linekit::report::{describe_hit, group_tree, line_table};
use linekit::{closest_line, init_logging_with, Config, Measurement, Vector2};

#[derive(Parser)]
#[command(name = "linekit")]
#[command(about = "Inspect line measurement documents", long_about = None)]
#[command(
    version = linekit::VERSION,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("LINEKIT_BUILD_DATE"), ")")
)]
struct Cli {
    /// Measurement document (JSON)
    #[arg(value_name = "FILE")]
    measurement: PathBuf,

    /// Settings file (.toml or .json); defaults to the platform config location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the group outline
    #[arg(long)]
    no_tree: bool,

    /// Report the line closest to this image point and mark it in the table
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    at: Option<Vector2>,
}

fn parse_point(value: &str) -> Result<Vector2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("'{s}' is not a finite number"))
    };
    Ok(Vector2::new(coord(x)?, coord(y)?))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Some(
            Config::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => Config::load_if_exists(&Config::default_path()?)?,
    };
    let defaulted = loaded.is_none();
    let config = loaded.unwrap_or_default();
    init_logging_with(&config.logging.level)?;
    if defaulted {
        tracing::warn!("No config file found, using defaults");
    }

    let json = std::fs::read_to_string(&cli.measurement)
        .with_context(|| format!("Failed to read {}", cli.measurement.display()))?;
    let measurement = Measurement::from_json(&json)
        .with_context(|| format!("Invalid measurement {}", cli.measurement.display()))?;
    if let Err(e) = measurement.validate() {
        tracing::warn!("{}: {}", cli.measurement.display(), e);
    }

    println!(
        "{} ({} lines, image {})",
        measurement.name,
        measurement.lines.len(),
        measurement.image
    );
    let tolerance = config.editor.hit_tolerance;
    let hit = cli
        .at
        .and_then(|point| closest_line(&measurement.lines, point, tolerance));
    if let Some(point) = cli.at {
        match &hit {
            Some(hit) => println!("Closest: {}", describe_hit(hit)),
            None => println!(
                "No line within {} px of ({}, {})",
                tolerance, point.x, point.y
            ),
        }
    }

    println!();
    print!(
        "{}",
        line_table(
            &measurement,
            config.editor.display_precision(),
            hit.map(|hit| hit.line.id)
        )
    );

    if !cli.no_tree {
        println!();
        print!("{}", group_tree(&measurement));
    }

    Ok(())
}
