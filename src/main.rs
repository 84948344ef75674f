//! Platesim CLI - single tectonic plate drift and erosion.
//!
//! Builds one plate from a fractal heightmap, lets it drift and erode on a
//! wrap-around world, then exports what is left of it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use thiserror::Error;

use platesim::export::{
    export_age_png, export_continent_map, export_crust_png, export_crust_raw, height_range,
    world_crust, PlateMapOptions, PngExportError, PngExportOptions, RawExportError, RawFormat,
};
use platesim::geometry::{WorldDimension, WorldError};
use platesim::noise::{crust_heightmap, FractalNoiseConfig};
use platesim::tectonics::{Plate, PlateConfig, PlateError};

/// Single tectonic plate simulator.
#[derive(Parser)]
#[command(name = "platesim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drift and erode a plate for a number of steps, then export it.
    Simulate {
        #[command(flatten)]
        setup: PlateSetup,

        /// Number of simulation steps.
        #[arg(long, default_value = "100")]
        steps: u32,

        /// Crust at or above this thickness erodes. Disables erosion when absent.
        #[arg(long)]
        erosion_bound: Option<f32>,

        /// Output directory for exported files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "plate")]
        name: String,

        /// Export format of the crust map.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Also export the crust age map.
        #[arg(long)]
        age_map: bool,

        /// Also export a continent map.
        #[arg(long)]
        continent_map: bool,

        /// Log plate statistics every this many steps.
        #[arg(long, default_value = "10")]
        report_every: u32,
    },

    /// Display information about a plate configuration.
    Info {
        #[command(flatten)]
        setup: PlateSetup,
    },
}

/// World and initial plate shared by all commands.
#[derive(clap::Args)]
struct PlateSetup {
    /// World width in cells.
    #[arg(long, default_value = "256")]
    world_width: usize,

    /// World height in cells.
    #[arg(long, default_value = "128")]
    world_height: usize,

    /// Plate width in cells.
    #[arg(long, default_value = "96")]
    plate_width: usize,

    /// Plate height in cells.
    #[arg(long, default_value = "64")]
    plate_height: usize,

    /// World column of the plate's top-left cell.
    #[arg(long, default_value = "0")]
    x: usize,

    /// World row of the plate's top-left cell.
    #[arg(long, default_value = "0")]
    y: usize,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Noise level above which crust is continental (-1 to 1).
    #[arg(long, default_value = "0.1")]
    sea_level: f32,

    /// Heightmap preset.
    #[arg(long, default_value = "continental")]
    terrain: TerrainPreset,

    /// Use stiffer plates that curve less and lose less speed.
    #[arg(long)]
    rigid: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (high precision).
    RawFloat,
}

#[derive(Clone, Copy, ValueEnum)]
enum TerrainPreset {
    /// Large, smooth landmasses.
    Continental,
    /// Many small islands.
    Archipelago,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Invalid world: {0}")]
    World(#[from] WorldError),
    #[error("Plate error: {0}")]
    Plate(#[from] PlateError),
    #[error("PNG export failed: {0}")]
    Png(#[from] PngExportError),
    #[error("RAW export failed: {0}")]
    Raw(#[from] RawExportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            setup,
            steps,
            erosion_bound,
            output,
            name,
            format,
            age_map,
            continent_map,
            report_every,
        } => run_simulate(
            &setup,
            steps,
            erosion_bound,
            &output,
            &name,
            format,
            age_map,
            continent_map,
            report_every,
        ),
        Commands::Info { setup } => run_info(&setup),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn build_plate(setup: &PlateSetup, seed: u64) -> Result<Plate, CliError> {
    let world = WorldDimension::new(setup.world_width, setup.world_height)?;
    let config = if setup.rigid {
        PlateConfig::rigid()
    } else {
        PlateConfig::default()
    };

    let noise = match setup.terrain {
        TerrainPreset::Continental => FractalNoiseConfig::continental(seed as i32),
        TerrainPreset::Archipelago => FractalNoiseConfig::archipelago(seed as i32),
    };
    let heightmap = crust_heightmap(
        setup.plate_width,
        setup.plate_height,
        &noise,
        setup.sea_level,
        config.continental_base,
    );

    let plate = Plate::new(
        seed,
        &heightmap,
        setup.plate_width,
        setup.plate_height,
        setup.x,
        setup.y,
        0,
        world,
        config,
    )?;
    Ok(plate)
}

/// Segments every continental cell and returns the number of continents.
fn label_continents(plate: &mut Plate) -> Result<usize, PlateError> {
    let bounds = plate.bounds();
    let threshold = plate.config().continental_base;
    for ly in 0..bounds.height {
        for lx in 0..bounds.width {
            let (x, y) = (bounds.left + lx, bounds.top + ly);
            if plate.crust(x, y) >= threshold {
                plate.continent_at(x, y)?;
            }
        }
    }
    Ok(plate.segmentation().live_count())
}

fn report(plate: &mut Plate, step: u32) -> Result<(), PlateError> {
    let continents = label_continents(plate)?;
    let (left, top) = plate.position();
    info!(
        "step {}: at ({:.1}, {:.1}) size {}x{}, mass {:.2}, speed {:.3}, {} continents",
        step,
        left,
        top,
        plate.width(),
        plate.height(),
        plate.mass(),
        plate.velocity(),
        continents
    );
    debug!("step {}: heading {}, momentum {:.2}", step, plate.heading(), plate.momentum());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_simulate(
    setup: &PlateSetup,
    steps: u32,
    erosion_bound: Option<f32>,
    output: &Path,
    name: &str,
    format: ExportFormat,
    age_map: bool,
    continent_map: bool,
    report_every: u32,
) -> Result<(), CliError> {
    let seed = resolve_seed(setup.seed);

    println!("Platesim - Single Plate Simulator");
    println!("=================================");
    println!("World: {}x{}", setup.world_width, setup.world_height);
    println!("Plate: {}x{} at ({}, {})", setup.plate_width, setup.plate_height, setup.x, setup.y);
    println!("Seed: {}", seed);
    println!("Output: {}", output.display());

    let start = Instant::now();
    let mut plate = build_plate(setup, seed)?;
    let initial_mass = plate.mass();
    report(&mut plate, 0)?;

    for step in 1..=steps {
        plate.reset_segments();
        plate.move_plate()?;
        if let Some(bound) = erosion_bound {
            plate.erode(bound);
        }
        if report_every > 0 && step % report_every == 0 {
            report(&mut plate, step)?;
        }
    }

    plate.reset_segments();
    let continents = label_continents(&mut plate)?;
    println!("Simulated {} steps in {:.2?}", steps, start.elapsed());
    println!(
        "Mass: {:.2} -> {:.2}, continents: {}, final position: {}",
        initial_mass,
        plate.mass(),
        continents,
        plate.bounds()
    );

    println!("\nExporting...");
    std::fs::create_dir_all(output)?;
    let crust = world_crust(&plate);
    let (min_h, max_h) = height_range(&crust);
    let max_h = if max_h > min_h { max_h } else { min_h + 1.0 };

    match format {
        ExportFormat::Png => {
            let path = output.join(format!("{}_crust.png", name));
            let options = PngExportOptions {
                min_height: min_h,
                max_height: max_h,
                ..Default::default()
            };
            export_crust_png(&crust, &path, &options)?;
            println!("  Exported {}", path.display());
        }
        ExportFormat::Raw => {
            let path = output.join(format!("{}_crust.raw", name));
            export_crust_raw(&crust, &path, RawFormat::R16LittleEndian, min_h, max_h)?;
            println!("  Exported {} (R16)", path.display());
        }
        ExportFormat::RawFloat => {
            let path = output.join(format!("{}_crust.raw", name));
            export_crust_raw(&crust, &path, RawFormat::R32Float, min_h, max_h)?;
            println!("  Exported {} (R32 float)", path.display());
        }
    }

    if age_map {
        let path = output.join(format!("{}_age.png", name));
        let defaults = PngExportOptions::default();
        export_age_png(plate.age_map(), &path, steps, defaults.compression, defaults.filter)?;
        println!("  Exported {}", path.display());
    }

    if continent_map {
        let path = output.join(format!("{}_continents.png", name));
        let options = PlateMapOptions {
            color_seed: seed,
            ..Default::default()
        };
        export_continent_map(&plate, &path, &options)?;
        println!("  Exported {}", path.display());
    }

    Ok(())
}

fn run_info(setup: &PlateSetup) -> Result<(), CliError> {
    let seed = resolve_seed(setup.seed);
    let mut plate = build_plate(setup, seed)?;
    let continents = label_continents(&mut plate)?;
    let largest = plate.segments().iter().map(|s| s.area).max().unwrap_or(0);
    let heading = plate.heading();

    println!("Plate Configuration");
    println!("===================");
    println!("World: {}x{} ({} cells)", setup.world_width, setup.world_height, plate.world().area());
    println!("Bounds: {}", plate.bounds());
    println!("Seed: {}", seed);
    println!("Mass: {:.2}", plate.mass());
    println!("Centroid (local): ({:.1}, {:.1})", plate.center().x, plate.center().y);
    println!("Heading: ({:.3}, {:.3}), speed {:.2}", heading.x, heading.y, plate.velocity());
    println!("Rotation direction: {:+}", plate.rotation_direction());
    println!("Continents: {} (largest {} cells)", continents, largest);
    Ok(())
}
