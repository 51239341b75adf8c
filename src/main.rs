use anyhow::{bail, Context};
use boundary_measure::config::load_config_or_default;
use boundary_measure::data::load_raster;
use boundary_measure::logging::init_logging;
use boundary_measure::pipeline::{measure_zone, summarize_zones, ZoneInput, ZoneMeasurement};
use boundary_measure::visualization::{save_overlay, OverlayStyle};
use boundary_measure::*;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "measure")]
#[command(about = "Measure hand-drawn boundaries on images in pixels or real-world units")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Args, Debug, Clone)]
struct ReferenceArgs {
    /// Pixel length of a known reference distance
    #[arg(long)]
    reference_pixels: Option<f64>,

    /// Real-world length of the reference distance
    #[arg(long)]
    reference_length: Option<f64>,

    /// Unit of the reference length (meters, feet, yards, inches, cm, mm)
    #[arg(long, default_value = "meters")]
    reference_unit: String,
}

impl ReferenceArgs {
    fn reference(&self) -> anyhow::Result<Option<ManualReference>> {
        match (self.reference_pixels, self.reference_length) {
            (Some(pixels), Some(length)) => Ok(Some(ManualReference::new(
                pixels,
                length,
                self.reference_unit.clone(),
            ))),
            (None, None) => Ok(None),
            _ => bail!("--reference-pixels and --reference-length must be given together"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and measure the main drawn boundary in an image
    Image {
        /// Path to the image
        image: PathBuf,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Include every area and length unit in calibrated results
        #[arg(long)]
        expand_units: bool,

        /// Log per-stage diagnostics at info level
        #[arg(long)]
        debug: bool,

        /// Print the full result instead of the summary report
        #[arg(long)]
        full: bool,

        /// Write an annotated copy of the image
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Output file for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Measure a boundary given as coordinates, e.g. '[[0,0],[100,0],[100,50]]'
    Points {
        /// JSON array of [x, y] pairs
        points: String,

        #[command(flatten)]
        reference: ReferenceArgs,

        #[arg(long)]
        expand_units: bool,

        #[arg(long)]
        full: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute pixels per meter from a reference or a map zoom level
    Scale {
        #[command(flatten)]
        reference: ReferenceArgs,

        /// Latitude in degrees, used with --zoom
        #[arg(long, requires = "zoom", allow_negative_numbers = true)]
        latitude: Option<f64>,

        /// Web map zoom level, used with --latitude
        #[arg(long, requires = "latitude")]
        zoom: Option<u8>,
    },

    /// Express an area and/or distance in every supported unit
    Convert {
        /// Area in square meters
        #[arg(long)]
        area_sq_m: Option<f64>,

        /// Distance in meters
        #[arg(long)]
        distance_m: Option<f64>,
    },

    /// Measure named zones from a JSON file and summarize the property
    Zones {
        /// JSON file: {"pixels_per_meter": 10.0, "zones": {"house": [[x, y], ...]}}
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Deserialize)]
struct ZoneFile {
    pixels_per_meter: Option<f64>,
    reference: Option<ManualReference>,
    zones: BTreeMap<String, Vec<[i32; 2]>>,
}

#[derive(Serialize)]
struct ZoneReport {
    zones: Vec<ZoneMeasurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<pipeline::PropertySummary>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_or_default(cli.config.as_deref());
    if cli.verbose > 0 {
        let level = match cli.verbose {
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        config.logging.global_level = level.to_string();
        config.logging.detection_level = level.to_string();
        config.logging.pipeline_level = level.to_string();
    }
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        Commands::Image {
            image,
            reference,
            expand_units,
            debug,
            full,
            overlay,
            output,
        } => {
            let options = MeasureOptions {
                reference: reference.reference()?,
                expand_units,
                debug,
            };
            handle_image(config, &image, &options, full, overlay.as_deref(), output.as_deref())?;
        }
        Commands::Points {
            points,
            reference,
            expand_units,
            full,
            output,
        } => {
            let options = MeasureOptions {
                reference: reference.reference()?,
                expand_units,
                debug: false,
            };
            handle_points(config, &points, &options, full, output.as_deref())?;
        }
        Commands::Scale {
            reference,
            latitude,
            zoom,
        } => handle_scale(&reference, latitude, zoom)?,
        Commands::Convert {
            area_sq_m,
            distance_m,
        } => handle_convert(area_sq_m, distance_m)?,
        Commands::Zones { input, output } => handle_zones(&input, output.as_deref())?,
    }

    Ok(())
}

fn handle_image(
    config: MeasureConfig,
    path: &Path,
    options: &MeasureOptions,
    full: bool,
    overlay: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let raster = load_raster(path)?;
    let pipeline = MeasurementPipeline::new(config)?;
    let result = pipeline.measure(&raster, options)?;

    if let Some(overlay_path) = overlay {
        save_overlay(&raster, &result, &OverlayStyle::default(), overlay_path)?;
        tracing::info!(path = %overlay_path.display(), "Overlay written");
    }

    write_result(&result, full, output)
}

fn handle_points(
    config: MeasureConfig,
    points: &str,
    options: &MeasureOptions,
    full: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let pairs: Vec<[i32; 2]> =
        serde_json::from_str(points).context("points must be a JSON array of [x, y] pairs")?;
    let points: Vec<Point> = pairs.into_iter().map(Point::from).collect();

    let pipeline = MeasurementPipeline::new(config)?;
    let result = pipeline.measure_points(&points, options)?;
    write_result(&result, full, output)
}

fn handle_scale(reference: &ReferenceArgs, latitude: Option<f64>, zoom: Option<u8>) -> anyhow::Result<()> {
    let scale = match (latitude, zoom, reference.reference()?) {
        (Some(lat), Some(zoom), _) => pixels_per_meter_from_zoom(lat, zoom)?,
        (_, _, Some(reference)) => reference.scale()?,
        _ => bail!("give either --reference-pixels/--reference-length or --latitude/--zoom"),
    };
    emit(
        &serde_json::json!({ "pixels_per_meter": scale.pixels_per_meter() }),
        None,
    )
}

fn handle_convert(area_sq_m: Option<f64>, distance_m: Option<f64>) -> anyhow::Result<()> {
    if area_sq_m.is_none() && distance_m.is_none() {
        bail!("give --area-sq-m and/or --distance-m");
    }
    let value = serde_json::json!({
        "area": area_sq_m.map(UnitConverter::area_to_all_units),
        "distance": distance_m.map(UnitConverter::distance_to_all_units),
    });
    emit(&value, None)
}

fn handle_zones(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("reading zone file {}", input.display()))?;
    let file: ZoneFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing zone file {}", input.display()))?;

    let scale = match (file.pixels_per_meter, &file.reference) {
        (Some(ppm), _) => Some(ScaleFactor::new(ppm)?),
        (None, Some(reference)) => Some(reference.scale()?),
        (None, None) => None,
    };

    let mut zones = Vec::with_capacity(file.zones.len());
    let mut inputs = BTreeMap::new();
    for (name, coords) in &file.zones {
        let points: Vec<Point> = coords.iter().copied().map(Point::from).collect();
        let zone = measure_zone(name, &points, scale)?;
        inputs.insert(name.clone(), ZoneInput::from(&zone));
        zones.push(zone);
    }

    let report = ZoneReport {
        zones,
        summary: scale.map(|s| summarize_zones(&inputs, s)),
    };
    emit(&report, output)
}

fn write_result(result: &MeasurementResult, full: bool, output: Option<&Path>) -> anyhow::Result<()> {
    if full {
        emit(result, output)
    } else {
        emit(&result.report(), output)
    }
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "Results saved");
        }
        None => println!("{json}"),
    }
    Ok(())
}
