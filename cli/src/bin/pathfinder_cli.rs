use clap::{Parser, Subcommand};
use cli::{TraceSettings, load_image, render_overlay};
use color_eyre::eyre::{Result, eyre};
use pathfinder::{AnalysisCommand, PathfinderConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace the contour of the shape in an image and write the results
    Trace {
        /// Path to the grayscale input image
        #[arg(short, long)]
        input: PathBuf,
        /// Settings file (.toml or .json), defaults apply when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Write a JSON report with contour, centroid and descriptors
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the contour as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
        /// Write a PNG with the contour and centroid drawn over the input
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Write the preprocessed field the walk ran on as an 8-bit image
        #[arg(long)]
        field: Option<PathBuf>,
    },
    /// Run a single analysis query and print its JSON result
    Query {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// One of: contour, centered_contour, centroid, radial_profile, fourier_descriptor, summary
        #[arg(short, long, default_value = "summary")]
        command: String,
    },
    /// Print the JSON schema of the settings file or of the analysis commands
    Schema {
        #[arg(long)]
        commands: bool,
    },
    /// Write a settings file with default values
    InitConfig {
        /// Output path, the extension selects TOML or JSON
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct TraceReport<'a> {
    input: &'a Path,
    config: &'a PathfinderConfig,
    contour: Vec<[usize; 2]>,
    summary: pathfinder::ShapeSummary,
    radial_profile: Vec<pathfinder::RadialPoint>,
    fourier_descriptor: pathfinder::FourierDescriptor,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Trace {
            input,
            settings,
            report,
            geojson,
            overlay,
            field,
        } => {
            let outputs = TraceOutputs {
                report: report.as_deref(),
                geojson: geojson.as_deref(),
                overlay: overlay.as_deref(),
                field: field.as_deref(),
            };
            trace(input, settings.as_deref(), &outputs)?;
        }
        Commands::Query {
            input,
            settings,
            command,
        } => {
            query(input, settings.as_deref(), command)?;
        }
        Commands::Schema { commands } => {
            let schema = if *commands {
                serde_json::to_string_pretty(&AnalysisCommand::schema())?
            } else {
                serde_json::to_string_pretty(&TraceSettings::schema())?
            };
            println!("{schema}");
        }
        Commands::InitConfig { output } => {
            TraceSettings::default().to_file(output)?;
            info!("Wrote default settings to {:?}", output);
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<TraceSettings> {
    match path {
        Some(path) => {
            let settings = TraceSettings::from_file(path)?;
            info!("Loaded settings from {:?}", path);
            Ok(settings)
        }
        None => Ok(TraceSettings::default()),
    }
}

struct TraceOutputs<'a> {
    report: Option<&'a Path>,
    geojson: Option<&'a Path>,
    overlay: Option<&'a Path>,
    field: Option<&'a Path>,
}

fn trace(input: &Path, settings: Option<&Path>, outputs: &TraceOutputs) -> Result<()> {
    let settings = load_settings(settings)?;
    let image = load_image(input)?;
    info!("Tracing {:?} ({}x{})", input, image.width(), image.height());

    let pathfinder = settings.build(&image)?;
    let path = pathfinder.contour_path()?;
    let summary = path.summary();
    info!(
        "Contour: {} points, perimeter {:.1}, area {:.1}, centroid ({:.2}, {:.2})",
        summary.point_count, summary.perimeter, summary.area, summary.centroid[0], summary.centroid[1]
    );

    if let Some(report_path) = outputs.report {
        let radial_profile = path.radial_profile();
        let fourier_descriptor = pathfinder.fourier_descriptor(&radial_profile);
        let report = TraceReport {
            input,
            config: pathfinder.config(),
            contour: pathfinder.contour_pixels()?,
            summary,
            radial_profile,
            fourier_descriptor,
        };
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
        info!("Report written to {:?}", report_path);
    }

    if let Some(geojson_path) = outputs.geojson {
        path.save_geojson(geojson_path, pathfinder.width(), pathfinder.height())?;
        info!("GeoJSON written to {:?}", geojson_path);
    }

    if let Some(overlay_path) = outputs.overlay {
        render_overlay(&image, path).save(overlay_path)?;
        info!("Overlay written to {:?}", overlay_path);
    }

    if let Some(field_path) = outputs.field {
        pathfinder.field().to_luma8().save(field_path)?;
        info!("Field written to {:?}", field_path);
    }

    Ok(())
}

fn query(input: &Path, settings: Option<&Path>, command: &str) -> Result<()> {
    let command: AnalysisCommand = command.parse().map_err(|_| {
        eyre!(
            "Unknown command '{}', expected one of: {}",
            command,
            AnalysisCommand::command_names().join(", ")
        )
    })?;
    info!("{}: {}", command, command.description());

    let settings = load_settings(settings)?;
    let pathfinder = settings.build(&load_image(input)?)?;
    let output = pathfinder.execute(command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
