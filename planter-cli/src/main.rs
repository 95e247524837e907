mod args;
mod color;
mod config;

use std::{
    fs::{self, File},
    path::Path,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};
use planter_core::{ExtractionSummary, Extractor, PipelineSettings, PlantDescriptor};
use planter_utils::{
    PngCompression,
    config::{AppSettings, ExtractionMode, PlantSettings},
    configure_telemetry, init_logging, load_image, normalize_path,
};
use serde::Serialize;

use crate::{
    args::ExtractArgs,
    config::{apply_cli_overrides, filter_plants, load_settings, resolve_plants},
};

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    source: String,
    source_size: (u32, u32),
    mode: ExtractionMode,
    output_dir: String,
    #[serde(flatten)]
    summary: &'a ExtractionSummary,
}

fn main() -> Result<()> {
    init_logging(log::LevelFilter::Info)?;
    let args = ExtractArgs::parse();

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );

    let plants = filter_plants(resolve_plants(&settings), &args.only)?;

    if args.list_plants {
        let table: Vec<PlantSettings> = plants.iter().map(PlantSettings::from).collect();
        let json = serde_json::to_string_pretty(&table).context("failed to serialize plant table")?;
        println!("{json}");
        return Ok(());
    }

    let Some(input) = args.input.as_ref() else {
        bail!("--input is required unless --list-plants is given");
    };
    let input_path = normalize_path(input)?;
    let source = load_image(&input_path)?;

    let summary = run_extraction(&settings, &source, &plants)?;

    if let Some(report_path) = args.report.as_ref() {
        let report = RunReport {
            source: input_path.display().to_string(),
            source_size: (source.width(), source.height()),
            mode: settings.mode,
            output_dir: settings.output_dir.display().to_string(),
            summary: &summary,
        };
        write_report(report_path, &report)?;
        info!("Wrote run report to {}", report_path.display());
    }

    if !summary.is_success() {
        let names: Vec<&str> = summary.failed.iter().map(|f| f.name.as_str()).collect();
        bail!(
            "{} of {} plants failed: {}",
            summary.failed.len(),
            summary.total(),
            names.join(", ")
        );
    }
    info!("These are faceless plant PNGs ready for SVG face overlay.");
    Ok(())
}

fn run_extraction(
    settings: &AppSettings,
    source: &image::DynamicImage,
    plants: &[PlantDescriptor],
) -> Result<ExtractionSummary> {
    if plants.is_empty() {
        warn!("No plants configured; nothing to extract");
    }
    let extractor = Extractor::new(PipelineSettings::from(settings), &settings.output_dir)
        .with_compression(PngCompression::parse(&settings.output.png_compression))
        .with_parallel(settings.parallel);
    info!(
        "Extracting {} plant(s) in {} mode",
        plants.len(),
        settings.mode
    );
    extractor.extract_all(source, plants)
}

fn write_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("failed to write run report to {}", path.display()))?;
    Ok(())
}
