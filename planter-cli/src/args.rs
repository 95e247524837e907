//! Command-line argument definitions for planter-cli.

use clap::{ArgAction, Parser};
use planter_utils::config::{BackgroundReferenceMode, ExtractionMode};
use std::path::PathBuf;

/// Extract transparent, faceless plant placeholders from a reference sheet.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct ExtractArgs {
    /// Path to the composite reference image.
    #[arg(short, long, required_unless_present = "list_plants")]
    pub input: Option<PathBuf>,

    /// Directory receiving one PNG per plant (default: assets/plants/placeholders).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Optional settings JSON. Defaults to `config/planter_settings.json` when present, otherwise built-in parameters.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pipeline variant: refined (in-painting) or legacy (ellipse fill).
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ExtractionMode>,

    /// Per-channel background tolerance (default: 32 refined, 35 legacy).
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Background reference: corner_average, corner or fixed.
    #[arg(long, value_name = "SOURCE")]
    pub background_reference: Option<BackgroundReferenceMode>,

    /// Known background color for `--background-reference fixed` (accepts #RRGGBB, rgb(), or r,g,b).
    #[arg(long, value_name = "COLOR")]
    pub background_color: Option<String>,

    /// Length of the longer side of each output image.
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Keep crops that already fit within `--max-dimension` at their original size.
    #[arg(long = "no-upscale", action = ArgAction::SetTrue)]
    pub no_upscale: bool,

    /// PNG compression strategy: fast, default, best, or numeric level 0-9.
    #[arg(long)]
    pub png_compression: Option<String>,

    /// Process plants concurrently.
    #[arg(long, action = ArgAction::SetTrue)]
    pub parallel: bool,

    /// Extract only the named plant (may be repeated). Names match without case or numeric prefix.
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Print the active plant table as JSON and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    pub list_plants: bool,

    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Enable telemetry timing logs (defaults to settings file).
    #[arg(long, action = ArgAction::SetTrue)]
    pub telemetry: bool,

    /// Override telemetry logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub telemetry_level: Option<String>,
}
