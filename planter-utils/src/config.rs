//! Shared configuration types consumed across the planter workspace.
//!
//! These structures describe how plants are cut out of the reference sheet, how
//! pot artwork is cleaned, and how the results are written. They serialize to a
//! JSON settings file and are converted into the core pipeline's own parameter
//! types by the CLI.

use crate::color::RgbColor;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Which extraction pipeline to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Dark-feature and blush in-painting with a smoothing blur (default).
    #[default]
    Refined,
    /// Paint an ellipse of sampled pot color over the face, single-corner background.
    Legacy,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExtractionMode::Refined => "refined",
                ExtractionMode::Legacy => "legacy",
            }
        )
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refined" | "v2" => Ok(ExtractionMode::Refined),
            "legacy" | "v1" => Ok(ExtractionMode::Legacy),
            other => Err(format!(
                "invalid extraction mode '{other}'; expected 'refined' or 'legacy'"
            )),
        }
    }
}

/// Where the background reference color comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundReferenceMode {
    /// Average of four samples taken just inside the crop corners.
    CornerAverage,
    /// A single sample near the top-left corner.
    Corner,
    /// The configured `fixed_color`.
    Fixed,
}

impl FromStr for BackgroundReferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "corner_average" | "corners" => Ok(BackgroundReferenceMode::CornerAverage),
            "corner" => Ok(BackgroundReferenceMode::Corner),
            "fixed" => Ok(BackgroundReferenceMode::Fixed),
            other => Err(format!(
                "invalid background reference '{other}'; expected 'corner_average', 'corner' or 'fixed'"
            )),
        }
    }
}

/// Background removal parameters.
///
/// `threshold` and `reference` fall back to the defaults of the active
/// [`ExtractionMode`] when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundSettings {
    /// Per-channel tolerance; a pixel is background when every channel is closer than this.
    pub threshold: Option<u8>,
    /// Reference color source.
    pub reference: Option<BackgroundReferenceMode>,
    /// Color used when `reference` is `fixed`.
    pub fixed_color: RgbColor,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            threshold: None,
            reference: None,
            fixed_color: RgbColor::new(255, 251, 240),
        }
    }
}

impl BackgroundSettings {
    pub fn threshold_for(&self, mode: ExtractionMode) -> u8 {
        self.threshold.unwrap_or(match mode {
            ExtractionMode::Refined => 32,
            ExtractionMode::Legacy => 35,
        })
    }

    pub fn reference_for(&self, mode: ExtractionMode) -> BackgroundReferenceMode {
        self.reference.unwrap_or(match mode {
            ExtractionMode::Refined => BackgroundReferenceMode::CornerAverage,
            ExtractionMode::Legacy => BackgroundReferenceMode::Corner,
        })
    }
}

/// Relative rectangle inside a pot region where blush marks are expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceZoneSettings {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Default for FaceZoneSettings {
    fn default() -> Self {
        Self {
            x_min: 0.15,
            x_max: 0.85,
            y_min: 0.15,
            y_max: 0.75,
        }
    }
}

/// Thresholds for the pot face in-painting passes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InpaintSettings {
    /// Pixels darker than `dark_ratio * average brightness` are treated as facial features.
    pub dark_ratio: f32,
    /// Pixels below this brightness are ignored by the blush pass.
    pub blush_min_brightness: f32,
    /// Blush candidates must exceed the average red/green ratio by this factor.
    pub blush_ratio_gain: f32,
    /// Blush candidates must exceed the average red channel by this factor.
    pub blush_red_gain: f32,
    /// Relative zone where blush is plausible.
    pub face_zone: FaceZoneSettings,
    /// Neighborhood radius for local color sampling.
    pub local_radius: u32,
    /// Brightness floor for the pot average color.
    pub average_floor: f32,
    /// Brightness floor for local neighborhood colors.
    pub local_floor: f32,
    /// Gaussian sigma of the final smoothing pass (0 disables it).
    pub blur_sigma: f32,
}

impl Default for InpaintSettings {
    fn default() -> Self {
        Self {
            dark_ratio: 0.55,
            blush_min_brightness: 80.0,
            blush_ratio_gain: 1.25,
            blush_red_gain: 1.1,
            face_zone: FaceZoneSettings::default(),
            local_radius: 40,
            average_floor: 150.0,
            local_floor: 160.0,
            blur_sigma: 3.0,
        }
    }
}

impl InpaintSettings {
    /// Clamp values to sensible ranges.
    pub fn sanitize(&mut self) {
        self.dark_ratio = self.dark_ratio.clamp(0.0, 1.0);
        self.blush_min_brightness = self.blush_min_brightness.clamp(0.0, 255.0);
        self.blush_ratio_gain = self.blush_ratio_gain.max(0.0);
        self.blush_red_gain = self.blush_red_gain.max(0.0);
        self.average_floor = self.average_floor.clamp(0.0, 255.0);
        self.local_floor = self.local_floor.clamp(0.0, 255.0);
        self.blur_sigma = if self.blur_sigma.is_finite() {
            self.blur_sigma.max(0.0)
        } else {
            0.0
        };

        let zone = &mut self.face_zone;
        zone.x_min = zone.x_min.clamp(0.0, 1.0);
        zone.x_max = zone.x_max.clamp(0.0, 1.0);
        zone.y_min = zone.y_min.clamp(0.0, 1.0);
        zone.y_max = zone.y_max.clamp(0.0, 1.0);
        if zone.x_min > zone.x_max {
            std::mem::swap(&mut zone.x_min, &mut zone.x_max);
        }
        if zone.y_min > zone.y_max {
            std::mem::swap(&mut zone.y_min, &mut zone.y_max);
        }
    }
}

/// Settings for the resized PNG outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Length of the longer side of every output image.
    pub max_dimension: u32,
    /// Scale images up when their longer side is below `max_dimension`.
    pub allow_upscale: bool,
    /// PNG compression strategy ("fast", "default", "best") or numeric level (0-9)
    pub png_compression: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            max_dimension: 512,
            allow_upscale: true,
            png_compression: "default".to_string(),
        }
    }
}

/// A plant entry in the settings file. Rectangles are `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantSettings {
    /// Output file stem.
    pub name: String,
    /// Crop rectangle in source image coordinates.
    pub crop: [i32; 4],
    /// Pot/face rectangles relative to the crop origin.
    pub pot_regions: Vec<[i32; 4]>,
    /// Pot color sample point for legacy mode, relative to the crop origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot_sample: Option<[u32; 2]>,
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether telemetry timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }

    /// Update the level string from a `LevelFilter` value.
    pub fn set_level(&mut self, level: LevelFilter) {
        let label = match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        };
        self.level = label.to_string();
    }
}

/// Persistent application settings.
///
/// This struct aggregates all user-configurable parameters, allowing them to be
/// loaded from and saved to a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Pipeline variant.
    pub mode: ExtractionMode,
    /// Directory receiving one PNG per plant.
    pub output_dir: PathBuf,
    /// Background removal parameters.
    pub background: BackgroundSettings,
    /// Pot face in-painting parameters.
    pub inpaint: InpaintSettings,
    /// Resize and encoding parameters.
    pub output: OutputSettings,
    /// Telemetry and diagnostics preferences.
    pub telemetry: TelemetrySettings,
    /// Process plants on the rayon thread pool instead of one after another.
    pub parallel: bool,
    /// Replaces the built-in plant table for the active mode when set.
    pub plants: Option<Vec<PlantSettings>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            output_dir: PathBuf::from("assets/plants/placeholders"),
            background: BackgroundSettings::default(),
            inpaint: InpaintSettings::default(),
            output: OutputSettings::default(),
            telemetry: TelemetrySettings::default(),
            parallel: false,
            plants: None,
        }
    }
}

impl AppSettings {
    /// Clamp values to sensible ranges.
    pub fn sanitize(&mut self) {
        self.inpaint.sanitize();
        self.output.max_dimension = self.output.max_dimension.max(1);
    }

    /// Load settings from a JSON file.
    ///
    /// If the file does not exist or cannot be parsed, an error is returned.
    /// Missing sections fall back to their defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;

        settings.sanitize();

        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON.
    ///
    /// This will overwrite the file if it already exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}

/// Returns the default path for persisted settings (`config/planter_settings.json`).
pub fn default_settings_path() -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join("config/planter_settings.json"))
        .unwrap_or_else(|_| PathBuf::from("config/planter_settings.json"))
}
