//! Configuration loading and CLI override logic.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use planter_core::{PlantDescriptor, builtin_plants, plant_by_name};
use planter_utils::{
    config::{AppSettings, BackgroundReferenceMode, default_settings_path},
    normalize_path,
};

use crate::{args::ExtractArgs, color::parse_color_spec};

/// Load application settings from a file or use defaults.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<AppSettings> {
    if let Some(path) = config_path {
        let resolved = normalize_path(path)?;
        let settings = AppSettings::load_from_path(&resolved)?;
        info!("Loaded settings from {}", resolved.display());
        Ok(settings)
    } else {
        let default_path = default_settings_path();
        if default_path.exists() {
            let settings = AppSettings::load_from_path(&default_path).with_context(|| {
                format!(
                    "failed to load default settings from {}",
                    default_path.display()
                )
            })?;
            info!("Loaded settings from {}", default_path.display());
            Ok(settings)
        } else {
            Ok(AppSettings::default())
        }
    }
}

/// Apply command-line arguments to override loaded or default settings.
pub fn apply_cli_overrides(settings: &mut AppSettings, args: &ExtractArgs) {
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }
    if let Some(dir) = args.output_dir.as_ref() {
        settings.output_dir = dir.clone();
    }

    if let Some(threshold) = args.threshold {
        settings.background.threshold = Some(threshold);
    }
    if let Some(reference) = args.background_reference {
        settings.background.reference = Some(reference);
    }
    if let Some(ref raw) = args.background_color {
        match parse_color_spec(raw) {
            Ok(color) => {
                settings.background.fixed_color = color;
                if args.background_reference.is_none() {
                    settings.background.reference = Some(BackgroundReferenceMode::Fixed);
                }
            }
            Err(err) => warn!("failed to parse --background-color '{}': {}", raw, err),
        }
    }

    if let Some(max) = args.max_dimension {
        settings.output.max_dimension = max;
    }
    if args.no_upscale {
        settings.output.allow_upscale = false;
    }
    if let Some(ref compression) = args.png_compression {
        settings.output.png_compression = compression.clone();
    }
    if args.parallel {
        settings.parallel = true;
    }

    if args.telemetry {
        settings.telemetry.enabled = true;
    }
    if let Some(level) = args.telemetry_level.as_ref() {
        let normalized = level.trim();
        if !normalized.is_empty() {
            let lower = normalized.to_ascii_lowercase();
            settings.telemetry.level = lower.clone();
            if lower == "off" {
                settings.telemetry.enabled = false;
            }
        }
    }

    settings.sanitize();
}

/// The plant table for the active mode: the settings file's list when present,
/// otherwise the built-in one.
pub fn resolve_plants(settings: &AppSettings) -> Vec<PlantDescriptor> {
    match settings.plants.as_ref() {
        Some(custom) => custom.iter().map(PlantDescriptor::from).collect(),
        None => builtin_plants(settings.mode),
    }
}

/// Keep only the plants named in `only`, in the order given. An empty filter keeps everything.
pub fn filter_plants(
    plants: Vec<PlantDescriptor>,
    only: &[String],
) -> Result<Vec<PlantDescriptor>> {
    if only.is_empty() {
        return Ok(plants);
    }
    let mut selected: Vec<PlantDescriptor> = Vec::with_capacity(only.len());
    for name in only {
        let Some(plant) = plant_by_name(&plants, name) else {
            let known: Vec<&str> = plants.iter().map(|p| p.name.as_str()).collect();
            bail!("unknown plant '{}'; known plants: {}", name, known.join(", "));
        };
        if !selected.iter().any(|p| p.name == plant.name) {
            selected.push(plant.clone());
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use planter_utils::{RgbColor, config::ExtractionMode};

    fn parse(extra: &[&str]) -> ExtractArgs {
        let mut argv = vec!["planter-cli", "--input", "sheet.jpg"];
        argv.extend_from_slice(extra);
        ExtractArgs::parse_from(argv)
    }

    #[test]
    fn overrides_replace_settings() {
        let mut settings = AppSettings::default();
        let args = parse(&[
            "--mode",
            "legacy",
            "--threshold",
            "20",
            "--max-dimension",
            "256",
            "--no-upscale",
            "--parallel",
            "--output-dir",
            "out",
        ]);

        apply_cli_overrides(&mut settings, &args);

        assert_eq!(settings.mode, ExtractionMode::Legacy);
        assert_eq!(settings.background.threshold, Some(20));
        assert_eq!(settings.output.max_dimension, 256);
        assert!(!settings.output.allow_upscale);
        assert!(settings.parallel);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn background_color_selects_fixed_reference() {
        let mut settings = AppSettings::default();
        apply_cli_overrides(&mut settings, &parse(&["--background-color", "#FFFBF0"]));
        assert_eq!(settings.background.reference, Some(BackgroundReferenceMode::Fixed));
        assert_eq!(settings.background.fixed_color, RgbColor::new(255, 251, 240));

        let mut settings = AppSettings::default();
        apply_cli_overrides(&mut settings, &parse(&["--background-color", "nope"]));
        assert_eq!(settings.background.reference, None);
    }

    #[test]
    fn telemetry_off_disables() {
        let mut settings = AppSettings::default();
        apply_cli_overrides(&mut settings, &parse(&["--telemetry", "--telemetry-level", "OFF"]));
        assert!(!settings.telemetry.enabled);
        assert_eq!(settings.telemetry.level, "off");
    }

    #[test]
    fn filter_keeps_requested_order_and_rejects_unknown() {
        let plants = builtin_plants(ExtractionMode::Refined);

        let wanted: [String; 3] = ["aloe".into(), "01_yellow_flowers".into(), "Aloe".into()];
        let picked = filter_plants(plants.clone(), &wanted).expect("known plants");
        let names: Vec<_> = picked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["04_aloe", "01_yellow_flowers"]);

        let err = filter_plants(plants.clone(), &["cactus".into()]).unwrap_err();
        assert!(err.to_string().contains("cactus"));

        assert_eq!(filter_plants(plants, &[]).expect("all").len(), 5);
    }

    #[test]
    fn custom_plants_replace_builtin_table() {
        let mut settings = AppSettings::default();
        settings.plants = Some(vec![planter_utils::config::PlantSettings {
            name: "fern".into(),
            crop: [0, 0, 10, 10],
            pot_regions: vec![],
            pot_sample: None,
        }]);
        let plants = resolve_plants(&settings);
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "fern");
    }
}
