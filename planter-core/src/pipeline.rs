//! Per-plant extraction: crop, in-paint, cut out, resize.

use anyhow::{Result, bail};
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use log::{Level, info};
use planter_utils::{
    RgbColor, binarize_alpha,
    config::{AppSettings, ExtractionMode},
    resize_to_max_dimension, timing_guard,
};
use serde::Serialize;

use crate::{
    background::{BackgroundParams, BackgroundReference, remove_background},
    inpaint::{InpaintParams, remove_face_features},
    legacy::erase_face_ellipse,
    plant::PlantDescriptor,
    region::Region,
};

/// Alpha cut-off applied after resampling so edges stay hard.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Everything [`process_plant`] needs besides the plant itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub mode: ExtractionMode,
    pub inpaint: InpaintParams,
    pub background: BackgroundParams,
    /// Target length of the longer output side.
    pub max_dimension: u32,
    pub allow_upscale: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Refined,
            inpaint: InpaintParams::default(),
            background: BackgroundParams::default(),
            max_dimension: 512,
            allow_upscale: true,
        }
    }
}

impl From<&AppSettings> for PipelineSettings {
    fn from(settings: &AppSettings) -> Self {
        Self {
            mode: settings.mode,
            inpaint: InpaintParams::from(&settings.inpaint),
            background: BackgroundParams::from_settings(&settings.background, settings.mode),
            max_dimension: settings.output.max_dimension,
            allow_upscale: settings.output.allow_upscale,
        }
    }
}

/// Per pot region outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PotReport {
    pub region: Region,
    pub pot_color: RgbColor,
    /// Always zero for the ellipse eraser.
    pub dark_replaced: usize,
    /// Always zero for the ellipse eraser.
    pub blush_replaced: usize,
}

/// Diagnostics gathered while processing one plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantReport {
    pub name: String,
    pub mode: ExtractionMode,
    pub crop_size: (u32, u32),
    pub output_size: (u32, u32),
    pub pots: Vec<PotReport>,
    pub background_color: RgbColor,
    pub background_removed: usize,
    /// Set once the image has been written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// A finished placeholder, not yet written to disk.
#[derive(Debug, Clone)]
pub struct ProcessedPlant {
    pub name: String,
    pub image: RgbaImage,
    pub report: PlantReport,
}

/// Run the full extraction for one plant against the loaded reference sheet.
///
/// Fails when the crop lies entirely outside `source`. Pot regions outside the
/// crop are skipped silently by the in-painters.
pub fn process_plant(
    source: &DynamicImage,
    plant: &PlantDescriptor,
    settings: &PipelineSettings,
) -> Result<ProcessedPlant> {
    let _timing = timing_guard(format!("plant {}", plant.name), Level::Info);
    info!("Processing {}...", plant.name);

    let bounds = plant.crop.clamp_to(source.width(), source.height());
    if bounds.is_empty() {
        bail!(
            "crop {:?} for {} lies outside the {}x{} source image",
            plant.crop.to_array(),
            plant.name,
            source.width(),
            source.height()
        );
    }
    let cropped = source.crop_imm(bounds.x1, bounds.y1, bounds.width(), bounds.height());
    let crop_size = (cropped.width(), cropped.height());
    info!("  Cropped size: {}x{}", crop_size.0, crop_size.1);

    let (mut rgba, pots, background) = match settings.mode {
        ExtractionMode::Refined => refined_stage(cropped, plant, settings),
        ExtractionMode::Legacy => legacy_stage(cropped, plant, settings),
    };

    info!("  Removing background...");
    let background_stats = remove_background(&mut rgba, &background);

    let mut resized = {
        let _timing = timing_guard("resize", Level::Debug);
        resize_to_max_dimension(
            &rgba,
            settings.max_dimension,
            settings.allow_upscale,
            FilterType::Lanczos3,
        )?
    };
    binarize_alpha(&mut resized, ALPHA_THRESHOLD);
    let output_size = resized.dimensions();

    Ok(ProcessedPlant {
        name: plant.name.clone(),
        image: resized,
        report: PlantReport {
            name: plant.name.clone(),
            mode: settings.mode,
            crop_size,
            output_size,
            pots,
            background_color: background_stats.reference,
            background_removed: background_stats.removed,
            output_path: None,
        },
    })
}

/// Three-pass in-painting on RGB, background sampled afterwards.
fn refined_stage(
    cropped: DynamicImage,
    plant: &PlantDescriptor,
    settings: &PipelineSettings,
) -> (RgbaImage, Vec<PotReport>, BackgroundParams) {
    let mut rgb = cropped.to_rgb8();
    info!("  Removing face features...");
    let pots = plant
        .pot_regions
        .iter()
        .map(|&region| {
            let stats = remove_face_features(&mut rgb, region, &settings.inpaint);
            PotReport {
                region,
                pot_color: stats.pot_color,
                dark_replaced: stats.dark_replaced,
                blush_replaced: stats.blush_replaced,
            }
        })
        .collect();
    let rgba = DynamicImage::ImageRgb8(rgb).to_rgba8();
    (rgba, pots, settings.background)
}

/// Ellipse eraser on RGBA; the background reference is taken before erasing.
fn legacy_stage(
    cropped: DynamicImage,
    plant: &PlantDescriptor,
    settings: &PipelineSettings,
) -> (RgbaImage, Vec<PotReport>, BackgroundParams) {
    let mut rgba = cropped.to_rgba8();
    let reference = settings.background.reference.resolve(&rgba);
    let pots = plant
        .pot_regions
        .iter()
        .map(|&region| {
            let stats = erase_face_ellipse(
                &mut rgba,
                region,
                plant.pot_sample,
                settings.inpaint.average_floor,
            );
            PotReport {
                region,
                pot_color: stats.pot_color,
                dark_replaced: 0,
                blush_replaced: 0,
            }
        })
        .collect();
    let background = BackgroundParams {
        threshold: settings.background.threshold,
        reference: BackgroundReference::Fixed(reference),
    };
    (rgba, pots, background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const CREAM: Rgb<u8> = Rgb([255, 251, 240]);

    fn sheet() -> DynamicImage {
        let mut image = RgbImage::from_pixel(200, 100, CREAM);
        for y in 30..80 {
            for x in 20..60 {
                image.put_pixel(x, y, Rgb([210, 150, 110]));
            }
        }
        image.put_pixel(40, 50, Rgb([10, 10, 10]));
        DynamicImage::ImageRgb8(image)
    }

    fn settings(max_dimension: u32) -> PipelineSettings {
        PipelineSettings {
            max_dimension,
            ..PipelineSettings::default()
        }
    }

    #[test]
    fn crop_outside_source_fails() {
        let plant = PlantDescriptor::new("ghost", Region::new(500, 500, 900, 900), vec![]);
        let err = process_plant(&sheet(), &plant, &settings(64)).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn crop_is_clamped_and_resized() {
        let plant = PlantDescriptor::new("left", Region::new(-10, 0, 100, 150), vec![]);
        let processed = process_plant(&sheet(), &plant, &settings(50)).expect("processed");

        assert_eq!(processed.report.crop_size, (100, 100));
        assert_eq!(processed.image.dimensions(), (50, 50));
        assert_eq!(processed.report.output_size, (50, 50));
        assert_eq!(processed.report.background_color, RgbColor::new(255, 251, 240));
        assert!(processed.image.pixels().all(|px| px[3] == 0 || px[3] == 255));
    }

    #[test]
    fn refined_mode_reports_each_pot() {
        let plant = PlantDescriptor::new(
            "pot",
            Region::new(0, 0, 100, 100),
            vec![Region::new(20, 30, 60, 80), Region::new(300, 300, 400, 400)],
        );
        let processed = process_plant(&sheet(), &plant, &settings(100)).expect("processed");

        let pots = &processed.report.pots;
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].pot_color, RgbColor::new(210, 150, 110));
        assert_eq!(pots[0].dark_replaced, 1);
        assert_eq!(pots[1].dark_replaced, 0);
        let center = processed.image.get_pixel(40, 50);
        assert_eq!(center[3], 255);
        assert!(center[0] > 150, "dark dot should be painted over: {center:?}");
    }

    #[test]
    fn legacy_mode_samples_background_before_erasing() {
        let plant = PlantDescriptor::new(
            "pot",
            Region::new(0, 0, 100, 100),
            vec![Region::new(0, 0, 20, 20)],
        )
        .with_pot_sample(40, 40);
        let pipeline = PipelineSettings {
            mode: ExtractionMode::Legacy,
            background: BackgroundParams {
                threshold: 35,
                reference: BackgroundReference::Corner { x: 5, y: 5 },
            },
            ..settings(100)
        };

        let processed = process_plant(&sheet(), &plant, &pipeline).expect("processed");

        assert_eq!(processed.report.background_color, RgbColor::new(255, 251, 240));
        assert_eq!(processed.report.pots[0].pot_color, RgbColor::new(210, 150, 110));
        // The ellipse repainted the corner in pot color, so it survives removal.
        assert_eq!(processed.image.get_pixel(10, 10)[3], 255);
        assert_eq!(processed.image.get_pixel(90, 10)[3], 0);
    }
}
