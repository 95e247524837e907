//! Batch driver that runs every plant and writes one PNG per plant.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use image::DynamicImage;
use log::{Level, info, warn};
use planter_utils::{PngCompression, plant_output_path, save_png, timing_guard};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    pipeline::{PipelineSettings, PlantReport, process_plant},
    plant::PlantDescriptor,
};

/// A plant that could not be extracted or saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantFailure {
    pub name: String,
    pub error: String,
}

/// Result of a whole batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionSummary {
    pub succeeded: Vec<PlantReport>,
    pub failed: Vec<PlantFailure>,
}

impl ExtractionSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Writes placeholders for a list of plants into one directory.
#[derive(Debug, Clone)]
pub struct Extractor {
    settings: PipelineSettings,
    output_dir: PathBuf,
    compression: PngCompression,
    parallel: bool,
}

impl Extractor {
    pub fn new(settings: PipelineSettings, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
            compression: PngCompression::default(),
            parallel: false,
        }
    }

    pub fn with_compression(mut self, compression: PngCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Process plants on the rayon pool. Output files and report order are unaffected.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Extract and save a single plant.
    pub fn extract_one(
        &self,
        source: &DynamicImage,
        plant: &PlantDescriptor,
    ) -> Result<PlantReport> {
        let destination = plant_output_path(&self.output_dir, &plant.name)?;
        let processed = process_plant(source, plant, &self.settings)?;
        save_png(&processed.image, &destination, self.compression)
            .with_context(|| format!("failed to save {}", plant.name))?;
        let (width, height) = processed.image.dimensions();
        info!("  Saved: {} ({}x{})", destination.display(), width, height);

        let mut report = processed.report;
        report.output_path = Some(destination.display().to_string());
        Ok(report)
    }

    /// Extract every plant, continuing past individual failures.
    ///
    /// Only a missing or uncreatable output directory aborts the batch.
    pub fn extract_all(
        &self,
        source: &DynamicImage,
        plants: &[PlantDescriptor],
    ) -> Result<ExtractionSummary> {
        let _timing = timing_guard("extraction batch", Level::Info);
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        info!("Source: {}x{}", source.width(), source.height());
        info!("Output: {}", self.output_dir.display());

        let results: Vec<(&PlantDescriptor, Result<PlantReport>)> = if self.parallel {
            plants
                .par_iter()
                .map(|plant| (plant, self.extract_one(source, plant)))
                .collect()
        } else {
            plants
                .iter()
                .map(|plant| (plant, self.extract_one(source, plant)))
                .collect()
        };

        let mut summary = ExtractionSummary::default();
        for (plant, result) in results {
            match result {
                Ok(report) => summary.succeeded.push(report),
                Err(err) => {
                    warn!("Failed to extract {}: {err:#}", plant.name);
                    summary.failed.push(PlantFailure {
                        name: plant.name.clone(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }
        info!(
            "Done! Extracted {} of {} plants.",
            summary.succeeded.len(),
            summary.total()
        );
        Ok(summary)
    }
}
