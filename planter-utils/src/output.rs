//! Helpers for writing finished plant images as alpha-preserving PNG files.

use anyhow::{Context, Result};
use image::{
    ExtendedColorType, ImageEncoder, RgbaImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};
use log::{debug, warn};
use std::{
    fs,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Simplified PNG compression strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl PngCompression {
    /// Parse compression string/level into a compression strategy.
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "fast" => Self::Fast,
            "best" => Self::Best,
            "default" => Self::Default,
            _ => {
                if let Ok(level) = normalized.parse::<u8>() {
                    match level {
                        0..=3 => Self::Fast,
                        7..=9 => Self::Best,
                        _ => Self::Default,
                    }
                } else {
                    warn!(
                        "Unknown PNG compression '{}', falling back to default strategy",
                        input
                    );
                    Self::Default
                }
            }
        }
    }

    fn into_image(self) -> CompressionType {
        match self {
            Self::Fast => CompressionType::Fast,
            Self::Default => CompressionType::Default,
            Self::Best => CompressionType::Best,
        }
    }
}

/// Deterministic output path for a named plant: `<dir>/<name>.png`.
///
/// Names must be a single path component so every file lands inside `output_dir`.
pub fn plant_output_path(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let trimmed = name.trim();
    anyhow::ensure!(
        !trimmed.is_empty() && trimmed != "." && trimmed != "..",
        "invalid plant name '{name}'"
    );
    anyhow::ensure!(
        !name.contains(['/', '\\']),
        "plant name '{name}' must not contain path separators"
    );
    Ok(output_dir.join(format!("{name}.png")))
}

/// Encode `image` as RGBA PNG and write it to `destination`, creating parent
/// directories on demand. Existing files are overwritten.
pub fn save_png(image: &RgbaImage, destination: &Path, compression: PngCompression) -> Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.exists()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    debug!(
        "Saving {}x{} PNG to {} ({:?} compression)",
        image.width(),
        image.height(),
        destination.display(),
        compression
    );

    let encoded = encode_png(image, compression)?;
    write_bytes(destination, &encoded)
}

fn encode_png(image: &RgbaImage, compression: PngCompression) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let encoder = PngEncoder::new_with_quality(
            &mut buffer,
            compression.into_image(),
            FilterType::Adaptive,
        );
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .context("failed to encode PNG")?;
    }
    Ok(buffer)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
