//! Plant placeholder extraction.
//!
//! Cuts individual plants out of a reference sheet, erases the faces drawn on
//! their pots, removes the flat background and produces transparent images
//! whose longer side is a fixed size.

/// Flat-background removal.
pub mod background;
/// Batch driver writing one PNG per plant.
pub mod extractor;
/// Three-pass pot face in-painting.
pub mod inpaint;
/// Ellipse-based face erasure.
pub mod legacy;
/// Per-plant pipeline.
pub mod pipeline;
pub mod pixel;
/// Plant descriptors.
pub mod plant;
/// Built-in plant tables.
pub mod presets;
/// Rectangles and clamping.
pub mod region;
/// Brightness-floored color sampling.
pub mod sampler;

pub use background::{
    BackgroundParams, BackgroundReference, BackgroundStats, is_background, remove_background,
};
pub use extractor::{ExtractionSummary, Extractor, PlantFailure};
pub use inpaint::{FaceZone, InpaintParams, InpaintStats, remove_face_features};
pub use legacy::{LegacyStats, erase_face_ellipse};
pub use pipeline::{
    PipelineSettings, PlantReport, PotReport, ProcessedPlant, process_plant,
};
pub use pixel::RgbPixel;
pub use plant::PlantDescriptor;
pub use presets::{PlantPreset, builtin_plants, plant_by_name, plant_presets};
pub use region::{Bounds, Region};
pub use sampler::{average_color, local_color};
