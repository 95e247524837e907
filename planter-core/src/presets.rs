//! Built-in plant tables for the kawaii plant reference sheet.
//!
//! The sheet is roughly 7973x7973 with three plants on the top row and two on
//! the bottom row. Each extraction mode has its own table because the ellipse
//! eraser was tuned against slightly different crops.

use planter_utils::config::ExtractionMode;

use crate::{plant::PlantDescriptor, region::Region};

/// A compiled-in plant entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantPreset {
    pub name: &'static str,
    pub crop: Region,
    /// Pot rectangle, or the face rectangle for the legacy table.
    pub pot_region: Region,
    pub pot_sample: Option<(u32, u32)>,
}

impl PlantPreset {
    const fn refined(name: &'static str, crop: [i32; 4], pot_region: [i32; 4]) -> Self {
        Self {
            name,
            crop: Region::from_array(crop),
            pot_region: Region::from_array(pot_region),
            pot_sample: None,
        }
    }

    /// `face` is `(x, y, width, height)`.
    const fn legacy(
        name: &'static str,
        crop: [i32; 4],
        face: [i32; 4],
        pot_sample: (u32, u32),
    ) -> Self {
        Self {
            name,
            crop: Region::from_array(crop),
            pot_region: Region::from_xywh(face[0], face[1], face[2], face[3]),
            pot_sample: Some(pot_sample),
        }
    }

    pub fn to_descriptor(&self) -> PlantDescriptor {
        PlantDescriptor {
            name: self.name.to_string(),
            crop: self.crop,
            pot_regions: vec![self.pot_region],
            pot_sample: self.pot_sample,
        }
    }
}

static REFINED_PLANTS: [PlantPreset; 5] = [
    PlantPreset::refined(
        "01_yellow_flowers",
        [150, 250, 2750, 3900],
        [300, 1800, 2200, 3400],
    ),
    PlantPreset::refined(
        "02_monstera",
        [2750, 150, 5250, 3900],
        [400, 1700, 2200, 3500],
    ),
    PlantPreset::refined(
        "03_anthurium",
        [5150, 250, 7800, 3900],
        [350, 1900, 2300, 3400],
    ),
    PlantPreset::refined(
        "04_aloe",
        [350, 3800, 3850, 7700],
        [400, 2000, 3100, 3600],
    ),
    PlantPreset::refined(
        "05_trailing_vine",
        [3750, 3800, 7700, 7700],
        [700, 1800, 3200, 3500],
    ),
];

static LEGACY_PLANTS: [PlantPreset; 5] = [
    PlantPreset::legacy(
        "01_yellow_flowers",
        [200, 300, 2800, 3800],
        [550, 1700, 1100, 900],
        (700, 2200),
    ),
    PlantPreset::legacy(
        "02_monstera",
        [2800, 200, 5400, 3800],
        [600, 1800, 1000, 800],
        (750, 2300),
    ),
    PlantPreset::legacy(
        "03_anthurium",
        [5200, 300, 7800, 3800],
        [600, 1800, 1100, 900],
        (750, 2300),
    ),
    PlantPreset::legacy(
        "04_aloe",
        [400, 3900, 3800, 7600],
        [700, 2100, 1100, 900],
        (850, 2600),
    ),
    PlantPreset::legacy(
        "05_trailing_vine",
        [3800, 3900, 7600, 7600],
        [900, 1900, 1100, 900],
        (1050, 2500),
    ),
];

/// The compiled-in table for `mode`.
pub fn plant_presets(mode: ExtractionMode) -> &'static [PlantPreset] {
    match mode {
        ExtractionMode::Refined => &REFINED_PLANTS,
        ExtractionMode::Legacy => &LEGACY_PLANTS,
    }
}

/// Descriptors for every built-in plant of `mode`, in sheet order.
pub fn builtin_plants(mode: ExtractionMode) -> Vec<PlantDescriptor> {
    plant_presets(mode).iter().map(PlantPreset::to_descriptor).collect()
}

/// Find a plant by name, ignoring case, punctuation and the numeric prefix.
///
/// `"monstera"`, `"02_monstera"` and `"Trailing Vine"` all resolve.
pub fn plant_by_name<'a>(
    plants: &'a [PlantDescriptor],
    name: &str,
) -> Option<&'a PlantDescriptor> {
    let key = normalize_name(name);
    plants
        .iter()
        .find(|p| normalize_name(&p.name) == key)
        .or_else(|| plants.iter().find(|p| normalize_name(strip_index(&p.name)) == key))
}

fn strip_index(name: &str) -> &str {
    name.trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['_', '-', ' '])
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refined_table_matches_sheet_layout() {
        let plants = builtin_plants(ExtractionMode::Refined);
        assert_eq!(plants.len(), 5);
        let aloe = plant_by_name(&plants, "04_aloe").expect("aloe present");
        assert_eq!(aloe.crop, Region::new(350, 3800, 3850, 7700));
        assert_eq!(aloe.pot_regions, vec![Region::new(400, 2000, 3100, 3600)]);
        assert!(plants.iter().all(|p| p.pot_sample.is_none()));
    }

    #[test]
    fn legacy_faces_are_converted_from_xywh() {
        let plants = builtin_plants(ExtractionMode::Legacy);
        let monstera = plant_by_name(&plants, "monstera").expect("monstera present");
        assert_eq!(monstera.pot_regions, vec![Region::new(600, 1800, 1600, 2600)]);
        assert_eq!(monstera.pot_sample, Some((750, 2300)));
    }

    #[test]
    fn lookup_ignores_case_spacing_and_prefix() {
        let plants = builtin_plants(ExtractionMode::Refined);
        let vine = plant_by_name(&plants, "Trailing Vine").expect("vine present");
        assert_eq!(vine.name, "05_trailing_vine");
        assert_eq!(
            plant_by_name(&plants, "03-ANTHURIUM").map(|p| p.name.as_str()),
            Some("03_anthurium")
        );
        assert!(plant_by_name(&plants, "cactus").is_none());
    }

    #[test]
    fn names_are_unique_and_ordered() {
        for mode in [ExtractionMode::Refined, ExtractionMode::Legacy] {
            let names: Vec<_> = plant_presets(mode).iter().map(|p| p.name).collect();
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(names, sorted);
        }
    }
}
