use planter_utils::config::PlantSettings;
use serde::Serialize;

use crate::region::Region;

/// One plant to extract from the reference sheet.
///
/// `crop` is in source image coordinates; `pot_regions` and `pot_sample` are
/// relative to the crop's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantDescriptor {
    /// Output file stem.
    pub name: String,
    pub crop: Region,
    /// Pot areas to in-paint, processed in order.
    pub pot_regions: Vec<Region>,
    /// Fill color sample point for the ellipse eraser.
    pub pot_sample: Option<(u32, u32)>,
}

impl PlantDescriptor {
    pub fn new(name: impl Into<String>, crop: Region, pot_regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            crop,
            pot_regions,
            pot_sample: None,
        }
    }

    pub fn with_pot_sample(mut self, x: u32, y: u32) -> Self {
        self.pot_sample = Some((x, y));
        self
    }
}

impl From<&PlantSettings> for PlantDescriptor {
    fn from(settings: &PlantSettings) -> Self {
        Self {
            name: settings.name.clone(),
            crop: Region::from(settings.crop),
            pot_regions: settings.pot_regions.iter().copied().map(Region::from).collect(),
            pot_sample: settings.pot_sample.map(|[x, y]| (x, y)),
        }
    }
}

impl From<&PlantDescriptor> for PlantSettings {
    fn from(plant: &PlantDescriptor) -> Self {
        Self {
            name: plant.name.clone(),
            crop: plant.crop.to_array(),
            pot_regions: plant.pot_regions.iter().map(|r| r.to_array()).collect(),
            pot_sample: plant.pot_sample.map(|(x, y)| [x, y]),
        }
    }
}
