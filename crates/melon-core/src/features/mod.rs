pub mod extractor;

use serde::{Deserialize, Serialize};

pub use extractor::{extract_features, extract_from_rgb};

/// Colour-based health indicators of one plant photo.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// mean(G) / (mean(R) + mean(B) + epsilon). Higher in healthy foliage.
    pub green_intensity: f64,
    /// Fraction of pixels in the yellow/brown band, in [0, 1].
    pub yellow_brown_ratio: f64,
    /// Pixels in the leaf-green HSV band of the canonical 800x600 frame.
    pub leaf_area_estimate: u64,
}
