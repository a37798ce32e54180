use crate::features::FeatureVector;
use crate::frame::ImageBuffer;

/// Persona sent as the system instruction on every provider call.
pub const SYSTEM_PROMPT: &str = "You are MelonBuddy, an expert assistant for hydroponic melon farmers. \
You provide advice on growing media, irrigation systems, nutrient solutions, \
pest management, and general cultivation practices for melons. \
Your responses should be practical, actionable, and based on horticultural science. \
When uncertain, acknowledge limitations and suggest reliable resources.";

/// Used when a provider is asked to analyse an image with no prompt at all.
pub const DEFAULT_VISION_PROMPT: &str = "Analyze this melon plant image. Identify:
1. Overall plant health
2. Any visible diseases or deficiencies
3. Growth stage
4. Recommendations for the farmer";

/// Build the analysis request text.
///
/// A non-empty caller instruction is used verbatim. Without one, or with an
/// empty one, the default template embeds the extracted features.
pub fn compose_prompt(features: &FeatureVector, instruction: Option<&str>) -> String {
    match instruction {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!(
            "Analyze this melon plant image. Consider these extracted features:
- Green intensity: {:.2}
- Yellow/brown ratio: {:.2}
- Leaf area estimate: {} pixels

Please provide:
1. Overall plant health assessment
2. Identification of any visible diseases or nutrient deficiencies
3. Growth stage estimation
4. Specific recommendations for the farmer",
            features.green_intensity, features.yellow_brown_ratio, features.leaf_area_estimate
        ),
    }
}

/// A composed prompt paired with the image it describes.
#[derive(Clone, Debug)]
pub struct AnalysisRequest<'a> {
    pub prompt: String,
    pub image: &'a ImageBuffer,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(image: &'a ImageBuffer, features: &FeatureVector, instruction: Option<&str>) -> Self {
        Self {
            prompt: compose_prompt(features, instruction),
            image,
        }
    }
}
