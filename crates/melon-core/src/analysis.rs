use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::error::{ProviderError, Result};
use crate::features::{extract_features, FeatureVector};
use crate::frame::ImageBuffer;
use crate::prompt::AnalysisRequest;
use crate::provider::AiBackend;

/// Extracted features plus the provider's verdict on them.
///
/// Exactly one of `narrative` and `error` carries content: a failed provider
/// call leaves `narrative` empty.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    pub features: FeatureVector,
    pub narrative: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ProviderError>,
}

fn serialize_error<S: Serializer>(
    error: &Option<ProviderError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn outcome(&self) -> std::result::Result<&str, &ProviderError> {
        match &self.error {
            Some(e) => Err(e),
            None => Ok(&self.narrative),
        }
    }
}

/// Combine features with the provider's outcome.
pub fn aggregate(
    features: FeatureVector,
    outcome: std::result::Result<String, ProviderError>,
) -> AnalysisResult {
    match outcome {
        Ok(narrative) => AnalysisResult {
            features,
            narrative,
            error: None,
        },
        Err(e) => AnalysisResult {
            features,
            narrative: String::new(),
            error: Some(e),
        },
    }
}

/// Runs extraction, prompt composition, and the provider call for one image.
pub struct PlantAnalyzer<B: AiBackend> {
    backend: B,
}

impl<B: AiBackend> PlantAnalyzer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Analyse one image.
    ///
    /// Undecodable input is an `Err`; a failed provider call is reported
    /// inside the returned result.
    pub fn analyze(&self, image: &ImageBuffer, instruction: Option<&str>) -> Result<AnalysisResult> {
        let features = extract_features(image)?;
        let request = AnalysisRequest::new(image, &features, instruction);

        info!(provider = self.backend.name(), "Requesting plant analysis");
        let outcome = self
            .backend
            .analyze_image(request.image, Some(&request.prompt));
        if let Err(ref e) = outcome {
            warn!(provider = self.backend.name(), error = %e, "Plant analysis failed");
        }

        Ok(aggregate(features, outcome))
    }
}

