pub mod features;
pub mod insight;
pub mod scoring;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audio::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use features::{AcousticFeatures, FeatureExtractor};
use insight::Category;
use scoring::{Confidence, VoiceScores};

/// Insight shown when no buffer could be analysed at all.
pub const FALLBACK_INSIGHT: &str =
    "The voice check could not be completed. Please try recording again.";

/// Everything the presentation layer needs for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: VoiceScores,
    pub insight: String,
    pub category: Category,
    pub confidence: Confidence,
    pub features: AcousticFeatures,
}

impl AnalysisResult {
    /// Conservative result for when capture failed and the pipeline never
    /// ran: neutral 50/50/50 scores, low confidence.
    pub fn fallback() -> Self {
        Self {
            scores: VoiceScores {
                energy: 50,
                tension: 50,
                clarity: 50,
            },
            insight: FALLBACK_INSIGHT.to_string(),
            category: Category::Neutral,
            confidence: Confidence::Low,
            features: AcousticFeatures::default(),
        }
    }
}

/// Run the full pipeline on one buffer.
///
/// The buffer is consumed; its samples are dropped when this returns.
/// Features are extracted completely before anything is scored, so an
/// error means no scores were computed.
pub fn analyze(buffer: AudioBuffer, config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;

    let features = FeatureExtractor::new(config).extract(&buffer)?;
    drop(buffer);

    Ok(evaluate(features))
}

/// Score, label and describe already-extracted features.
pub fn evaluate(features: AcousticFeatures) -> AnalysisResult {
    let scores = scoring::score(&features);
    let rule = insight::matching_rule(&features, &scores);
    let category = insight::category(&features, &scores);
    let confidence = scoring::confidence(&features);

    info!(
        energy = scores.energy,
        tension = scores.tension,
        clarity = scores.clarity,
        insight = rule.id,
        %category,
        %confidence,
        "analysis complete"
    );

    AnalysisResult {
        scores,
        insight: rule.message.to_string(),
        category,
        confidence,
        features,
    }
}
