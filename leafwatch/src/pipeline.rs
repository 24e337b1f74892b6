// THEORY:
// The `pipeline` module is the top-level API of the library. It strings the scoring
// core and the reasoning backend together in the order a run actually happens:
//
//   Stage 1 (screen):  sanity filter → encode → remote plant validation.
//   Stage 2 (assess):  vegetation scorer → stress model → remote explanation →
//                      remote self-rating.
//
// The two stages are separate calls because the user is asked for weather and soil
// only after the image has passed screening; there is no point asking about a
// photo of a car.
//
// Failure policy lives here and nowhere else. Screening can fail fatally (blank
// image, "not a plant"). Remote errors never do: they are logged and carried into
// the report as `RemoteText::Failed`, and the run completes.

use crate::core_modules::frame::frame::Frame;
use crate::core_modules::image_helper::image_helper;
use crate::core_modules::sanity;
use crate::core_modules::stress::{PlantSize, StressAssessment, WeatherReading};
use crate::core_modules::vegetation::{self, VegetationReading};
use crate::error::{LeafwatchError, Result};
use crate::reasoning::prompts::{SummaryContext, summary_prompt};
use crate::reasoning::{EncodedImage, PlantVerdict, ReasoningBackend, SelfRatedConfidence, parse_verdict};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Tunable behavior of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub plant_size: PlantSize,
}

/// Text produced by a remote call, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum RemoteText {
    Reply(String),
    Failed(String),
}

impl RemoteText {
    pub fn is_failed(&self) -> bool {
        matches!(self, RemoteText::Failed(_))
    }

    pub fn reply(&self) -> Option<&str> {
        match self {
            RemoteText::Reply(text) => Some(text),
            RemoteText::Failed(_) => None,
        }
    }
}

impl fmt::Display for RemoteText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteText::Reply(text) => f.write_str(text),
            RemoteText::Failed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// User-supplied context for the stress model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowingConditions {
    pub weather: WeatherReading,
    /// Free-text soil description, kept verbatim for the report.
    pub soil: String,
}

/// A frame that passed the sanity filter and plant validation.
#[derive(Debug, Clone)]
pub struct ScreenedFrame {
    pub frame: Frame,
    pub image: EncodedImage,
    pub validation: RemoteText,
}

/// The final, printable result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub backend: String,
    pub validation: RemoteText,
    pub conditions: GrowingConditions,
    pub vegetation: VegetationReading,
    pub assessment: StressAssessment,
    pub expert_summary: RemoteText,
    pub self_rated_confidence: SelfRatedConfidence,
}

/// Runs the scoring core and the remote reasoning calls for one image.
pub struct StressPipeline {
    backend: Box<dyn ReasoningBackend>,
    config: PipelineConfig,
}

impl StressPipeline {
    pub fn new(backend: Box<dyn ReasoningBackend>, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Loads `path` and screens it.
    pub async fn screen_path(&self, path: &Path) -> Result<ScreenedFrame> {
        let frame = image_helper::load_frame(path)?;
        self.screen(frame).await
    }

    /// Stage 1: rejects blank frames and frames the model says are not a plant.
    pub async fn screen(&self, frame: Frame) -> Result<ScreenedFrame> {
        sanity::check_frame(&frame)?;
        let image = EncodedImage::jpeg(image_helper::encode_jpeg_base64(&frame)?);

        info!(backend = self.backend.name(), "validating image");
        let validation = match self.backend.validate_image(&image).await {
            Ok(reply) => {
                if parse_verdict(&reply) == PlantVerdict::NotPlant {
                    return Err(LeafwatchError::NotAPlant { verdict: reply });
                }
                RemoteText::Reply(reply)
            }
            Err(e) => {
                warn!(error = %e, "image validation failed, continuing without a verdict");
                RemoteText::Failed(e.to_string())
            }
        };

        Ok(ScreenedFrame {
            frame,
            image,
            validation,
        })
    }

    /// Stage 2: scores the frame, asks for an explanation and a self-rating.
    pub async fn assess(&self, screened: &ScreenedFrame, conditions: GrowingConditions) -> StressReport {
        let vegetation = vegetation::score(&screened.frame);
        let assessment = StressAssessment::evaluate(
            vegetation.rgvi,
            &conditions.weather,
            &conditions.soil,
            self.config.plant_size,
        );
        info!(
            rgvi = vegetation.rgvi,
            confidence = vegetation.confidence,
            combined_stress = assessment.combined_stress,
            status = ?assessment.status,
            "scored frame"
        );

        let prompt = summary_prompt(&SummaryContext {
            validation: &screened.validation.to_string(),
            vegetation: &vegetation,
            weather: &conditions.weather,
            soil_description: &conditions.soil,
            assessment: &assessment,
        });
        let expert_summary = match self.backend.explain(&prompt).await {
            Ok(reply) => RemoteText::Reply(reply),
            Err(e) => {
                warn!(error = %e, "explanation request failed");
                RemoteText::Failed(e.to_string())
            }
        };

        let self_rated_confidence = match expert_summary.reply() {
            Some(summary) => match self.backend.self_rate_confidence(summary).await {
                Ok(rating) => rating,
                Err(e) => {
                    warn!(error = %e, "self-rating request failed");
                    SelfRatedConfidence::Indeterminate
                }
            },
            None => SelfRatedConfidence::Indeterminate,
        };

        StressReport {
            backend: self.backend.name().to_string(),
            validation: screened.validation.clone(),
            conditions,
            vegetation,
            assessment,
            expert_summary,
            self_rated_confidence,
        }
    }

    /// Free-form scene description of the image at `path`. Only blank frames are
    /// rejected; a remote failure comes back as `RemoteText::Failed`.
    pub async fn describe_path(&self, path: &Path) -> Result<RemoteText> {
        let frame = image_helper::load_frame(path)?;
        sanity::check_frame(&frame)?;
        let image = EncodedImage::jpeg(image_helper::encode_jpeg_base64(&frame)?);
        Ok(match self.backend.describe_scene(&image).await {
            Ok(reply) => RemoteText::Reply(reply),
            Err(e) => {
                warn!(error = %e, "scene description failed");
                RemoteText::Failed(e.to_string())
            }
        })
    }
}
