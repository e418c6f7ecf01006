//! # Milestone Generator
//!
//! Turns three planning parameters into a list of milestone drafts.

use std::sync::Arc;

use super::backend::{CompletionBackend, CompletionRequest, GeminiBackend};
use super::error::GenerationError;
use super::prompts;
use super::schema::{self, ParsedMilestones};
use super::types::{GenerationRequest, MilestoneDraft};
use crate::models::ModelConfig;

/// What a generation call produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOutcome {
    /// Valid drafts, in service order
    pub drafts: Vec<MilestoneDraft>,
    /// Elements the validator discarded
    pub rejected: usize,
    /// The service answered without any text
    pub empty_response: bool,
}

impl From<ParsedMilestones> for GenerationOutcome {
    fn from(parsed: ParsedMilestones) -> Self {
        Self {
            drafts: parsed.drafts,
            rejected: parsed.rejected,
            empty_response: false,
        }
    }
}

/// Stateless milestone generation client.
///
/// Holds no per-call state; concurrent calls are independent and may
/// complete in any order.
#[derive(Clone)]
pub struct MilestoneGenerator {
    backend: Arc<dyn CompletionBackend>,
    model: String,
}

impl MilestoneGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &ModelConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
        }
    }

    /// Build a generator backed by Gemini, reading the API key from the environment
    pub fn from_config(config: &ModelConfig) -> Result<Self, GenerationError> {
        let backend = GeminiBackend::new(config)?;
        Ok(Self::new(Arc::new(backend), config))
    }

    /// Generate launch milestones, absorbing every failure.
    ///
    /// Returns an empty list when the call fails or produces nothing; the
    /// cause is logged.
    pub async fn generate_milestones(
        &self,
        therapeutic_area: &str,
        target_launch_date: &str,
        region: &str,
    ) -> Vec<MilestoneDraft> {
        let request = GenerationRequest::new(therapeutic_area, target_launch_date, region);
        match self.try_generate(&request).await {
            Ok(outcome) => outcome.drafts,
            Err(e) => {
                tracing::error!(error = %e, "Error generating launch plan");
                Vec::new()
            }
        }
    }

    /// Generate launch milestones, reporting failures to the caller
    #[tracing::instrument(
        skip(self, request),
        fields(
            model = %self.model,
            therapeutic_area = %request.therapeutic_area,
            region = %request.region
        )
    )]
    pub async fn try_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let completion = CompletionRequest {
            model: self.model.clone(),
            prompt: prompts::render(request),
            response_mime_type: schema::RESPONSE_MIME_TYPE.to_string(),
            response_schema: schema::response_schema(),
        };

        let Some(text) = self.backend.complete(completion).await? else {
            tracing::warn!("Completion service returned no text");
            return Ok(GenerationOutcome {
                empty_response: true,
                ..GenerationOutcome::default()
            });
        };

        let outcome = GenerationOutcome::from(schema::parse_milestones(&text)?);
        tracing::info!(
            milestones = outcome.drafts.len(),
            rejected = outcome.rejected,
            "Generated launch milestones"
        );
        Ok(outcome)
    }
}
