//! Improvement suggestions.

use crate::error::AtsError;
use crate::llm::prompts::suggestion_prompt;
use crate::llm::InferenceClient;
use crate::models::AggregateResult;
use tracing::info;

/// Ask the model for three improvements based on the aggregated findings.
///
/// Returns the raw response text; splitting into items is left to
/// [`crate::models::Suggestions::items`].
pub async fn request_suggestions(
    client: &dyn InferenceClient,
    result: &AggregateResult,
) -> Result<String, AtsError> {
    let prompt = suggestion_prompt(result.average_score, &result.findings_text());

    info!("Requesting improvement suggestions from {}", client.model());
    client.generate(&prompt).await
}
