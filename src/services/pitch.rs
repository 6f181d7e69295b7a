use crate::models::{Client, Property};
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Returned when the model answers with no text
const STANDARD_RECOMMENDATION: &str =
    "Standard Recommendation: High potential match based on location and budget profile.";

/// Errors that can occur when calling the generative model
#[derive(Debug, Error)]
pub enum PitchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

/// Gemini `generateContent` client
struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: HttpClient,
}

impl GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, PitchError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        tracing::debug!("Requesting pitch from: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PitchError::ApiError(format!(
                "Failed to generate content: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        // No candidates array at all is a malformed answer; an empty one is a blank answer
        if !json.get("candidates").is_some_and(Value::is_array) {
            return Err(PitchError::InvalidResponse("missing candidates array".to_string()));
        }

        let text = json
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(text)
    }
}

/// Short sales pitch for a property matched to a client
///
/// Runs entirely locally when no API key is configured. The remote model
/// only ever produces prose; scores never depend on it.
pub struct PitchGenerator {
    remote: Option<GeminiClient>,
}

impl PitchGenerator {
    /// Create a generator; a blank or missing API key selects the local template
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, PitchError> {
        let api_key = match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => return Ok(Self::local()),
        };

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            remote: Some(GeminiClient {
                base_url,
                api_key,
                model,
                client,
            }),
        })
    }

    /// Generator that never leaves the process
    pub fn local() -> Self {
        Self { remote: None }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn recommend(&self, property: &Property, client: &Client) -> String {
        let Some(remote) = &self.remote else {
            return template_pitch(property, client);
        };

        match remote.generate(&build_prompt(property, client)).await {
            Ok(Some(text)) => text,
            Ok(None) => STANDARD_RECOMMENDATION.to_string(),
            Err(e) => {
                tracing::warn!("Pitch generation failed, using fallback: {}", e);
                fallback_pitch(property, client)
            }
        }
    }
}

fn build_prompt(property: &Property, client: &Client) -> String {
    format!(
        "Act as a high-end real estate matching expert.\n\
         Analyze this match:\n\
         Property: {} in {}, {}, Price ₹{}.\n\
         Client: {}, Budget ₹{}-{}, wants {}.\n\n\
         Provide a one-paragraph persuasive recommendation (max 40 words) for the agent. \
         Use a professional, luxury tone.",
        property.title,
        property.location.area,
        property.bhk,
        property.price,
        client.name,
        client.budget_min,
        client.budget_max,
        client.bhk_preference.join("/"),
    )
}

/// Pitch used when no model is configured
pub fn template_pitch(property: &Property, client: &Client) -> String {
    format!(
        "Highly recommended listing for {}. The property in {} offers a {} configuration \
         that matches the client's preference perfectly. At ₹{}, it sits comfortably within \
         the target acquisition range. Best suited for immediate site visit.",
        client.name, property.location.area, property.bhk, property.price
    )
}

/// Pitch used when the model call fails
pub fn fallback_pitch(property: &Property, client: &Client) -> String {
    format!(
        "Excellent match for {}. This {} in {} provides the exact configuration required. \
         The pricing of ₹{} represents significant value compared to the client's upper limit.",
        client.name, property.bhk, property.location.area, property.price
    )
}
