use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GenerationParams, Summarizer, SummarizerError};

/// Client for a Hugging Face style summarization inference endpoint.
///
/// `POST {api_base}/models/{model}` with the window text and generation
/// parameters; the endpoint answers `[{"summary_text": "..."}]`.
pub struct HuggingFaceSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

impl HuggingFaceSummarizer {
    pub fn new(
        api_base: &str,
        model: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/models/{}", api_base.trim_end_matches('/'), model),
            api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<String, SummarizerError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: params.max_length,
                min_length: params.min_length,
                do_sample: params.do_sample,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        debug!(endpoint = %self.endpoint, input_chars = text.chars().count(), "Calling summarization endpoint");
        let response = request.send().await?;
        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Summarization endpoint returned an error");
            return Err(SummarizerError::Upstream {
                status: status.as_u16(),
                body: payload,
            });
        }

        let outputs: Vec<SummaryOutput> = serde_json::from_str(&payload)
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text)
            .ok_or_else(|| SummarizerError::InvalidResponse("empty result list".to_string()))
    }
}
