//! OpenAI completion client for Cloudformation to Terraform translation
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::pipeline::HclTranslator;
use crate::{Config, CompletionResponse, PipelineError};

/// Fixed instruction prepended to every source document. Byte-exact,
/// including the trailing space before the blank lines.
const PROMPT_PREAMBLE: &str = "translate the following cloudformation to valid \
Terraform code with equivalent functionality. Let's think step by step. \n\n\n";

// Generation parameters are part of the pipeline contract, not configuration.
// f64 matches serde_json's Number; f32 would reach the wire as 0.699999988079071.
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 3345;
const TOP_P: f64 = 1.0;
const FREQUENCY_PENALTY: f64 = 0.0;
const PRESENCE_PENALTY: f64 = 0.0;
const STOP_SEQUENCE: &str = "###";

/// A completion result shorter than this is treated as degenerate.
const MIN_COMPLETION_CHARS: usize = 5;

/// Client for the legacy `/completions` endpoint
pub struct CompletionClient {
    client: Client,
    config: Config,
}

impl CompletionClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Translate one Cloudformation document into Terraform HCL.
    ///
    /// Issues exactly one request; the first choice's text is returned
    /// verbatim, with no trimming or syntax repair. The only semantic
    /// check is the minimum-length guard.
    pub async fn translate(&self, source_text: &str) -> Result<String> {
        let prompt = build_prompt(source_text);
        tracing::debug!(prompt = %prompt, "prompt");

        let request_body = request_body(&self.config.model, &prompt);

        let response = self
            .client
            .post(format!("{}/completions", self.config.openai_base_url))
            .header("Authorization", format!("Bearer {}", self.config.openai_api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .context("Failed to send completion request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Completion API error: {}", error_text));
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let text = first_choice_text(api_response)?;
        tracing::debug!(completion = %text, "completion");

        check_completion(text)
    }
}

#[async_trait]
impl HclTranslator for CompletionClient {
    async fn translate(&self, source_text: &str) -> Result<String> {
        CompletionClient::translate(self, source_text).await
    }
}

/// Prompt = fixed preamble + verbatim source text
pub fn build_prompt(source_text: &str) -> String {
    format!("{}{}", PROMPT_PREAMBLE, source_text)
}

/// Request body for the `/completions` endpoint with the fixed
/// generation parameters.
pub fn request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "prompt": prompt,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
        "top_p": TOP_P,
        "frequency_penalty": FREQUENCY_PENALTY,
        "presence_penalty": PRESENCE_PENALTY,
        "stop": [STOP_SEQUENCE]
    })
}

/// Extract the first candidate's text from a completion response
pub fn first_choice_text(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text)
        .ok_or_else(|| anyhow::anyhow!("No choices in completion response"))
}

/// Reject degenerate completions. This is the only semantic check on
/// the model's output; it does not verify HCL syntax.
pub fn check_completion(text: String) -> Result<String> {
    let chars = text.chars().count();
    if chars < MIN_COMPLETION_CHARS {
        tracing::error!(completion = %text, "Generated Terraform HCL is too short");
        return Err(PipelineError::InvalidCompletion { chars }.into());
    }
    Ok(text)
}
