//! Cloudformation to Terraform translation pipeline.
//!
//! Reads Cloudformation templates from an input folder, asks an
//! OpenAI-compatible completion endpoint to translate each one into
//! Terraform HCL, checks the candidate with `terraform validate -json`,
//! and writes accepted output to the destination folder.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Pipeline error taxonomy
pub mod error;

/// Completion service client
pub mod providers;

/// External terraform validator adapter
pub mod validation;

/// Folder checks and per-file orchestration
pub mod pipeline;

pub use error::PipelineError;
pub use providers::CompletionClient;
pub use validation::TerraformValidator;

/// Response body of the legacy `/completions` endpoint, reduced to the
/// fields the pipeline consumes.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

/// `terraform validate -json` output, reduced to the decision fields.
/// Diagnostics are kept raw; they only ever travel inside error messages.
#[derive(Debug, Deserialize)]
pub struct ValidateOutput {
    pub valid: bool,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub diagnostics: Vec<serde_json::Value>,
}

/// Environment-backed configuration with validation
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,

    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,

    pub terraform_bin: String,
    pub validate_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // .env in the working directory, if present; real environment wins
        dotenvy::dotenv().ok();

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .unwrap_or(120)
            .clamp(10, 600);

        let connect_timeout_secs = std::env::var("CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .unwrap_or(30)
            .clamp(5, 120);

        let validate_timeout_secs = std::env::var("VALIDATE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .unwrap_or(60)
            .clamp(5, 600);

        let config = Config {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: std::env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "text-davinci-003".to_string()),
            request_timeout_secs,
            connect_timeout_secs,
            terraform_bin: std::env::var("TERRAFORM_BIN")
                .unwrap_or_else(|_| "terraform".to_string()),
            validate_timeout_secs,
        };

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    /// Validate configuration and return errors if invalid
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            return Err(anyhow::anyhow!(
                "OPENAI_API_KEY is not set; the completion endpoint requires it"
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow::anyhow!("COMPLETION_MODEL cannot be empty"));
        }

        if self.openai_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("OPENAI_BASE_URL cannot be empty"));
        }

        if self.terraform_bin.trim().is_empty() {
            return Err(anyhow::anyhow!("TERRAFORM_BIN cannot be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            model: "text-davinci-003".to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 30,
            terraform_bin: "terraform".to_string(),
            validate_timeout_secs: 60,
        }
    }
}
