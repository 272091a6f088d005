use std::path::PathBuf;
use thiserror::Error;

/// Semantic failures of the translation pipeline. Everything else
/// (I/O, HTTP transport, subprocess spawn) surfaces as `anyhow` errors
/// with context attached at the call site.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input folder does not exist or is not a directory: {0}")]
    MissingInputFolder(PathBuf),

    #[error("Output folder does not exist or is not a directory: {0}")]
    MissingOutputFolder(PathBuf),

    #[error("Generated Terraform HCL is too short ({chars} chars)")]
    InvalidCompletion { chars: usize },

    #[error("Generated Terraform HCL is not valid:\n{output}")]
    ValidationFailed { output: String },
}
