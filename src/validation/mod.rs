//! Terraform validator adapter
//!
//! Pipes candidate HCL into `terraform validate -json` and parses the
//! machine-readable result instead of matching the human-oriented,
//! color-coded success line.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::pipeline::HclValidator;
use crate::{PipelineError, ValidateOutput};

/// Maximum candidate size piped into the validator
const MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub struct TerraformValidator {
    bin: String,
    timeout: Duration,
}

impl TerraformValidator {
    pub fn new(bin: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            bin: bin.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Validate one candidate document.
    ///
    /// Success is decided by the parsed `valid` field alone; an
    /// unparseable capture, a `valid: false`, or a timeout all fail
    /// with the raw captured output attached for diagnostics.
    pub fn validate(&self, hcl: &str) -> Result<()> {
        tracing::debug!("Validating generated Terraform HCL");

        if hcl.len() > MAX_INPUT_BYTES {
            anyhow::bail!(
                "Candidate too large for validation: {} bytes (max: {})",
                hcl.len(),
                MAX_INPUT_BYTES
            );
        }

        let output = self
            .run_validator(hcl)
            .context("Failed to run terraform validate")?;
        tracing::debug!(output = %output, "Terraform validate output");

        match serde_json::from_str::<ValidateOutput>(locate_json(&output)) {
            Ok(parsed) if parsed.valid => Ok(()),
            Ok(parsed) => {
                tracing::error!(
                    error_count = parsed.error_count,
                    "Generated Terraform HCL is not valid"
                );
                Err(PipelineError::ValidationFailed { output }.into())
            }
            Err(_) => Err(PipelineError::ValidationFailed { output }.into()),
        }
    }

    /// Spawn the validator, feed stdin from a helper thread, and wait
    /// for completion with a timeout. stdout and stderr are captured
    /// separately and merged into one diagnostic stream.
    fn run_validator(&self, input: &str) -> Result<String> {
        let mut child = Command::new(&self.bin)
            .arg("validate")
            .arg("-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn '{} validate -json'", self.bin))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Write in a separate thread so a full pipe cannot deadlock
            let data = input.to_string();
            thread::spawn(move || {
                let _ = stdin.write_all(data.as_bytes());
                let _ = stdin.flush();
            });
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = child.wait_with_output();
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(output)) => {
                let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.is_empty() {
                    captured.push_str(&stderr);
                }
                Ok(captured)
            }
            Ok(Err(e)) => Err(e).context("terraform validate did not complete"),
            Err(_) => Err(PipelineError::ValidationFailed {
                output: format!(
                    "terraform validate timed out after {}s",
                    self.timeout.as_secs()
                ),
            }
            .into()),
        }
    }
}

impl HclValidator for TerraformValidator {
    fn validate(&self, hcl: &str) -> Result<()> {
        TerraformValidator::validate(self, hcl)
    }
}

/// Some terraform builds print a human warning line before the JSON
/// document. Skip to the first brace so the parse sees the document.
fn locate_json(captured: &str) -> &str {
    match captured.find('{') {
        Some(idx) => &captured[idx..],
        None => captured,
    }
}
