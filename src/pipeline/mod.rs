//! Folder validation and per-file orchestration

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

use crate::PipelineError;

/// Translates one Cloudformation document into Terraform HCL.
#[async_trait]
pub trait HclTranslator {
    async fn translate(&self, source_text: &str) -> Result<String>;
}

/// Checks one candidate HCL document, erroring on rejection.
pub trait HclValidator {
    fn validate(&self, hcl: &str) -> Result<()>;
}

/// Validates that the input folder exists and is a directory.
///
/// The original logged and carried on here; this version fails fast.
/// The CLI's path argument rejects a missing path even earlier, so this
/// check guards library callers.
pub fn validate_input_folder(input_folder: &Path) -> Result<()> {
    if !input_folder.is_dir() {
        tracing::error!(path = %input_folder.display(), "Input folder does not exist or is not a directory");
        return Err(PipelineError::MissingInputFolder(input_folder.to_path_buf()).into());
    }
    Ok(())
}

/// Validates that the output folder exists and is a directory.
pub fn validate_output_folder(output_folder: &Path) -> Result<()> {
    tracing::debug!("Validating output folder");
    if !output_folder.is_dir() {
        tracing::error!(path = %output_folder.display(), "Output folder does not exist or is not a directory");
        return Err(PipelineError::MissingOutputFolder(output_folder.to_path_buf()).into());
    }
    Ok(())
}

/// Process every entry of the input folder, sequentially and fail-fast.
///
/// Entries are sorted lexicographically by file name so the processing
/// order (and therefore the fail-fast cutoff) is deterministic. There is
/// no recursion, no extension filter, and no per-file isolation: the
/// first failure in any stage aborts the whole run, leaving outputs
/// written for earlier entries in place.
pub async fn run<T, V>(
    translator: &T,
    validator: &V,
    input_folder: &Path,
    output_folder: &Path,
) -> Result<()>
where
    T: HclTranslator,
    V: HclValidator,
{
    validate_input_folder(input_folder)?;
    validate_output_folder(output_folder)?;

    let mut filenames = Vec::new();
    let entries = std::fs::read_dir(input_folder)
        .with_context(|| format!("Failed to list input folder: {}", input_folder.display()))?;
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        filenames.push(entry.file_name().to_string_lossy().into_owned());
    }
    filenames.sort();

    for filename in &filenames {
        process_file(translator, validator, input_folder, output_folder, filename).await?;
        println!("Generated Terraform file: {}", filename);
    }

    Ok(())
}

/// Read one source file, translate it, validate the candidate, and
/// write `<filename>.tf` into the output folder (silent overwrite).
async fn process_file<T, V>(
    translator: &T,
    validator: &V,
    input_folder: &Path,
    output_folder: &Path,
    filename: &str,
) -> Result<()>
where
    T: HclTranslator,
    V: HclValidator,
{
    let source_path = input_folder.join(filename);
    tracing::debug!(path = %source_path.display(), "Generating Terraform HCL from Cloudformation file");

    let source_text = std::fs::read_to_string(&source_path)
        .with_context(|| format!("Failed to read Cloudformation file: {}", source_path.display()))?;

    let terraform_hcl = translator.translate(&source_text).await?;
    validator.validate(&terraform_hcl)?;

    let output_path = output_folder.join(format!("{}.tf", filename));
    tracing::debug!(path = %output_path.display(), "Writing generated Terraform HCL to file");
    std::fs::write(&output_path, &terraform_hcl)
        .with_context(|| format!("Failed to write Terraform file: {}", output_path.display()))?;

    Ok(())
}
