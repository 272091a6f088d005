//! CLI for converting Cloudformation files to Terraform files.
//!
//! `cf2tf [--debug] generate INPUT_FOLDER OUTPUT_FOLDER` iterates over the
//! files in the input folder, translates each through an OpenAI completion
//! endpoint, runs `terraform validate` on the result, and saves accepted
//! output in the output folder.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cf2tf::{pipeline, CompletionClient, Config, TerraformValidator};

#[derive(Parser)]
#[command(name = "cf2tf", version, about = "CLI for converting Cloudformation files to Terraform files")]
struct Cli {
    /// Enables debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates Terraform files from Cloudformation templates
    Generate {
        /// Folder containing Cloudformation templates
        #[arg(value_parser = parse_existing_path)]
        input_folder: PathBuf,

        /// Folder where generated Terraform files are saved
        output_folder: PathBuf,
    },
}

/// Rejects a nonexistent input path at parse time, before any pipeline
/// logic runs. Directory-ness is still the folder validator's job.
fn parse_existing_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if !path.exists() {
        return Err(format!("path does not exist: {}", raw));
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The flag picks the default verbosity; RUST_LOG still overrides.
    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting CLI");

    match cli.command {
        Commands::Generate {
            input_folder,
            output_folder,
        } => {
            tracing::debug!("Generating Terraform files from Cloudformation templates");

            let config = Config::from_env().context("Failed to load configuration")?;
            let client = CompletionClient::new(config.clone())
                .context("Failed to create completion client")?;
            let validator =
                TerraformValidator::new(config.terraform_bin.clone(), config.validate_timeout_secs);

            pipeline::run(&client, &validator, &input_folder, &output_folder).await
        }
    }
}
