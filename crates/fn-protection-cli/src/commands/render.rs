//! Render command - run the function and print its response

use clap::ValueEnum;
use std::path::Path;

use super::load_request;
use crate::error::{CliError, Result};
use crate::function::{InputOverrides, run_function};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

pub fn run(
    request_path: &Path,
    format: OutputFormat,
    overrides: &InputOverrides,
    fail_on_fatal: bool,
) -> Result<()> {
    let request = load_request(request_path)?;
    let run = run_function(&request, overrides);

    let output = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&run.response)?,
        OutputFormat::Json => serde_json::to_string_pretty(&run.response)?,
    };
    println!("{}", output.trim_end());

    // A fatal result is part of the response; only fail when asked to
    if fail_on_fatal && let Some(message) = run.response.fatal_message() {
        return Err(CliError::fatal(message));
    }

    Ok(())
}
