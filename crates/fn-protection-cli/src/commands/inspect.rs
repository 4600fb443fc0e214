//! Inspect command - show which resources a request would protect

use console::style;
use fn_protection_engine::ProtectionDecision;
use serde::Serialize;
use std::path::Path;

use super::load_request;
use crate::display::PlanRenderer;
use crate::error::{CliError, Result};
use crate::function::{InputOverrides, run_function};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport<'a> {
    tag: &'a str,
    #[serde(with = "humantime_serde")]
    ttl: std::time::Duration,
    protected_count: usize,
    decisions: &'a [ProtectionDecision],
    #[serde(skip_serializing_if = "Option::is_none")]
    fatal: Option<&'a str>,
}

pub fn run(request_path: &Path, overrides: &InputOverrides, json: bool) -> Result<()> {
    let request = load_request(request_path)?;
    let run = run_function(&request, overrides);
    let response = &run.response;

    if json {
        let decisions = run.outcome.as_ref().map(|o| o.decisions.as_slice()).unwrap_or_default();
        let report = InspectReport {
            tag: &response.meta.tag,
            ttl: response.meta.ttl,
            protected_count: run.outcome.as_ref().map(|o| o.protected_count).unwrap_or_default(),
            decisions,
            fatal: response.fatal_message(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(message) = response.fatal_message() {
        if !json {
            eprintln!("{} {}", style("✗").red().bold(), message);
        }
        return Err(CliError::fatal(message));
    }

    let Some(outcome) = &run.outcome else {
        return Err(CliError::internal("function returned no protection outcome"));
    };

    if !json {
        PlanRenderer::new().render(response, outcome)?;
    }

    Ok(())
}
