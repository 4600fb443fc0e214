//! The function runner
//!
//! Turns a request into a response: reads the input, builds the resource
//! graph, runs the protection engine and adds the resulting guards to the
//! desired state. Every failure becomes a single fatal result; the runner
//! itself never errors.

use fn_protection_core::{
    CoreError, DEFAULT_TTL, FunctionInput, ResourceDoc, ResourceGraph, RunFunctionRequest,
    RunFunctionResponse,
};
use fn_protection_engine::{EngineError, ProtectionEngine, ProtectionOutcome};
use thiserror::Error;
use tracing::{info, warn};

/// Values that take precedence over the request's function input
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    pub cache_ttl: Option<String>,
    pub enable_v1_mode: Option<bool>,
}

impl InputOverrides {
    fn apply(&self, input: &mut FunctionInput) {
        if let Some(ttl) = &self.cache_ttl {
            input.cache_ttl = Some(ttl.clone());
        }
        if let Some(enabled) = self.enable_v1_mode {
            input.enable_v1_mode = enabled;
        }
    }
}

/// The response plus what the engine decided, when it got to run
#[derive(Debug)]
pub struct FunctionRun {
    pub response: RunFunctionResponse,
    pub outcome: Option<ProtectionOutcome>,
}

#[derive(Debug, Error)]
enum FunctionError {
    #[error("{context}: {source}")]
    Read {
        context: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("cannot create usages: {0}")]
    Protect(#[from] EngineError),

    #[error("cannot set desired resources: {0}")]
    Assemble(#[from] serde_json::Error),

    #[error("cannot set desired resources: {0} already exists")]
    KeyTaken(String),
}

trait ReadContext<T> {
    fn context(self, context: &'static str) -> Result<T, FunctionError>;
}

impl<T> ReadContext<T> for fn_protection_core::Result<T> {
    fn context(self, context: &'static str) -> Result<T, FunctionError> {
        self.map_err(|source| FunctionError::Read { context, source })
    }
}

/// Run the function against one request
pub fn run_function(req: &RunFunctionRequest, overrides: &InputOverrides) -> FunctionRun {
    info!(tag = %req.meta.tag, "Running function");

    let mut response = RunFunctionResponse::to(req, DEFAULT_TTL);
    match protect(req, overrides, &mut response) {
        Ok(outcome) => FunctionRun {
            response,
            outcome: Some(outcome),
        },
        Err(err) => {
            warn!(error = %err, "function failed");
            response.meta.ttl = DEFAULT_TTL;
            response.fatal(err.to_string());
            FunctionRun {
                response,
                outcome: None,
            }
        }
    }
}

fn protect(
    req: &RunFunctionRequest,
    overrides: &InputOverrides,
    response: &mut RunFunctionResponse,
) -> Result<ProtectionOutcome, FunctionError> {
    let mut input = req.input().context("cannot get Function input")?;
    overrides.apply(&mut input);
    response.meta.ttl = input.response_ttl().context("cannot set cacheTTL")?;

    let graph = read_graph(req)?;
    let outcome = ProtectionEngine::from_legacy_flag(input.enable_v1_mode).run(&graph)?;

    merge_guards(response, &outcome)?;
    Ok(outcome)
}

/// Add the guards to the desired composed resources; existing entries stay
fn merge_guards(response: &mut RunFunctionResponse, outcome: &ProtectionOutcome) -> Result<(), FunctionError> {
    for (key, guard) in outcome.guards() {
        if response.desired.resources.contains_key(key) {
            return Err(FunctionError::KeyTaken(key.clone()));
        }
        let resource = serde_json::to_value(guard)?;
        response
            .desired
            .resources
            .insert(key.clone(), ResourceDoc::new(resource));
    }
    Ok(())
}

fn read_graph(req: &RunFunctionRequest) -> Result<ResourceGraph, FunctionError> {
    Ok(ResourceGraph {
        composite_desired: req
            .desired_composite()
            .context("cannot get desired composite")?,
        composite_observed: req
            .observed_composite()
            .context("cannot get observed composite")?,
        composed_observed: req
            .observed_composed()
            .context("cannot get observed resources")?,
        composed_desired: req
            .desired_composed()
            .context("cannot get desired composed resources")?,
        required: req.required().context("cannot get required resources")?,
    })
}
