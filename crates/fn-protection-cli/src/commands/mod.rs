//! CLI commands

pub mod inspect;
pub mod name;
pub mod render;

use fn_protection_core::{CoreError, RunFunctionRequest};
use std::path::Path;
use tracing::debug;

use crate::error::{CliError, Result};

/// Load a request document from disk
pub(crate) fn load_request(path: &Path) -> Result<RunFunctionRequest> {
    debug!(path = %path.display(), "loading request");

    RunFunctionRequest::from_file(path).map_err(|err| match err {
        CoreError::Io(e) => CliError::Io {
            message: format!("{}: {e}", path.display()),
        },
        other => CliError::request_with_help(
            format!("cannot parse {}: {other}", path.display()),
            "requests are YAML or JSON documents with meta, input, observed, desired and requiredResources",
        ),
    })
}
