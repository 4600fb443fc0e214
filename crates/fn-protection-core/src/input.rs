//! Function input
//!
//! The input document is supplied by the pipeline step that runs the
//! function:
//!
//! ```yaml
//! apiVersion: protection.fn.crossplane.io/v1beta1
//! kind: Input
//! cacheTTL: 5m
//! enableV1Mode: false
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, Result};

/// TTL reported in the response when the input does not set one
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// How long the host may cache the response (e.g. "5m", "90s")
    #[serde(rename = "cacheTTL", default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<String>,

    /// Emit legacy `apiextensions.crossplane.io` Usages instead of
    /// `protection.crossplane.io` ones
    #[serde(default)]
    pub enable_v1_mode: bool,
}

impl FunctionInput {
    /// Resolve the response TTL, falling back to [`DEFAULT_TTL`]
    pub fn response_ttl(&self) -> Result<Duration> {
        match self.cache_ttl.as_deref() {
            None | Some("") => Ok(DEFAULT_TTL),
            Some(value) => parse_cache_ttl(value),
        }
    }
}

/// Parse a cache TTL such as "5m", "300ms" or "1h30m"
///
/// A unit is mandatory except for "0".
pub fn parse_cache_ttl(value: &str) -> Result<Duration> {
    if value == "0" {
        return Ok(Duration::ZERO);
    }

    humantime::parse_duration(value).map_err(|e| CoreError::InvalidDuration {
        value: value.to_string(),
        message: e.to_string(),
    })
}
