//! Response document returned to the host

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::request::{RunFunctionRequest, State};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFunctionResponse {
    pub meta: ResponseMeta,

    #[serde(default, skip_serializing_if = "State::is_empty")]
    pub desired: State,

    #[serde(default)]
    pub results: Vec<FunctionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub tag: String,

    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "SEVERITY_FATAL")]
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "TARGET_COMPOSITE")]
    Composite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
}

impl RunFunctionResponse {
    /// Start a response for a request: the tag is echoed and the desired
    /// state is carried over unchanged
    pub fn to(req: &RunFunctionRequest, ttl: Duration) -> Self {
        Self {
            meta: ResponseMeta {
                tag: req.meta.tag.clone(),
                ttl,
            },
            desired: req.desired.clone(),
            results: Vec::new(),
        }
    }

    /// Record a fatal result against the composite
    ///
    /// The desired state is dropped so that no partial work reaches the host.
    pub fn fatal(&mut self, message: impl Into<String>) {
        self.desired = State::default();
        self.results.push(FunctionResult {
            severity: Severity::Fatal,
            message: message.into(),
            target: Some(Target::Composite),
        });
    }

    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Fatal)
    }

    /// Message of the first fatal result, if any
    pub fn fatal_message(&self) -> Option<&str> {
        self.results
            .iter()
            .find(|r| r.severity == Severity::Fatal)
            .map(|r| r.message.as_str())
    }
}
