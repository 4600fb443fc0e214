//! Request document delivered by the host
//!
//! The shape follows the function runner wire format (camelCase JSON, or
//! YAML). Resource documents are kept as raw JSON so that anything the
//! function does not understand is passed back untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::Result;
use crate::input::FunctionInput;
use crate::resource::TargetResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFunctionRequest {
    #[serde(default)]
    pub meta: RequestMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,

    #[serde(default)]
    pub observed: State,

    #[serde(default)]
    pub desired: State,

    /// Resources fetched for the function, keyed by requirement name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub required_resources: IndexMap<String, RequiredResources>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

/// Observed or desired state: the composite plus its composed resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<ResourceDoc>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, ResourceDoc>,
}

/// A resource document plus whatever else the host attached to it
/// (connection details, readiness...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDoc {
    #[serde(default)]
    pub resource: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequiredResources {
    #[serde(default)]
    pub items: Vec<ResourceDoc>,
}

impl State {
    pub fn is_empty(&self) -> bool {
        self.composite.is_none() && self.resources.is_empty()
    }
}

impl ResourceDoc {
    pub fn new(resource: Value) -> Self {
        Self {
            resource,
            extra: Map::new(),
        }
    }

    pub fn target(&self) -> Result<TargetResource> {
        TargetResource::from_manifest(&self.resource)
    }
}

impl RunFunctionRequest {
    /// Parse a request from YAML or JSON text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a request from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Decode the function input, defaulting when none was supplied
    pub fn input(&self) -> Result<FunctionInput> {
        match &self.input {
            None | Some(Value::Null) => Ok(FunctionInput::default()),
            Some(value) => Ok(FunctionInput::deserialize(value)?),
        }
    }

    pub fn desired_composite(&self) -> Result<Option<TargetResource>> {
        composite(&self.desired)
    }

    pub fn observed_composite(&self) -> Result<Option<TargetResource>> {
        composite(&self.observed)
    }

    pub fn desired_composed(&self) -> Result<IndexMap<String, TargetResource>> {
        composed(&self.desired)
    }

    pub fn observed_composed(&self) -> Result<IndexMap<String, TargetResource>> {
        composed(&self.observed)
    }

    pub fn required(&self) -> Result<IndexMap<String, Vec<TargetResource>>> {
        self.required_resources
            .iter()
            .map(|(group, resources)| {
                let targets = resources
                    .items
                    .iter()
                    .map(ResourceDoc::target)
                    .collect::<Result<Vec<_>>>()?;
                Ok((group.clone(), targets))
            })
            .collect()
    }
}

fn composite(state: &State) -> Result<Option<TargetResource>> {
    state.composite.as_ref().map(ResourceDoc::target).transpose()
}

fn composed(state: &State) -> Result<IndexMap<String, TargetResource>> {
    state
        .resources
        .iter()
        .map(|(key, doc)| Ok((key.clone(), doc.target()?)))
        .collect()
}
