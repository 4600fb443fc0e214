//! Typed view of the resources a guard record can reference
//!
//! Resource documents arrive as arbitrary JSON objects. Only the fields the
//! protection decision needs are lifted into [`TargetResource`]; everything
//! else (spec, status, annotations...) stays in the original document.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, Result};

/// A resource that may be guarded against deletion
///
/// Identity is `(kind, namespace, name)`. An absent namespace means the
/// resource is cluster-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResource {
    pub api_version: String,
    pub kind: String,
    /// Empty for desired resources that have not been named yet
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// The parts of a resource document we read
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestHeader {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
}

impl TargetResource {
    /// Create a cluster-scoped resource without labels
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
            namespace: None,
            labels: None,
        }
    }

    /// Place the resource in a namespace (empty means cluster-scoped)
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Read a resource from its JSON document
    ///
    /// `apiVersion` and `kind` are required. A missing `metadata.name` is
    /// tolerated because desired resources are often unnamed until created.
    pub fn from_manifest(doc: &Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(CoreError::InvalidResource {
                message: format!("expected an object, found {}", json_type(doc)),
            });
        }

        let header = ManifestHeader::deserialize(doc)?;

        let api_version = header
            .api_version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CoreError::MissingField {
                field: "apiVersion".to_string(),
            })?;
        let kind = header
            .kind
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CoreError::MissingField {
                field: "kind".to_string(),
            })?;

        Ok(Self {
            api_version,
            kind,
            name: header.metadata.name.unwrap_or_default(),
            namespace: header.metadata.namespace.filter(|ns| !ns.is_empty()),
            labels: header.metadata.labels,
        })
    }

    /// Look up a label value
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(key))
            .map(String::as_str)
    }
}

impl fmt::Display for TargetResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_manifest_reads_identity_and_labels() {
        let doc = json!({
            "apiVersion": "test.crossplane.io/v1",
            "kind": "TestComposed",
            "metadata": {
                "name": "my-test-composed",
                "namespace": "test",
                "labels": {"team": "storage"}
            },
            "spec": {"forProvider": {}},
            "status": {"conditions": []}
        });

        let resource = TargetResource::from_manifest(&doc).unwrap();
        assert_eq!(resource.api_version, "test.crossplane.io/v1");
        assert_eq!(resource.kind, "TestComposed");
        assert_eq!(resource.name, "my-test-composed");
        assert_eq!(resource.namespace.as_deref(), Some("test"));
        assert_eq!(resource.label("team"), Some("storage"));
    }

    #[test]
    fn test_from_manifest_empty_namespace_is_cluster_scoped() {
        let doc = json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": {"name": "prod", "namespace": ""}
        });

        let resource = TargetResource::from_manifest(&doc).unwrap();
        assert_eq!(resource.namespace, None);
        assert!(resource.labels.is_none());
    }

    #[test]
    fn test_from_manifest_tolerates_missing_name() {
        let doc = json!({"apiVersion": "test.crossplane.io/v1", "kind": "TestComposed"});

        let resource = TargetResource::from_manifest(&doc).unwrap();
        assert_eq!(resource.name, "");
    }

    #[test]
    fn test_from_manifest_requires_kind() {
        let doc = json!({"apiVersion": "test.crossplane.io/v1", "metadata": {"name": "x"}});

        let err = TargetResource::from_manifest(&doc).unwrap_err();
        assert!(matches!(err, CoreError::MissingField { ref field } if field == "kind"));
    }

    #[test]
    fn test_from_manifest_rejects_non_object() {
        let err = TargetResource::from_manifest(&json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("found array"));
    }

    #[test]
    fn test_builder_and_display() {
        let resource = TargetResource::new("v1", "ConfigMap", "settings")
            .in_namespace("apps")
            .with_label("protection.fn.crossplane.io/block-deletion", "true");

        assert_eq!(resource.to_string(), "ConfigMap/apps/settings");
        assert_eq!(
            resource.label("protection.fn.crossplane.io/block-deletion"),
            Some("true")
        );

        let cluster = TargetResource::new("v1", "Namespace", "apps").in_namespace("");
        assert_eq!(cluster.to_string(), "Namespace/apps");
        assert_eq!(cluster.namespace, None);
    }
}
