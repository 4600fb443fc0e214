//! Guard record schemas
//!
//! Two structurally identical Usage schemas exist:
//!
//! - **current**: `protection.crossplane.io/v1beta1`, with `ClusterUsage`
//!   for cluster-scoped targets and `Usage` for namespaced ones
//! - **legacy**: `apiextensions.crossplane.io/v1beta1`, which only knows a
//!   single `Usage` kind used for both scopes
//!
//! The choice only affects `apiVersion` and `kind` of the emitted records.

use kube::core::GroupVersionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scope::Scope;

/// Which schema to emit guard records with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    #[default]
    Current,
    Legacy,
}

/// API group, version and kinds of a guard record schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub group: &'static str,
    pub version: &'static str,
    pub cluster_kind: &'static str,
    pub namespaced_kind: &'static str,
}

pub const CURRENT_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    group: "protection.crossplane.io",
    version: "v1beta1",
    cluster_kind: "ClusterUsage",
    namespaced_kind: "Usage",
};

pub const LEGACY_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    group: "apiextensions.crossplane.io",
    version: "v1beta1",
    cluster_kind: "Usage",
    namespaced_kind: "Usage",
};

/// Pick the schema for the legacy-mode flag
pub fn select_schema(legacy_mode_enabled: bool) -> &'static SchemaDescriptor {
    SchemaMode::from_legacy_flag(legacy_mode_enabled).descriptor()
}

impl SchemaMode {
    pub fn from_legacy_flag(enabled: bool) -> Self {
        if enabled { Self::Legacy } else { Self::Current }
    }

    pub fn descriptor(&self) -> &'static SchemaDescriptor {
        match self {
            Self::Current => &CURRENT_SCHEMA,
            Self::Legacy => &LEGACY_SCHEMA,
        }
    }
}

impl fmt::Display for SchemaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl SchemaDescriptor {
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    pub fn kind_for(&self, scope: Scope) -> &'static str {
        match scope {
            Scope::Cluster => self.cluster_kind,
            Scope::Namespaced => self.namespaced_kind,
        }
    }

    pub fn gvk(&self, scope: Scope) -> GroupVersionKind {
        GroupVersionKind::gvk(self.group, self.version, self.kind_for(scope))
    }
}
