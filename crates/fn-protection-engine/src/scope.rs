//! Guard record scope

use fn_protection_core::TargetResource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a guard record is cluster-wide or lives in a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Cluster,
    Namespaced,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => write!(f, "cluster"),
            Self::Namespaced => write!(f, "namespaced"),
        }
    }
}

/// Scope of a guard record plus the namespace it must be created in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    pub scope: Scope,
    /// Set iff `scope` is [`Scope::Namespaced`]
    pub namespace: Option<String>,
}

/// Guards follow their target: a namespaced target gets a namespaced guard
/// in the same namespace, anything else a cluster-scoped one.
pub fn resolve_scope(target: &TargetResource) -> ResolvedScope {
    match target.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => ResolvedScope {
            scope: Scope::Namespaced,
            namespace: Some(ns.to_string()),
        },
        _ => ResolvedScope {
            scope: Scope::Cluster,
            namespace: None,
        },
    }
}
