//! Guard record synthesis
//!
//! A guard record is the Usage that blocks deletion of its target. Records
//! are built in two steps: [`synthesize`] resolves name, scope and schema
//! into a typed [`GuardRecord`], and [`GuardRecord::to_object`] renders the
//! resource document handed back to the host:
//!
//! ```yaml
//! apiVersion: protection.crossplane.io/v1beta1
//! kind: Usage
//! metadata:
//!   name: testcomposed-my-test-composed-80b1f8-fn-protection
//!   namespace: test
//! spec:
//!   of:
//!     apiVersion: test.crossplane.io/v1
//!     kind: TestComposed
//!     resourceRef:
//!       name: my-test-composed
//!   reason: created by function-deletion-protection via label ...
//! ```

use fn_protection_core::TargetResource;
use kube::core::{ApiResource, DynamicObject};
use serde::Serialize;
use serde_json::json;

use crate::error::{EngineError, Result};
use crate::naming::derive_name;
use crate::reason::Reason;
use crate::schema::SchemaMode;
use crate::scope::{Scope, resolve_scope};

/// A synthesized protection entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardRecord {
    pub schema: SchemaMode,
    pub scope: Scope,
    pub name: String,
    /// Set iff `scope` is [`Scope::Namespaced`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub of_api_version: String,
    pub of_kind: String,
    pub of_name: String,
    pub reason: Reason,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageSpec<'a> {
    of: UsageOf<'a>,
    reason: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageOf<'a> {
    api_version: &'a str,
    kind: &'a str,
    resource_ref: ResourceRef<'a>,
}

#[derive(Serialize)]
struct ResourceRef<'a> {
    name: &'a str,
}

/// Build the guard record protecting `target`
///
/// Fails when the target lacks the identity a Usage needs to reference it.
pub fn synthesize(target: &TargetResource, reason: Reason, mode: SchemaMode) -> Result<GuardRecord> {
    for (field, value) in [
        ("apiVersion", &target.api_version),
        ("kind", &target.kind),
        ("name", &target.name),
    ] {
        if value.is_empty() {
            return Err(EngineError::IncompleteTarget {
                target: target.to_string(),
                field,
            });
        }
    }

    let resolved = resolve_scope(target);

    Ok(GuardRecord {
        schema: mode,
        scope: resolved.scope,
        name: derive_name(&target.kind, &target.name, resolved.namespace.as_deref()),
        namespace: resolved.namespace,
        of_api_version: target.api_version.clone(),
        of_kind: target.kind.clone(),
        of_name: target.name.clone(),
        reason,
    })
}

impl GuardRecord {
    pub fn api_version(&self) -> String {
        self.schema.descriptor().api_version()
    }

    pub fn kind(&self) -> &'static str {
        self.schema.descriptor().kind_for(self.scope)
    }

    /// Render the record as a resource document
    pub fn to_object(&self) -> Result<DynamicObject> {
        let resource = ApiResource::from_gvk(&self.schema.descriptor().gvk(self.scope));

        let spec = serde_json::to_value(UsageSpec {
            of: UsageOf {
                api_version: &self.of_api_version,
                kind: &self.of_kind,
                resource_ref: ResourceRef { name: &self.of_name },
            },
            reason: self.reason.message(),
        })
        .map_err(|e| EngineError::Conversion {
            target: format!("{}/{}", self.of_kind, self.of_name),
            message: e.to_string(),
        })?;

        let mut object = DynamicObject::new(&self.name, &resource).data(json!({ "spec": spec }));
        object.metadata.namespace = self.namespace.clone();

        Ok(object)
    }
}
