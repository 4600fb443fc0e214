//! Guard record names and response keys
//!
//! Guard names are `<kind>-<name>-<hash>-fn-protection`, lowercased, where
//! `<hash>` is the first six hex characters of a SHA-256 digest over the
//! target identity. The same identity always yields the same name.

use fn_protection_core::TargetResource;
use sha2::{Digest, Sha256};

/// Suffix of every generated guard name
pub const USAGE_NAME_SUFFIX: &str = "fn-protection";

/// Hex characters kept from the identity digest
const HASH_LEN: usize = 6;

/// Derive the guard name for a target identity
///
/// Cluster-scoped identities hash `<kind>-<name>`; namespaced ones append
/// `/<namespace>` so equal names in different namespaces stay distinct.
pub fn derive_name(kind: &str, name: &str, namespace: Option<&str>) -> String {
    let base = format!("{}-{}", kind, name).to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(base.as_bytes());
    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        hasher.update(b"/");
        hasher.update(ns.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());

    format!("{}-{}-{}", base, &digest[..HASH_LEN], USAGE_NAME_SUFFIX)
}

/// Response key for the guard of a composed resource
pub fn composed_key(key: &str) -> String {
    format!("{}-usage", key)
}

/// Response key for the guard of the composite
pub fn composite_key(composite_name: &str) -> String {
    format!("xr-{}-usage", composite_name).to_lowercase()
}

/// Response key for the guard of a required resource
pub fn required_key(target: &TargetResource) -> String {
    format!(
        "{}-{}-{}-required-resource-{}",
        target.kind,
        target.name,
        target.namespace.as_deref().unwrap_or_default(),
        USAGE_NAME_SUFFIX
    )
}
