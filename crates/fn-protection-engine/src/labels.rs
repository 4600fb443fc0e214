//! Block-deletion label detection

use fn_protection_core::TargetResource;

/// Label that opts a resource into deletion protection
pub const BLOCK_DELETION_LABEL: &str = "protection.fn.crossplane.io/block-deletion";

/// Whether a resource asks to be protected
///
/// Only the value "true" (any case) enables protection. Absent resources,
/// resources without labels and any other value do not.
pub fn is_protected(resource: Option<&TargetResource>) -> bool {
    resource
        .and_then(|r| r.label(BLOCK_DELETION_LABEL))
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}
