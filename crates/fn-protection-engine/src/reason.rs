//! Why a guard record was created

use serde::{Deserialize, Serialize};
use std::fmt;

/// The trigger path that led to a guard record
///
/// The message of each variant ends up in `spec.reason` of the Usage and is
/// matched by downstream tooling, so the wording must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    /// The resource carries the block-deletion label
    LabelTriggered,
    /// The composite is protected because one of its composed resources is
    ChildResourceTriggered,
    /// A labeled resource required by an Operation
    OperationTriggered,
    /// A resource watched by a WatchOperation
    WatchTriggered,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LabelTriggered => {
                "created by function-deletion-protection via label protection.fn.crossplane.io/block-deletion"
            }
            Self::ChildResourceTriggered => {
                "created by function-deletion-protection because a composed resource is protected"
            }
            Self::OperationTriggered => "created by function-deletion-protection by an Operation",
            Self::WatchTriggered => "created by function-deletion-protection by a WatchOperation",
        }
    }

    /// Short name, as used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabelTriggered => "label-triggered",
            Self::ChildResourceTriggered => "child-resource-triggered",
            Self::OperationTriggered => "operation-triggered",
            Self::WatchTriggered => "watch-triggered",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
