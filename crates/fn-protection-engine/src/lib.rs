//! fn-protection engine - deletion protection decisions for composite resources
//!
//! This crate provides:
//! - **Labels**: Detect the block-deletion label on a resource
//! - **Naming**: Deterministic guard names and response keys
//! - **Scope**: Cluster-scoped vs namespaced guard selection
//! - **Schema**: Current (`protection.crossplane.io`) vs legacy (`apiextensions.crossplane.io`) Usages
//! - **Record**: Guard record synthesis and conversion to a wire document
//! - **Orchestrator**: The protection pass over a resource graph, including
//!   the composed-to-composite cascade and required resources

pub mod error;
pub mod labels;
pub mod naming;
pub mod orchestrator;
pub mod reason;
pub mod record;
pub mod schema;
pub mod scope;

pub use error::{EngineError, Result};
pub use labels::{BLOCK_DELETION_LABEL, is_protected};
pub use naming::{USAGE_NAME_SUFFIX, composed_key, composite_key, derive_name, required_key};
pub use orchestrator::{
    Phase, ProtectionDecision, ProtectionEngine, ProtectionOutcome, WATCHED_RESOURCE_GROUP,
};
pub use reason::Reason;
pub use record::{GuardRecord, synthesize};
pub use schema::{CURRENT_SCHEMA, LEGACY_SCHEMA, SchemaDescriptor, SchemaMode, select_schema};
pub use scope::{ResolvedScope, Scope, resolve_scope};
