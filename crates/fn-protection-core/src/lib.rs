//! fn-protection core - shared types for the deletion protection function
//!
//! This crate provides the foundational types used throughout fn-protection:
//! - `TargetResource`: Typed view of a resource a guard can reference
//! - `ResourceGraph`: The composite, composed and required resources of one invocation
//! - `FunctionInput`: Function configuration (cache TTL, legacy mode)
//! - `RunFunctionRequest` / `RunFunctionResponse`: The documents exchanged with the host

pub mod error;
pub mod graph;
pub mod input;
pub mod request;
pub mod resource;
pub mod response;

pub use error::{CoreError, Result};
pub use graph::ResourceGraph;
pub use input::{DEFAULT_TTL, FunctionInput, parse_cache_ttl};
pub use request::{RequestMeta, RequiredResources, ResourceDoc, RunFunctionRequest, State};
pub use resource::TargetResource;
pub use response::{FunctionResult, ResponseMeta, RunFunctionResponse, Severity, Target};
