//! The protection pass over a resource graph
//!
//! Runs in three ordered phases, then aggregates:
//!
//! 1. **Composed resources**: every composed resource that has been observed
//!    and carries the block-deletion label (on its desired or observed copy)
//!    gets a guard built from the observed copy.
//! 2. **Composite**: the composite is protected when it is labeled itself or
//!    when phase 1 protected at least one composed resource. The latter
//!    always reports the cascade reason, even if the composite is labeled.
//! 3. **Required resources**: members of the watched-resource group are
//!    always protected; members of any other group only when labeled.
//!
//! Phase 1 must complete before phase 2 looks at the count. Decisions do not
//! depend on map order: keys are visited sorted and results are keyed maps.

use fn_protection_core::{ResourceGraph, TargetResource};
use kube::core::DynamicObject;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::labels::is_protected;
use crate::naming::{composed_key, composite_key, required_key};
use crate::reason::Reason;
use crate::record::{GuardRecord, synthesize};
use crate::schema::SchemaMode;

/// Requirement group whose members are protected unconditionally
pub const WATCHED_RESOURCE_GROUP: &str = "ops.crossplane.io/watched-resource";

/// Which pass produced a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Composed,
    Composite,
    Required,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Composed => write!(f, "composed"),
            Self::Composite => write!(f, "composite"),
            Self::Required => write!(f, "required"),
        }
    }
}

/// One protected resource and the guard created for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionDecision {
    /// Key the guard is stored under in the response
    pub key: String,
    pub phase: Phase,
    pub record: GuardRecord,
}

/// Result of a protection pass
#[derive(Debug, Clone, Default)]
pub struct ProtectionOutcome {
    /// Guards to add to the desired composed resources (phases 1 and 2)
    pub composed_guards: BTreeMap<String, DynamicObject>,
    /// Guards for required resources (phase 3)
    pub required_guards: BTreeMap<String, DynamicObject>,
    /// Every guard created, in phase order
    pub decisions: Vec<ProtectionDecision>,
    pub protected_count: usize,
}

impl ProtectionOutcome {
    /// All guards keyed by response key
    pub fn guards(&self) -> impl Iterator<Item = (&String, &DynamicObject)> {
        self.composed_guards.iter().chain(self.required_guards.iter())
    }

    /// Decisions produced by a single phase
    pub fn decisions_for(&self, phase: Phase) -> impl Iterator<Item = &ProtectionDecision> {
        self.decisions.iter().filter(move |d| d.phase == phase)
    }

    pub fn is_empty(&self) -> bool {
        self.protected_count == 0
    }
}

/// Decides which resources of a graph need a guard and builds the guards
///
/// Stateless: the same graph and schema mode always produce the same outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectionEngine {
    mode: SchemaMode,
}

impl ProtectionEngine {
    pub fn new(mode: SchemaMode) -> Self {
        Self { mode }
    }

    /// Engine for the `enableV1Mode` input flag
    pub fn from_legacy_flag(legacy_mode_enabled: bool) -> Self {
        Self::new(SchemaMode::from_legacy_flag(legacy_mode_enabled))
    }

    /// Run every phase over the graph
    ///
    /// Any synthesis failure aborts the whole pass.
    pub fn run(&self, graph: &ResourceGraph) -> Result<ProtectionOutcome> {
        let mut outcome = ProtectionOutcome::default();

        self.protect_composed(graph, &mut outcome)?;
        self.protect_composite(graph, &mut outcome)?;
        self.protect_required(graph, &mut outcome)?;

        debug!(total = outcome.protected_count, "usages created");
        Ok(outcome)
    }

    fn protect_composed(&self, graph: &ResourceGraph, outcome: &mut ProtectionOutcome) -> Result<()> {
        // Only resources that exist on the cluster can be protected
        let mut pairs: Vec<_> = graph.composed_pairs().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        for (key, desired, observed) in pairs {
            // The label may come from the pipeline or be applied outside of it
            if !(is_protected(Some(desired)) || is_protected(Some(observed))) {
                continue;
            }

            debug!(
                kind = %observed.kind,
                name = %observed.name,
                namespace = observed.namespace.as_deref().unwrap_or_default(),
                "protecting composed resource"
            );

            let guard_key = claim_key(graph, outcome, composed_key(key))?;
            let (guard_key, object) =
                self.guard(outcome, Phase::Composed, guard_key, observed, Reason::LabelTriggered)?;
            outcome.composed_guards.insert(guard_key, object);
        }

        Ok(())
    }

    fn protect_composite(&self, graph: &ResourceGraph, outcome: &mut ProtectionOutcome) -> Result<()> {
        let children = outcome.protected_count;
        let labeled = is_protected(graph.composite_observed.as_ref())
            || is_protected(graph.composite_desired.as_ref());

        if !labeled && children == 0 {
            return Ok(());
        }

        let Some(observed) = graph.composite_observed.as_ref() else {
            debug!("composite is protected but has not been observed yet");
            return Ok(());
        };

        // A protected child always wins, even over the composite's own label
        let reason = if children > 0 {
            Reason::ChildResourceTriggered
        } else {
            Reason::LabelTriggered
        };

        debug!(
            kind = %observed.kind,
            name = %observed.name,
            namespace = observed.namespace.as_deref().unwrap_or_default(),
            %reason,
            "protecting composite"
        );

        let guard_key = claim_key(graph, outcome, composite_key(&observed.name))?;
        let (guard_key, object) =
            self.guard(outcome, Phase::Composite, guard_key, observed, reason)?;
        outcome.composed_guards.insert(guard_key, object);

        Ok(())
    }

    fn protect_required(&self, graph: &ResourceGraph, outcome: &mut ProtectionOutcome) -> Result<()> {
        if graph.required.is_empty() {
            return Ok(());
        }
        debug!(groups = graph.required.len(), "processing required resources");

        // A resource can be surfaced by several groups; keep one guard and
        // let the watch reason win so group order does not matter.
        let mut pending: BTreeMap<String, (&TargetResource, Reason)> = BTreeMap::new();

        for (group, resources) in &graph.required {
            let watched = group == WATCHED_RESOURCE_GROUP;

            for resource in resources {
                if !watched && !is_protected(Some(resource)) {
                    continue;
                }

                let reason = if watched {
                    Reason::WatchTriggered
                } else {
                    Reason::OperationTriggered
                };

                match pending.entry(required_key(resource)) {
                    Entry::Vacant(entry) => {
                        entry.insert((resource, reason));
                    }
                    Entry::Occupied(mut entry) => {
                        if reason == Reason::WatchTriggered {
                            entry.insert((resource, reason));
                        }
                    }
                }
            }
        }

        for (key, (resource, reason)) in pending {
            debug!(%resource, %reason, "protecting required resource");
            let guard_key = claim_key(graph, outcome, key)?;
            let (guard_key, object) =
                self.guard(outcome, Phase::Required, guard_key, resource, reason)?;
            outcome.required_guards.insert(guard_key, object);
        }

        Ok(())
    }

    /// Synthesize and render one guard, recording the decision
    fn guard(
        &self,
        outcome: &mut ProtectionOutcome,
        phase: Phase,
        key: String,
        target: &TargetResource,
        reason: Reason,
    ) -> Result<(String, DynamicObject)> {
        let record = synthesize(target, reason, self.mode)?;
        let object = record.to_object()?;

        debug!(
            kind = record.kind(),
            name = %record.name,
            namespace = record.namespace.as_deref().unwrap_or_default(),
            "created usage"
        );

        outcome.protected_count += 1;
        outcome.decisions.push(ProtectionDecision {
            key: key.clone(),
            phase,
            record,
        });

        Ok((key, object))
    }
}

/// Make sure a guard key is free before a guard is stored under it
///
/// Desired resources are never replaced and guards never shadow each other.
fn claim_key(graph: &ResourceGraph, outcome: &ProtectionOutcome, key: String) -> Result<String> {
    if graph.composed_desired.contains_key(&key)
        || outcome.composed_guards.contains_key(&key)
        || outcome.required_guards.contains_key(&key)
    {
        return Err(EngineError::KeyCollision { key });
    }
    Ok(key)
}
