//! The per-invocation resource graph

use indexmap::IndexMap;

use crate::resource::TargetResource;

/// Everything one invocation knows about: the composite (parent), its
/// composed resources (children) and resources surfaced by an external
/// trigger, grouped by requirement name.
///
/// Composed maps are keyed by the caller's local resource key. Map order is
/// the caller's order and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    pub composite_desired: Option<TargetResource>,
    pub composite_observed: Option<TargetResource>,
    pub composed_desired: IndexMap<String, TargetResource>,
    pub composed_observed: IndexMap<String, TargetResource>,
    pub required: IndexMap<String, Vec<TargetResource>>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_composite_desired(mut self, resource: TargetResource) -> Self {
        self.composite_desired = Some(resource);
        self
    }

    pub fn with_composite_observed(mut self, resource: TargetResource) -> Self {
        self.composite_observed = Some(resource);
        self
    }

    pub fn with_desired_composed(mut self, key: impl Into<String>, resource: TargetResource) -> Self {
        self.composed_desired.insert(key.into(), resource);
        self
    }

    pub fn with_observed_composed(mut self, key: impl Into<String>, resource: TargetResource) -> Self {
        self.composed_observed.insert(key.into(), resource);
        self
    }

    /// Add a resource to a requirement group, creating the group if needed
    pub fn with_required(mut self, group: impl Into<String>, resource: TargetResource) -> Self {
        self.required.entry(group.into()).or_default().push(resource);
        self
    }

    /// Composed resources present in both the desired and observed sets,
    /// as `(key, desired, observed)`
    pub fn composed_pairs(
        &self,
    ) -> impl Iterator<Item = (&String, &TargetResource, &TargetResource)> {
        self.composed_desired.iter().filter_map(|(key, desired)| {
            self.composed_observed
                .get(key)
                .map(|observed| (key, desired, observed))
        })
    }

    /// Whether the graph holds nothing at all
    pub fn is_empty(&self) -> bool {
        self.composite_desired.is_none()
            && self.composite_observed.is_none()
            && self.composed_desired.is_empty()
            && self.composed_observed.is_empty()
            && self.required.is_empty()
    }
}
