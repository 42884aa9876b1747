//! Fleet — the live resources of one scheduling session plus the
//! catalog of classes new resources can be provisioned from.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{Resource, ResourceClass, ResourceId};

#[derive(Debug, Clone)]
pub struct Fleet {
    resources: Vec<Resource>,
    classes: Vec<ResourceClass>,
    /// Id handed to the next provisioned resource; `None` once
    /// `ResourceId::MAX` is taken.
    next_id: Option<ResourceId>,
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            classes: Vec::new(),
            next_id: Some(0),
        }
    }
}

impl Fleet {
    /// Build a fleet, rejecting duplicate resource ids.
    pub fn new(resources: Vec<Resource>, classes: Vec<ResourceClass>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for r in &resources {
            if !seen.insert(r.id) {
                return Err(CoreError::DuplicateResource(r.id));
            }
        }
        let next_id = match resources.iter().map(|r| r.id).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        };
        Ok(Self {
            resources,
            classes,
            next_id,
        })
    }

    /// A fleet with fixed resources and no class catalog.
    pub fn with_resources(resources: Vec<Resource>) -> CoreResult<Self> {
        Self::new(resources, Vec::new())
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Live resources, mutable in place. The set itself only grows
    /// through [`Fleet::provision`].
    pub fn resources_mut(&mut self) -> &mut [Resource] {
        &mut self.resources
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.id == id)
    }

    pub fn classes(&self) -> &[ResourceClass] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ResourceClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Make sure provisioned ids never collide with ids at or below `id`.
    ///
    /// Used when two fleets are merged into one roster.
    pub fn reserve_ids_through(&mut self, id: ResourceId) {
        self.next_id = match (self.next_id, id.checked_add(1)) {
            (Some(next), Some(above)) => Some(next.max(above)),
            _ => None,
        };
    }

    /// Id the next provisioned resource will receive, if any is left.
    pub fn next_id(&self) -> Option<ResourceId> {
        self.next_id
    }

    /// Instantiate a resource from the named class and append it to the
    /// live set. Fails when the class is unknown or exhausted, or when no
    /// resource id is left.
    pub fn provision(&mut self, class: &str) -> CoreResult<ResourceId> {
        let id = self.next_id.ok_or(CoreError::ResourceIdsExhausted)?;
        let template = self
            .classes
            .iter_mut()
            .find(|c| c.name == class)
            .ok_or_else(|| CoreError::UnknownClass(class.to_string()))?;
        let resource = template.instantiate(id)?;
        debug!(class, resource = id, speed = resource.speed, "provisioned resource");
        self.resources.push(resource);
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Sum of what every resource has been billed.
    pub fn total_cost(&self) -> f64 {
        self.resources.iter().map(|r| r.cost).sum()
    }

    pub fn into_resources(self) -> Vec<Resource> {
        self.resources
    }
}
