use domain_pricing::Region;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{ServiceConfig, ServiceType};
use crate::error::{EstimationError, EstimationResult};
use crate::models::{Draft, ResourceConfig, ResourceId};

/// A project: the active region, the committed resources in insertion order
/// and exactly one draft.
///
/// All mutation goes through these methods. Every change replaces the draft or
/// a list entry as a whole value, so an estimate computed between calls always
/// sees a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    region: Region,
    draft: Draft,
    resources: Vec<ResourceConfig>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

impl Project {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            draft: Draft::empty(region),
            resources: Vec::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn resources(&self) -> &[ResourceConfig] {
        &self.resources
    }

    pub fn resource(&self, id: Uuid) -> Option<&ResourceConfig> {
        self.resources.iter().find(|resource| resource.id.value == id)
    }

    /// Number of committed resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Switch the active region. Configurations are left as they are; only
    /// the prices they resolve against change.
    pub fn set_region(&mut self, region: Region) {
        if region != self.region {
            debug!(from = %self.region, to = %region, "Switching active region");
            self.region = region;
        }
    }

    /// Reset the draft to the defaults of `service_type`.
    ///
    /// Selecting the type the draft already has does nothing.
    pub fn select_service_type(&mut self, service_type: ServiceType) {
        if self.draft.service_type() == Some(service_type) {
            return;
        }

        let draft = Draft {
            id: ResourceId::ephemeral(),
            name: service_type.default_name().to_string(),
            region: self.region,
            service: Some(ServiceConfig::defaults(service_type)),
        };
        debug!(draft_id = %draft.id, service_type = %service_type, "Selected service type");
        self.draft = draft;
    }

    pub fn rename_draft(&mut self, name: impl Into<String>) {
        self.draft = Draft {
            name: name.into(),
            ..self.draft.clone()
        };
    }

    /// Replace the draft's attributes with a complete configuration of the
    /// same service type
    pub fn replace_draft_service(&mut self, service: ServiceConfig) -> EstimationResult<()> {
        let expected = self
            .draft
            .service_type()
            .ok_or(EstimationError::NoServiceSelected)?;

        if service.service_type() != Some(expected) {
            return Err(EstimationError::ServiceTypeMismatch {
                expected,
                found: service
                    .service_type()
                    .map(|found| found.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }

        self.draft = Draft {
            service: Some(service),
            ..self.draft.clone()
        };
        Ok(())
    }

    /// Append the draft to the committed list and start a fresh draft.
    ///
    /// A draft restored with [`edit`](Self::edit) keeps its permanent id.
    pub fn commit(&mut self) -> EstimationResult<ResourceId> {
        let Some(service) = self.draft.service.clone() else {
            return Err(EstimationError::NothingToCommit);
        };

        let id = if self.draft.id.is_permanent() {
            self.draft.id
        } else {
            ResourceId::permanent()
        };

        let resource = ResourceConfig {
            id,
            name: self.draft.name.clone(),
            region: self.draft.region,
            service,
        };
        debug!(
            resource_id = %id,
            name = %resource.name,
            service_type = ?resource.service_type(),
            "Committed resource"
        );

        self.resources.push(resource);
        self.draft = Draft::empty(self.region);
        Ok(id)
    }

    /// Move a committed resource back into the draft. The previous draft is
    /// discarded.
    pub fn edit(&mut self, id: Uuid) -> EstimationResult<()> {
        let resource = self.take(id)?;
        debug!(resource_id = %resource.id, "Editing resource");

        self.draft = Draft {
            id: resource.id,
            name: resource.name,
            region: resource.region,
            service: Some(resource.service),
        };
        Ok(())
    }

    /// Delete a committed resource. The draft is not affected.
    pub fn remove(&mut self, id: Uuid) -> EstimationResult<ResourceConfig> {
        let resource = self.take(id)?;
        debug!(resource_id = %resource.id, "Removed resource");
        Ok(resource)
    }

    fn take(&mut self, id: Uuid) -> EstimationResult<ResourceConfig> {
        let index = self
            .resources
            .iter()
            .position(|resource| resource.id.value == id)
            .ok_or(EstimationError::ResourceNotFound(id))?;
        Ok(self.resources.remove(index))
    }
}
