use std::cmp::Ordering;
use std::sync::Arc;

use domain_pricing::{PricingRepository, Region};
use serde::Serialize;
use tracing::debug;

use crate::calculators::{DEFAULT_HOURS_PER_MONTH, PricingContext, calculate_with};
use crate::catalog::{ServiceConfig, ServiceType};
use crate::lifecycle::Project;
use crate::models::{CostBreakdown, ResourceConfig, ResourceId};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Sum of the monthly totals of `breakdowns`
pub fn project_total(breakdowns: &[CostBreakdown]) -> f64 {
    breakdowns.iter().map(|breakdown| breakdown.monthly_total).sum()
}

/// Project a monthly figure to a year. Calculators are never re-run with a
/// yearly time base.
pub fn annualize(monthly: f64) -> f64 {
    monthly * MONTHS_PER_YEAR
}

/// Breakdown of one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceEstimate {
    pub id: ResourceId,
    pub name: String,
    /// `None` for a configuration of an unrecognized service type
    pub service_type: Option<ServiceType>,
    pub breakdown: CostBreakdown,
}

impl ResourceEstimate {
    pub fn monthly_total(&self) -> f64 {
        self.breakdown.monthly_total
    }

    pub fn annual_total(&self) -> f64 {
        self.breakdown.annual_total()
    }
}

/// Estimate of every committed resource of a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectEstimate {
    pub region: Region,
    pub resources: Vec<ResourceEstimate>,
    pub monthly_total: f64,
    /// Prices came from static defaults because the artifact failed to load
    pub degraded: bool,
}

impl ProjectEstimate {
    pub fn annual_total(&self) -> f64 {
        annualize(self.monthly_total)
    }

    /// The `n` most expensive resources; equal totals keep insertion order
    pub fn top_cost_drivers(&self, n: usize) -> Vec<&ResourceEstimate> {
        let mut resources: Vec<&ResourceEstimate> = self.resources.iter().collect();
        resources.sort_by(|a, b| {
            b.monthly_total()
                .partial_cmp(&a.monthly_total())
                .unwrap_or(Ordering::Equal)
        });
        resources.truncate(n);
        resources
    }
}

/// Prices project resources against a shared pricing repository
#[derive(Debug, Clone)]
pub struct Estimator {
    repository: Arc<PricingRepository>,
    hours_per_month: f64,
}

impl Estimator {
    pub fn new(repository: Arc<PricingRepository>) -> Self {
        Self {
            repository,
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
        }
    }

    /// Override the monthly hours; non-positive values are ignored
    pub fn with_hours_per_month(mut self, hours: f64) -> Self {
        if hours.is_finite() && hours > 0.0 {
            self.hours_per_month = hours;
        }
        self
    }

    pub fn repository(&self) -> &PricingRepository {
        &self.repository
    }

    fn context(&self, region: Region) -> PricingContext<'_> {
        PricingContext::new(&self.repository, region).with_hours_per_month(self.hours_per_month)
    }

    pub fn estimate_service(&self, service: &ServiceConfig, region: Region) -> CostBreakdown {
        calculate_with(service, &self.context(region))
    }

    /// Breakdown of the draft, empty until a service type is selected
    pub fn estimate_draft(&self, project: &Project) -> CostBreakdown {
        project
            .draft()
            .service
            .as_ref()
            .map(|service| self.estimate_service(service, project.region()))
            .unwrap_or_default()
    }

    /// Price a committed resource in `region`, which is normally the
    /// project's active region rather than the one stored on the resource
    pub fn estimate_resource(&self, resource: &ResourceConfig, region: Region) -> ResourceEstimate {
        ResourceEstimate {
            id: resource.id,
            name: resource.name.clone(),
            service_type: resource.service_type(),
            breakdown: self.estimate_service(&resource.service, region),
        }
    }

    pub fn estimate_project(&self, project: &Project) -> ProjectEstimate {
        let region = project.region();
        let resources: Vec<ResourceEstimate> = project
            .resources()
            .iter()
            .map(|resource| self.estimate_resource(resource, region))
            .collect();
        let monthly_total = resources.iter().map(ResourceEstimate::monthly_total).sum();

        debug!(
            region = %region,
            resources = resources.len(),
            monthly_total,
            "Estimated project"
        );

        ProjectEstimate {
            region,
            resources,
            monthly_total,
            degraded: self.repository.is_degraded(),
        }
    }
}
