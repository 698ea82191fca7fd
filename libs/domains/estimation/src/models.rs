use std::cmp::Ordering;
use std::fmt;

use domain_pricing::Region;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ServiceConfig, ServiceType};

/// Absolute and relative tolerance for breakdown consistency checks
pub const TOTAL_EPSILON: f64 = 1e-6;

/// One priced line of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComponent {
    pub label: String,
    pub quantity: f64,
    /// Billing unit of `quantity` (e.g. "Hrs", "GB-Mo")
    pub unit: String,
    pub unit_price: f64,
    pub total: f64,
}

impl CostComponent {
    pub fn new(label: impl Into<String>, quantity: f64, unit: impl Into<String>, unit_price: f64) -> Self {
        Self {
            label: label.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total: quantity * unit_price,
        }
    }
}

/// Ordered cost lines of one resource plus their monthly sum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub items: Vec<CostComponent>,
    pub monthly_total: f64,
}

impl CostBreakdown {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CostComponent>) -> Self {
        let monthly_total = items.iter().map(|item| item.total).sum();
        Self {
            items,
            monthly_total,
        }
    }

    /// Monthly total projected to a year. Display-time only.
    pub fn annual_total(&self) -> f64 {
        crate::aggregation::annualize(self.monthly_total)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First line whose label starts with `prefix`
    pub fn find(&self, prefix: &str) -> Option<&CostComponent> {
        self.items.iter().find(|item| item.label.starts_with(prefix))
    }

    /// Whether `monthly_total` matches the sum of the lines
    pub fn is_consistent(&self) -> bool {
        let sum: f64 = self.items.iter().map(|item| item.total).sum();
        let tolerance = TOTAL_EPSILON.max(TOTAL_EPSILON * sum.abs().max(self.monthly_total.abs()));
        (sum - self.monthly_total).abs() <= tolerance
    }

    /// The `n` most expensive lines; equal totals keep declaration order
    pub fn top_items(&self, n: usize) -> Vec<&CostComponent> {
        let mut items: Vec<&CostComponent> = self.items.iter().collect();
        items.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        items.truncate(n);
        items
    }
}

/// Whether an id belongs to a draft or to a committed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Ephemeral,
    Permanent,
}

/// Identifier of a resource configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub value: Uuid,
    pub kind: IdKind,
}

impl ResourceId {
    /// Fresh id for a draft
    pub fn ephemeral() -> Self {
        Self {
            value: Uuid::new_v4(),
            kind: IdKind::Ephemeral,
        }
    }

    /// Fresh id for a committed resource (time-ordered)
    pub fn permanent() -> Self {
        Self {
            value: Uuid::now_v7(),
            kind: IdKind::Permanent,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == IdKind::Permanent
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IdKind::Ephemeral => write!(f, "draft-{}", self.value),
            IdKind::Permanent => write!(f, "{}", self.value),
        }
    }
}

/// A committed resource of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub id: ResourceId,
    pub name: String,
    /// Region the resource was configured in; pricing uses the project's
    /// active region
    pub region: Region,
    pub service: ServiceConfig,
}

impl ResourceConfig {
    pub fn service_type(&self) -> Option<ServiceType> {
        self.service.service_type()
    }
}

/// The single configuration under edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: ResourceId,
    pub name: String,
    pub region: Region,
    /// `None` until a service type is selected
    pub service: Option<ServiceConfig>,
}

impl Draft {
    pub fn empty(region: Region) -> Self {
        Self {
            id: ResourceId::ephemeral(),
            name: String::new(),
            region,
            service: None,
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.service.as_ref().and_then(ServiceConfig::service_type)
    }

    pub fn is_empty(&self) -> bool {
        self.service.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown() -> CostBreakdown {
        CostBreakdown::from_items(vec![
            CostComponent::new("Instance", 730.0, "Hrs", 0.0104),
            CostComponent::new("Storage", 8.0, "GB-Mo", 0.08),
            CostComponent::new("Snapshots", 10.0, "GB-Mo", 0.05),
            CostComponent::new("Egress", 0.0, "GB", 0.09),
        ])
    }

    #[test]
    fn test_from_items_sums_lines() {
        let b = breakdown();
        assert!((b.monthly_total - (7.592 + 0.64 + 0.5)).abs() < 1e-9);
        assert!(b.is_consistent());
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn test_inconsistent_total_is_detected() {
        let mut b = breakdown();
        b.monthly_total += 0.01;
        assert!(!b.is_consistent());
    }

    #[test]
    fn test_top_items_orders_by_total_and_keeps_ties_stable() {
        let b = CostBreakdown::from_items(vec![
            CostComponent::new("a", 1.0, "u", 1.0),
            CostComponent::new("b", 1.0, "u", 5.0),
            CostComponent::new("c", 1.0, "u", 1.0),
        ]);
        let labels: Vec<&str> = b.top_items(3).iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
        assert_eq!(b.top_items(1).len(), 1);
    }

    #[test]
    fn test_resource_id_kinds() {
        let draft = ResourceId::ephemeral();
        let committed = ResourceId::permanent();
        assert!(!draft.is_permanent());
        assert!(committed.is_permanent());
        assert!(draft.to_string().starts_with("draft-"));
        assert_ne!(draft.value, committed.value);
    }

    #[test]
    fn test_empty_draft() {
        let draft = Draft::empty(Region::EuWest1);
        assert!(draft.is_empty());
        assert!(draft.service_type().is_none());
        assert_eq!(draft.region, Region::EuWest1);
    }
}
