//! Service calculators and the primitives they share.
//!
//! Every calculator is a pure function of a typed service configuration, a
//! region and the pricing repository. Missing prices fall back to static
//! us-east-1 list prices, so a calculator never fails.

pub mod analytics;
pub mod compute;
pub mod database;
pub mod integration;
pub mod management;
pub mod networking;
pub mod security;
pub mod storage;

use domain_pricing::{PricingRepository, Region, fallback};

use crate::catalog::ServiceConfig;
use crate::models::{CostBreakdown, CostComponent};

/// Hours in a billing month
pub const DEFAULT_HOURS_PER_MONTH: f64 = 730.0;

/// A service configuration that can be priced
pub trait Priceable {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown;
}

/// Price a service configuration with the default monthly hours
pub fn calculate(
    service: &ServiceConfig,
    region: Region,
    repository: &PricingRepository,
) -> CostBreakdown {
    calculate_with(service, &PricingContext::new(repository, region))
}

/// Price a service configuration in an explicit context.
///
/// Unknown service types yield an empty breakdown.
pub fn calculate_with(service: &ServiceConfig, ctx: &PricingContext<'_>) -> CostBreakdown {
    match service.priceable() {
        Some(calculator) => calculator.price(ctx),
        None => CostBreakdown::empty(),
    }
}

/// Clamp a user-supplied quantity: negative, NaN and infinite values become 0
pub fn quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Quantity left after a free allotment, never negative
pub fn billable(value: f64, free_allotment: f64) -> f64 {
    (quantity(value) - quantity(free_allotment)).max(0.0)
}

/// Multiplier for a percentage discount, clamped to 0..=100
pub fn discount_multiplier(percentage: f64) -> f64 {
    1.0 - quantity(percentage).min(100.0) / 100.0
}

/// Static rate for `key` from a `(key, rate)` table, 0 when unlisted
pub fn lookup(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(id, _)| *id == key)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0)
}

/// A price band. `up_to` is the cumulative upper bound of the band, `None`
/// for the open-ended last band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub up_to: Option<f64>,
    pub unit_price: f64,
}

impl Tier {
    pub fn new(up_to: Option<f64>, unit_price: f64) -> Self {
        Self { up_to, unit_price }
    }
}

/// Split `quantity` across bands as `(band index, quantity in band, unit price)`.
///
/// Empty bands are skipped. Quantity above the last bounded band is unpriced,
/// so tables should end with an open band.
pub fn split_into_bands(quantity: f64, tiers: &[Tier]) -> Vec<(usize, f64, f64)> {
    let mut remaining = self::quantity(quantity);
    let mut lower = 0.0;
    let mut bands = Vec::new();

    for (index, tier) in tiers.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }
        let width = match tier.up_to {
            Some(upper) => (upper - lower).max(0.0),
            None => f64::INFINITY,
        };
        let in_band = remaining.min(width);
        if in_band > 0.0 {
            bands.push((index, in_band, tier.unit_price));
        }
        remaining -= in_band;
        if let Some(upper) = tier.up_to {
            lower = upper;
        }
    }

    bands
}

/// Total cost of `quantity` over banded prices
pub fn tiered_cost(quantity: f64, tiers: &[Tier]) -> f64 {
    split_into_bands(quantity, tiers)
        .iter()
        .map(|(_, q, price)| q * price)
        .sum()
}

/// Region-scoped rate resolution for a single calculation
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    repository: &'a PricingRepository,
    region: Region,
    hours_per_month: f64,
}

impl<'a> PricingContext<'a> {
    pub fn new(repository: &'a PricingRepository, region: Region) -> Self {
        Self {
            repository,
            region,
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
        }
    }

    /// Override monthly hours; non-positive values keep the default
    pub fn with_hours_per_month(mut self, hours: f64) -> Self {
        if quantity(hours) > 0.0 {
            self.hours_per_month = hours;
        }
        self
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn hours(&self) -> f64 {
        self.hours_per_month
    }

    /// Per-resource running hours, or the month when unset
    pub fn hours_or(&self, hours: Option<f64>) -> f64 {
        hours.map(quantity).unwrap_or(self.hours_per_month)
    }

    /// Price per unit for `sku`, or `default` when the repository has none
    pub fn rate(&self, service_code: &str, sku: &str, default: f64) -> f64 {
        self.repository
            .rate_or(self.region, service_code, sku, default)
    }

    /// Hourly rate of a node or instance type: repository, then the static
    /// fallback tables, then 0.
    pub fn node_rate(&self, service_code: &str, node_type: &str) -> f64 {
        self.rate(
            service_code,
            node_type,
            fallback::hourly_rate(node_type).unwrap_or(0.0),
        )
    }

    /// Banded prices for `sku`. Band `n > 1` is read from `{sku}_tier{n}`.
    pub fn tiers(&self, service_code: &str, sku: &str, defaults: &[(Option<f64>, f64)]) -> Vec<Tier> {
        defaults
            .iter()
            .enumerate()
            .map(|(index, &(up_to, price))| {
                let key = if index == 0 {
                    sku.to_string()
                } else {
                    format!("{sku}_tier{}", index + 1)
                };
                Tier::new(up_to, self.rate(service_code, &key, price))
            })
            .collect()
    }
}

/// Accumulates cost lines in declaration order
#[derive(Debug, Default)]
pub struct BreakdownBuilder {
    items: Vec<CostComponent>,
}

impl BreakdownBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line that is always present, even at zero quantity
    pub fn line(
        &mut self,
        label: impl Into<String>,
        quantity: f64,
        unit: &str,
        unit_price: f64,
    ) -> &mut Self {
        self.items
            .push(CostComponent::new(label, self::quantity(quantity), unit, unit_price));
        self
    }

    /// Line present only when `enabled`
    pub fn line_if(
        &mut self,
        enabled: bool,
        label: impl Into<String>,
        quantity: f64,
        unit: &str,
        unit_price: f64,
    ) -> &mut Self {
        if enabled {
            self.line(label, quantity, unit, unit_price);
        }
        self
    }

    /// Line present only when the clamped quantity is positive
    pub fn usage(
        &mut self,
        label: impl Into<String>,
        quantity: f64,
        unit: &str,
        unit_price: f64,
    ) -> &mut Self {
        self.line_if(self::quantity(quantity) > 0.0, label, quantity, unit, unit_price)
    }

    /// One line per occupied band. A zero quantity still yields a single
    /// zero line at the first band's price.
    pub fn tiered(&mut self, label: &str, quantity: f64, unit: &str, tiers: &[Tier]) -> &mut Self {
        let bands = split_into_bands(quantity, tiers);
        if bands.is_empty() {
            if let Some(first) = tiers.first() {
                self.line(label, 0.0, unit, first.unit_price);
            }
            return self;
        }

        for (index, in_band, unit_price) in bands {
            let label = if tiers.len() > 1 {
                format!("{label} (tier {})", index + 1)
            } else {
                label.to_string()
            };
            self.line(label, in_band, unit, unit_price);
        }
        self
    }

    /// Banded usage: nothing when the quantity is zero
    pub fn tiered_usage(&mut self, label: &str, quantity: f64, unit: &str, tiers: &[Tier]) -> &mut Self {
        if self::quantity(quantity) > 0.0 {
            self.tiered(label, quantity, unit, tiers);
        }
        self
    }

    /// Merge the lines of a sub-calculation (fan-out over sub-entities)
    pub fn extend(&mut self, breakdown: CostBreakdown) -> &mut Self {
        self.items.extend(breakdown.items);
        self
    }

    pub fn build(self) -> CostBreakdown {
        CostBreakdown::from_items(self.items)
    }
}
