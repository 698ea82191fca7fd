//! Monitoring, auditing and configuration tracking.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};

use super::{BreakdownBuilder, Priceable, PricingContext, billable};
use crate::models::CostBreakdown;

/// Amazon CloudWatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudwatchConfig {
    pub custom_metrics: f64,
    pub dashboards: f64,
    pub alarms: f64,
    pub logs_ingested_gb: f64,
    pub logs_stored_gb: f64,
    pub synthetics: bool,
    pub canary_runs: f64,
    pub include_free_tier: bool,
}

impl Default for CloudwatchConfig {
    fn default() -> Self {
        Self {
            custom_metrics: 10.0,
            dashboards: 1.0,
            alarms: 10.0,
            logs_ingested_gb: 5.0,
            logs_stored_gb: 10.0,
            synthetics: false,
            canary_runs: 10_000.0,
            include_free_tier: true,
        }
    }
}

impl Priceable for CloudwatchConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        // (metrics, dashboards, alarms, ingested GB, stored GB)
        let free = if self.include_free_tier {
            (10.0, 3.0, 10.0, 5.0, 5.0)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0.0)
        };
        let metric_tiers = ctx.tiers(
            codes::CLOUDWATCH,
            "custom_metric",
            &[
                (Some(10_000.0), 0.30),
                (Some(250_000.0), 0.10),
                (Some(1_000_000.0), 0.05),
                (None, 0.02),
            ],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered(
            "Custom metrics",
            billable(self.custom_metrics, free.0),
            "metrics",
            &metric_tiers,
        )
        .usage(
            "Dashboards",
            billable(self.dashboards, free.1),
            "dashboards",
            ctx.rate(codes::CLOUDWATCH, "dashboard", 3.00),
        )
        .usage(
            "Alarms",
            billable(self.alarms, free.2),
            "alarms",
            ctx.rate(codes::CLOUDWATCH, "alarm", 0.10),
        )
        .usage(
            "Logs ingested",
            billable(self.logs_ingested_gb, free.3),
            "GB",
            ctx.rate(codes::CLOUDWATCH, "logs_ingestion", 0.50),
        )
        .usage(
            "Logs stored",
            billable(self.logs_stored_gb, free.4),
            "GB-Mo",
            ctx.rate(codes::CLOUDWATCH, "logs_storage", 0.03),
        )
        .line_if(
            self.synthetics,
            "Synthetics canary runs",
            self.canary_runs,
            "runs",
            ctx.rate(codes::CLOUDWATCH, "canary_run", 0.0012),
        );
        b.build()
    }
}

/// AWS CloudTrail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudtrailConfig {
    pub management_events_100k: f64,
    /// Trails delivering management events beyond the first copy
    pub additional_trails: u32,
    pub data_events: bool,
    pub data_events_100k: f64,
    pub insights: bool,
    pub insights_events_100k: f64,
}

impl Default for CloudtrailConfig {
    fn default() -> Self {
        Self {
            management_events_100k: 10.0,
            additional_trails: 0,
            data_events: false,
            data_events_100k: 10.0,
            insights: false,
            insights_events_100k: 10.0,
        }
    }
}

impl Priceable for CloudtrailConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        // The first copy of management events is free but still applicable
        b.line(
            "Management events (first copy)",
            self.management_events_100k,
            "100K events",
            0.0,
        )
        .usage(
            "Management events (additional copies)",
            f64::from(self.additional_trails) * super::quantity(self.management_events_100k),
            "100K events",
            ctx.rate(codes::CLOUDTRAIL, "management_events", 2.00),
        )
        .line_if(
            self.data_events,
            "Data events",
            self.data_events_100k,
            "100K events",
            ctx.rate(codes::CLOUDTRAIL, "data_events", 0.10),
        )
        .line_if(
            self.insights,
            "Insights events analyzed",
            self.insights_events_100k,
            "100K events",
            ctx.rate(codes::CLOUDTRAIL, "insights_events", 0.35),
        );
        b.build()
    }
}

/// AWS Config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigServiceConfig {
    pub configuration_items: f64,
    pub rule_evaluations: f64,
    pub conformance_pack_evaluations: f64,
}

impl Default for ConfigServiceConfig {
    fn default() -> Self {
        Self {
            configuration_items: 1_000.0,
            rule_evaluations: 10_000.0,
            conformance_pack_evaluations: 0.0,
        }
    }
}

impl Priceable for ConfigServiceConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let rule_tiers = ctx.tiers(
            codes::CONFIG,
            "rule_evaluation",
            &[(Some(100_000.0), 0.001), (Some(500_000.0), 0.0008), (None, 0.0005)],
        );
        let pack_tiers = ctx.tiers(
            codes::CONFIG,
            "conformance_pack_evaluation",
            &[(Some(100_000.0), 0.001), (Some(500_000.0), 0.0008), (None, 0.0005)],
        );

        let mut b = BreakdownBuilder::new();
        b.line(
            "Configuration items recorded",
            self.configuration_items,
            "items",
            ctx.rate(codes::CONFIG, "configuration_item", 0.003),
        )
        .tiered("Rule evaluations", self.rule_evaluations, "evaluations", &rule_tiers)
        .tiered_usage(
            "Conformance pack evaluations",
            self.conformance_pack_evaluations,
            "evaluations",
            &pack_tiers,
        );
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::{PricingRepository, Region};

    fn price(config: &impl Priceable) -> CostBreakdown {
        let repo = PricingRepository::empty();
        config.price(&PricingContext::new(&repo, Region::UsEast1))
    }

    #[test]
    fn test_cloudwatch_defaults_within_free_tier() {
        let breakdown = price(&CloudwatchConfig::default());
        // custom metrics line stays, the other free usage lines drop out
        assert_eq!(breakdown.len(), 2);
        assert!((breakdown.monthly_total - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_cloudtrail_first_copy_is_free_but_listed() {
        let breakdown = price(&CloudtrailConfig::default());
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.monthly_total, 0.0);

        let paid = price(&CloudtrailConfig {
            additional_trails: 1,
            ..CloudtrailConfig::default()
        });
        assert!((paid.monthly_total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_rule_evaluation_bands() {
        let breakdown = price(&ConfigServiceConfig {
            rule_evaluations: 150_000.0,
            ..ConfigServiceConfig::default()
        });
        assert!((breakdown.monthly_total - (3.0 + 100.0 + 40.0)).abs() < 1e-9);
    }
}
