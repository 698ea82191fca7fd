//! Query engines, ETL, big data and machine learning.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};

use super::{BreakdownBuilder, Priceable, PricingContext, billable, lookup, quantity};
use crate::models::CostBreakdown;

// Athena bills at least 10 MB per query
const ATHENA_MIN_SCAN_GB: f64 = 10.0 / 1024.0;

/// Amazon Athena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthenaConfig {
    pub queries_per_month: f64,
    pub avg_data_scanned_gb: f64,
    pub provisioned_capacity: bool,
    pub dpus: f64,
    pub provisioned_hours: Option<f64>,
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            queries_per_month: 1_000.0,
            avg_data_scanned_gb: 1.0,
            provisioned_capacity: false,
            dpus: 24.0,
            provisioned_hours: None,
        }
    }
}

impl AthenaConfig {
    fn terabytes_scanned(&self) -> f64 {
        let per_query = quantity(self.avg_data_scanned_gb).max(ATHENA_MIN_SCAN_GB);
        quantity(self.queries_per_month) * per_query / 1024.0
    }
}

impl Priceable for AthenaConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        if self.provisioned_capacity {
            // Provisioned queries are not billed per scan; 24 DPUs minimum
            b.line(
                "Provisioned capacity",
                quantity(self.dpus).max(24.0) * ctx.hours_or(self.provisioned_hours),
                "DPU-Hrs",
                ctx.rate(codes::ATHENA, "dpu_hour", 0.30),
            );
        } else {
            b.line(
                "Data scanned",
                self.terabytes_scanned(),
                "TB",
                ctx.rate(codes::ATHENA, "data_scanned", 5.00),
            );
        }
        b.build()
    }
}

const GLUE_FREE_CATALOG_OBJECTS: f64 = 1_000_000.0;
const GLUE_FREE_CATALOG_REQUESTS_MILLIONS: f64 = 1.0;

/// AWS Glue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlueConfig {
    pub etl_dpu_hours: f64,
    pub crawler_dpu_hours: f64,
    pub catalog_objects: f64,
    pub catalog_requests_millions: f64,
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self {
            etl_dpu_hours: 10.0,
            crawler_dpu_hours: 1.0,
            catalog_objects: 0.0,
            catalog_requests_millions: 0.0,
        }
    }
}

impl Priceable for GlueConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "ETL jobs",
            self.etl_dpu_hours,
            "DPU-Hrs",
            ctx.rate(codes::GLUE, "etl_dpu_hour", 0.44),
        )
        .usage(
            "Crawlers",
            self.crawler_dpu_hours,
            "DPU-Hrs",
            ctx.rate(codes::GLUE, "crawler_dpu_hour", 0.44),
        )
        .usage(
            "Data Catalog storage",
            billable(self.catalog_objects, GLUE_FREE_CATALOG_OBJECTS) / 100_000.0,
            "100K objects",
            ctx.rate(codes::GLUE, "catalog_storage", 1.00),
        )
        .usage(
            "Data Catalog requests",
            billable(
                self.catalog_requests_millions,
                GLUE_FREE_CATALOG_REQUESTS_MILLIONS,
            ),
            "1M requests",
            ctx.rate(codes::GLUE, "catalog_requests", 1.00),
        );
        b.build()
    }
}

const EMR_SURCHARGE: &[(&str, f64)] = &[
    ("m5.xlarge", 0.048),
    ("m5.2xlarge", 0.096),
    ("r5.xlarge", 0.063),
    ("c5.xlarge", 0.043),
];

/// Amazon EMR on EC2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmrConfig {
    pub instance_type: String,
    pub instance_count: u32,
    pub ebs_gb_per_instance: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for EmrConfig {
    fn default() -> Self {
        Self {
            instance_type: "m5.xlarge".to_string(),
            instance_count: 3,
            ebs_gb_per_instance: 32.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for EmrConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let instance = self.instance_type.as_str();
        let count = f64::from(self.instance_count);
        let instance_hours = count * ctx.hours_or(self.hours_per_month);

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("EC2 instances ({instance})"),
            instance_hours,
            "Hrs",
            ctx.node_rate(codes::EC2, instance),
        )
        .line(
            format!("EMR surcharge ({instance})"),
            instance_hours,
            "Hrs",
            ctx.rate(codes::EMR, instance, lookup(EMR_SURCHARGE, instance)),
        )
        .line(
            "EBS storage (gp2)",
            count * quantity(self.ebs_gb_per_instance),
            "GB-Mo",
            ctx.rate(codes::EC2, "ebs_gp2_storage", 0.10),
        );
        b.build()
    }
}

const SAGEMAKER_INSTANCES: &[(&str, f64)] = &[
    ("ml.t3.medium", 0.05),
    ("ml.m5.large", 0.115),
    ("ml.m5.xlarge", 0.23),
    ("ml.c5.xlarge", 0.204),
    ("ml.g4dn.xlarge", 0.736),
    ("ml.p3.2xlarge", 3.825),
];

/// Amazon SageMaker: real-time inference, training and notebooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SagemakerConfig {
    pub endpoint_instance_type: String,
    pub endpoint_instance_count: u32,
    pub endpoint_hours: Option<f64>,
    pub training_instance_type: String,
    pub training_hours: f64,
    pub notebook: bool,
    pub notebook_instance_type: String,
    pub notebook_hours: f64,
    pub storage_gb: f64,
}

impl Default for SagemakerConfig {
    fn default() -> Self {
        Self {
            endpoint_instance_type: "ml.m5.large".to_string(),
            endpoint_instance_count: 1,
            endpoint_hours: None,
            training_instance_type: "ml.m5.xlarge".to_string(),
            training_hours: 10.0,
            notebook: false,
            notebook_instance_type: "ml.t3.medium".to_string(),
            notebook_hours: 160.0,
            storage_gb: 5.0,
        }
    }
}

impl Priceable for SagemakerConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let instance_rate = |instance: &str| {
            ctx.rate(codes::SAGEMAKER, instance, lookup(SAGEMAKER_INSTANCES, instance))
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Inference endpoint ({})", self.endpoint_instance_type),
            f64::from(self.endpoint_instance_count) * ctx.hours_or(self.endpoint_hours),
            "Hrs",
            instance_rate(self.endpoint_instance_type.as_str()),
        )
        .usage(
            format!("Training ({})", self.training_instance_type),
            self.training_hours,
            "Hrs",
            instance_rate(self.training_instance_type.as_str()),
        )
        .line_if(
            self.notebook,
            format!("Notebook instance ({})", self.notebook_instance_type),
            self.notebook_hours,
            "Hrs",
            instance_rate(self.notebook_instance_type.as_str()),
        )
        .line(
            "ML storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::SAGEMAKER, "ml_storage", 0.14),
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
    fn test_athena_minimum_scan_per_query() {
        let breakdown = price(&AthenaConfig {
            queries_per_month: 1024.0,
            avg_data_scanned_gb: 0.0,
            ..AthenaConfig::default()
        });
        assert!((breakdown.items[0].quantity - 10.0 / 1024.0).abs() < 1e-12);
    }

    #[test]
    fn test_athena_provisioned_replaces_scan_billing() {
        let breakdown = price(&AthenaConfig {
            provisioned_capacity: true,
            dpus: 8.0,
            ..AthenaConfig::default()
        });
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.items[0].quantity, 24.0 * 730.0);
    }

    #[test]
    fn test_emr_adds_surcharge_to_compute() {
        let breakdown = price(&EmrConfig::default());
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown.items[0].unit_price, 0.192);
        assert_eq!(breakdown.items[1].unit_price, 0.048);
    }

    #[test]
    fn test_sagemaker_notebook_is_conditional() {
        let off = price(&SagemakerConfig::default());
        let on = price(&SagemakerConfig {
            notebook: true,
            ..SagemakerConfig::default()
        });
        assert_eq!(on.len(), off.len() + 1);
        assert!((off.items[0].total - 730.0 * 0.115).abs() < 1e-9);
    }
}
