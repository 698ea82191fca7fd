//! Compute services: instances, containers, functions and registries.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::networking::internet_egress;
use super::storage::EbsVolume;
use super::{
    BreakdownBuilder, Priceable, PricingContext, billable, discount_multiplier, lookup, quantity,
};
use crate::models::CostBreakdown;

/// How instance capacity is bought
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurchaseOption {
    #[default]
    OnDemand,
    /// Spare capacity at a percentage off the on-demand rate
    Spot { discount_percentage: f64 },
}

impl PurchaseOption {
    fn multiplier(self) -> f64 {
        match self {
            Self::OnDemand => 1.0,
            Self::Spot {
                discount_percentage,
            } => discount_multiplier(discount_percentage),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Architecture {
    #[default]
    X86,
    Arm,
}

/// Amazon EC2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ec2Config {
    pub instance_type: String,
    pub instance_count: u32,
    /// Running hours per month; the estimator's monthly hours when unset
    pub hours_per_month: Option<f64>,
    pub purchase_option: PurchaseOption,
    pub root_volume: EbsVolume,
    pub volumes: Vec<EbsVolume>,
    pub elastic_ip: bool,
    pub detailed_monitoring: bool,
    pub data_transfer_out_gb: f64,
}

impl Default for Ec2Config {
    fn default() -> Self {
        Self {
            instance_type: "t3.micro".to_string(),
            instance_count: 1,
            hours_per_month: None,
            purchase_option: PurchaseOption::OnDemand,
            root_volume: EbsVolume::gp3(8.0),
            volumes: Vec::new(),
            elastic_ip: false,
            detailed_monitoring: false,
            data_transfer_out_gb: 0.0,
        }
    }
}

// Metrics published per instance with detailed monitoring
const DETAILED_MONITORING_METRICS: f64 = 7.0;

impl Priceable for Ec2Config {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let count = f64::from(self.instance_count);
        let hours = ctx.hours_or(self.hours_per_month);
        let instance_type = self.instance_type.as_str();

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("EC2 instance ({instance_type})"),
            count * hours,
            "Hrs",
            ctx.node_rate(codes::EC2, instance_type) * self.purchase_option.multiplier(),
        );
        b.extend(self.root_volume.price_lines(ctx, "Root volume", count));
        for (index, volume) in self.volumes.iter().enumerate() {
            b.extend(volume.price_lines(ctx, &format!("Volume {}", index + 1), count));
        }

        b.line_if(
            self.elastic_ip,
            "Elastic IP",
            count * hours,
            "Hrs",
            ctx.rate(codes::VPC, "public_ipv4_hour", 0.005),
        )
        .line_if(
            self.detailed_monitoring,
            "Detailed monitoring",
            count * DETAILED_MONITORING_METRICS,
            "metrics",
            ctx.rate(codes::CLOUDWATCH, "custom_metric", 0.30),
        );

        internet_egress(&mut b, ctx, self.data_transfer_out_gb);
        b.build()
    }
}

const LIGHTSAIL_BUNDLES: &[(&str, f64)] = &[
    ("nano", 3.50),
    ("micro", 5.00),
    ("small", 10.00),
    ("medium", 20.00),
    ("large", 40.00),
    ("xlarge", 80.00),
    ("2xlarge", 160.00),
];

/// Amazon Lightsail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsailConfig {
    /// Instance bundle, one of the `bundle_<size>` SKUs
    pub bundle: String,
    pub instance_count: u32,
    pub additional_storage_gb: f64,
    pub load_balancer: bool,
    pub managed_database: bool,
}

impl Default for LightsailConfig {
    fn default() -> Self {
        Self {
            bundle: "micro".to_string(),
            instance_count: 1,
            additional_storage_gb: 0.0,
            load_balancer: false,
            managed_database: false,
        }
    }
}

impl Priceable for LightsailConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let bundle = self.bundle.as_str();
        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Lightsail instance ({bundle})"),
            f64::from(self.instance_count),
            "Mo",
            ctx.rate(
                codes::LIGHTSAIL,
                &format!("bundle_{bundle}"),
                lookup(LIGHTSAIL_BUNDLES, bundle),
            ),
        )
        .usage(
            "Block storage",
            self.additional_storage_gb,
            "GB-Mo",
            ctx.rate(codes::LIGHTSAIL, "block_storage", 0.10),
        )
        .line_if(
            self.load_balancer,
            "Load balancer",
            1.0,
            "Mo",
            ctx.rate(codes::LIGHTSAIL, "load_balancer", 18.00),
        )
        .line_if(
            self.managed_database,
            "Managed database",
            1.0,
            "Mo",
            ctx.rate(codes::LIGHTSAIL, "database_micro", 15.00),
        );
        b.build()
    }
}

/// AWS Lambda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LambdaConfig {
    pub requests_millions: f64,
    pub avg_duration_ms: f64,
    pub memory_mb: f64,
    pub architecture: Architecture,
    pub ephemeral_storage_mb: f64,
    pub include_free_tier: bool,
    pub provisioned_concurrency: bool,
    pub provisioned_instances: f64,
    pub provisioned_hours: Option<f64>,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            requests_millions: 1.0,
            avg_duration_ms: 100.0,
            memory_mb: 128.0,
            architecture: Architecture::X86,
            ephemeral_storage_mb: 512.0,
            include_free_tier: true,
            provisioned_concurrency: false,
            provisioned_instances: 1.0,
            provisioned_hours: None,
        }
    }
}

const LAMBDA_FREE_REQUESTS_MILLIONS: f64 = 1.0;
const LAMBDA_FREE_GB_SECONDS: f64 = 400_000.0;
const LAMBDA_FREE_EPHEMERAL_MB: f64 = 512.0;

impl LambdaConfig {
    fn gb_seconds(&self) -> f64 {
        quantity(self.requests_millions) * 1_000_000.0 * quantity(self.avg_duration_ms) / 1000.0
            * quantity(self.memory_mb)
            / 1024.0
    }
}

impl Priceable for LambdaConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let (free_requests, free_compute) = if self.include_free_tier {
            (LAMBDA_FREE_REQUESTS_MILLIONS, LAMBDA_FREE_GB_SECONDS)
        } else {
            (0.0, 0.0)
        };
        let (sku, defaults): (&str, &[(Option<f64>, f64)]) = match self.architecture {
            Architecture::X86 => (
                "compute_gb_second_x86",
                &[
                    (Some(6_000_000_000.0), 0.000_016_666_7),
                    (Some(15_000_000_000.0), 0.000_015),
                    (None, 0.000_013_333_4),
                ],
            ),
            Architecture::Arm => (
                "compute_gb_second_arm",
                &[
                    (Some(7_500_000_000.0), 0.000_013_333_4),
                    (Some(18_750_000_000.0), 0.000_012_000_1),
                    (None, 0.000_010_666_7),
                ],
            ),
        };
        let gb_seconds = self.gb_seconds();

        let mut b = BreakdownBuilder::new();
        b.tiered(
            &format!("Compute ({})", self.architecture),
            billable(gb_seconds, free_compute),
            "GB-s",
            &ctx.tiers(codes::LAMBDA, sku, defaults),
        )
        .line(
            "Requests",
            billable(self.requests_millions, free_requests),
            "1M requests",
            ctx.rate(codes::LAMBDA, "requests", 0.20),
        );

        let seconds = quantity(self.requests_millions) * 1_000_000.0 * quantity(self.avg_duration_ms) / 1000.0;
        b.usage(
            "Ephemeral storage",
            billable(self.ephemeral_storage_mb, LAMBDA_FREE_EPHEMERAL_MB) / 1024.0 * seconds,
            "GB-s",
            ctx.rate(codes::LAMBDA, "ephemeral_storage_gb_second", 0.000_000_030_9),
        );

        let provisioned_seconds = ctx.hours_or(self.provisioned_hours) * 3600.0;
        b.line_if(
            self.provisioned_concurrency,
            "Provisioned concurrency",
            quantity(self.provisioned_instances) * quantity(self.memory_mb) / 1024.0 * provisioned_seconds,
            "GB-s",
            ctx.rate(codes::LAMBDA, "provisioned_concurrency_gb_second", 0.000_004_166_7),
        );
        b.build()
    }
}

/// AWS Fargate (ECS/EKS tasks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FargateConfig {
    pub task_count: u32,
    pub vcpu: f64,
    pub memory_gb: f64,
    pub architecture: Architecture,
    pub ephemeral_storage_gb: f64,
    pub spot: bool,
    pub spot_discount_percentage: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for FargateConfig {
    fn default() -> Self {
        Self {
            task_count: 1,
            vcpu: 0.25,
            memory_gb: 0.5,
            architecture: Architecture::X86,
            ephemeral_storage_gb: 20.0,
            spot: false,
            spot_discount_percentage: 70.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for FargateConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let task_hours = f64::from(self.task_count) * ctx.hours_or(self.hours_per_month);
        let multiplier = if self.spot {
            discount_multiplier(self.spot_discount_percentage)
        } else {
            1.0
        };
        let arch = self.architecture;
        let (vcpu_default, memory_default) = match arch {
            Architecture::X86 => (0.040_48, 0.004_445),
            Architecture::Arm => (0.032_38, 0.003_56),
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("vCPU ({arch})"),
            quantity(self.vcpu) * task_hours,
            "vCPU-Hrs",
            ctx.rate(codes::FARGATE, &format!("fargate_vcpu_{arch}"), vcpu_default) * multiplier,
        )
        .line(
            format!("Memory ({arch})"),
            quantity(self.memory_gb) * task_hours,
            "GB-Hrs",
            ctx.rate(codes::FARGATE, &format!("fargate_memory_{arch}"), memory_default) * multiplier,
        )
        .usage(
            "Ephemeral storage",
            billable(self.ephemeral_storage_gb, 20.0) * task_hours,
            "GB-Hrs",
            ctx.rate(codes::FARGATE, "fargate_ephemeral_storage", 0.000_111),
        );
        b.build()
    }
}

/// A managed node group of an EKS cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGroup {
    /// Key within the node group list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    pub instance_type: String,
    pub node_count: u32,
    pub volume_size_gb: f64,
}

impl Default for NodeGroup {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "default".to_string(),
            instance_type: "t3.medium".to_string(),
            node_count: 2,
            volume_size_gb: 20.0,
        }
    }
}

/// Amazon EKS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EksConfig {
    pub cluster_count: u32,
    /// Kubernetes version past standard support
    pub extended_support: bool,
    pub node_groups: Vec<NodeGroup>,
    pub hours_per_month: Option<f64>,
}

impl Default for EksConfig {
    fn default() -> Self {
        Self {
            cluster_count: 1,
            extended_support: false,
            node_groups: vec![NodeGroup::default()],
            hours_per_month: None,
        }
    }
}

impl Priceable for EksConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let (sku, default) = if self.extended_support {
            ("cluster_extended_hour", 0.60)
        } else {
            ("cluster_hour", 0.10)
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            "Cluster control plane",
            f64::from(self.cluster_count) * hours,
            "Hrs",
            ctx.rate(codes::EKS, sku, default),
        );

        for group in &self.node_groups {
            let nodes = f64::from(group.node_count);
            b.line(
                format!("Node group {} ({})", group.name, group.instance_type),
                nodes * hours,
                "Hrs",
                ctx.node_rate(codes::EC2, &group.instance_type),
            )
            .line(
                format!("Node group {} volumes", group.name),
                nodes * quantity(group.volume_size_gb),
                "GB-Mo",
                ctx.rate(codes::EC2, "ebs_gp3_storage", 0.08),
            );
        }

        b.build()
    }
}

/// AWS App Runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppRunnerConfig {
    pub instances: u32,
    pub vcpu: f64,
    pub memory_gb: f64,
    /// Hours per month spent serving requests
    pub active_hours: f64,
    pub automatic_deployments: bool,
    pub build_minutes: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for AppRunnerConfig {
    fn default() -> Self {
        Self {
            instances: 1,
            vcpu: 1.0,
            memory_gb: 2.0,
            active_hours: 200.0,
            automatic_deployments: true,
            build_minutes: 0.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for AppRunnerConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let instances = f64::from(self.instances);
        let hours = ctx.hours_or(self.hours_per_month);
        let active = quantity(self.active_hours).min(hours);
        let memory_rate = ctx.rate(codes::APP_RUNNER, "memory_gb_hour", 0.007);

        let mut b = BreakdownBuilder::new();
        b.line(
            "Active vCPU",
            instances * quantity(self.vcpu) * active,
            "vCPU-Hrs",
            ctx.rate(codes::APP_RUNNER, "vcpu_hour", 0.064),
        )
        .line(
            "Active memory",
            instances * quantity(self.memory_gb) * active,
            "GB-Hrs",
            memory_rate,
        )
        .usage(
            "Provisioned memory (idle)",
            instances * quantity(self.memory_gb) * (hours - active),
            "GB-Hrs",
            memory_rate,
        )
        .line_if(
            self.automatic_deployments,
            "Automatic deployments",
            1.0,
            "apps",
            ctx.rate(codes::APP_RUNNER, "automatic_deployment", 1.00),
        )
        .usage(
            "Build minutes",
            self.build_minutes,
            "minutes",
            ctx.rate(codes::APP_RUNNER, "build_minute", 0.005),
        );
        b.build()
    }
}

/// Amazon ECR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcrConfig {
    pub storage_gb: f64,
    pub data_transfer_out_gb: f64,
    pub enhanced_scanning: bool,
    pub images_scanned: f64,
}

impl Default for EcrConfig {
    fn default() -> Self {
        Self {
            storage_gb: 10.0,
            data_transfer_out_gb: 0.0,
            enhanced_scanning: false,
            images_scanned: 100.0,
        }
    }
}

impl Priceable for EcrConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "Image storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::ECR, "storage", 0.10),
        );
        internet_egress(&mut b, ctx, self.data_transfer_out_gb);
        b.line_if(
            self.enhanced_scanning,
            "Enhanced scanning",
            self.images_scanned,
            "images",
            ctx.rate(codes::ECR, "enhanced_scan", 0.09),
        );
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::{PricePoint, PricingRepository, Region};

    fn price(config: &impl Priceable) -> CostBreakdown {
        let repo = PricingRepository::empty();
        config.price(&PricingContext::new(&repo, Region::UsEast1))
    }

    #[test]
    fn test_ec2_defaults_price_instance_and_root_volume() {
        let breakdown = price(&Ec2Config::default());

        assert_eq!(breakdown.len(), 2);
        assert!((breakdown.items[0].total - 7.592).abs() < 1e-9);
        assert!((breakdown.items[1].total - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_ec2_spot_discount_scales_instance_line_only() {
        let on_demand = price(&Ec2Config::default());
        let spot = price(&Ec2Config {
            purchase_option: PurchaseOption::Spot {
                discount_percentage: 60.0,
            },
            ..Ec2Config::default()
        });

        assert!((spot.items[0].total - on_demand.items[0].total * 0.4).abs() < 1e-9);
        assert_eq!(spot.items[1], on_demand.items[1]);
    }

    #[test]
    fn test_ec2_optional_lines() {
        let config = Ec2Config {
            instance_count: 2,
            volumes: vec![EbsVolume {
                volume_type: "io1".to_string(),
                iops: 1000.0,
                ..EbsVolume::gp3(50.0)
            }],
            elastic_ip: true,
            detailed_monitoring: true,
            data_transfer_out_gb: 200.0,
            ..Ec2Config::default()
        };
        let breakdown = price(&config);
        let labels: Vec<&str> = breakdown.items.iter().map(|i| i.label.as_str()).collect();

        assert_eq!(
            labels,
            vec![
                "EC2 instance (t3.micro)",
                "Root volume (gp3)",
                "Volume 1 (io1)",
                "Volume 1 provisioned IOPS",
                "Elastic IP",
                "Detailed monitoring",
                "Data transfer out (tier 1)",
            ]
        );
        // per-instance volumes are multiplied by the instance count
        assert_eq!(breakdown.items[2].quantity, 100.0);
        assert_eq!(breakdown.items[3].quantity, 2000.0);
        assert_eq!(breakdown.items[6].quantity, 100.0);
        assert!(breakdown.is_consistent());
    }

    #[test]
    fn test_ec2_unknown_instance_type_costs_nothing() {
        let breakdown = price(&Ec2Config {
            instance_type: "q9.huge".to_string(),
            ..Ec2Config::default()
        });
        assert_eq!(breakdown.items[0].total, 0.0);
    }

    #[test]
    fn test_ec2_prefers_repository_price() {
        let repo = PricingRepository::empty().with_price(
            Region::EuWest1,
            codes::EC2,
            "t3.micro",
            PricePoint::usd(0.0114, "Hrs"),
        );
        let breakdown = Ec2Config::default().price(&PricingContext::new(&repo, Region::EuWest1));
        assert_eq!(breakdown.items[0].unit_price, 0.0114);
    }

    #[test]
    fn test_lambda_free_tier_covers_default_usage() {
        let breakdown = price(&LambdaConfig::default());
        assert_eq!(breakdown.monthly_total, 0.0);
        assert_eq!(breakdown.len(), 2);
    }

    #[test]
    fn test_lambda_billable_compute() {
        let config = LambdaConfig {
            requests_millions: 10.0,
            avg_duration_ms: 1000.0,
            memory_mb: 1024.0,
            include_free_tier: false,
            ..LambdaConfig::default()
        };
        let breakdown = price(&config);
        let compute = breakdown.find("Compute").unwrap();
        assert_eq!(compute.quantity, 10_000_000.0);
        let requests = breakdown.find("Requests").unwrap();
        assert!((requests.total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_lambda_provisioned_concurrency_is_conditional() {
        let off = price(&LambdaConfig::default());
        let on = price(&LambdaConfig {
            provisioned_concurrency: true,
            ..LambdaConfig::default()
        });
        assert_eq!(on.len(), off.len() + 1);
    }

    #[test]
    fn test_fargate_spot() {
        let on_demand = price(&FargateConfig::default());
        let spot = price(&FargateConfig {
            spot: true,
            ..FargateConfig::default()
        });
        assert!((spot.monthly_total - on_demand.monthly_total * 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_eks_node_groups_use_compute_rates() {
        let breakdown = price(&EksConfig::default());
        assert_eq!(breakdown.len(), 3);
        assert!((breakdown.items[0].total - 73.0).abs() < 1e-9);
        assert_eq!(breakdown.items[1].unit_price, 0.0416);
        assert_eq!(breakdown.items[1].quantity, 1460.0);
    }

    #[test]
    fn test_app_runner_idle_memory() {
        let breakdown = price(&AppRunnerConfig::default());
        let idle = breakdown.find("Provisioned memory").unwrap();
        assert_eq!(idle.quantity, 2.0 * 530.0);
    }
}
