//! Messaging, events, workflows and streaming.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::database::CapacityMode;
use super::{BreakdownBuilder, Priceable, PricingContext, billable, lookup, quantity};
use crate::models::CostBreakdown;

/// Amazon SQS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqsConfig {
    pub standard_requests_millions: f64,
    pub fifo_requests_millions: f64,
    pub include_free_tier: bool,
}

impl Default for SqsConfig {
    fn default() -> Self {
        Self {
            standard_requests_millions: 1.0,
            fifo_requests_millions: 0.0,
            include_free_tier: true,
        }
    }
}

impl Priceable for SqsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        // One free million requests per month, spent on standard queues first
        let free = if self.include_free_tier { 1.0 } else { 0.0 };
        let standard = quantity(self.standard_requests_millions);
        let free_left = (free - standard).max(0.0);

        let standard_tiers = ctx.tiers(
            codes::SQS,
            "standard_requests",
            &[(Some(100_000.0), 0.40), (Some(200_000.0), 0.30), (None, 0.24)],
        );
        let fifo_tiers = ctx.tiers(
            codes::SQS,
            "fifo_requests",
            &[(Some(100_000.0), 0.50), (Some(200_000.0), 0.40), (None, 0.35)],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered(
            "Standard queue requests",
            billable(standard, free),
            "1M requests",
            &standard_tiers,
        )
        .tiered_usage(
            "FIFO queue requests",
            billable(self.fifo_requests_millions, free_left),
            "1M requests",
            &fifo_tiers,
        );
        b.build()
    }
}

/// Amazon SNS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnsConfig {
    pub publishes_millions: f64,
    pub http_deliveries_millions: f64,
    pub email_deliveries_thousands: f64,
    pub sms_messages: f64,
    /// Varies by destination country
    pub sms_price_per_message: f64,
    pub include_free_tier: bool,
}

impl Default for SnsConfig {
    fn default() -> Self {
        Self {
            publishes_millions: 1.0,
            http_deliveries_millions: 0.0,
            email_deliveries_thousands: 0.0,
            sms_messages: 0.0,
            sms_price_per_message: 0.006_45,
            include_free_tier: true,
        }
    }
}

impl Priceable for SnsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let (free_publishes, free_http, free_email) = if self.include_free_tier {
            (1.0, 0.1, 1.0)
        } else {
            (0.0, 0.0, 0.0)
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            "Publishes",
            billable(self.publishes_millions, free_publishes),
            "1M requests",
            ctx.rate(codes::SNS, "publishes", 0.50),
        )
        .usage(
            "HTTP/S deliveries",
            billable(self.http_deliveries_millions, free_http),
            "1M notifications",
            ctx.rate(codes::SNS, "http_deliveries", 0.60),
        )
        .usage(
            "Email deliveries",
            billable(self.email_deliveries_thousands, free_email),
            "1K notifications",
            ctx.rate(codes::SNS, "email_deliveries", 0.02),
        )
        .usage(
            "SMS messages",
            self.sms_messages,
            "messages",
            ctx.rate(codes::SNS, "sms", self.sms_price_per_message),
        );
        b.build()
    }
}

/// Amazon EventBridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventbridgeConfig {
    pub custom_events_millions: f64,
    pub archive: bool,
    pub archive_processed_gb: f64,
    pub archive_stored_gb: f64,
    pub pipes_requests_millions: f64,
    pub scheduler_invocations_millions: f64,
}

impl Default for EventbridgeConfig {
    fn default() -> Self {
        Self {
            custom_events_millions: 1.0,
            archive: false,
            archive_processed_gb: 10.0,
            archive_stored_gb: 10.0,
            pipes_requests_millions: 0.0,
            scheduler_invocations_millions: 0.0,
        }
    }
}

const SCHEDULER_FREE_INVOCATIONS_MILLIONS: f64 = 14.0;

impl Priceable for EventbridgeConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "Custom events",
            self.custom_events_millions,
            "1M events",
            ctx.rate(codes::EVENTBRIDGE, "custom_events", 1.00),
        );
        if self.archive {
            b.line(
                "Archive processing",
                self.archive_processed_gb,
                "GB",
                ctx.rate(codes::EVENTBRIDGE, "archive_processed", 0.10),
            )
            .line(
                "Archive storage",
                self.archive_stored_gb,
                "GB-Mo",
                ctx.rate(codes::EVENTBRIDGE, "archive_storage", 0.023),
            );
        }
        b.usage(
            "Pipes requests",
            self.pipes_requests_millions,
            "1M requests",
            ctx.rate(codes::EVENTBRIDGE, "pipes_requests", 0.40),
        )
        .usage(
            "Scheduler invocations",
            billable(
                self.scheduler_invocations_millions,
                SCHEDULER_FREE_INVOCATIONS_MILLIONS,
            ),
            "1M invocations",
            ctx.rate(codes::EVENTBRIDGE, "scheduler_invocations", 1.00),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowType {
    #[default]
    Standard,
    Express,
}

/// AWS Step Functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepFunctionsConfig {
    pub workflow_type: WorkflowType,
    /// Standard workflows
    pub state_transitions_thousands: f64,
    /// Express workflows
    pub requests_millions: f64,
    pub avg_duration_ms: f64,
    pub memory_mb: f64,
    pub include_free_tier: bool,
}

impl Default for StepFunctionsConfig {
    fn default() -> Self {
        Self {
            workflow_type: WorkflowType::Standard,
            state_transitions_thousands: 10.0,
            requests_millions: 1.0,
            avg_duration_ms: 500.0,
            memory_mb: 64.0,
            include_free_tier: true,
        }
    }
}

impl Priceable for StepFunctionsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        match self.workflow_type {
            WorkflowType::Standard => {
                let free = if self.include_free_tier { 4.0 } else { 0.0 };
                b.line(
                    "State transitions",
                    billable(self.state_transitions_thousands, free),
                    "1K transitions",
                    ctx.rate(codes::STEP_FUNCTIONS, "state_transitions", 0.025),
                );
            }
            WorkflowType::Express => {
                let gb_seconds = quantity(self.requests_millions) * 1_000_000.0
                    * quantity(self.avg_duration_ms)
                    / 1000.0
                    * quantity(self.memory_mb)
                    / 1024.0;
                // bands are 1,000 and 4,000 GB-hours
                let tiers = ctx.tiers(
                    codes::STEP_FUNCTIONS,
                    "express_duration",
                    &[
                        (Some(3_600_000.0), 0.000_016_67),
                        (Some(18_000_000.0), 0.000_008_33),
                        (None, 0.000_004_56),
                    ],
                );
                b.line(
                    "Express requests",
                    self.requests_millions,
                    "1M requests",
                    ctx.rate(codes::STEP_FUNCTIONS, "express_requests", 1.00),
                )
                .tiered("Express duration", gb_seconds, "GB-s", &tiers);
            }
        }
        b.build()
    }
}

/// Amazon Kinesis Data Streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinesisConfig {
    pub capacity_mode: CapacityMode,
    /// Provisioned mode
    pub shards: u32,
    pub put_payload_units_millions: f64,
    pub extended_retention: bool,
    /// On-demand mode
    pub data_in_gb: f64,
    pub data_out_gb: f64,
    pub enhanced_fan_out: bool,
    pub consumers: u32,
    pub fan_out_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for KinesisConfig {
    fn default() -> Self {
        Self {
            capacity_mode: CapacityMode::Provisioned,
            shards: 1,
            put_payload_units_millions: 10.0,
            extended_retention: false,
            data_in_gb: 100.0,
            data_out_gb: 100.0,
            enhanced_fan_out: false,
            consumers: 1,
            fan_out_gb: 100.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for KinesisConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let shard_hours = f64::from(self.shards) * hours;
        let mut b = BreakdownBuilder::new();

        match self.capacity_mode {
            CapacityMode::Provisioned => {
                b.line(
                    "Shard hours",
                    shard_hours,
                    "Hrs",
                    ctx.rate(codes::KINESIS, "shard_hour", 0.015),
                )
                .line(
                    "PUT payload units",
                    self.put_payload_units_millions,
                    "1M units",
                    ctx.rate(codes::KINESIS, "put_payload_units", 0.014),
                )
                .line_if(
                    self.extended_retention,
                    "Extended retention",
                    shard_hours,
                    "Hrs",
                    ctx.rate(codes::KINESIS, "extended_retention_shard_hour", 0.02),
                );
            }
            CapacityMode::OnDemand => {
                b.line(
                    "Stream hours",
                    hours,
                    "Hrs",
                    ctx.rate(codes::KINESIS, "on_demand_stream_hour", 0.04),
                )
                .line(
                    "Data ingested",
                    self.data_in_gb,
                    "GB",
                    ctx.rate(codes::KINESIS, "on_demand_data_in", 0.08),
                )
                .line(
                    "Data retrieved",
                    self.data_out_gb,
                    "GB",
                    ctx.rate(codes::KINESIS, "on_demand_data_out", 0.04),
                );
            }
        }

        if self.enhanced_fan_out {
            let consumer_shard_hours = f64::from(self.consumers) * shard_hours;
            b.line(
                "Enhanced fan-out consumers",
                consumer_shard_hours,
                "Hrs",
                ctx.rate(codes::KINESIS, "efo_consumer_shard_hour", 0.015),
            )
            .line(
                "Enhanced fan-out data",
                self.fan_out_gb,
                "GB",
                ctx.rate(codes::KINESIS, "efo_data", 0.013),
            );
        }

        b.build()
    }
}

/// Amazon Data Firehose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirehoseConfig {
    pub ingested_gb: f64,
    pub format_conversion: bool,
    pub dynamic_partitioning: bool,
    pub vpc_delivery: bool,
    pub vpc_delivery_azs: u32,
    pub hours_per_month: Option<f64>,
}

impl Default for FirehoseConfig {
    fn default() -> Self {
        Self {
            ingested_gb: 100.0,
            format_conversion: false,
            dynamic_partitioning: false,
            vpc_delivery: false,
            vpc_delivery_azs: 2,
            hours_per_month: None,
        }
    }
}

impl Priceable for FirehoseConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let tiers = ctx.tiers(
            codes::FIREHOSE,
            "ingestion",
            &[
                (Some(512_000.0), 0.029),
                (Some(2_048_000.0), 0.025),
                (None, 0.020),
            ],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered("Data ingested", self.ingested_gb, "GB", &tiers)
            .line_if(
                self.format_conversion,
                "Format conversion",
                self.ingested_gb,
                "GB",
                ctx.rate(codes::FIREHOSE, "format_conversion", 0.018),
            )
            .line_if(
                self.dynamic_partitioning,
                "Dynamic partitioning",
                self.ingested_gb,
                "GB",
                ctx.rate(codes::FIREHOSE, "dynamic_partitioning", 0.02),
            );

        if self.vpc_delivery {
            b.line(
                "VPC delivery",
                f64::from(self.vpc_delivery_azs) * ctx.hours_or(self.hours_per_month),
                "Hrs",
                ctx.rate(codes::FIREHOSE, "vpc_delivery_hour", 0.01),
            )
            .line(
                "VPC delivery data",
                self.ingested_gb,
                "GB",
                ctx.rate(codes::FIREHOSE, "vpc_delivery_data", 0.01),
            );
        }

        b.build()
    }
}

const MSK_BROKERS: &[(&str, f64)] = &[
    ("kafka.t3.small", 0.0456),
    ("kafka.m5.large", 0.21),
    ("kafka.m5.xlarge", 0.42),
    ("kafka.m7g.large", 0.204),
];

/// Amazon MSK (provisioned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MskConfig {
    pub broker_type: String,
    pub broker_count: u32,
    pub storage_gb_per_broker: f64,
    pub provisioned_throughput: bool,
    /// Per broker, in MB/s
    pub throughput_mbps: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for MskConfig {
    fn default() -> Self {
        Self {
            broker_type: "kafka.m5.large".to_string(),
            broker_count: 3,
            storage_gb_per_broker: 100.0,
            provisioned_throughput: false,
            throughput_mbps: 250.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for MskConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let brokers = f64::from(self.broker_count);
        let broker = self.broker_type.as_str();

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Brokers ({broker})"),
            brokers * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::MSK, broker, lookup(MSK_BROKERS, broker)),
        )
        .line(
            "Broker storage",
            brokers * quantity(self.storage_gb_per_broker),
            "GB-Mo",
            ctx.rate(codes::MSK, "storage", 0.10),
        )
        .line_if(
            self.provisioned_throughput,
            "Provisioned storage throughput",
            brokers * quantity(self.throughput_mbps),
            "MBps-Mo",
            ctx.rate(codes::MSK, "provisioned_throughput", 0.08),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MqEngine {
    #[default]
    Activemq,
    Rabbitmq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MqDeployment {
    #[default]
    SingleInstance,
    ActiveStandby,
    Cluster,
}

impl MqDeployment {
    fn brokers(self) -> f64 {
        match self {
            Self::SingleInstance => 1.0,
            Self::ActiveStandby => 2.0,
            Self::Cluster => 3.0,
        }
    }
}

const MQ_BROKERS: &[(&str, f64)] = &[
    ("mq.t3.micro", 0.027),
    ("mq.m5.large", 0.288),
    ("mq.m5.xlarge", 0.576),
];

/// Amazon MQ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqConfig {
    pub engine: MqEngine,
    pub instance_type: String,
    pub deployment: MqDeployment,
    pub storage_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for MqConfig {
    fn default() -> Self {
        Self {
            engine: MqEngine::Activemq,
            instance_type: "mq.m5.large".to_string(),
            deployment: MqDeployment::SingleInstance,
            storage_gb: 20.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for MqConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let brokers = self.deployment.brokers();
        let instance = self.instance_type.as_str();
        // ActiveMQ brokers share one EFS volume; RabbitMQ nodes each keep their own
        let (storage_copies, storage_sku, storage_default) = match self.engine {
            MqEngine::Activemq => (1.0, "activemq_storage", 0.30),
            MqEngine::Rabbitmq => (brokers, "rabbitmq_storage", 0.10),
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Brokers ({instance}, {})", self.deployment),
            brokers * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::MQ, instance, lookup(MQ_BROKERS, instance)),
        )
        .line(
            format!("Broker storage ({})", self.engine),
            storage_copies * quantity(self.storage_gb),
            "GB-Mo",
            ctx.rate(codes::MQ, storage_sku, storage_default),
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
    fn test_sqs_free_tier_spills_to_fifo() {
        let breakdown = price(&SqsConfig {
            standard_requests_millions: 0.25,
            fifo_requests_millions: 1.0,
            include_free_tier: true,
        });
        assert_eq!(breakdown.items[0].total, 0.0);
        let fifo = breakdown.find("FIFO queue requests").unwrap();
        assert!((fifo.quantity - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sqs_standard_bands() {
        let breakdown = price(&SqsConfig {
            standard_requests_millions: 150_000.0,
            fifo_requests_millions: 0.0,
            include_free_tier: false,
        });
        assert_eq!(breakdown.len(), 2);
        assert!((breakdown.monthly_total - (100_000.0 * 0.40 + 50_000.0 * 0.30)).abs() < 1e-6);
    }

    #[test]
    fn test_step_functions_workflow_types() {
        let standard = price(&StepFunctionsConfig::default());
        assert_eq!(standard.len(), 1);
        assert!((standard.monthly_total - 6.0 * 0.025).abs() < 1e-12);

        let express = price(&StepFunctionsConfig {
            workflow_type: WorkflowType::Express,
            ..StepFunctionsConfig::default()
        });
        assert_eq!(express.items[0].label, "Express requests");
        assert_eq!(express.items[1].quantity, 31_250.0);
    }

    #[test]
    fn test_kinesis_enhanced_fan_out_is_conditional() {
        let off = price(&KinesisConfig::default());
        let on = price(&KinesisConfig {
            enhanced_fan_out: true,
            ..KinesisConfig::default()
        });
        assert_eq!(on.len(), off.len() + 2);
    }

    #[test]
    fn test_mq_storage_copies() {
        let active_standby = price(&MqConfig {
            deployment: MqDeployment::ActiveStandby,
            ..MqConfig::default()
        });
        assert_eq!(active_standby.items[0].quantity, 1460.0);
        assert_eq!(active_standby.items[1].quantity, 20.0);

        let rabbit = price(&MqConfig {
            engine: MqEngine::Rabbitmq,
            deployment: MqDeployment::Cluster,
            ..MqConfig::default()
        });
        assert_eq!(rabbit.items[1].quantity, 60.0);
    }
}
