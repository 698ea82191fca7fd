//! Managed databases, caches and search.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::{BreakdownBuilder, Priceable, PricingContext, billable, lookup, quantity};
use crate::models::CostBreakdown;

const RDS_STORAGE: &[(&str, f64)] = &[
    ("gp3", 0.115),
    ("gp2", 0.115),
    ("io1", 0.125),
    ("io2", 0.125),
    ("magnetic", 0.10),
];

const RDS_GP3_BASELINE_IOPS: f64 = 3000.0;

/// Amazon RDS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsConfig {
    /// mysql, postgres, mariadb, oracle-se2 or sqlserver-se
    pub engine: String,
    pub instance_class: String,
    pub multi_az: bool,
    pub storage_type: String,
    pub storage_gb: f64,
    pub provisioned_iops: f64,
    pub backup_retention_days: u32,
    pub backup_storage_gb: f64,
    pub read_replicas: u32,
    pub hours_per_month: Option<f64>,
}

impl Default for RdsConfig {
    fn default() -> Self {
        Self {
            engine: "mysql".to_string(),
            instance_class: "db.t3.micro".to_string(),
            multi_az: false,
            storage_type: "gp3".to_string(),
            storage_gb: 20.0,
            provisioned_iops: 0.0,
            backup_retention_days: 7,
            backup_storage_gb: 20.0,
            read_replicas: 0,
            hours_per_month: None,
        }
    }
}

impl Priceable for RdsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let deployments = if self.multi_az { 2.0 } else { 1.0 };
        let class = self.instance_class.as_str();
        let storage_type = self.storage_type.as_str();
        let instance_rate = ctx.node_rate(codes::RDS, class);
        let storage_rate = ctx.rate(
            codes::RDS,
            &format!("rds_{storage_type}_storage"),
            lookup(RDS_STORAGE, storage_type),
        );
        let deployment = if self.multi_az { "Multi-AZ" } else { "Single-AZ" };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("RDS {} instance ({class}, {deployment})", self.engine),
            hours * deployments,
            "Hrs",
            instance_rate,
        )
        .line(
            format!("Storage ({storage_type})"),
            quantity(self.storage_gb) * deployments,
            "GB-Mo",
            storage_rate,
        );

        match storage_type {
            "io1" | "io2" => {
                b.line(
                    "Provisioned IOPS",
                    quantity(self.provisioned_iops) * deployments,
                    "IOPS-Mo",
                    ctx.rate(codes::RDS, &format!("rds_{storage_type}_iops"), 0.10),
                );
            }
            "gp3" => {
                b.usage(
                    "Provisioned IOPS above baseline",
                    billable(self.provisioned_iops, RDS_GP3_BASELINE_IOPS) * deployments,
                    "IOPS-Mo",
                    ctx.rate(codes::RDS, "rds_gp3_iops", 0.02),
                );
            }
            _ => {}
        }

        // Backup storage up to the provisioned size is free
        b.line_if(
            self.backup_retention_days > 0,
            "Backup storage",
            billable(self.backup_storage_gb, self.storage_gb),
            "GB-Mo",
            ctx.rate(codes::RDS, "backup_storage", 0.095),
        );

        if self.read_replicas > 0 {
            let replicas = f64::from(self.read_replicas);
            b.line(
                format!("Read replicas ({class})"),
                replicas * hours,
                "Hrs",
                instance_rate,
            )
            .line(
                "Read replica storage",
                replicas * quantity(self.storage_gb),
                "GB-Mo",
                storage_rate,
            );
        }

        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuroraCapacity {
    #[default]
    Provisioned,
    Serverless,
}

// I/O-Optimized raises compute and storage prices and drops I/O charges
const AURORA_IO_OPTIMIZED_COMPUTE: f64 = 1.3;

const AURORA_INSTANCES: &[(&str, f64)] = &[
    ("db.t3.medium", 0.082),
    ("db.t3.large", 0.164),
    ("db.t4g.medium", 0.073),
    ("db.t4g.large", 0.146),
    ("db.r5.large", 0.29),
    ("db.r5.xlarge", 0.58),
    ("db.r6g.large", 0.26),
    ("db.r6g.xlarge", 0.519),
];

/// Amazon Aurora
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    /// aurora-mysql or aurora-postgresql
    pub engine: String,
    pub capacity_mode: AuroraCapacity,
    pub instance_class: String,
    pub instance_count: u32,
    /// Average Aurora capacity units for serverless v2
    pub serverless_acu: f64,
    pub storage_gb: f64,
    pub io_requests_millions: f64,
    pub io_optimized: bool,
    pub backup_storage_gb: f64,
    pub backtrack: bool,
    pub backtrack_change_records_millions: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            engine: "aurora-postgresql".to_string(),
            capacity_mode: AuroraCapacity::Provisioned,
            instance_class: "db.r6g.large".to_string(),
            instance_count: 2,
            serverless_acu: 2.0,
            storage_gb: 100.0,
            io_requests_millions: 10.0,
            io_optimized: false,
            backup_storage_gb: 0.0,
            backtrack: false,
            backtrack_change_records_millions: 1.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for AuroraConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let compute_multiplier = if self.io_optimized {
            AURORA_IO_OPTIMIZED_COMPUTE
        } else {
            1.0
        };

        let mut b = BreakdownBuilder::new();
        match self.capacity_mode {
            AuroraCapacity::Provisioned => {
                let class = self.instance_class.as_str();
                b.line(
                    format!("Aurora instances ({class})"),
                    f64::from(self.instance_count) * hours,
                    "Hrs",
                    ctx.rate(codes::AURORA, class, lookup(AURORA_INSTANCES, class))
                        * compute_multiplier,
                );
            }
            AuroraCapacity::Serverless => {
                b.line(
                    "Aurora Serverless v2 capacity",
                    quantity(self.serverless_acu) * hours,
                    "ACU-Hrs",
                    ctx.rate(codes::AURORA, "serverless_acu_hour", 0.12) * compute_multiplier,
                );
            }
        }

        let (storage_sku, storage_default) = if self.io_optimized {
            ("io_optimized_storage", 0.225)
        } else {
            ("storage", 0.10)
        };
        b.line(
            "Cluster storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::AURORA, storage_sku, storage_default),
        )
        .line_if(
            !self.io_optimized,
            "I/O requests",
            self.io_requests_millions,
            "1M requests",
            ctx.rate(codes::AURORA, "io_requests", 0.20),
        )
        .usage(
            "Backup storage",
            billable(self.backup_storage_gb, self.storage_gb),
            "GB-Mo",
            ctx.rate(codes::AURORA, "backup_storage", 0.021),
        )
        .line_if(
            self.backtrack,
            "Backtrack change records",
            self.backtrack_change_records_millions,
            "1M records",
            ctx.rate(codes::AURORA, "backtrack", 0.012),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityMode {
    #[default]
    OnDemand,
    Provisioned,
}

const DAX_NODES: &[(&str, f64)] = &[
    ("dax.t3.small", 0.04),
    ("dax.t3.medium", 0.08),
    ("dax.r5.large", 0.269),
    ("dax.r5.xlarge", 0.537),
];

/// Amazon DynamoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamodbConfig {
    pub capacity_mode: CapacityMode,
    pub write_request_millions: f64,
    pub read_request_millions: f64,
    pub write_capacity_units: f64,
    pub read_capacity_units: f64,
    pub storage_gb: f64,
    /// standard or standard_ia
    pub table_class: String,
    pub include_free_tier: bool,
    pub point_in_time_recovery: bool,
    pub global_table_replicas: u32,
    pub dax: bool,
    pub dax_node_type: String,
    pub dax_nodes: u32,
    pub hours_per_month: Option<f64>,
}

impl Default for DynamodbConfig {
    fn default() -> Self {
        Self {
            capacity_mode: CapacityMode::OnDemand,
            write_request_millions: 1.0,
            read_request_millions: 5.0,
            write_capacity_units: 5.0,
            read_capacity_units: 5.0,
            storage_gb: 10.0,
            table_class: "standard".to_string(),
            include_free_tier: true,
            point_in_time_recovery: false,
            global_table_replicas: 0,
            dax: false,
            dax_node_type: "dax.t3.small".to_string(),
            dax_nodes: 3,
            hours_per_month: None,
        }
    }
}

impl Priceable for DynamodbConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let free = if self.include_free_tier { 25.0 } else { 0.0 };
        let infrequent = self.table_class == "standard_ia";
        let replicas = f64::from(self.global_table_replicas);

        let mut b = BreakdownBuilder::new();
        match self.capacity_mode {
            CapacityMode::OnDemand => {
                b.line(
                    "Write request units",
                    self.write_request_millions,
                    "1M WRU",
                    ctx.rate(codes::DYNAMODB, "write_request_units", 1.25),
                )
                .line(
                    "Read request units",
                    self.read_request_millions,
                    "1M RRU",
                    ctx.rate(codes::DYNAMODB, "read_request_units", 0.25),
                );
            }
            CapacityMode::Provisioned => {
                b.line(
                    "Write capacity units",
                    billable(self.write_capacity_units, free) * hours,
                    "WCU-Hrs",
                    ctx.rate(codes::DYNAMODB, "write_capacity_unit_hour", 0.000_65),
                )
                .line(
                    "Read capacity units",
                    billable(self.read_capacity_units, free) * hours,
                    "RCU-Hrs",
                    ctx.rate(codes::DYNAMODB, "read_capacity_unit_hour", 0.000_13),
                );
            }
        }

        let (storage_sku, storage_default) = if infrequent {
            ("storage_standard_ia", 0.10)
        } else {
            ("storage_standard", 0.25)
        };
        b.line(
            "Table storage",
            billable(self.storage_gb, free),
            "GB-Mo",
            ctx.rate(codes::DYNAMODB, storage_sku, storage_default),
        )
        .line_if(
            self.point_in_time_recovery,
            "Point-in-time recovery",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::DYNAMODB, "pitr_storage", 0.20),
        );

        if self.global_table_replicas > 0 {
            match self.capacity_mode {
                CapacityMode::OnDemand => b.line(
                    "Replicated write request units",
                    replicas * quantity(self.write_request_millions),
                    "1M rWRU",
                    ctx.rate(codes::DYNAMODB, "replicated_write_request_units", 1.875),
                ),
                CapacityMode::Provisioned => b.line(
                    "Replicated write capacity units",
                    replicas * quantity(self.write_capacity_units) * hours,
                    "rWCU-Hrs",
                    ctx.rate(codes::DYNAMODB, "replicated_write_capacity_unit_hour", 0.000_975),
                ),
            };
        }

        let node = self.dax_node_type.as_str();
        b.line_if(
            self.dax,
            format!("DAX cluster ({node})"),
            f64::from(self.dax_nodes) * hours,
            "Hrs",
            ctx.rate(codes::DYNAMODB, node, lookup(DAX_NODES, node)),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CacheEngine {
    #[default]
    Redis,
    Valkey,
    Memcached,
}

// Valkey nodes are priced below Redis OSS
const VALKEY_DISCOUNT_PERCENTAGE: f64 = 20.0;

/// An ElastiCache cluster (replication group)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheCluster {
    /// Key within the cluster list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    pub engine: CacheEngine,
    pub node_type: String,
    pub shards: u32,
    /// Ignored for memcached
    pub replicas_per_shard: u32,
}

impl Default for CacheCluster {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "cache-1".to_string(),
            engine: CacheEngine::Redis,
            node_type: "cache.t3.micro".to_string(),
            shards: 1,
            replicas_per_shard: 1,
        }
    }
}

impl CacheCluster {
    pub fn node_count(&self) -> u32 {
        match self.engine {
            CacheEngine::Memcached => self.shards,
            CacheEngine::Redis | CacheEngine::Valkey => {
                self.shards.saturating_mul(self.replicas_per_shard.saturating_add(1))
            }
        }
    }
}

/// Amazon ElastiCache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticacheConfig {
    pub clusters: Vec<CacheCluster>,
    pub backup_storage_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for ElasticacheConfig {
    fn default() -> Self {
        Self {
            clusters: vec![CacheCluster::default()],
            backup_storage_gb: 0.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for ElasticacheConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let mut b = BreakdownBuilder::new();

        for cluster in &self.clusters {
            let mut rate = ctx.node_rate(codes::ELASTICACHE, &cluster.node_type);
            if cluster.engine == CacheEngine::Valkey {
                rate *= super::discount_multiplier(VALKEY_DISCOUNT_PERCENTAGE);
            }
            b.line(
                format!("Cluster {} ({}, {})", cluster.name, cluster.engine, cluster.node_type),
                f64::from(cluster.node_count()) * hours,
                "Hrs",
                rate,
            );
        }

        b.usage(
            "Backup storage",
            self.backup_storage_gb,
            "GB-Mo",
            ctx.rate(codes::ELASTICACHE, "backup_storage", 0.085),
        );
        b.build()
    }
}

const MEMORYDB_NODES: &[(&str, f64)] = &[
    ("db.t4g.small", 0.054),
    ("db.t4g.medium", 0.108),
    ("db.r6g.large", 0.311),
    ("db.r6g.xlarge", 0.622),
    ("db.r7g.large", 0.327),
];

/// Amazon MemoryDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorydbConfig {
    pub node_type: String,
    pub shards: u32,
    pub replicas_per_shard: u32,
    pub data_written_gb: f64,
    pub snapshot_storage_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for MemorydbConfig {
    fn default() -> Self {
        Self {
            node_type: "db.t4g.small".to_string(),
            shards: 1,
            replicas_per_shard: 1,
            data_written_gb: 10.0,
            snapshot_storage_gb: 0.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for MemorydbConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let nodes = f64::from(self.shards) * (f64::from(self.replicas_per_shard) + 1.0);
        let node = self.node_type.as_str();

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("MemoryDB nodes ({node})"),
            nodes * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::MEMORYDB, node, lookup(MEMORYDB_NODES, node)),
        )
        .line(
            "Data written",
            self.data_written_gb,
            "GB",
            ctx.rate(codes::MEMORYDB, "data_written", 0.20),
        )
        .usage(
            "Snapshot storage",
            self.snapshot_storage_gb,
            "GB-Mo",
            ctx.rate(codes::MEMORYDB, "snapshot_storage", 0.021),
        );
        b.build()
    }
}

/// Amazon OpenSearch Service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpensearchConfig {
    pub instance_type: String,
    pub instance_count: u32,
    pub storage_type: String,
    pub storage_gb_per_node: f64,
    pub dedicated_master: bool,
    pub master_instance_type: String,
    pub master_count: u32,
    pub ultrawarm: bool,
    pub ultrawarm_instance_type: String,
    pub ultrawarm_count: u32,
    pub ultrawarm_storage_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for OpensearchConfig {
    fn default() -> Self {
        Self {
            instance_type: "t3.small.search".to_string(),
            instance_count: 1,
            storage_type: "gp3".to_string(),
            storage_gb_per_node: 10.0,
            dedicated_master: false,
            master_instance_type: "m5.large.search".to_string(),
            master_count: 3,
            ultrawarm: false,
            ultrawarm_instance_type: "ultrawarm1.medium.search".to_string(),
            ultrawarm_count: 2,
            ultrawarm_storage_gb: 100.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for OpensearchConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let count = f64::from(self.instance_count);
        let storage_type = self.storage_type.as_str();
        let storage_default = if storage_type == "gp2" { 0.135 } else { 0.122 };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Data nodes ({})", self.instance_type),
            count * hours,
            "Hrs",
            ctx.node_rate(codes::OPENSEARCH, &self.instance_type),
        )
        .line(
            format!("EBS storage ({storage_type})"),
            count * quantity(self.storage_gb_per_node),
            "GB-Mo",
            ctx.rate(
                codes::OPENSEARCH,
                &format!("opensearch_{storage_type}_storage"),
                storage_default,
            ),
        )
        .line_if(
            self.dedicated_master,
            format!("Dedicated master nodes ({})", self.master_instance_type),
            f64::from(self.master_count) * hours,
            "Hrs",
            ctx.node_rate(codes::OPENSEARCH, &self.master_instance_type),
        );

        if self.ultrawarm {
            b.line(
                format!("UltraWarm nodes ({})", self.ultrawarm_instance_type),
                f64::from(self.ultrawarm_count) * hours,
                "Hrs",
                ctx.rate(codes::OPENSEARCH, &self.ultrawarm_instance_type, 0.238),
            )
            .line(
                "UltraWarm storage",
                self.ultrawarm_storage_gb,
                "GB-Mo",
                ctx.rate(codes::OPENSEARCH, "ultrawarm_storage", 0.024),
            );
        }

        b.build()
    }
}

const REDSHIFT_NODES: &[(&str, f64)] = &[
    ("ra3.xlplus", 1.086),
    ("ra3.4xlarge", 3.26),
    ("ra3.16xlarge", 13.04),
    ("dc2.large", 0.25),
    ("dc2.8xlarge", 4.80),
];

// Free concurrency scaling credits accrued per month (one hour per day)
const REDSHIFT_FREE_SCALING_HOURS: f64 = 30.0;

/// Amazon Redshift (provisioned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedshiftConfig {
    pub node_type: String,
    pub node_count: u32,
    /// RA3 managed storage
    pub managed_storage_gb: f64,
    pub spectrum_tb_scanned: f64,
    pub concurrency_scaling: bool,
    pub concurrency_scaling_hours: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for RedshiftConfig {
    fn default() -> Self {
        Self {
            node_type: "ra3.xlplus".to_string(),
            node_count: 2,
            managed_storage_gb: 100.0,
            spectrum_tb_scanned: 0.0,
            concurrency_scaling: false,
            concurrency_scaling_hours: 60.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for RedshiftConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let node = self.node_type.as_str();
        let nodes = f64::from(self.node_count);
        let node_rate = ctx.rate(codes::REDSHIFT, node, lookup(REDSHIFT_NODES, node));

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Redshift nodes ({node})"),
            nodes * ctx.hours_or(self.hours_per_month),
            "Hrs",
            node_rate,
        )
        .line_if(
            node.starts_with("ra3"),
            "Managed storage",
            self.managed_storage_gb,
            "GB-Mo",
            ctx.rate(codes::REDSHIFT, "managed_storage", 0.024),
        )
        .usage(
            "Spectrum data scanned",
            self.spectrum_tb_scanned,
            "TB",
            ctx.rate(codes::REDSHIFT, "spectrum_tb", 5.00),
        )
        .line_if(
            self.concurrency_scaling,
            "Concurrency scaling",
            billable(self.concurrency_scaling_hours, REDSHIFT_FREE_SCALING_HOURS) * nodes,
            "Hrs",
            node_rate,
        );
        b.build()
    }
}

const DOCUMENTDB_INSTANCES: &[(&str, f64)] = &[
    ("db.t3.medium", 0.078),
    ("db.t4g.medium", 0.073),
    ("db.r5.large", 0.277),
    ("db.r6g.large", 0.249),
];

/// Amazon DocumentDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentdbConfig {
    pub instance_class: String,
    pub instance_count: u32,
    pub storage_gb: f64,
    pub io_requests_millions: f64,
    pub backup_storage_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for DocumentdbConfig {
    fn default() -> Self {
        Self {
            instance_class: "db.t3.medium".to_string(),
            instance_count: 1,
            storage_gb: 10.0,
            io_requests_millions: 1.0,
            backup_storage_gb: 0.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for DocumentdbConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let class = self.instance_class.as_str();
        let mut b = BreakdownBuilder::new();
        b.line(
            format!("DocumentDB instances ({class})"),
            f64::from(self.instance_count) * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::DOCUMENTDB, class, lookup(DOCUMENTDB_INSTANCES, class)),
        )
        .line(
            "Storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::DOCUMENTDB, "storage", 0.10),
        )
        .line(
            "I/O requests",
            self.io_requests_millions,
            "1M requests",
            ctx.rate(codes::DOCUMENTDB, "io_requests", 0.20),
        )
        .usage(
            "Backup storage",
            billable(self.backup_storage_gb, self.storage_gb),
            "GB-Mo",
            ctx.rate(codes::DOCUMENTDB, "backup_storage", 0.021),
        );
        b.build()
    }
}

const NEPTUNE_INSTANCES: &[(&str, f64)] = &[
    ("db.t3.medium", 0.098),
    ("db.t4g.medium", 0.091),
    ("db.r5.large", 0.348),
    ("db.r6g.large", 0.313),
];

/// Amazon Neptune
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeptuneConfig {
    pub instance_class: String,
    pub instance_count: u32,
    pub storage_gb: f64,
    pub io_requests_millions: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for NeptuneConfig {
    fn default() -> Self {
        Self {
            instance_class: "db.t3.medium".to_string(),
            instance_count: 1,
            storage_gb: 10.0,
            io_requests_millions: 1.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for NeptuneConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let class = self.instance_class.as_str();
        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Neptune instances ({class})"),
            f64::from(self.instance_count) * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::NEPTUNE, class, lookup(NEPTUNE_INSTANCES, class)),
        )
        .line(
            "Storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::NEPTUNE, "storage", 0.10),
        )
        .line(
            "I/O requests",
            self.io_requests_millions,
            "1M requests",
            ctx.rate(codes::NEPTUNE, "io_requests", 0.20),
        );
        b.build()
    }
}

/// Amazon Keyspaces (for Apache Cassandra), on-demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyspacesConfig {
    pub write_request_millions: f64,
    pub read_request_millions: f64,
    pub storage_gb: f64,
    pub point_in_time_recovery: bool,
    pub ttl_deletes_millions: f64,
}

impl Default for KeyspacesConfig {
    fn default() -> Self {
        Self {
            write_request_millions: 1.0,
            read_request_millions: 5.0,
            storage_gb: 10.0,
            point_in_time_recovery: false,
            ttl_deletes_millions: 0.0,
        }
    }
}

impl Priceable for KeyspacesConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "Write request units",
            self.write_request_millions,
            "1M WRU",
            ctx.rate(codes::KEYSPACES, "write_request_units", 1.45),
        )
        .line(
            "Read request units",
            self.read_request_millions,
            "1M RRU",
            ctx.rate(codes::KEYSPACES, "read_request_units", 0.29),
        )
        .line(
            "Storage",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::KEYSPACES, "storage", 0.25),
        )
        .line_if(
            self.point_in_time_recovery,
            "Point-in-time recovery",
            self.storage_gb,
            "GB-Mo",
            ctx.rate(codes::KEYSPACES, "pitr_storage", 0.20),
        )
        .usage(
            "TTL deletes",
            self.ttl_deletes_millions,
            "1M deletes",
            ctx.rate(codes::KEYSPACES, "ttl_deletes", 0.335),
        );
        b.build()
    }
}

/// Amazon Timestream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestreamConfig {
    /// 1 KB writes
    pub writes_millions: f64,
    pub memory_store_gb: f64,
    pub magnetic_store_gb: f64,
    pub query_gb_scanned: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for TimestreamConfig {
    fn default() -> Self {
        Self {
            writes_millions: 1.0,
            memory_store_gb: 1.0,
            magnetic_store_gb: 10.0,
            query_gb_scanned: 10.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for TimestreamConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "Writes",
            self.writes_millions,
            "1M writes",
            ctx.rate(codes::TIMESTREAM, "writes", 0.50),
        )
        .line(
            "Memory store",
            quantity(self.memory_store_gb) * ctx.hours_or(self.hours_per_month),
            "GB-Hrs",
            ctx.rate(codes::TIMESTREAM, "memory_store", 0.036),
        )
        .line(
            "Magnetic store",
            self.magnetic_store_gb,
            "GB-Mo",
            ctx.rate(codes::TIMESTREAM, "magnetic_store", 0.03),
        )
        .usage(
            "Queries",
            self.query_gb_scanned,
            "GB",
            ctx.rate(codes::TIMESTREAM, "query_scanned", 0.01),
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
    fn test_rds_defaults() {
        let breakdown = price(&RdsConfig::default());
        let labels: Vec<&str> = breakdown.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "RDS mysql instance (db.t3.micro, Single-AZ)",
                "Storage (gp3)",
                "Backup storage",
            ]
        );
        assert!((breakdown.items[0].total - 730.0 * 0.017).abs() < 1e-9);
        assert!((breakdown.items[1].total - 20.0 * 0.115).abs() < 1e-9);
        // backup within the free allotment
        assert_eq!(breakdown.items[2].total, 0.0);
    }

    #[test]
    fn test_rds_backup_line_requires_retention() {
        let breakdown = price(&RdsConfig {
            backup_retention_days: 0,
            ..RdsConfig::default()
        });
        assert!(breakdown.find("Backup storage").is_none());

        let breakdown = price(&RdsConfig {
            backup_storage_gb: 50.0,
            ..RdsConfig::default()
        });
        assert_eq!(breakdown.find("Backup storage").unwrap().quantity, 30.0);
    }

    #[test]
    fn test_rds_io1_iops_follow_multi_az() {
        let config = RdsConfig {
            storage_type: "io1".to_string(),
            provisioned_iops: 1000.0,
            ..RdsConfig::default()
        };
        let single = price(&config);
        let multi = price(&RdsConfig {
            multi_az: true,
            ..config
        });
        assert_eq!(
            multi.find("Provisioned IOPS").unwrap().total,
            single.find("Provisioned IOPS").unwrap().total * 2.0
        );
    }

    #[test]
    fn test_rds_read_replicas() {
        let breakdown = price(&RdsConfig {
            read_replicas: 2,
            ..RdsConfig::default()
        });
        assert_eq!(breakdown.find("Read replicas").unwrap().quantity, 1460.0);
        assert_eq!(breakdown.find("Read replica storage").unwrap().quantity, 40.0);
    }

    #[test]
    fn test_aurora_io_optimized_drops_io_line() {
        let standard = price(&AuroraConfig::default());
        let optimized = price(&AuroraConfig {
            io_optimized: true,
            ..AuroraConfig::default()
        });
        assert!(standard.find("I/O requests").is_some());
        assert!(optimized.find("I/O requests").is_none());
        assert!(
            (optimized.items[0].unit_price - standard.items[0].unit_price * 1.3).abs() < 1e-12
        );
    }

    #[test]
    fn test_aurora_uses_its_own_instance_rates() {
        let breakdown = price(&AuroraConfig::default());
        let instances = breakdown.find("Aurora instances (db.r6g.large)").unwrap();
        assert_eq!(instances.quantity, 1460.0);
        assert_eq!(instances.unit_price, 0.26);
        // not the RDS class rate
        assert_ne!(
            Some(instances.unit_price),
            domain_pricing::fallback::hourly_rate("db.r6g.large")
        );
    }

    #[test]
    fn test_dynamodb_provisioned_free_tier() {
        let breakdown = price(&DynamodbConfig {
            capacity_mode: CapacityMode::Provisioned,
            ..DynamodbConfig::default()
        });
        // 5 WCU/RCU and 10 GB are inside the free tier
        assert_eq!(breakdown.monthly_total, 0.0);
        assert_eq!(breakdown.len(), 3);
    }

    #[test]
    fn test_dynamodb_dax_is_conditional() {
        let off = price(&DynamodbConfig::default());
        let on = price(&DynamodbConfig {
            dax: true,
            ..DynamodbConfig::default()
        });
        assert_eq!(on.len(), off.len() + 1);
        assert!((on.find("DAX cluster").unwrap().total - 3.0 * 730.0 * 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_elasticache_node_counts() {
        let redis = CacheCluster {
            shards: 2,
            replicas_per_shard: 2,
            ..CacheCluster::default()
        };
        let memcached = CacheCluster {
            engine: CacheEngine::Memcached,
            shards: 3,
            replicas_per_shard: 2,
            ..CacheCluster::default()
        };
        assert_eq!(redis.node_count(), 6);
        assert_eq!(memcached.node_count(), 3);

        let breakdown = price(&ElasticacheConfig {
            clusters: vec![redis, memcached],
            ..ElasticacheConfig::default()
        });
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.items[0].quantity, 6.0 * 730.0);
        assert_eq!(breakdown.items[0].unit_price, 0.017);
    }

    #[test]
    fn test_elasticache_valkey_discount() {
        let breakdown = price(&ElasticacheConfig {
            clusters: vec![CacheCluster {
                engine: CacheEngine::Valkey,
                ..CacheCluster::default()
            }],
            ..ElasticacheConfig::default()
        });
        assert!((breakdown.items[0].unit_price - 0.017 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_opensearch_optional_node_tiers() {
        let base = price(&OpensearchConfig::default());
        assert_eq!(base.len(), 2);

        let full = price(&OpensearchConfig {
            dedicated_master: true,
            ultrawarm: true,
            ..OpensearchConfig::default()
        });
        assert_eq!(full.len(), 5);
        assert_eq!(full.items[2].unit_price, 0.142);
    }

    #[test]
    fn test_redshift_concurrency_scaling_free_credits() {
        let breakdown = price(&RedshiftConfig {
            concurrency_scaling: true,
            ..RedshiftConfig::default()
        });
        assert_eq!(breakdown.find("Concurrency scaling").unwrap().quantity, 60.0);

        let dc2 = price(&RedshiftConfig {
            node_type: "dc2.large".to_string(),
            ..RedshiftConfig::default()
        });
        assert!(dc2.find("Managed storage").is_none());
    }
}
