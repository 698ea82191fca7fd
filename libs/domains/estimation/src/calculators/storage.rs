//! Block, object, file and backup storage.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::networking::internet_egress;
use super::{BreakdownBuilder, Priceable, PricingContext, billable, lookup, quantity};
use crate::models::CostBreakdown;

const EBS_STORAGE: &[(&str, f64)] = &[
    ("gp3", 0.08),
    ("gp2", 0.10),
    ("io1", 0.125),
    ("io2", 0.125),
    ("st1", 0.045),
    ("sc1", 0.015),
    ("standard", 0.05),
];

const GP3_BASELINE_IOPS: f64 = 3000.0;
const GP3_BASELINE_THROUGHPUT: f64 = 125.0;

/// An EBS volume, attached to an instance or standalone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsVolume {
    /// Key within a volume list; nil until the caller assigns one
    pub id: Uuid,
    /// gp3, gp2, io1, io2, st1, sc1 or standard
    pub volume_type: String,
    pub size_gb: f64,
    /// Provisioned IOPS (io1/io2) or total IOPS (gp3)
    pub iops: f64,
    /// gp3 throughput in MB/s
    pub throughput_mbps: f64,
}

impl Default for EbsVolume {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            volume_type: "gp3".to_string(),
            size_gb: 100.0,
            iops: GP3_BASELINE_IOPS,
            throughput_mbps: GP3_BASELINE_THROUGHPUT,
        }
    }
}

impl EbsVolume {
    pub fn gp3(size_gb: f64) -> Self {
        Self {
            size_gb,
            ..Self::default()
        }
    }

    fn has_provisioned_iops(&self) -> bool {
        matches!(self.volume_type.as_str(), "io1" | "io2")
    }

    /// Storage and performance lines for `copies` identical volumes.
    ///
    /// EBS prices live under the EC2 offer, keyed `ebs_<type>_storage`.
    pub(crate) fn price_lines(&self, ctx: &PricingContext<'_>, label: &str, copies: f64) -> CostBreakdown {
        let volume_type = self.volume_type.as_str();
        let mut b = BreakdownBuilder::new();

        b.line(
            format!("{label} ({volume_type})"),
            quantity(self.size_gb) * copies,
            "GB-Mo",
            ctx.rate(
                codes::EC2,
                &format!("ebs_{volume_type}_storage"),
                lookup(EBS_STORAGE, volume_type),
            ),
        );

        if self.has_provisioned_iops() {
            b.line(
                format!("{label} provisioned IOPS"),
                quantity(self.iops) * copies,
                "IOPS-Mo",
                ctx.rate(codes::EC2, &format!("ebs_{volume_type}_iops"), 0.065),
            );
        } else if volume_type == "gp3" {
            b.usage(
                format!("{label} extra IOPS"),
                billable(self.iops, GP3_BASELINE_IOPS) * copies,
                "IOPS-Mo",
                ctx.rate(codes::EC2, "ebs_gp3_iops", 0.005),
            )
            .usage(
                format!("{label} extra throughput"),
                billable(self.throughput_mbps, GP3_BASELINE_THROUGHPUT) * copies,
                "MBps-Mo",
                ctx.rate(codes::EC2, "ebs_gp3_throughput", 0.04),
            );
        }

        b.build()
    }
}

/// Amazon S3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// standard, intelligent_tiering, standard_ia, one_zone_ia,
    /// glacier_instant, glacier_flexible or deep_archive
    pub storage_class: String,
    pub storage_gb: f64,
    pub put_requests_thousands: f64,
    pub get_requests_thousands: f64,
    pub data_transfer_out_gb: f64,
    pub replication: bool,
    pub replicated_gb: f64,
    pub transfer_acceleration: bool,
    pub accelerated_gb: f64,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            storage_class: "standard".to_string(),
            storage_gb: 100.0,
            put_requests_thousands: 10.0,
            get_requests_thousands: 100.0,
            data_transfer_out_gb: 0.0,
            replication: false,
            replicated_gb: 100.0,
            transfer_acceleration: false,
            accelerated_gb: 100.0,
        }
    }
}

// (class, storage GB-Mo, PUT per 1k, GET per 1k)
const S3_CLASSES: &[(&str, f64, f64, f64)] = &[
    ("standard", 0.023, 0.005, 0.0004),
    ("intelligent_tiering", 0.023, 0.005, 0.0004),
    ("standard_ia", 0.0125, 0.01, 0.001),
    ("one_zone_ia", 0.01, 0.01, 0.001),
    ("glacier_instant", 0.004, 0.02, 0.01),
    ("glacier_flexible", 0.0036, 0.03, 0.0004),
    ("deep_archive", 0.00099, 0.05, 0.0004),
];

impl Priceable for S3Config {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let class = self.storage_class.as_str();
        let (_, storage, put, get) = S3_CLASSES
            .iter()
            .copied()
            .find(|(name, ..)| *name == class)
            .unwrap_or(("", 0.0, 0.0, 0.0));
        let storage_sku = format!("s3_{class}_storage");

        let mut b = BreakdownBuilder::new();
        if class == "standard" {
            let tiers = ctx.tiers(
                codes::S3,
                &storage_sku,
                &[(Some(51_200.0), 0.023), (Some(512_000.0), 0.022), (None, 0.021)],
            );
            b.tiered("S3 Standard storage", self.storage_gb, "GB-Mo", &tiers);
        } else {
            b.line(
                format!("S3 storage ({class})"),
                self.storage_gb,
                "GB-Mo",
                ctx.rate(codes::S3, &storage_sku, storage),
            );
        }

        b.line(
            "PUT/COPY/POST/LIST requests",
            self.put_requests_thousands,
            "1K requests",
            ctx.rate(codes::S3, &format!("s3_{class}_put_requests"), put),
        )
        .line(
            "GET/SELECT requests",
            self.get_requests_thousands,
            "1K requests",
            ctx.rate(codes::S3, &format!("s3_{class}_get_requests"), get),
        );

        internet_egress(&mut b, ctx, self.data_transfer_out_gb);

        b.line_if(
            self.replication,
            "Cross-region replication transfer",
            self.replicated_gb,
            "GB",
            ctx.rate(codes::S3, "replication_transfer", 0.02),
        )
        .line_if(
            self.transfer_acceleration,
            "Transfer Acceleration",
            self.accelerated_gb,
            "GB",
            ctx.rate(codes::S3, "transfer_acceleration", 0.04),
        );

        b.build()
    }
}

/// Amazon EBS volumes and snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsConfig {
    pub volumes: Vec<EbsVolume>,
    pub snapshots: bool,
    pub snapshot_gb: f64,
}

impl Default for EbsConfig {
    fn default() -> Self {
        Self {
            volumes: vec![EbsVolume::default()],
            snapshots: false,
            snapshot_gb: 50.0,
        }
    }
}

impl Priceable for EbsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        for (index, volume) in self.volumes.iter().enumerate() {
            b.extend(volume.price_lines(ctx, &format!("Volume {}", index + 1), 1.0));
        }
        b.line_if(
            self.snapshots,
            "Snapshot storage",
            self.snapshot_gb,
            "GB-Mo",
            ctx.rate(codes::EC2, "ebs_snapshot_storage", 0.05),
        );
        b.build()
    }
}

/// Amazon EFS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfsConfig {
    /// standard (regional) or one_zone
    pub storage_class: String,
    pub storage_gb: f64,
    /// Share of data in Infrequent Access, 0..=100
    pub infrequent_access_percentage: f64,
    pub ia_access_gb: f64,
    pub provisioned_throughput: bool,
    pub throughput_mbps: f64,
}

impl Default for EfsConfig {
    fn default() -> Self {
        Self {
            storage_class: "standard".to_string(),
            storage_gb: 100.0,
            infrequent_access_percentage: 0.0,
            ia_access_gb: 0.0,
            provisioned_throughput: false,
            throughput_mbps: 10.0,
        }
    }
}

impl Priceable for EfsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let one_zone = self.storage_class == "one_zone";
        let ia_share = quantity(self.infrequent_access_percentage).min(100.0) / 100.0;
        let storage = quantity(self.storage_gb);
        let (class, hot_default, ia_class, ia_default) = if one_zone {
            ("one_zone", 0.16, "one_zone_ia", 0.0133)
        } else {
            ("standard", 0.30, "standard_ia", 0.025)
        };

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("EFS storage ({class})"),
            storage * (1.0 - ia_share),
            "GB-Mo",
            ctx.rate(codes::EFS, &format!("efs_{class}_storage"), hot_default),
        )
        .usage(
            format!("EFS storage ({ia_class})"),
            storage * ia_share,
            "GB-Mo",
            ctx.rate(codes::EFS, &format!("efs_{ia_class}_storage"), ia_default),
        )
        .usage(
            "Infrequent Access reads",
            self.ia_access_gb,
            "GB",
            ctx.rate(codes::EFS, "ia_access", 0.01),
        )
        .line_if(
            self.provisioned_throughput,
            "Provisioned throughput",
            self.throughput_mbps,
            "MBps-Mo",
            ctx.rate(codes::EFS, "provisioned_throughput", 6.00),
        );
        b.build()
    }
}

const FSX_STORAGE: &[(&str, f64)] = &[
    ("windows", 0.13),
    ("lustre", 0.145),
    ("ontap", 0.125),
    ("openzfs", 0.09),
];

const FSX_THROUGHPUT: &[(&str, f64)] = &[("windows", 2.20), ("ontap", 0.72), ("openzfs", 0.26)];

/// Amazon FSx
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsxConfig {
    /// windows, lustre, ontap or openzfs
    pub file_system: String,
    pub multi_az: bool,
    pub storage_gb: f64,
    pub throughput_mbps: f64,
    pub backups: bool,
    pub backup_gb: f64,
}

impl Default for FsxConfig {
    fn default() -> Self {
        Self {
            file_system: "windows".to_string(),
            multi_az: false,
            storage_gb: 1024.0,
            throughput_mbps: 32.0,
            backups: false,
            backup_gb: 100.0,
        }
    }
}

impl Priceable for FsxConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let fs = self.file_system.as_str();
        let deployments = if self.multi_az { 2.0 } else { 1.0 };
        let throughput_rate = ctx.rate(
            codes::FSX,
            &format!("fsx_{fs}_throughput"),
            lookup(FSX_THROUGHPUT, fs),
        );

        let mut b = BreakdownBuilder::new();
        b.line(
            format!("FSx storage ({fs})"),
            quantity(self.storage_gb) * deployments,
            "GB-Mo",
            ctx.rate(codes::FSX, &format!("fsx_{fs}_storage"), lookup(FSX_STORAGE, fs)),
        )
        // Lustre includes throughput in the storage price
        .line_if(
            throughput_rate > 0.0,
            "Throughput capacity",
            quantity(self.throughput_mbps) * deployments,
            "MBps-Mo",
            throughput_rate,
        )
        .line_if(
            self.backups,
            "Backup storage",
            self.backup_gb,
            "GB-Mo",
            ctx.rate(codes::FSX, "fsx_backup", 0.05),
        );
        b.build()
    }
}

/// A backup vault and the data it protects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupVault {
    /// Key within the vault list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    /// ebs, rds, efs, s3 or dynamodb
    pub resource_kind: String,
    pub warm_storage_gb: f64,
    pub cold_storage_gb: f64,
}

impl Default for BackupVault {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "default".to_string(),
            resource_kind: "ebs".to_string(),
            warm_storage_gb: 100.0,
            cold_storage_gb: 0.0,
        }
    }
}

const BACKUP_WARM: &[(&str, f64)] = &[
    ("ebs", 0.05),
    ("rds", 0.095),
    ("efs", 0.05),
    ("s3", 0.05),
    ("dynamodb", 0.10),
];

/// AWS Backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub vaults: Vec<BackupVault>,
    pub restore_gb: f64,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            vaults: vec![BackupVault::default()],
            restore_gb: 0.0,
        }
    }
}

impl Priceable for BackupConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        for vault in &self.vaults {
            let kind = vault.resource_kind.as_str();
            b.line(
                format!("Vault {} warm storage ({kind})", vault.name),
                vault.warm_storage_gb,
                "GB-Mo",
                ctx.rate(codes::BACKUP, &format!("backup_{kind}_warm"), lookup(BACKUP_WARM, kind)),
            )
            .usage(
                format!("Vault {} cold storage ({kind})", vault.name),
                vault.cold_storage_gb,
                "GB-Mo",
                ctx.rate(codes::BACKUP, &format!("backup_{kind}_cold"), 0.01),
            );
        }
        b.usage(
            "Restores",
            self.restore_gb,
            "GB",
            ctx.rate(codes::BACKUP, "restore", 0.02),
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
    fn test_s3_standard_defaults() {
        let breakdown = price(&S3Config::default());
        // storage, PUT, GET
        assert_eq!(breakdown.len(), 3);
        assert!((breakdown.items[0].total - 2.3).abs() < 1e-9);
        assert!((breakdown.monthly_total - (2.3 + 0.05 + 0.04)).abs() < 1e-9);
    }

    #[test]
    fn test_s3_non_standard_class_is_flat() {
        let config = S3Config {
            storage_class: "deep_archive".to_string(),
            storage_gb: 1000.0,
            ..S3Config::default()
        };
        let breakdown = price(&config);
        assert_eq!(breakdown.items[0].label, "S3 storage (deep_archive)");
        assert!((breakdown.items[0].total - 0.99).abs() < 1e-9);
    }

    #[test]
    fn test_s3_egress_after_free_allotment() {
        let config = S3Config {
            data_transfer_out_gb: 150.0,
            ..S3Config::default()
        };
        let egress = price(&config);
        let line = egress.find("Data transfer out").unwrap();
        assert_eq!(line.quantity, 50.0);
        assert_eq!(line.unit_price, 0.09);
    }

    #[test]
    fn test_ebs_volume_lines() {
        let io2 = EbsVolume {
            volume_type: "io2".to_string(),
            size_gb: 100.0,
            iops: 4000.0,
            ..EbsVolume::default()
        };
        let fast_gp3 = EbsVolume {
            iops: 6000.0,
            throughput_mbps: 250.0,
            ..EbsVolume::gp3(50.0)
        };
        let breakdown = price(&EbsConfig {
            volumes: vec![io2, fast_gp3],
            snapshots: true,
            snapshot_gb: 10.0,
        });

        let labels: Vec<&str> = breakdown.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Volume 1 (io2)",
                "Volume 1 provisioned IOPS",
                "Volume 2 (gp3)",
                "Volume 2 extra IOPS",
                "Volume 2 extra throughput",
                "Snapshot storage",
            ]
        );
        assert_eq!(breakdown.items[3].quantity, 3000.0);
        assert_eq!(breakdown.items[4].quantity, 125.0);
    }

    #[test]
    fn test_empty_volume_list_has_no_lines() {
        let breakdown = price(&EbsConfig {
            volumes: vec![],
            ..EbsConfig::default()
        });
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.monthly_total, 0.0);
    }

    #[test]
    fn test_efs_infrequent_access_split() {
        let breakdown = price(&EfsConfig {
            infrequent_access_percentage: 80.0,
            ..EfsConfig::default()
        });
        assert_eq!(breakdown.len(), 2);
        assert!((breakdown.items[0].quantity - 20.0).abs() < 1e-9);
        assert!((breakdown.items[1].quantity - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_fsx_multi_az_doubles_storage_and_throughput() {
        let single = price(&FsxConfig::default());
        let multi = price(&FsxConfig {
            multi_az: true,
            ..FsxConfig::default()
        });
        assert_eq!(multi.items[0].total, single.items[0].total * 2.0);
        assert_eq!(multi.items[1].total, single.items[1].total * 2.0);
    }

    #[test]
    fn test_fsx_lustre_has_no_throughput_line() {
        let breakdown = price(&FsxConfig {
            file_system: "lustre".to_string(),
            ..FsxConfig::default()
        });
        assert_eq!(breakdown.len(), 1);
    }

    #[test]
    fn test_backup_fans_out_over_vaults() {
        let config = BackupConfig {
            vaults: vec![
                BackupVault::default(),
                BackupVault {
                    name: "databases".to_string(),
                    resource_kind: "rds".to_string(),
                    warm_storage_gb: 200.0,
                    cold_storage_gb: 0.0,
                    ..BackupVault::default()
                },
            ],
            restore_gb: 0.0,
        };
        let breakdown = price(&config);
        assert_eq!(breakdown.len(), 2);
        assert!((breakdown.monthly_total - (5.0 + 19.0)).abs() < 1e-9);
    }
}
