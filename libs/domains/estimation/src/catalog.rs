//! The service catalog.
//!
//! One table maps every service type to its typed configuration, its
//! calculator and its display metadata. [`ServiceType`], [`ServiceConfig`],
//! defaults, dispatch and descriptors are all generated from it, so adding a
//! service is a single entry.

use domain_pricing::{OptionCategory, PricingRepository, Region, codes};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::calculators::{
    Priceable, analytics, compute, database, integration, management, networking, security,
    storage,
};

/// Console grouping of services
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceGroup {
    Compute,
    Storage,
    Database,
    Networking,
    Integration,
    Security,
    Management,
    Analytics,
}

/// Where the choices of one option category are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSource {
    pub category: OptionCategory,
    pub service_code: &'static str,
    /// Key prefix for categories discovered by naming convention
    /// (`StorageVariant`, `Capacity`); node families need none
    pub sku_prefix: Option<&'static str>,
}

/// Display and pricing metadata of a service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub service_type: ServiceType,
    pub display_name: &'static str,
    /// Offer code the calculator reads its own SKUs from
    pub service_code: &'static str,
    pub sku_prefix: &'static str,
    pub group: ServiceGroup,
    /// Name given to a fresh draft of this type
    pub default_name: &'static str,
    pub options: &'static [OptionSource],
}

impl ServiceDescriptor {
    pub fn option_categories(&self) -> Vec<OptionCategory> {
        self.options.iter().map(|source| source.category).collect()
    }

    pub fn option_source(&self, category: OptionCategory) -> Option<&'static OptionSource> {
        self.options.iter().find(|source| source.category == category)
    }
}

macro_rules! service_catalog {
    (@prefix) => { None };
    (@prefix $option_prefix:literal) => { Some($option_prefix) };
    (
        $(
            $variant:ident($config:ty) {
                name: $name:literal,
                code: $code:expr,
                prefix: $prefix:literal,
                group: $group:ident,
                default_name: $default_name:literal,
                options: [$(($category:ident, $option_code:expr $(, $option_prefix:literal)?)),* $(,)?] $(,)?
            }
        ),+ $(,)?
    ) => {
        /// Every service the estimator can price
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Serialize,
            Deserialize,
            Display,
            EnumString,
            EnumIter,
            IntoStaticStr,
        )]
        #[serde(rename_all = "snake_case")]
        #[strum(serialize_all = "snake_case")]
        pub enum ServiceType {
            $($variant,)+
        }

        /// A service configuration: the service type plus only that
        /// service's attributes.
        ///
        /// Serialized with a `service_type` tag. Unrecognized tags decode to
        /// [`ServiceConfig::Unknown`], which prices to nothing.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "service_type", rename_all = "snake_case")]
        pub enum ServiceConfig {
            $($variant($config),)+
            #[serde(other)]
            Unknown,
        }

        impl ServiceConfig {
            /// Default attributes for a fresh draft of `service_type`
            pub fn defaults(service_type: ServiceType) -> Self {
                match service_type {
                    $(ServiceType::$variant => Self::$variant(<$config>::default()),)+
                }
            }

            /// `None` for [`ServiceConfig::Unknown`]
            pub fn service_type(&self) -> Option<ServiceType> {
                match self {
                    $(Self::$variant(_) => Some(ServiceType::$variant),)+
                    Self::Unknown => None,
                }
            }

            pub(crate) fn priceable(&self) -> Option<&dyn Priceable> {
                match self {
                    $(Self::$variant(config) => Some(config as &dyn Priceable),)+
                    Self::Unknown => None,
                }
            }
        }

        impl ServiceType {
            pub fn descriptor(self) -> ServiceDescriptor {
                match self {
                    $(Self::$variant => ServiceDescriptor {
                        service_type: self,
                        display_name: $name,
                        service_code: $code,
                        sku_prefix: $prefix,
                        group: ServiceGroup::$group,
                        default_name: $default_name,
                        options: &[$(OptionSource {
                            category: OptionCategory::$category,
                            service_code: $option_code,
                            sku_prefix: service_catalog!(@prefix $($option_prefix)?),
                        }),*],
                    },)+
                }
            }
        }
    };
}

service_catalog! {
    Ec2(compute::Ec2Config) {
        name: "Amazon EC2", code: codes::EC2, prefix: "ebs", group: Compute,
        default_name: "web-server",
        options: [(InstanceType, codes::EC2), (StorageVariant, codes::EC2, "ebs")],
    },
    Lightsail(compute::LightsailConfig) {
        name: "Amazon Lightsail", code: codes::LIGHTSAIL, prefix: "bundle", group: Compute,
        default_name: "lightsail-instance",
        options: [(Capacity, codes::LIGHTSAIL, "bundle")],
    },
    Lambda(compute::LambdaConfig) {
        name: "AWS Lambda", code: codes::LAMBDA, prefix: "lambda", group: Compute,
        default_name: "function",
        options: [],
    },
    Fargate(compute::FargateConfig) {
        name: "AWS Fargate", code: codes::FARGATE, prefix: "fargate", group: Compute,
        default_name: "fargate-service",
        options: [],
    },
    Eks(compute::EksConfig) {
        name: "Amazon EKS", code: codes::EKS, prefix: "eks", group: Compute,
        default_name: "eks-cluster",
        options: [(InstanceType, codes::EC2)],
    },
    AppRunner(compute::AppRunnerConfig) {
        name: "AWS App Runner", code: codes::APP_RUNNER, prefix: "apprunner", group: Compute,
        default_name: "app-runner-service",
        options: [],
    },
    Ecr(compute::EcrConfig) {
        name: "Amazon ECR", code: codes::ECR, prefix: "ecr", group: Compute,
        default_name: "container-registry",
        options: [],
    },
    S3(storage::S3Config) {
        name: "Amazon S3", code: codes::S3, prefix: "s3", group: Storage,
        default_name: "bucket",
        options: [(StorageVariant, codes::S3, "s3")],
    },
    Ebs(storage::EbsConfig) {
        name: "Amazon EBS", code: codes::EC2, prefix: "ebs", group: Storage,
        default_name: "volumes",
        options: [(StorageVariant, codes::EC2, "ebs")],
    },
    Efs(storage::EfsConfig) {
        name: "Amazon EFS", code: codes::EFS, prefix: "efs", group: Storage,
        default_name: "file-system",
        options: [(StorageVariant, codes::EFS, "efs")],
    },
    Fsx(storage::FsxConfig) {
        name: "Amazon FSx", code: codes::FSX, prefix: "fsx", group: Storage,
        default_name: "fsx-file-system",
        options: [(StorageVariant, codes::FSX, "fsx")],
    },
    Backup(storage::BackupConfig) {
        name: "AWS Backup", code: codes::BACKUP, prefix: "backup", group: Storage,
        default_name: "backup-plan",
        options: [],
    },
    Rds(database::RdsConfig) {
        name: "Amazon RDS", code: codes::RDS, prefix: "rds", group: Database,
        default_name: "database",
        options: [(DatabaseClass, codes::RDS), (StorageVariant, codes::RDS, "rds")],
    },
    Aurora(database::AuroraConfig) {
        name: "Amazon Aurora", code: codes::AURORA, prefix: "aurora", group: Database,
        default_name: "aurora-cluster",
        options: [(DatabaseClass, codes::AURORA)],
    },
    Dynamodb(database::DynamodbConfig) {
        name: "Amazon DynamoDB", code: codes::DYNAMODB, prefix: "dynamodb", group: Database,
        default_name: "table",
        options: [],
    },
    Elasticache(database::ElasticacheConfig) {
        name: "Amazon ElastiCache", code: codes::ELASTICACHE, prefix: "cache", group: Database,
        default_name: "cache",
        options: [(CacheNodeType, codes::ELASTICACHE)],
    },
    Memorydb(database::MemorydbConfig) {
        name: "Amazon MemoryDB", code: codes::MEMORYDB, prefix: "memorydb", group: Database,
        default_name: "memorydb-cluster",
        options: [(DatabaseClass, codes::MEMORYDB)],
    },
    Opensearch(database::OpensearchConfig) {
        name: "Amazon OpenSearch Service", code: codes::OPENSEARCH, prefix: "opensearch",
        group: Database,
        default_name: "search-domain",
        options: [
            (SearchNodeType, codes::OPENSEARCH),
            (StorageVariant, codes::OPENSEARCH, "opensearch"),
        ],
    },
    Redshift(database::RedshiftConfig) {
        name: "Amazon Redshift", code: codes::REDSHIFT, prefix: "redshift", group: Database,
        default_name: "warehouse",
        options: [(InstanceType, codes::REDSHIFT)],
    },
    Documentdb(database::DocumentdbConfig) {
        name: "Amazon DocumentDB", code: codes::DOCUMENTDB, prefix: "docdb", group: Database,
        default_name: "docdb-cluster",
        options: [(DatabaseClass, codes::DOCUMENTDB)],
    },
    Neptune(database::NeptuneConfig) {
        name: "Amazon Neptune", code: codes::NEPTUNE, prefix: "neptune", group: Database,
        default_name: "graph-database",
        options: [(DatabaseClass, codes::NEPTUNE)],
    },
    Keyspaces(database::KeyspacesConfig) {
        name: "Amazon Keyspaces", code: codes::KEYSPACES, prefix: "keyspaces", group: Database,
        default_name: "keyspace",
        options: [],
    },
    Timestream(database::TimestreamConfig) {
        name: "Amazon Timestream", code: codes::TIMESTREAM, prefix: "timestream",
        group: Database,
        default_name: "timeseries-database",
        options: [],
    },
    Vpc(networking::VpcConfig) {
        name: "Amazon VPC", code: codes::VPC, prefix: "vpc", group: Networking,
        default_name: "vpc",
        options: [],
    },
    Elb(networking::ElbConfig) {
        name: "Elastic Load Balancing", code: codes::ELB, prefix: "elb", group: Networking,
        default_name: "load-balancers",
        options: [],
    },
    Cloudfront(networking::CloudfrontConfig) {
        name: "Amazon CloudFront", code: codes::CLOUDFRONT, prefix: "cloudfront",
        group: Networking,
        default_name: "cdn",
        options: [],
    },
    Route53(networking::Route53Config) {
        name: "Amazon Route 53", code: codes::ROUTE53, prefix: "route53", group: Networking,
        default_name: "dns",
        options: [],
    },
    ApiGateway(networking::ApiGatewayConfig) {
        name: "Amazon API Gateway", code: codes::API_GATEWAY, prefix: "cache", group: Networking,
        default_name: "api",
        options: [(Capacity, codes::API_GATEWAY, "cache")],
    },
    DirectConnect(networking::DirectConnectConfig) {
        name: "AWS Direct Connect", code: codes::DIRECT_CONNECT, prefix: "port",
        group: Networking,
        default_name: "direct-connect",
        options: [(Capacity, codes::DIRECT_CONNECT, "port")],
    },
    GlobalAccelerator(networking::GlobalAcceleratorConfig) {
        name: "AWS Global Accelerator", code: codes::GLOBAL_ACCELERATOR, prefix: "accelerator",
        group: Networking,
        default_name: "accelerators",
        options: [],
    },
    TransitGateway(networking::TransitGatewayConfig) {
        name: "AWS Transit Gateway", code: codes::TRANSIT_GATEWAY, prefix: "tgw",
        group: Networking,
        default_name: "transit-gateway",
        options: [],
    },
    DataTransfer(networking::DataTransferConfig) {
        name: "Data Transfer", code: codes::DATA_TRANSFER, prefix: "transfer", group: Networking,
        default_name: "data-transfer",
        options: [],
    },
    Sqs(integration::SqsConfig) {
        name: "Amazon SQS", code: codes::SQS, prefix: "sqs", group: Integration,
        default_name: "queue",
        options: [],
    },
    Sns(integration::SnsConfig) {
        name: "Amazon SNS", code: codes::SNS, prefix: "sns", group: Integration,
        default_name: "topic",
        options: [],
    },
    Eventbridge(integration::EventbridgeConfig) {
        name: "Amazon EventBridge", code: codes::EVENTBRIDGE, prefix: "events",
        group: Integration,
        default_name: "event-bus",
        options: [],
    },
    StepFunctions(integration::StepFunctionsConfig) {
        name: "AWS Step Functions", code: codes::STEP_FUNCTIONS, prefix: "states",
        group: Integration,
        default_name: "state-machine",
        options: [],
    },
    Kinesis(integration::KinesisConfig) {
        name: "Amazon Kinesis Data Streams", code: codes::KINESIS, prefix: "kinesis",
        group: Integration,
        default_name: "stream",
        options: [],
    },
    Firehose(integration::FirehoseConfig) {
        name: "Amazon Data Firehose", code: codes::FIREHOSE, prefix: "firehose",
        group: Integration,
        default_name: "delivery-stream",
        options: [],
    },
    Msk(integration::MskConfig) {
        name: "Amazon MSK", code: codes::MSK, prefix: "msk", group: Integration,
        default_name: "kafka-cluster",
        options: [(InstanceType, codes::MSK)],
    },
    Mq(integration::MqConfig) {
        name: "Amazon MQ", code: codes::MQ, prefix: "mq", group: Integration,
        default_name: "message-broker",
        options: [(InstanceType, codes::MQ)],
    },
    Kms(security::KmsConfig) {
        name: "AWS KMS", code: codes::KMS, prefix: "kms", group: Security,
        default_name: "keys",
        options: [],
    },
    SecretsManager(security::SecretsManagerConfig) {
        name: "AWS Secrets Manager", code: codes::SECRETS_MANAGER, prefix: "secrets",
        group: Security,
        default_name: "secrets",
        options: [],
    },
    Waf(security::WafConfig) {
        name: "AWS WAF", code: codes::WAF, prefix: "waf", group: Security,
        default_name: "web-acl",
        options: [],
    },
    Guardduty(security::GuarddutyConfig) {
        name: "Amazon GuardDuty", code: codes::GUARDDUTY, prefix: "guardduty", group: Security,
        default_name: "threat-detection",
        options: [],
    },
    Cognito(security::CognitoConfig) {
        name: "Amazon Cognito", code: codes::COGNITO, prefix: "cognito", group: Security,
        default_name: "user-pool",
        options: [],
    },
    Cloudwatch(management::CloudwatchConfig) {
        name: "Amazon CloudWatch", code: codes::CLOUDWATCH, prefix: "cloudwatch",
        group: Management,
        default_name: "monitoring",
        options: [],
    },
    Cloudtrail(management::CloudtrailConfig) {
        name: "AWS CloudTrail", code: codes::CLOUDTRAIL, prefix: "cloudtrail",
        group: Management,
        default_name: "audit-trail",
        options: [],
    },
    Config(management::ConfigServiceConfig) {
        name: "AWS Config", code: codes::CONFIG, prefix: "config", group: Management,
        default_name: "config-recorder",
        options: [],
    },
    Athena(analytics::AthenaConfig) {
        name: "Amazon Athena", code: codes::ATHENA, prefix: "athena", group: Analytics,
        default_name: "query-workgroup",
        options: [],
    },
    Glue(analytics::GlueConfig) {
        name: "AWS Glue", code: codes::GLUE, prefix: "glue", group: Analytics,
        default_name: "etl-jobs",
        options: [],
    },
    Emr(analytics::EmrConfig) {
        name: "Amazon EMR", code: codes::EMR, prefix: "emr", group: Analytics,
        default_name: "emr-cluster",
        options: [(InstanceType, codes::EC2)],
    },
    Sagemaker(analytics::SagemakerConfig) {
        name: "Amazon SageMaker", code: codes::SAGEMAKER, prefix: "sagemaker", group: Analytics,
        default_name: "ml-endpoint",
        options: [(InstanceType, codes::SAGEMAKER)],
    },
}

impl ServiceType {
    pub fn all() -> impl Iterator<Item = ServiceType> {
        Self::iter()
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn default_name(self) -> &'static str {
        self.descriptor().default_name
    }

    pub fn group(self) -> ServiceGroup {
        self.descriptor().group
    }

    /// Choices for one option category of this service in `region`.
    ///
    /// Empty when the service has no such category.
    pub fn options(
        self,
        repository: &PricingRepository,
        region: Region,
        category: OptionCategory,
    ) -> Vec<String> {
        match self.descriptor().option_source(category) {
            Some(source) => repository.service_options(
                region,
                source.service_code,
                category,
                source.sku_prefix.unwrap_or_default(),
            ),
            None => Vec::new(),
        }
    }
}
