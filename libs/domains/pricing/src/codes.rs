//! Service codes used as the second level of the pricing artifact.
//!
//! They follow the AWS Price List offer codes so an artifact produced from the
//! AWS bulk API can be consumed without remapping.

pub const EC2: &str = "AmazonEC2";
pub const LIGHTSAIL: &str = "AmazonLightsail";
pub const LAMBDA: &str = "AWSLambda";
pub const FARGATE: &str = "AmazonECS";
pub const EKS: &str = "AmazonEKS";
pub const APP_RUNNER: &str = "AWSAppRunner";
pub const ECR: &str = "AmazonECR";

pub const S3: &str = "AmazonS3";
pub const EFS: &str = "AmazonEFS";
pub const FSX: &str = "AmazonFSx";
pub const BACKUP: &str = "AWSBackup";

pub const RDS: &str = "AmazonRDS";
pub const AURORA: &str = "AmazonAurora";
pub const DYNAMODB: &str = "AmazonDynamoDB";
pub const ELASTICACHE: &str = "AmazonElastiCache";
pub const MEMORYDB: &str = "AmazonMemoryDB";
pub const OPENSEARCH: &str = "AmazonES";
pub const REDSHIFT: &str = "AmazonRedshift";
pub const DOCUMENTDB: &str = "AmazonDocDB";
pub const NEPTUNE: &str = "AmazonNeptune";
pub const KEYSPACES: &str = "AmazonMCS";
pub const TIMESTREAM: &str = "AmazonTimestream";

pub const VPC: &str = "AmazonVPC";
pub const ELB: &str = "AWSELB";
pub const CLOUDFRONT: &str = "AmazonCloudFront";
pub const ROUTE53: &str = "AmazonRoute53";
pub const API_GATEWAY: &str = "AmazonApiGateway";
pub const DIRECT_CONNECT: &str = "AWSDirectConnect";
pub const GLOBAL_ACCELERATOR: &str = "AWSGlobalAccelerator";
pub const TRANSIT_GATEWAY: &str = "AWSTransitGateway";
pub const DATA_TRANSFER: &str = "AWSDataTransfer";

pub const SQS: &str = "AWSQueueService";
pub const SNS: &str = "AmazonSNS";
pub const EVENTBRIDGE: &str = "AWSEvents";
pub const STEP_FUNCTIONS: &str = "AmazonStates";
pub const KINESIS: &str = "AmazonKinesis";
pub const FIREHOSE: &str = "AmazonKinesisFirehose";
pub const MSK: &str = "AmazonMSK";
pub const MQ: &str = "AmazonMQ";

pub const KMS: &str = "awskms";
pub const SECRETS_MANAGER: &str = "AWSSecretsManager";
pub const WAF: &str = "awswaf";
pub const GUARDDUTY: &str = "AmazonGuardDuty";
pub const COGNITO: &str = "AmazonCognito";

pub const CLOUDWATCH: &str = "AmazonCloudWatch";
pub const CLOUDTRAIL: &str = "AWSCloudTrail";
pub const CONFIG: &str = "AWSConfig";

pub const ATHENA: &str = "AmazonAthena";
pub const GLUE: &str = "AWSGlue";
pub const EMR: &str = "ElasticMapReduce";
pub const SAGEMAKER: &str = "AmazonSageMaker";
