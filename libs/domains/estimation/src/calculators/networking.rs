//! Networking, content delivery and data transfer.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::{BreakdownBuilder, Priceable, PricingContext, Tier, billable, lookup, quantity};
use crate::models::CostBreakdown;

/// Monthly internet egress that is not billed, aggregated across services
pub const INTERNET_EGRESS_FREE_GB: f64 = 100.0;

/// Internet egress bands applied after the free allotment
pub(crate) fn internet_egress_tiers(ctx: &PricingContext<'_>) -> Vec<Tier> {
    ctx.tiers(
        codes::DATA_TRANSFER,
        "internet_out",
        &[
            (Some(10_240.0), 0.09),
            (Some(51_200.0), 0.085),
            (Some(153_600.0), 0.07),
            (None, 0.05),
        ],
    )
}

/// Internet egress lines, present only when something is billable
pub(crate) fn internet_egress(b: &mut BreakdownBuilder, ctx: &PricingContext<'_>, gb: f64) {
    b.tiered_usage(
        "Data transfer out",
        billable(gb, INTERNET_EGRESS_FREE_GB),
        "GB",
        &internet_egress_tiers(ctx),
    );
}

/// Amazon VPC: NAT gateways, endpoints, VPN and public IPv4
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcConfig {
    pub nat_gateways: u32,
    pub nat_data_processed_gb: f64,
    pub interface_endpoints: u32,
    pub endpoint_azs: u32,
    pub endpoint_data_processed_gb: f64,
    pub public_ipv4_addresses: u32,
    pub vpn_connections: u32,
    pub flow_logs: bool,
    pub flow_logs_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for VpcConfig {
    fn default() -> Self {
        Self {
            nat_gateways: 1,
            nat_data_processed_gb: 100.0,
            interface_endpoints: 0,
            endpoint_azs: 2,
            endpoint_data_processed_gb: 0.0,
            public_ipv4_addresses: 0,
            vpn_connections: 0,
            flow_logs: false,
            flow_logs_gb: 10.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for VpcConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let nat = f64::from(self.nat_gateways);
        let endpoint_hours = f64::from(self.interface_endpoints) * f64::from(self.endpoint_azs) * hours;

        let mut b = BreakdownBuilder::new();
        b.line("NAT gateway", nat * hours, "Hrs", ctx.rate(codes::VPC, "nat_gateway_hour", 0.045));
        if self.nat_gateways > 0 {
            b.usage(
                "NAT gateway data processed",
                self.nat_data_processed_gb,
                "GB",
                ctx.rate(codes::VPC, "nat_gateway_bytes", 0.045),
            );
        }
        b.usage(
            "Interface endpoints",
            endpoint_hours,
            "Hrs",
            ctx.rate(codes::VPC, "vpc_endpoint_hour", 0.01),
        );
        if self.interface_endpoints > 0 {
            b.usage(
                "Endpoint data processed",
                self.endpoint_data_processed_gb,
                "GB",
                ctx.rate(codes::VPC, "vpc_endpoint_bytes", 0.01),
            );
        }
        b.usage(
            "Public IPv4 addresses",
            f64::from(self.public_ipv4_addresses) * hours,
            "Hrs",
            ctx.rate(codes::VPC, "public_ipv4_hour", 0.005),
        )
        .usage(
            "Site-to-Site VPN connections",
            f64::from(self.vpn_connections) * hours,
            "Hrs",
            ctx.rate(codes::VPC, "vpn_connection_hour", 0.05),
        )
        .line_if(
            self.flow_logs,
            "Flow logs ingestion",
            self.flow_logs_gb,
            "GB",
            ctx.rate(codes::CLOUDWATCH, "vended_logs_ingestion", 0.50),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadBalancerKind {
    #[default]
    Application,
    Network,
    Gateway,
    Classic,
}

impl LoadBalancerKind {
    fn sku(self) -> &'static str {
        match self {
            Self::Application => "alb",
            Self::Network => "nlb",
            Self::Gateway => "gwlb",
            Self::Classic => "clb",
        }
    }

    fn hourly_default(self) -> f64 {
        match self {
            Self::Application | Self::Network => 0.0225,
            Self::Gateway => 0.0125,
            Self::Classic => 0.025,
        }
    }

    fn capacity_unit_default(self) -> f64 {
        match self {
            Self::Application => 0.008,
            Self::Network => 0.006,
            Self::Gateway => 0.004,
            Self::Classic => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    /// Key within the load balancer list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    pub kind: LoadBalancerKind,
    /// Average consumed capacity units (LCU/NLCU/GLCU) per hour
    pub capacity_units: f64,
    /// Data processed, billed for classic load balancers only
    pub data_processed_gb: f64,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "alb-1".to_string(),
            kind: LoadBalancerKind::Application,
            capacity_units: 1.0,
            data_processed_gb: 100.0,
        }
    }
}

/// Elastic Load Balancing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbConfig {
    pub load_balancers: Vec<LoadBalancer>,
    pub hours_per_month: Option<f64>,
}

impl Default for ElbConfig {
    fn default() -> Self {
        Self {
            load_balancers: vec![LoadBalancer::default()],
            hours_per_month: None,
        }
    }
}

impl Priceable for ElbConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let mut b = BreakdownBuilder::new();

        for lb in &self.load_balancers {
            let sku = lb.kind.sku();
            b.line(
                format!("{} ({})", lb.name, lb.kind),
                hours,
                "Hrs",
                ctx.rate(codes::ELB, &format!("{sku}_hour"), lb.kind.hourly_default()),
            );
            if lb.kind == LoadBalancerKind::Classic {
                b.line(
                    format!("{} data processed", lb.name),
                    lb.data_processed_gb,
                    "GB",
                    ctx.rate(codes::ELB, "clb_bytes", 0.008),
                );
            } else {
                b.line(
                    format!("{} capacity units", lb.name),
                    quantity(lb.capacity_units) * hours,
                    "LCU-Hrs",
                    ctx.rate(
                        codes::ELB,
                        &format!("{sku}_lcu_hour"),
                        lb.kind.capacity_unit_default(),
                    ),
                );
            }
        }

        b.build()
    }
}

/// Amazon CloudFront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudfrontConfig {
    pub data_transfer_out_gb: f64,
    pub https_requests_millions: f64,
    pub include_free_tier: bool,
    pub origin_shield: bool,
    pub origin_shield_requests_millions: f64,
    pub invalidation_paths: f64,
}

impl Default for CloudfrontConfig {
    fn default() -> Self {
        Self {
            data_transfer_out_gb: 100.0,
            https_requests_millions: 1.0,
            include_free_tier: true,
            origin_shield: false,
            origin_shield_requests_millions: 1.0,
            invalidation_paths: 0.0,
        }
    }
}

impl Priceable for CloudfrontConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let (free_gb, free_requests) = if self.include_free_tier {
            (1024.0, 10.0)
        } else {
            (0.0, 0.0)
        };
        let egress_tiers = ctx.tiers(
            codes::CLOUDFRONT,
            "data_transfer_out",
            &[
                (Some(10_240.0), 0.085),
                (Some(51_200.0), 0.080),
                (Some(153_600.0), 0.060),
                (Some(512_000.0), 0.040),
                (Some(1_048_576.0), 0.030),
                (Some(5_242_880.0), 0.025),
                (None, 0.020),
            ],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered(
            "Data transfer out to internet",
            billable(self.data_transfer_out_gb, free_gb),
            "GB",
            &egress_tiers,
        )
        .line(
            "HTTPS requests",
            billable(self.https_requests_millions, free_requests),
            "1M requests",
            ctx.rate(codes::CLOUDFRONT, "https_requests", 1.00),
        )
        .line_if(
            self.origin_shield,
            "Origin Shield requests",
            self.origin_shield_requests_millions,
            "1M requests",
            ctx.rate(codes::CLOUDFRONT, "origin_shield_requests", 0.75),
        )
        .usage(
            "Invalidation paths",
            billable(self.invalidation_paths, 1000.0),
            "paths",
            ctx.rate(codes::CLOUDFRONT, "invalidation_path", 0.005),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoutingPolicy {
    #[default]
    Standard,
    LatencyBased,
    Geo,
}

/// A hosted zone and the queries it answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedDomain {
    /// Key within the domain list; nil until the caller assigns one
    pub id: Uuid,
    pub domain: String,
    pub queries_millions: f64,
    pub routing_policy: RoutingPolicy,
    pub register_domain: bool,
}

impl Default for HostedDomain {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            domain: "example.com".to_string(),
            queries_millions: 1.0,
            routing_policy: RoutingPolicy::Standard,
            register_domain: false,
        }
    }
}

impl HostedDomain {
    fn tld(&self) -> &str {
        self.domain.rsplit('.').next().unwrap_or_default()
    }
}

// Annual registration fee per top-level domain
const DOMAIN_REGISTRATION: &[(&str, f64)] = &[
    ("com", 15.0),
    ("net", 17.0),
    ("org", 13.0),
    ("io", 71.0),
    ("dev", 16.0),
    ("app", 20.0),
];

/// Amazon Route 53
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route53Config {
    pub domains: Vec<HostedDomain>,
    pub health_checks: u32,
}

impl Default for Route53Config {
    fn default() -> Self {
        Self {
            domains: vec![HostedDomain::default()],
            health_checks: 0,
        }
    }
}

impl Priceable for Route53Config {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();

        if !self.domains.is_empty() {
            let zone_tiers = ctx.tiers(
                codes::ROUTE53,
                "hosted_zone",
                &[(Some(25.0), 0.50), (None, 0.10)],
            );
            b.tiered("Hosted zones", self.domains.len() as f64, "zones", &zone_tiers);
        }

        for domain in &self.domains {
            let (sku, default) = match domain.routing_policy {
                RoutingPolicy::Standard => ("standard_queries", 0.40),
                RoutingPolicy::LatencyBased => ("latency_queries", 0.60),
                RoutingPolicy::Geo => ("geo_queries", 0.70),
            };
            b.line(
                format!("Queries {} ({})", domain.domain, domain.routing_policy),
                domain.queries_millions,
                "1M queries",
                ctx.rate(codes::ROUTE53, sku, default),
            );
            if domain.register_domain {
                let tld = domain.tld();
                let annual = ctx.rate(
                    codes::ROUTE53,
                    &format!("domain_{tld}"),
                    lookup(DOMAIN_REGISTRATION, tld),
                );
                b.line(
                    format!("Registration {}", domain.domain),
                    1.0,
                    "Mo",
                    annual / 12.0,
                );
            }
        }

        b.usage(
            "Health checks",
            f64::from(self.health_checks),
            "checks",
            ctx.rate(codes::ROUTE53, "health_check", 0.50),
        );
        b.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApiType {
    #[default]
    Rest,
    Http,
    Websocket,
}

const API_CACHE: &[(&str, f64)] = &[
    ("0.5", 0.02),
    ("1.6", 0.038),
    ("6.1", 0.20),
    ("13.5", 0.25),
    ("28.4", 0.50),
    ("58.2", 1.00),
    ("118", 1.90),
    ("237", 3.80),
];

/// Amazon API Gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGatewayConfig {
    pub api_type: ApiType,
    pub requests_millions: f64,
    pub websocket_messages_millions: f64,
    pub connection_minutes_millions: f64,
    /// REST APIs only
    pub cache: bool,
    /// Cache capacity in GB, one of the `cache_<size>` SKUs
    pub cache_size_gb: String,
    pub data_transfer_out_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            api_type: ApiType::Rest,
            requests_millions: 1.0,
            websocket_messages_millions: 1.0,
            connection_minutes_millions: 1.0,
            cache: false,
            cache_size_gb: "0.5".to_string(),
            data_transfer_out_gb: 0.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for ApiGatewayConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();

        match self.api_type {
            ApiType::Rest => {
                let tiers = ctx.tiers(
                    codes::API_GATEWAY,
                    "rest_requests",
                    &[
                        (Some(333.0), 3.50),
                        (Some(1_000.0), 2.80),
                        (Some(20_000.0), 2.38),
                        (None, 1.51),
                    ],
                );
                b.tiered("REST API requests", self.requests_millions, "1M requests", &tiers);
            }
            ApiType::Http => {
                let tiers = ctx.tiers(
                    codes::API_GATEWAY,
                    "http_requests",
                    &[(Some(300.0), 1.00), (None, 0.90)],
                );
                b.tiered("HTTP API requests", self.requests_millions, "1M requests", &tiers);
            }
            ApiType::Websocket => {
                let tiers = ctx.tiers(
                    codes::API_GATEWAY,
                    "websocket_messages",
                    &[(Some(1_000.0), 1.00), (None, 0.80)],
                );
                b.tiered(
                    "WebSocket messages",
                    self.websocket_messages_millions,
                    "1M messages",
                    &tiers,
                )
                .line(
                    "WebSocket connection minutes",
                    self.connection_minutes_millions,
                    "1M minutes",
                    ctx.rate(codes::API_GATEWAY, "websocket_connection_minutes", 0.25),
                );
            }
        }

        let size = self.cache_size_gb.as_str();
        b.line_if(
            self.cache && self.api_type == ApiType::Rest,
            format!("API cache ({size} GB)"),
            ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::API_GATEWAY, &format!("cache_{size}"), lookup(API_CACHE, size)),
        );
        internet_egress(&mut b, ctx, self.data_transfer_out_gb);
        b.build()
    }
}

const DIRECT_CONNECT_PORTS: &[(&str, f64)] = &[
    ("50m", 0.03),
    ("100m", 0.06),
    ("500m", 0.12),
    ("1g", 0.30),
    ("10g", 2.25),
    ("100g", 22.50),
];

/// AWS Direct Connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConnectConfig {
    /// Port speed, one of the `port_<speed>` SKUs
    pub port_speed: String,
    pub connections: u32,
    pub data_transfer_out_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for DirectConnectConfig {
    fn default() -> Self {
        Self {
            port_speed: "1g".to_string(),
            connections: 1,
            data_transfer_out_gb: 1000.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for DirectConnectConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let speed = self.port_speed.as_str();
        let mut b = BreakdownBuilder::new();
        b.line(
            format!("Port hours ({speed})"),
            f64::from(self.connections) * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(
                codes::DIRECT_CONNECT,
                &format!("port_{speed}"),
                lookup(DIRECT_CONNECT_PORTS, speed),
            ),
        )
        .usage(
            "Data transfer out",
            self.data_transfer_out_gb,
            "GB",
            ctx.rate(codes::DIRECT_CONNECT, "data_transfer_out", 0.02),
        );
        b.build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accelerator {
    /// Key within the accelerator list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    /// Traffic in the dominant direction
    pub dominant_direction_gb: f64,
}

impl Default for Accelerator {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "accelerator-1".to_string(),
            dominant_direction_gb: 100.0,
        }
    }
}

/// AWS Global Accelerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalAcceleratorConfig {
    pub accelerators: Vec<Accelerator>,
    pub hours_per_month: Option<f64>,
}

impl Default for GlobalAcceleratorConfig {
    fn default() -> Self {
        Self {
            accelerators: vec![Accelerator::default()],
            hours_per_month: None,
        }
    }
}

impl Priceable for GlobalAcceleratorConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let hours = ctx.hours_or(self.hours_per_month);
        let mut b = BreakdownBuilder::new();
        for accelerator in &self.accelerators {
            b.line(
                format!("{} fixed fee", accelerator.name),
                hours,
                "Hrs",
                ctx.rate(codes::GLOBAL_ACCELERATOR, "accelerator_hour", 0.025),
            )
            .usage(
                format!("{} data transfer premium", accelerator.name),
                accelerator.dominant_direction_gb,
                "GB",
                ctx.rate(codes::GLOBAL_ACCELERATOR, "dt_premium", 0.015),
            );
        }
        b.build()
    }
}

/// AWS Transit Gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitGatewayConfig {
    pub attachments: u32,
    pub data_processed_gb: f64,
    pub hours_per_month: Option<f64>,
}

impl Default for TransitGatewayConfig {
    fn default() -> Self {
        Self {
            attachments: 2,
            data_processed_gb: 100.0,
            hours_per_month: None,
        }
    }
}

impl Priceable for TransitGatewayConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.line(
            "Attachments",
            f64::from(self.attachments) * ctx.hours_or(self.hours_per_month),
            "Hrs",
            ctx.rate(codes::TRANSIT_GATEWAY, "attachment_hour", 0.05),
        )
        .usage(
            "Data processed",
            self.data_processed_gb,
            "GB",
            ctx.rate(codes::TRANSIT_GATEWAY, "data_processed", 0.02),
        );
        b.build()
    }
}

/// Data transfer not attributed to another service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTransferConfig {
    pub internet_out_gb: f64,
    pub inter_region_gb: f64,
    pub inter_az_gb: f64,
}

impl Default for DataTransferConfig {
    fn default() -> Self {
        Self {
            internet_out_gb: 100.0,
            inter_region_gb: 0.0,
            inter_az_gb: 0.0,
        }
    }
}

impl Priceable for DataTransferConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        b.tiered(
            "Internet data transfer out",
            billable(self.internet_out_gb, INTERNET_EGRESS_FREE_GB),
            "GB",
            &internet_egress_tiers(ctx),
        )
        .usage(
            "Inter-region data transfer",
            self.inter_region_gb,
            "GB",
            ctx.rate(codes::DATA_TRANSFER, "inter_region", 0.02),
        )
        // Billed on both sides of the zone boundary
        .usage(
            "Inter-AZ data transfer",
            quantity(self.inter_az_gb) * 2.0,
            "GB",
            ctx.rate(codes::DATA_TRANSFER, "inter_az", 0.01),
        );
        b.build()
    }
}
