//! Security, identity and compliance.

use domain_pricing::codes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BreakdownBuilder, Priceable, PricingContext, billable, quantity};
use crate::models::CostBreakdown;

/// AWS KMS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmsConfig {
    pub customer_managed_keys: u32,
    pub requests_millions: f64,
    pub include_free_tier: bool,
}

impl Default for KmsConfig {
    fn default() -> Self {
        Self {
            customer_managed_keys: 1,
            requests_millions: 0.1,
            include_free_tier: true,
        }
    }
}

impl Priceable for KmsConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let free = if self.include_free_tier { 0.02 } else { 0.0 };
        let mut b = BreakdownBuilder::new();
        b.line(
            "Customer managed keys",
            f64::from(self.customer_managed_keys),
            "keys",
            ctx.rate(codes::KMS, "customer_managed_key", 1.00),
        )
        .line(
            "API requests",
            billable(self.requests_millions, free),
            "1M requests",
            ctx.rate(codes::KMS, "requests", 3.00),
        );
        b.build()
    }
}

/// A group of secrets with the same access pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretGroup {
    /// Key within the group list; nil until the caller assigns one
    pub id: Uuid,
    pub name: String,
    pub secret_count: u32,
    /// API calls per month across the group, in units of 10,000
    pub api_calls_10k: f64,
}

impl Default for SecretGroup {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: "app-secrets".to_string(),
            secret_count: 5,
            api_calls_10k: 1.0,
        }
    }
}

/// AWS Secrets Manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsManagerConfig {
    pub secret_groups: Vec<SecretGroup>,
}

impl Default for SecretsManagerConfig {
    fn default() -> Self {
        Self {
            secret_groups: vec![SecretGroup::default()],
        }
    }
}

impl Priceable for SecretsManagerConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let mut b = BreakdownBuilder::new();
        for group in &self.secret_groups {
            b.line(
                format!("Secrets ({})", group.name),
                f64::from(group.secret_count),
                "secrets",
                ctx.rate(codes::SECRETS_MANAGER, "secret", 0.40),
            )
            .usage(
                format!("API calls ({})", group.name),
                group.api_calls_10k,
                "10K calls",
                ctx.rate(codes::SECRETS_MANAGER, "api_calls", 0.05),
            );
        }
        b.build()
    }
}

const BOT_CONTROL_FREE_REQUESTS_MILLIONS: f64 = 10.0;

/// AWS WAF, with the Shield Advanced add-on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WafConfig {
    pub web_acls: u32,
    pub rules_per_acl: u32,
    pub requests_millions: f64,
    pub bot_control: bool,
    pub bot_control_requests_millions: f64,
    pub shield_advanced: bool,
}

impl Default for WafConfig {
    fn default() -> Self {
        Self {
            web_acls: 1,
            rules_per_acl: 10,
            requests_millions: 10.0,
            bot_control: false,
            bot_control_requests_millions: 10.0,
            shield_advanced: false,
        }
    }
}

impl Priceable for WafConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let acls = f64::from(self.web_acls);
        let mut b = BreakdownBuilder::new();
        b.line(
            "Web ACLs",
            acls,
            "ACLs",
            ctx.rate(codes::WAF, "web_acl", 5.00),
        )
        .line(
            "Rules",
            acls * f64::from(self.rules_per_acl),
            "rules",
            ctx.rate(codes::WAF, "rule", 1.00),
        )
        .line(
            "Requests",
            self.requests_millions,
            "1M requests",
            ctx.rate(codes::WAF, "requests", 0.60),
        );

        if self.bot_control {
            b.line(
                "Bot Control subscription",
                acls,
                "ACLs",
                ctx.rate(codes::WAF, "bot_control", 10.00),
            )
            .line(
                "Bot Control requests",
                billable(
                    self.bot_control_requests_millions,
                    BOT_CONTROL_FREE_REQUESTS_MILLIONS,
                ),
                "1M requests",
                ctx.rate(codes::WAF, "bot_control_requests", 1.00),
            );
        }

        b.line_if(
            self.shield_advanced,
            "Shield Advanced subscription",
            1.0,
            "Mo",
            ctx.rate(codes::WAF, "shield_advanced", 3000.00),
        );
        b.build()
    }
}

/// Amazon GuardDuty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuarddutyConfig {
    pub cloudtrail_events_millions: f64,
    pub vpc_flow_dns_gb: f64,
    pub s3_protection: bool,
    pub s3_events_millions: f64,
    pub eks_protection: bool,
    pub eks_audit_logs_millions: f64,
    pub malware_protection: bool,
    pub malware_scanned_gb: f64,
}

impl Default for GuarddutyConfig {
    fn default() -> Self {
        Self {
            cloudtrail_events_millions: 10.0,
            vpc_flow_dns_gb: 100.0,
            s3_protection: false,
            s3_events_millions: 10.0,
            eks_protection: false,
            eks_audit_logs_millions: 1.0,
            malware_protection: false,
            malware_scanned_gb: 100.0,
        }
    }
}

impl Priceable for GuarddutyConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let events = ctx.tiers(
            codes::GUARDDUTY,
            "cloudtrail_events",
            &[(Some(500.0), 4.00), (Some(5_000.0), 2.00), (None, 1.00)],
        );
        let flow_logs = ctx.tiers(
            codes::GUARDDUTY,
            "vpc_flow_dns",
            &[
                (Some(500.0), 1.00),
                (Some(2_500.0), 0.50),
                (Some(10_000.0), 0.25),
                (None, 0.15),
            ],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered(
            "CloudTrail management events",
            self.cloudtrail_events_millions,
            "1M events",
            &events,
        )
        .tiered(
            "VPC flow and DNS logs",
            self.vpc_flow_dns_gb,
            "GB",
            &flow_logs,
        )
        .line_if(
            self.s3_protection,
            "S3 protection",
            self.s3_events_millions,
            "1M events",
            ctx.rate(codes::GUARDDUTY, "s3_events", 0.80),
        )
        .line_if(
            self.eks_protection,
            "EKS audit log monitoring",
            self.eks_audit_logs_millions,
            "1M events",
            ctx.rate(codes::GUARDDUTY, "eks_audit_logs", 1.60),
        )
        .line_if(
            self.malware_protection,
            "Malware protection scans",
            self.malware_scanned_gb,
            "GB",
            ctx.rate(codes::GUARDDUTY, "malware_scan", 0.04),
        );
        b.build()
    }
}

const COGNITO_FREE_MAU: f64 = 10_000.0;
const COGNITO_FREE_FEDERATED_MAU: f64 = 50.0;

/// Amazon Cognito user pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitoConfig {
    pub monthly_active_users: f64,
    pub include_free_tier: bool,
    pub advanced_security: bool,
    pub saml_federation: bool,
    pub federated_users: f64,
}

impl Default for CognitoConfig {
    fn default() -> Self {
        Self {
            monthly_active_users: 10_000.0,
            include_free_tier: true,
            advanced_security: false,
            saml_federation: false,
            federated_users: 0.0,
        }
    }
}

impl Priceable for CognitoConfig {
    fn price(&self, ctx: &PricingContext<'_>) -> CostBreakdown {
        let (free, free_federated) = if self.include_free_tier {
            (COGNITO_FREE_MAU, COGNITO_FREE_FEDERATED_MAU)
        } else {
            (0.0, 0.0)
        };
        let tiers = ctx.tiers(
            codes::COGNITO,
            "mau",
            &[
                (Some(90_000.0), 0.0055),
                (Some(990_000.0), 0.0046),
                (Some(9_990_000.0), 0.00325),
                (None, 0.0025),
            ],
        );

        let mut b = BreakdownBuilder::new();
        b.tiered(
            "Monthly active users",
            billable(self.monthly_active_users, free),
            "MAU",
            &tiers,
        )
        .line_if(
            self.advanced_security,
            "Advanced security features",
            quantity(self.monthly_active_users),
            "MAU",
            ctx.rate(codes::COGNITO, "advanced_security_mau", 0.05),
        )
        .line_if(
            self.saml_federation,
            "SAML/OIDC federated users",
            billable(self.federated_users, free_federated),
            "MAU",
            ctx.rate(codes::COGNITO, "federated_mau", 0.015),
        );
        b.build()
    }
}
