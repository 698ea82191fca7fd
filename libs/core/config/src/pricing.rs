use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::path::PathBuf;
use std::time::Duration;

/// Where the pricing artifact is fetched from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactLocation {
    File(PathBuf),
    Url(String),
}

impl ArtifactLocation {
    /// Anything starting with `http://` or `https://` is a URL, the rest is a path
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            ArtifactLocation::Url(raw.to_string())
        } else {
            ArtifactLocation::File(PathBuf::from(raw))
        }
    }
}

/// Pricing and estimation configuration
#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub artifact: ArtifactLocation,
    /// Region code used when a project does not name one
    pub default_region: String,
    /// Hours used to scale hourly rates to a month
    pub hours_per_month: f64,
    pub fetch_timeout: Duration,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            artifact: ArtifactLocation::File(PathBuf::from("pricing.json")),
            default_region: "us-east-1".to_string(),
            hours_per_month: 730.0,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl FromEnv for PricingConfig {
    /// Reads from environment variables with sensible defaults:
    /// - PRICING_ARTIFACT: path or http(s) URL, defaults to `pricing.json`
    /// - PRICING_REGION: defaults to `us-east-1`
    /// - PRICING_HOURS_PER_MONTH: defaults to 730, must be positive
    /// - PRICING_FETCH_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let hours_per_month: f64 = env_parse("PRICING_HOURS_PER_MONTH", 730.0)?;
        if !(hours_per_month.is_finite() && hours_per_month > 0.0) {
            return Err(ConfigError::ParseError {
                key: "PRICING_HOURS_PER_MONTH".to_string(),
                details: format!("expected a positive number of hours, got {hours_per_month}"),
            });
        }

        Ok(Self {
            artifact: ArtifactLocation::parse(&env_or_default("PRICING_ARTIFACT", "pricing.json")),
            default_region: env_or_default("PRICING_REGION", "us-east-1"),
            hours_per_month,
            fetch_timeout: Duration::from_secs(env_parse("PRICING_FETCH_TIMEOUT_SECS", 30u64)?),
        })
    }
}
