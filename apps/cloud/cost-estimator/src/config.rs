//! Configuration for the cost estimator

use core_config::{ArtifactLocation, Environment, FromEnv, PricingConfig};
use domain_pricing::{FilePriceSource, HttpPriceSource, PriceSource, Region};
use eyre::{Result, WrapErr};

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub pricing: PricingConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            environment: Environment::from_env(),
            pricing: <PricingConfig as FromEnv>::from_env()?,
        })
    }

    /// Region used when neither the command line nor the project names one
    pub fn default_region(&self) -> Result<Region> {
        self.pricing
            .default_region
            .parse()
            .wrap_err_with(|| format!("Unknown region '{}' in PRICING_REGION", self.pricing.default_region))
    }

    /// Source matching the configured artifact location
    pub fn price_source(&self) -> Result<Box<dyn PriceSource>> {
        let source: Box<dyn PriceSource> = match &self.pricing.artifact {
            ArtifactLocation::File(path) => Box::new(FilePriceSource::new(path.clone())),
            ArtifactLocation::Url(url) => Box::new(
                HttpPriceSource::new(url.clone(), self.pricing.fetch_timeout)
                    .wrap_err("Failed to build HTTP client for pricing artifact")?,
            ),
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("APP_ENV", None::<&str>),
                ("PRICING_ARTIFACT", None),
                ("PRICING_REGION", None),
                ("PRICING_HOURS_PER_MONTH", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.environment.is_development());
                assert_eq!(config.default_region().unwrap(), Region::UsEast1);
                assert!(config.price_source().unwrap().describe().starts_with("file "));
            },
        );
    }

    #[test]
    fn test_config_selects_http_source_for_urls() {
        temp_env::with_vars(
            [
                ("PRICING_ARTIFACT", Some("https://prices.example.com/aws.json")),
                ("PRICING_REGION", Some("eu-west-1")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.default_region().unwrap(), Region::EuWest1);
                assert_eq!(
                    config.price_source().unwrap().describe(),
                    "url https://prices.example.com/aws.json"
                );
            },
        );
    }

    #[test]
    fn test_config_unknown_region() {
        temp_env::with_var("PRICING_REGION", Some("mars-north-1"), || {
            let config = Config::from_env().unwrap();
            let err = config.default_region().unwrap_err();
            assert!(err.to_string().contains("mars-north-1"));
        });
    }

    #[test]
    fn test_config_invalid_hours_is_error() {
        temp_env::with_var("PRICING_HOURS_PER_MONTH", Some("-3"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
