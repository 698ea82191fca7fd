use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::fallback;
use crate::models::{OptionCategory, PricePoint, PricingArtifact, Region};
use crate::options;
use crate::source::PriceSource;

/// Region-scoped price lookups over a loaded pricing artifact.
///
/// Read-only once built. A failed load leaves the repository empty with
/// [`load_error`](Self::load_error) set, and every lookup then degrades to
/// static defaults.
#[derive(Debug, Clone, Default)]
pub struct PricingRepository {
    prices: PricingArtifact,
    loaded_at: Option<DateTime<Utc>>,
    load_error: Option<String>,
}

impl PricingRepository {
    /// Repository with no data and no error (e.g. offline use)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_artifact(prices: PricingArtifact) -> Self {
        Self {
            prices,
            loaded_at: Some(Utc::now()),
            load_error: None,
        }
    }

    /// Fetch the artifact once.
    ///
    /// Never fails: on error the repository is empty and carries the error
    /// message. There is no retry.
    pub async fn load<S: PriceSource + ?Sized>(source: &S) -> Self {
        let origin = source.describe();

        match source.fetch().await {
            Ok(prices) => {
                info!(
                    source = %origin,
                    regions = prices.0.len(),
                    price_points = prices.len(),
                    "Loaded pricing artifact"
                );
                Self::from_artifact(prices)
            }
            Err(e) => {
                warn!(
                    source = %origin,
                    error = %e,
                    "Failed to load pricing artifact, estimates will use fallback prices"
                );
                Self {
                    prices: PricingArtifact::default(),
                    loaded_at: None,
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Add or replace a single price point
    pub fn with_price(
        mut self,
        region: Region,
        service_code: &str,
        sku: &str,
        price: PricePoint,
    ) -> Self {
        self.prices.insert(region.code(), service_code, sku, price);
        self
    }

    /// Resolve a price point. Absence is a normal outcome.
    pub fn get_price(&self, region: Region, service_code: &str, sku: &str) -> Option<&PricePoint> {
        self.prices.service(region.code(), service_code)?.get(sku)
    }

    /// Price per unit, or `default` when the SKU is not priced for the region
    pub fn rate_or(&self, region: Region, service_code: &str, sku: &str, default: f64) -> f64 {
        self.get_price(region, service_code, sku)
            .map(|point| point.price_per_unit)
            .unwrap_or(default)
    }

    /// Whether any SKU exists for `(region, service_code)`
    pub fn has_service(&self, region: Region, service_code: &str) -> bool {
        self.prices
            .service(region.code(), service_code)
            .is_some_and(|skus| !skus.is_empty())
    }

    /// Options derived from the loaded data, `None` when the repository has no
    /// data for `(region, service_code)`.
    pub fn discovered_options(
        &self,
        region: Region,
        service_code: &str,
        category: OptionCategory,
        sku_prefix: &str,
    ) -> Option<Vec<String>> {
        let prices = self
            .prices
            .service(region.code(), service_code)
            .filter(|skus| !skus.is_empty())?;
        Some(options::discover(prices, category, sku_prefix))
    }

    /// Options for a choice field, falling back to the static enumeration
    /// when the repository has no data for `(region, service_code)`.
    pub fn service_options(
        &self,
        region: Region,
        service_code: &str,
        category: OptionCategory,
        sku_prefix: &str,
    ) -> Vec<String> {
        self.discovered_options(region, service_code, category, sku_prefix)
            .unwrap_or_else(|| fallback::options(service_code, category))
    }

    /// Number of price points held
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Message of the failed load, if the artifact could not be fetched
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// True when the artifact failed to load and all prices are fallbacks
    pub fn is_degraded(&self) -> bool {
        self.load_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use crate::error::PricingError;
    use crate::source::MockPriceSource;

    fn sample() -> PricingRepository {
        PricingRepository::empty()
            .with_price(Region::UsEast1, codes::EC2, "t3.micro", PricePoint::usd(0.0104, "Hrs"))
            .with_price(Region::UsEast1, codes::EC2, "t3.large", PricePoint::usd(0.0832, "Hrs"))
            .with_price(Region::UsEast1, codes::EC2, "ebs_gp3_storage", PricePoint::usd(0.08, "GB-Mo"))
            .with_price(Region::EuWest1, codes::EC2, "t3.micro", PricePoint::usd(0.0114, "Hrs"))
    }

    #[test]
    fn test_get_price_is_region_scoped() {
        let repo = sample();

        assert_eq!(repo.get_price(Region::UsEast1, codes::EC2, "t3.micro").unwrap().price_per_unit, 0.0104);
        assert_eq!(repo.get_price(Region::EuWest1, codes::EC2, "t3.micro").unwrap().price_per_unit, 0.0114);
        assert!(repo.get_price(Region::UsWest2, codes::EC2, "t3.micro").is_none());
        assert!(repo.get_price(Region::UsEast1, codes::EC2, "x1e.32xlarge").is_none());
        assert!(repo.get_price(Region::UsEast1, codes::RDS, "t3.micro").is_none());
    }

    #[test]
    fn test_rate_or_uses_default_only_when_absent() {
        let repo = sample();
        assert_eq!(repo.rate_or(Region::UsEast1, codes::EC2, "ebs_gp3_storage", 1.0), 0.08);
        assert_eq!(repo.rate_or(Region::UsEast1, codes::EC2, "ebs_io2_storage", 0.125), 0.125);
    }

    #[test]
    fn test_service_options_from_data() {
        let repo = sample();
        assert_eq!(
            repo.service_options(Region::UsEast1, codes::EC2, OptionCategory::InstanceType, "ebs"),
            vec!["t3.micro", "t3.large"]
        );
        assert_eq!(
            repo.service_options(Region::UsEast1, codes::EC2, OptionCategory::StorageVariant, "ebs"),
            vec!["gp3"]
        );
    }

    #[test]
    fn test_service_options_with_data_but_no_match_is_empty_not_fallback() {
        let repo = sample();
        assert!(repo
            .service_options(Region::UsEast1, codes::EC2, OptionCategory::Capacity, "bundle")
            .is_empty());
    }

    #[test]
    fn test_service_options_fall_back_when_region_has_no_data() {
        let repo = sample();

        let compute = repo.service_options(Region::ApSouth1, codes::EC2, OptionCategory::InstanceType, "ebs");
        assert_eq!(compute, fallback::options(codes::EC2, OptionCategory::InstanceType));

        let lightsail = repo.service_options(Region::ApSouth1, codes::LIGHTSAIL, OptionCategory::Capacity, "bundle");
        assert!(lightsail.is_empty());
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut source = MockPriceSource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_fetch().times(1).returning(|| {
            let mut artifact = PricingArtifact::default();
            artifact.insert("us-east-1", codes::S3, "s3_standard_storage", PricePoint::usd(0.023, "GB-Mo"));
            Ok(artifact)
        });

        let repo = PricingRepository::load(&source).await;

        assert!(!repo.is_degraded());
        assert!(repo.load_error().is_none());
        assert!(repo.loaded_at().is_some());
        assert_eq!(repo.len(), 1);
        assert!(repo.has_service(Region::UsEast1, codes::S3));
    }

    #[tokio::test]
    async fn test_load_failure_leaves_repository_empty_and_flags_error() {
        let mut source = MockPriceSource::new();
        source.expect_describe().return_const("mock".to_string());
        source.expect_fetch().times(1).returning(|| {
            Err(PricingError::Status {
                url: "https://example.com/pricing.json".to_string(),
                status: 503,
            })
        });

        let repo = PricingRepository::load(&source).await;

        assert!(repo.is_degraded());
        assert!(repo.is_empty());
        assert!(repo.load_error().unwrap().contains("503"));
        assert!(repo.get_price(Region::UsEast1, codes::EC2, "t3.micro").is_none());
        assert_eq!(
            repo.service_options(Region::UsEast1, codes::RDS, OptionCategory::DatabaseClass, "rds"),
            fallback::options(codes::RDS, OptionCategory::DatabaseClass)
        );
    }
}
