use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// AWS region enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Default,
)]
pub enum Region {
    #[default]
    #[serde(rename = "us-east-1")]
    #[strum(serialize = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-east-2")]
    #[strum(serialize = "us-east-2")]
    UsEast2,
    #[serde(rename = "us-west-1")]
    #[strum(serialize = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    #[strum(serialize = "us-west-2")]
    UsWest2,
    #[serde(rename = "ca-central-1")]
    #[strum(serialize = "ca-central-1")]
    CaCentral1,
    #[serde(rename = "sa-east-1")]
    #[strum(serialize = "sa-east-1")]
    SaEast1,
    #[serde(rename = "eu-west-1")]
    #[strum(serialize = "eu-west-1")]
    EuWest1,
    #[serde(rename = "eu-west-2")]
    #[strum(serialize = "eu-west-2")]
    EuWest2,
    #[serde(rename = "eu-west-3")]
    #[strum(serialize = "eu-west-3")]
    EuWest3,
    #[serde(rename = "eu-central-1")]
    #[strum(serialize = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-north-1")]
    #[strum(serialize = "eu-north-1")]
    EuNorth1,
    #[serde(rename = "ap-south-1")]
    #[strum(serialize = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-southeast-1")]
    #[strum(serialize = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    #[strum(serialize = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "ap-northeast-1")]
    #[strum(serialize = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-northeast-2")]
    #[strum(serialize = "ap-northeast-2")]
    ApNortheast2,
}

impl Region {
    /// Region code as used in the pricing artifact (e.g. `us-east-1`)
    pub fn code(self) -> &'static str {
        self.into()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Region::UsEast1 => "US East (N. Virginia)",
            Region::UsEast2 => "US East (Ohio)",
            Region::UsWest1 => "US West (N. California)",
            Region::UsWest2 => "US West (Oregon)",
            Region::CaCentral1 => "Canada (Central)",
            Region::SaEast1 => "South America (Sao Paulo)",
            Region::EuWest1 => "Europe (Ireland)",
            Region::EuWest2 => "Europe (London)",
            Region::EuWest3 => "Europe (Paris)",
            Region::EuCentral1 => "Europe (Frankfurt)",
            Region::EuNorth1 => "Europe (Stockholm)",
            Region::ApSouth1 => "Asia Pacific (Mumbai)",
            Region::ApSoutheast1 => "Asia Pacific (Singapore)",
            Region::ApSoutheast2 => "Asia Pacific (Sydney)",
            Region::ApNortheast1 => "Asia Pacific (Tokyo)",
            Region::ApNortheast2 => "Asia Pacific (Seoul)",
        }
    }
}

/// Currency enumeration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

/// Option category used to populate choice fields from price keys
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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OptionCategory {
    /// Dotted compute instance identifiers (`t3.micro`)
    InstanceType,
    /// Relational database instance classes (`db.t3.micro`)
    DatabaseClass,
    /// Cache node types (`cache.t3.micro`)
    CacheNodeType,
    /// Search node types (`t3.small.search`)
    SearchNodeType,
    /// Storage variants keyed `<prefix>_<variant>_storage`
    StorageVariant,
    /// Discretized capacity choices keyed `<prefix>_<size>`
    Capacity,
}

/// Structured option metadata carried alongside a price point.
///
/// When present, option discovery uses it instead of parsing the SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTag {
    pub category: OptionCategory,
    /// Identifier to store in a resource configuration
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A resolved price for one SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Billing unit (e.g. "Hrs", "GB-Mo", "Requests")
    pub unit: String,
    #[serde(deserialize_with = "number_or_string")]
    pub price_per_unit: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<OptionTag>,
}

impl PricePoint {
    /// USD price point without option metadata
    pub fn usd(price_per_unit: f64, unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            price_per_unit,
            currency: Currency::Usd,
            option: None,
        }
    }

    pub fn with_option(mut self, category: OptionCategory, value: impl Into<String>) -> Self {
        self.option = Some(OptionTag {
            category,
            value: value.into(),
            label: None,
        });
        self
    }
}

/// SKU → price point for one service in one region
pub type ServicePrices = BTreeMap<String, PricePoint>;

/// The pricing artifact: `region → serviceCode → sku → PricePoint`.
///
/// Region keys stay strings so an artifact listing regions this build does
/// not know about still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingArtifact(pub BTreeMap<String, BTreeMap<String, ServicePrices>>);

impl PricingArtifact {
    pub fn service(&self, region: &str, service_code: &str) -> Option<&ServicePrices> {
        self.0.get(region)?.get(service_code)
    }

    pub fn insert(&mut self, region: &str, service_code: &str, sku: &str, price: PricePoint) {
        self.0
            .entry(region.to_string())
            .or_default()
            .entry(service_code.to_string())
            .or_default()
            .insert(sku.to_string(), price);
    }

    /// Total number of price points across all regions and services
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(|services| services.values())
            .map(|skus| skus.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collectors sometimes emit prices as strings ("0.0104000000")
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_region_codes_round_trip_through_strum_and_serde() {
        assert_eq!(Region::UsEast1.code(), "us-east-1");
        assert_eq!(Region::from_str("ap-northeast-2").unwrap(), Region::ApNortheast2);
        assert_eq!(serde_json::to_string(&Region::EuWest1).unwrap(), "\"eu-west-1\"");
        assert_eq!(Region::default(), Region::UsEast1);
    }

    #[test]
    fn test_option_category_names_match_in_strum_and_serde() {
        use strum::IntoEnumIterator;

        for category in OptionCategory::iter() {
            let name = category.to_string();
            assert_eq!(serde_json::to_value(category).unwrap(), serde_json::json!(name));
            assert_eq!(OptionCategory::from_str(&name).unwrap(), category);
        }
        assert_eq!(OptionCategory::InstanceType.to_string(), "instance_type");
    }

    #[test]
    fn test_price_point_accepts_string_prices() {
        let point: PricePoint =
            serde_json::from_str(r#"{"unit":"Hrs","pricePerUnit":"0.0104000000","currency":"USD"}"#)
                .unwrap();
        assert_eq!(point.price_per_unit, 0.0104);
        assert_eq!(point.currency, Currency::Usd);
        assert!(point.option.is_none());
    }

    #[test]
    fn test_price_point_rejects_garbage_prices() {
        let result: Result<PricePoint, _> =
            serde_json::from_str(r#"{"unit":"Hrs","pricePerUnit":"cheap"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_artifact_shape() {
        let json = r#"{
            "us-east-1": {
                "AmazonEC2": {
                    "t3.micro": { "unit": "Hrs", "pricePerUnit": 0.0104, "currency": "USD" },
                    "ebs_gp3_storage": { "unit": "GB-Mo", "pricePerUnit": 0.08, "currency": "USD" }
                }
            },
            "xx-future-1": {}
        }"#;
        let artifact: PricingArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.len(), 2);
        let ec2 = artifact.service("us-east-1", "AmazonEC2").unwrap();
        assert_eq!(ec2["t3.micro"].price_per_unit, 0.0104);
        assert!(artifact.service("eu-west-1", "AmazonEC2").is_none());
    }
}
