//! Static defaults used when the pricing artifact is missing or incomplete.
//!
//! Only four services ship a fallback option list; every other service
//! degrades to an empty list. Hourly rates are us-east-1 on-demand Linux list
//! prices.

use crate::codes;
use crate::models::OptionCategory;

pub const COMPUTE_INSTANCE_TYPES: &[(&str, f64)] = &[
    ("t3.nano", 0.0052),
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("t3.xlarge", 0.1664),
    ("t3.2xlarge", 0.3328),
    ("t4g.micro", 0.0084),
    ("t4g.small", 0.0168),
    ("t4g.medium", 0.0336),
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("m5.2xlarge", 0.384),
    ("m6i.large", 0.096),
    ("m6g.large", 0.077),
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
    ("c6g.large", 0.068),
    ("r5.large", 0.126),
    ("r5.xlarge", 0.252),
    ("r6g.large", 0.1008),
];

pub const DATABASE_CLASSES: &[(&str, f64)] = &[
    ("db.t3.micro", 0.017),
    ("db.t3.small", 0.034),
    ("db.t3.medium", 0.068),
    ("db.t3.large", 0.136),
    ("db.t4g.micro", 0.016),
    ("db.t4g.medium", 0.065),
    ("db.m5.large", 0.171),
    ("db.m5.xlarge", 0.342),
    ("db.m6g.large", 0.152),
    ("db.r5.large", 0.25),
    ("db.r5.xlarge", 0.50),
    ("db.r6g.large", 0.225),
];

pub const CACHE_NODE_TYPES: &[(&str, f64)] = &[
    ("cache.t3.micro", 0.017),
    ("cache.t3.small", 0.034),
    ("cache.t3.medium", 0.068),
    ("cache.t4g.micro", 0.016),
    ("cache.m5.large", 0.156),
    ("cache.m5.xlarge", 0.311),
    ("cache.r5.large", 0.216),
    ("cache.r6g.large", 0.206),
];

pub const SEARCH_NODE_TYPES: &[(&str, f64)] = &[
    ("t3.small.search", 0.036),
    ("t3.medium.search", 0.073),
    ("m5.large.search", 0.142),
    ("m6g.large.search", 0.128),
    ("c5.large.search", 0.125),
    ("r5.large.search", 0.186),
    ("r6g.large.search", 0.167),
];

fn table(service_code: &str, category: OptionCategory) -> Option<&'static [(&'static str, f64)]> {
    match (service_code, category) {
        (codes::EC2, OptionCategory::InstanceType) => Some(COMPUTE_INSTANCE_TYPES),
        (codes::RDS, OptionCategory::DatabaseClass) => Some(DATABASE_CLASSES),
        (codes::ELASTICACHE, OptionCategory::CacheNodeType) => Some(CACHE_NODE_TYPES),
        (codes::OPENSEARCH, OptionCategory::SearchNodeType) => Some(SEARCH_NODE_TYPES),
        _ => None,
    }
}

/// Hardcoded option list for `(service_code, category)`, empty when the
/// service defines none.
pub fn options(service_code: &str, category: OptionCategory) -> Vec<String> {
    table(service_code, category)
        .map(|entries| entries.iter().map(|(id, _)| id.to_string()).collect())
        .unwrap_or_default()
}

/// Static hourly rate for a node or instance identifier from any fallback table
pub fn hourly_rate(sku: &str) -> Option<f64> {
    [
        COMPUTE_INSTANCE_TYPES,
        DATABASE_CLASSES,
        CACHE_NODE_TYPES,
        SEARCH_NODE_TYPES,
    ]
    .iter()
    .flat_map(|entries| entries.iter())
    .find(|(id, _)| *id == sku)
    .map(|(_, rate)| *rate)
}
