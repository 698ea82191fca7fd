//! Option discovery over the SKUs of one service.
//!
//! Price points tagged with [`OptionTag`](crate::OptionTag) are matched on
//! their category. Untagged SKUs fall back to the artifact naming conventions:
//!
//! | Category          | SKU shape                          | Option      |
//! |-------------------|------------------------------------|-------------|
//! | `InstanceType`    | `t3.micro`                         | the SKU     |
//! | `DatabaseClass`   | `db.t3.micro`                      | the SKU     |
//! | `CacheNodeType`   | `cache.t3.micro`                   | the SKU     |
//! | `SearchNodeType`  | `t3.small.search`                  | the SKU     |
//! | `StorageVariant`  | `<prefix>_<variant>_storage`       | `<variant>` |
//! | `Capacity`        | `<prefix>_<size>`                  | `<size>`    |

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{OptionCategory, PricePoint, ServicePrices};

const STORAGE_SUFFIX: &str = "_storage";

/// Derive the option identifier for an untagged SKU, if it belongs to `category`.
pub fn match_convention(category: OptionCategory, sku: &str, prefix: &str) -> Option<String> {
    match category {
        OptionCategory::InstanceType => {
            let is_dotted = sku.contains('.') && !sku.contains('_') && !sku.contains(' ');
            let reserved = sku.starts_with("db.")
                || sku.starts_with("cache.")
                || sku.ends_with(".search");
            (is_dotted && !reserved).then(|| sku.to_string())
        }
        OptionCategory::DatabaseClass => {
            (sku.starts_with("db.") && sku.len() > 3).then(|| sku.to_string())
        }
        OptionCategory::CacheNodeType => {
            (sku.starts_with("cache.") && sku.len() > 6).then(|| sku.to_string())
        }
        OptionCategory::SearchNodeType => {
            (sku.ends_with(".search") && sku.len() > 7).then(|| sku.to_string())
        }
        OptionCategory::StorageVariant => {
            let variant = sku
                .strip_prefix(prefix)?
                .strip_prefix('_')?
                .strip_suffix(STORAGE_SUFFIX)?;
            (!variant.is_empty()).then(|| variant.to_string())
        }
        OptionCategory::Capacity => {
            if sku.ends_with(STORAGE_SUFFIX) {
                return None;
            }
            let size = sku.strip_prefix(prefix)?.strip_prefix('_')?;
            (!size.is_empty() && !size.contains('_')).then(|| size.to_string())
        }
    }
}

fn option_for(
    category: OptionCategory,
    sku: &str,
    point: &PricePoint,
    prefix: &str,
) -> Option<String> {
    match &point.option {
        Some(tag) => (tag.category == category).then(|| tag.value.clone()),
        None => match_convention(category, sku, prefix),
    }
}

/// All options of `category` in one service's prices, cheapest first.
///
/// An identifier reachable through several SKUs is listed once, at its
/// lowest price. Ties are broken by identifier.
pub fn discover(prices: &ServicePrices, category: OptionCategory, prefix: &str) -> Vec<String> {
    let mut cheapest: BTreeMap<String, f64> = BTreeMap::new();

    for (sku, point) in prices {
        if let Some(value) = option_for(category, sku, point, prefix) {
            cheapest
                .entry(value)
                .and_modify(|price| *price = price.min(point.price_per_unit))
                .or_insert(point.price_per_unit);
        }
    }

    let mut options: Vec<(String, f64)> = cheapest.into_iter().collect();
    options.sort_by(|(a_id, a_price), (b_id, b_price)| {
        a_price
            .partial_cmp(b_price)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a_id.cmp(b_id))
    });
    options.into_iter().map(|(id, _)| id).collect()
}
