//! Pricing Domain
//!
//! Region-scoped price points loaded once from a JSON pricing artifact.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ PriceSource │  ← file or HTTP, one fetch per session
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← lookups, option discovery, fallbacks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Region, PricePoint, artifact shape
//! └─────────────┘
//! ```

pub mod codes;
pub mod error;
pub mod fallback;
pub mod models;
pub mod options;
pub mod repository;
pub mod source;

// Re-export commonly used types
pub use error::{PricingError, PricingResult};
pub use models::{
    Currency, OptionCategory, OptionTag, PricePoint, PricingArtifact, Region, ServicePrices,
};
pub use repository::PricingRepository;
pub use source::{FilePriceSource, HttpPriceSource, PriceSource};
