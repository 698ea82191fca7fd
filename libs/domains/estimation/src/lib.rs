//! Estimation Domain
//!
//! Turns typed service configurations into itemized monthly cost breakdowns
//! and aggregates them per project.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Lifecycle  │  ← one draft, committed resources in order
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Aggregation │  ← project totals, annual projection, top drivers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Calculators │  ← one pure pricing function per service type
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Catalog   │  ← service types, typed configs, descriptors
//! └─────────────┘
//! ```

pub mod aggregation;
pub mod calculators;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod models;

// Re-export commonly used types
pub use aggregation::{Estimator, ProjectEstimate, ResourceEstimate, annualize, project_total};
pub use calculators::{DEFAULT_HOURS_PER_MONTH, PricingContext, calculate, calculate_with};
pub use catalog::{ServiceConfig, ServiceDescriptor, ServiceGroup, ServiceType};
pub use error::{EstimationError, EstimationResult};
pub use lifecycle::Project;
pub use models::{CostBreakdown, CostComponent, Draft, IdKind, ResourceConfig, ResourceId};
