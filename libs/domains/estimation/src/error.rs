use thiserror::Error;
use uuid::Uuid;

use crate::catalog::ServiceType;

/// Result type for lifecycle operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors raised by the resource lifecycle.
///
/// Pricing itself never fails; a missing price degrades to a default.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimationError {
    #[error("Nothing to commit: no service type selected for the draft")]
    NothingToCommit,

    #[error("Resource not found: {0}")]
    ResourceNotFound(Uuid),

    #[error("Draft is a {expected} resource, got {found} configuration")]
    ServiceTypeMismatch {
        expected: ServiceType,
        found: String,
    },

    #[error("No service type selected for the draft")]
    NoServiceSelected,
}
