use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while obtaining the pricing artifact.
///
/// Lookups never fail; these only surface from [`crate::PriceSource::fetch`]
/// and are folded into the repository's load error by
/// [`crate::PricingRepository::load`].
#[derive(Debug, Error)]
pub enum PricingError {
    /// The artifact file could not be read
    #[error("Failed to read pricing artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself failed
    #[error("HTTP request for pricing artifact failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Pricing artifact request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The artifact is not valid JSON of the expected shape
    #[error("Failed to parse pricing artifact: {0}")]
    Parse(#[from] serde_json::Error),
}
