//! Error types for sitemap generation.

use data_model_smap::InvalidPriority;
use thiserror::Error;

/// Main error type for sitemap generation operations.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// A page's priority (fixed or computed) is not a decimal in [0.0, 1.0]
    #[error(transparent)]
    InvalidPriority(#[from] InvalidPriority),

    /// A `{placeholder}` in a path template has no value in the path parameter assignment
    #[error("Path template '{path}' has no value for placeholder '{{{name}}}'")]
    MissingPathParameter { name: String, path: String },

    /// Sitemap files must hold at least one URL each
    #[error("Chunk size must be at least 1, got {0}")]
    InvalidChunkSize(usize),

    /// Reading the site description or writing sitemap files failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The site description is not valid JSON for a `Site`
    #[error("Invalid site description: {0}")]
    SiteDescription(#[from] serde_json::Error),
}

/// Type alias for Result with SitemapError
pub type Result<T> = std::result::Result<T, SitemapError>;
