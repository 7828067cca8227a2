//! Catalog source port.

use async_trait::async_trait;
use thiserror::Error;

use crate::download::CatalogEntry;

/// Errors raised while fetching a platform catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The platform is not configured.
    #[error("Platform {0} not found")]
    UnknownPlatform(String),

    /// The listing page could not be fetched.
    #[error("Failed to fetch listing {url}: {message}")]
    Http {
        url: String,
        message: String,
        status_code: Option<u16>,
    },

    /// A listing link could not be joined onto the base URL.
    #[error("Invalid listing URL {0}")]
    InvalidUrl(String),

    /// The listing parser could not be initialised.
    #[error("Listing parser unavailable: {0}")]
    Parser(String),
}

/// Supplies the downloadable entries of a platform.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Configured platform names, in configuration order.
    fn platforms(&self) -> Vec<String>;

    /// Fetch the ordered catalog of `platform`.
    async fn list(&self, platform: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
}
