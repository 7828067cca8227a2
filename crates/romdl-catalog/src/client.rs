//! HTTP catalog source backed by the platform configuration.

use std::time::Duration;

use async_trait::async_trait;

use romdl_core::ports::{CatalogError, CatalogSource};
use romdl_core::{CatalogEntry, CatalogSettings};

use crate::listing::{ListingContext, ListingParser};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches and parses the listing page of each configured platform.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    parser: ListingParser,
    settings: CatalogSettings,
}

impl HttpCatalogSource {
    /// Create a source for the platforms in `settings`.
    pub fn new(settings: CatalogSettings) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("romdl/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Http {
                url: String::new(),
                message: format!("failed to create HTTP client: {e}"),
                status_code: None,
            })?;
        let parser =
            ListingParser::new().map_err(|e| CatalogError::Parser(e.to_string()))?;

        Ok(Self {
            client,
            parser,
            settings,
        })
    }

    /// Configuration this source was built from.
    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    async fn fetch_page(&self, url: &str) -> Result<String, CatalogError> {
        let http_error = |e: reqwest::Error| CatalogError::Http {
            url: url.to_string(),
            message: e.to_string(),
            status_code: e.status().map(|s| s.as_u16()),
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                url: url.to_string(),
                message: format!("server returned {status}"),
                status_code: Some(status.as_u16()),
            });
        }
        response.text().await.map_err(http_error)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn platforms(&self) -> Vec<String> {
        self.settings.platform_names()
    }

    async fn list(&self, platform: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let platform_settings = self
            .settings
            .platform(platform)
            .map_err(|_| CatalogError::UnknownPlatform(platform.to_string()))?;

        let url = platform_settings.url.as_str();
        if url::Url::parse(url).is_err() {
            return Err(CatalogError::InvalidUrl(url.to_string()));
        }

        tracing::debug!(target: "romdl.catalog", %platform, %url, "Fetching listing");
        let page = self.fetch_page(url).await?;
        let entries = self.parser.parse(&page, ListingContext {
            base_url: url,
            platform,
            ext: &platform_settings.ext,
        });

        tracing::info!(
            target: "romdl.catalog",
            %platform,
            count = entries.len(),
            "Loaded catalog"
        );
        Ok(entries)
    }
}
