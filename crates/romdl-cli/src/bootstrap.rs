//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete adapters are wired together:
//! - Catalog settings (via romdl-core)
//! - Catalog source (via romdl-catalog)
//! - Queue store and download manager (via romdl-download)
//!
//! The download manager is built per session, only for commands that
//! transfer files, so read-only commands never touch the queue file.

use std::path::PathBuf;
use std::sync::Arc;

use romdl_catalog::HttpCatalogSource;
use romdl_core::CatalogSettings;
use romdl_core::paths::{config_file_path, queue_file_path};
use romdl_core::ports::{CatalogSource, ChannelDownloadEmitter, DownloadManagerConfig};
use romdl_download::{DownloadManagerDeps, JsonQueueStore, build_download_manager};

use crate::error::CliError;
use crate::parser::Cli;
use crate::session::DownloadSession;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Catalog configuration file.
    pub config_path: PathBuf,
    /// Where the unfinished queue is saved.
    pub queue_file: PathBuf,
    /// Concurrency override from `--limit`.
    pub limit: Option<usize>,
}

impl CliConfig {
    /// Resolve paths from the command line and environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Ok(Self {
            config_path: config_file_path(cli.config.as_deref())?,
            queue_file: queue_file_path()?,
            limit: cli.limit.map(usize::from),
        })
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Loaded catalog configuration; also resolves download directories.
    pub settings: Arc<CatalogSettings>,
    /// Platform catalogs.
    pub catalog: Arc<dyn CatalogSource>,
    /// Persisted queue.
    pub queue_store: Arc<JsonQueueStore>,
    /// Effective concurrency limit.
    pub max_concurrent: usize,
}

impl CliContext {
    /// Build a download manager and its event stream.
    pub fn start_downloads(&self) -> Result<DownloadSession, CliError> {
        let (emitter, events) = ChannelDownloadEmitter::new();
        let manager = build_download_manager(DownloadManagerDeps {
            resolver: Arc::clone(&self.settings),
            store: Arc::clone(&self.queue_store),
            event_emitter: Arc::new(emitter),
            config: DownloadManagerConfig::default().with_max_concurrent(self.max_concurrent),
        })?;
        Ok(DownloadSession::new(manager, events))
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let settings = CatalogSettings::load(&config.config_path)?;
    let max_concurrent = config.limit.unwrap_or(settings.download_limit);
    let catalog = HttpCatalogSource::new(settings.clone())?;

    tracing::debug!(
        config = %config.config_path.display(),
        queue = %config.queue_file.display(),
        max_concurrent,
        "Bootstrapped CLI context"
    );

    Ok(CliContext {
        settings: Arc::new(settings),
        catalog: Arc::new(catalog),
        queue_store: Arc::new(JsonQueueStore::new(config.queue_file)),
        max_concurrent,
    })
}
