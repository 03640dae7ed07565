//! Record persistence: remote GitHub document with a local fallback slot.
//!
//! Every operation reports which path it took through [`Persistence`]. Remote
//! failures never surface as errors; they degrade to the fallback slot and are
//! reported as [`Persistence::Degraded`]. Only a failing fallback slot yields
//! an `Err`.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::models::Record;
use crate::remote::{
    decode_document, encode_document, ContentApi, GitHubContentsClient, PutFileRequest,
    RemoteError, RemoteResult,
};
use crate::storage::FallbackStore;
use crate::{Error, Result};

/// Which path an operation took.
#[derive(Debug)]
pub enum Persistence {
    /// The remote document was read or written.
    Remote,
    /// Remote persistence is not configured; the fallback slot was used.
    LocalOnly,
    /// The remote failed and the fallback slot was used instead.
    Degraded(RemoteError),
}

impl Persistence {
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::LocalOnly => "local",
            Self::Degraded(_) => "degraded",
        }
    }
}

impl fmt::Display for Persistence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => formatter.write_str("saved to GitHub"),
            Self::LocalOnly => formatter.write_str("saved locally (GitHub not configured)"),
            Self::Degraded(error) => write!(formatter, "saved locally ({error})"),
        }
    }
}

/// Result of [`RecordStore::load`].
#[derive(Debug)]
pub struct Loaded {
    pub records: Vec<Record>,
    pub persistence: Persistence,
}

/// Remote side of a configured store.
enum RemoteBackend {
    Api(Arc<dyn ContentApi>),
    /// The configuration names a remote that no client can be built for.
    Unusable(String),
}

impl RemoteBackend {
    fn api(&self) -> RemoteResult<&dyn ContentApi> {
        match self {
            Self::Api(api) => Ok(api.as_ref()),
            Self::Unusable(reason) => Err(RemoteError::InvalidConfiguration(reason.clone())),
        }
    }
}

/// Loads and saves the full submission list.
pub struct RecordStore {
    config: StoreConfig,
    remote: Option<RemoteBackend>,
    fallback: Arc<dyn FallbackStore>,
    save_lock: Mutex<()>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RecordStore")
            .field("config", &self.config)
            .field("remote", &matches!(self.remote, Some(RemoteBackend::Api(_))))
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Build a store backed by the GitHub contents API when configured.
    ///
    /// A configuration the client rejects (for example a repository not in
    /// `owner/name` form) does not fail here. Every load and save then
    /// degrades to the fallback slot with the rejection as its reason.
    pub fn new(config: StoreConfig, fallback: Arc<dyn FallbackStore>) -> Self {
        let remote = config
            .is_remote_configured()
            .then(|| match GitHubContentsClient::new(&config) {
                Ok(client) => RemoteBackend::Api(Arc::new(client)),
                Err(error) => {
                    tracing::warn!("GitHub client unavailable, using local fallback: {}", error);
                    RemoteBackend::Unusable(match error {
                        RemoteError::InvalidConfiguration(reason) => reason,
                        other => other.to_string(),
                    })
                }
            });

        Self {
            config,
            remote,
            fallback,
            save_lock: Mutex::new(()),
        }
    }

    /// Build a store over an explicit content API.
    ///
    /// The API is still only consulted when `config` is remote-configured.
    pub fn with_remote(
        config: StoreConfig,
        remote: Arc<dyn ContentApi>,
        fallback: Arc<dyn FallbackStore>,
    ) -> Self {
        Self {
            config,
            remote: Some(RemoteBackend::Api(remote)),
            fallback,
            save_lock: Mutex::new(()),
        }
    }

    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_remote_configured(&self) -> bool {
        self.config.is_remote_configured()
    }

    /// Load the submission list, preferring the remote document.
    pub async fn load(&self) -> Result<Loaded> {
        let Some(remote) = self.remote() else {
            tracing::warn!("GitHub integration not configured. Using local fallback.");
            return Ok(Loaded {
                records: self.read_fallback()?,
                persistence: Persistence::LocalOnly,
            });
        };

        match self.load_remote(remote).await {
            Ok(records) => {
                tracing::info!(
                    "Loaded {} submissions from {}/{}",
                    records.len(),
                    self.config.repository,
                    self.config.document_path
                );
                Ok(Loaded {
                    records,
                    persistence: Persistence::Remote,
                })
            }
            Err(error) => {
                tracing::warn!("Failed to load from GitHub, using local fallback: {}", error);
                Ok(Loaded {
                    records: self.read_fallback()?,
                    persistence: Persistence::Degraded(error),
                })
            }
        }
    }

    /// Replace the stored submission list with `records`.
    ///
    /// Saves through one store run one at a time, so the last call issued is
    /// the last one written. Writers in other processes can still interleave
    /// between the version lookup and the write, and the remote then rejects
    /// the stale token.
    pub async fn save(&self, records: &[Record]) -> Result<Persistence> {
        let Some(remote) = self.remote() else {
            tracing::warn!("GitHub integration not configured. Using local fallback.");
            self.write_fallback(records)?;
            return Ok(Persistence::LocalOnly);
        };

        let _guard = self.save_lock.lock().await;
        match self.save_remote(remote, records).await {
            Ok(()) => {
                tracing::info!(
                    "Saved {} submissions to {}/{}",
                    records.len(),
                    self.config.repository,
                    self.config.document_path
                );
                Ok(Persistence::Remote)
            }
            Err(error) => {
                tracing::error!("Failed to save to GitHub, using local fallback: {}", error);
                self.write_fallback(records)?;
                Ok(Persistence::Degraded(error))
            }
        }
    }

    fn remote(&self) -> Option<&RemoteBackend> {
        if self.config.is_remote_configured() {
            self.remote.as_ref()
        } else {
            None
        }
    }

    async fn load_remote(&self, remote: &RemoteBackend) -> RemoteResult<Vec<Record>> {
        let file = remote.api()?.get_file(&self.config.document_path).await?;
        let document = decode_document(&file)?;
        tracing::debug!("Read revision {}", document.version_token);
        Ok(document.records)
    }

    async fn save_remote(&self, remote: &RemoteBackend, records: &[Record]) -> RemoteResult<()> {
        let remote = remote.api()?;
        let sha = match remote.get_version(&self.config.document_path).await {
            Ok(sha) => Some(sha),
            Err(error) if error.is_status_response() => {
                tracing::debug!("No current revision to replace: {}", error);
                None
            }
            Err(error) => return Err(error),
        };

        let request = PutFileRequest {
            message: self.config.commit_message.clone(),
            content: encode_document(records)?,
            sha,
        };
        remote
            .put_file(&self.config.document_path, &request)
            .await
    }

    fn read_fallback(&self) -> Result<Vec<Record>> {
        let Some(raw) = self.fallback.read_slot(&self.config.fallback_slot)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|error| {
            Error::Storage(format!(
                "Fallback slot '{}' is corrupt: {error}",
                self.config.fallback_slot
            ))
        })
    }

    fn write_fallback(&self, records: &[Record]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.fallback.write_slot(&self.config.fallback_slot, &raw)
    }
}
