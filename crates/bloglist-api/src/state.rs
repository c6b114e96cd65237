//! Application state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use bloglist_data::store::BlogStore;
use tokio::sync::RwLock;

use crate::auth::JwtService;
use crate::error::ApiError;

/// Server configuration, resolved from CLI settings by the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. "127.0.0.1:3003").
    pub bind_addr: String,

    /// Token signing secret.
    pub secret: String,

    /// Snapshot file the store is loaded from and saved to (optional).
    pub data_file: Option<PathBuf>,
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Blogs, users and comments.
    pub store: Arc<RwLock<BlogStore>>,

    /// Signs and verifies login tokens.
    pub jwt: JwtService,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state around an already loaded store.
    pub fn new(config: Config, store: BlogStore) -> Self {
        tracing::info!(
            bind_addr = %config.bind_addr,
            data_file = ?config.data_file,
            blogs = store.blogs().len(),
            users = store.users().len(),
            "application state ready"
        );
        Self {
            store: Arc::new(RwLock::new(store)),
            jwt: JwtService::new(&config.secret),
            config: Arc::new(config),
        }
    }

    /// Load the snapshot named by `config.data_file` (if any) and build state.
    pub fn load(config: Config) -> bloglist_core::Result<Self> {
        let store = match &config.data_file {
            Some(path) => BlogStore::load_from(path)?,
            None => BlogStore::new(),
        };
        Ok(Self::new(config, store))
    }

    /// Apply `change` to the store and save the snapshot before committing.
    ///
    /// The change runs on a copy; the shared store is only replaced once the
    /// snapshot is on disk, so a failed save leaves memory untouched. The
    /// write guard is held throughout, so snapshots land in mutation order.
    pub async fn mutate<T, F>(&self, change: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut BlogStore) -> Result<T, ApiError>,
    {
        let mut store = self.store.write().await;

        let Some(path) = self.config.data_file.clone() else {
            return change(&mut *store);
        };

        let mut next = store.clone();
        let value = change(&mut next)?;

        let next = tokio::task::spawn_blocking(move || {
            next.save_to(&path)?;
            tracing::debug!(path = %path.display(), "store snapshot saved");
            Ok::<_, bloglist_core::BlogError>(next)
        })
        .await
        .map_err(anyhow::Error::from)??;

        *store = next;
        Ok(value)
    }
}
