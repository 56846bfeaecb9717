//! Application state for the Petitio REST API.
//!
//! Shared by every handler: the storage backend, the server configuration
//! and the image store.

use std::sync::Arc;

use petitio_persistence::core::PlatformStorage;

use crate::config::ServerConfig;
use crate::images::ImageStore;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`PlatformStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use petitio_rest::{AppState, ServerConfig};
/// use petitio_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// ```
pub struct AppState<S> {
    storage: Arc<S>,
    config: Arc<ServerConfig>,
    images: ImageStore,
}

// S sits behind an Arc and need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            images: self.images.clone(),
        }
    }
}

impl<S: PlatformStorage> AppState<S> {
    /// Creates a new AppState. Images are stored under `config.image_dir`.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let images = ImageStore::new(config.image_dir.clone());
        Self {
            storage,
            config: Arc::new(config),
            images,
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// bcrypt cost for new password hashes.
    pub fn bcrypt_cost(&self) -> u32 {
        self.config.bcrypt_cost
    }
}
