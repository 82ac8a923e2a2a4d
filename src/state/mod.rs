/// Sessions and their forgery tokens.
pub mod session;

use std::sync::Arc;

use crate::dao::catalog_store::CatalogStore;

pub use self::session::{SessionContext, SessionRegistry};

/// Reference-counted handle to [`AppState`] shared by every handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the catalog store handle and the session registry.
///
/// No catalog data lives here; the store is the only source of truth.
pub struct AppState {
    store: Arc<dyn CatalogStore>,
    sessions: SessionRegistry,
}

impl AppState {
    /// Construct a new [`AppState`] with default session settings.
    pub fn new(store: Arc<dyn CatalogStore>) -> SharedState {
        Self::with_sessions(store, SessionRegistry::new())
    }

    /// Construct a new [`AppState`] around an existing session registry.
    pub fn with_sessions(store: Arc<dyn CatalogStore>, sessions: SessionRegistry) -> SharedState {
        Arc::new(Self { store, sessions })
    }

    /// Handle to the catalog store.
    pub fn store(&self) -> Arc<dyn CatalogStore> {
        Arc::clone(&self.store)
    }

    /// Sessions and the forgery tokens bound to them.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
