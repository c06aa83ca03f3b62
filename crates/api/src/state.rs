use std::sync::Arc;

use bookshelf_core::repository::CatalogStore;
use bookshelf_core::services::{BookService, PublisherService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState<S>>`.
///
/// Generic over the catalog store so the same router runs on PostgreSQL in
/// production and on the in-memory store in tests. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState<S> {
    pub books: BookService<S>,
    pub publishers: PublisherService<S>,
    /// Kept for the health probe.
    pub store: S,
    pub config: Arc<ServerConfig>,
}

impl<S: CatalogStore> AppState<S> {
    /// Wire both services to one store.
    pub fn new(store: S, config: ServerConfig) -> Self {
        Self {
            books: BookService::new(store.clone()),
            publishers: PublisherService::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}
