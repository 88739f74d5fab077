//! Application state - shared across all handlers.

use std::sync::Arc;

use stanza_core::ports::{CategoryRepository, PostRepository};
use stanza_infra::InMemoryRepository;
use stanza_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use stanza_infra::database::{PostgresCategoryRepository, PostgresPostRepository, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(conn) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                            posts: Arc::new(PostgresPostRepository::new(conn)),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        Self::in_memory()
    }

    /// State backed entirely by the in-memory store. Also used by tests.
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            categories: Arc::new(repo.clone()),
            posts: Arc::new(repo),
        }
    }
}
