pub mod error;
pub mod memory;
pub mod models;
pub mod repository;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bookshelf_db::Database;
use bookshelf_kernel::{InitCtx, Module};

pub use error::{ErrorBody, ModelError};
pub use memory::InMemoryBookRepository;
pub use models::{Book, BookId, BookNotId};
pub use repository::{BookRepository, PgBookRepository};

/// Books module: owns the repository over the shared database handle
pub struct BooksModule {
    db: Database,
    repository: Arc<PgBookRepository>,
}

impl BooksModule {
    pub fn new(db: Database) -> Self {
        let repository = Arc::new(PgBookRepository::new(db.clone()));
        Self { db, repository }
    }

    /// Repository handle for callers driving book operations
    pub fn repository(&self) -> Arc<dyn BookRepository> {
        self.repository.clone()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.db
            .health_check()
            .await
            .context("books store is unreachable")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> Arc<BooksModule> {
    Arc::new(BooksModule::new(db))
}
