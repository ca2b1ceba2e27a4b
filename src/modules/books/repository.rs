//! Book repository
//!
//! Every operation is one statement against the pool:
//! - reads and deletes surface the driver error untouched
//! - create/update translate failures into [`ModelError`]

use async_trait::async_trait;
use bookshelf_db::{Database, PgRow, SqlParam};
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

use super::error::{Failure, ModelError};
use super::models::{Book, BookId, BookNotId};

const SELECT_ALL: &str = r#"
    SELECT id, title, author, categories, link, year, "imageURL"
    FROM books
"#;

const SELECT_BY_ID: &str = r#"
    SELECT id, title, author, categories, link, year, "imageURL"
    FROM books
    WHERE id = $1
"#;

const INSERT_BOOK: &str = r#"
    INSERT INTO books (id, title, author, categories, link, year, "imageURL")
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const UPDATE_BOOK: &str = r#"
    UPDATE books
    SET title = $1, author = $2, categories = $3, link = $4, year = $5, "imageURL" = $6
    WHERE id = $7
"#;

const DELETE_BOOK: &str = "DELETE FROM books WHERE id = $1";

/// Data access for books
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books in the store's natural order
    async fn get_all(&self) -> Result<Vec<Book>, sqlx::Error>;

    /// The book with `id`, or `None` when no row matches
    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, sqlx::Error>;

    /// Store `input` under a freshly minted id and return that id
    async fn create_book(&self, input: BookNotId) -> Result<BookId, ModelError>;

    /// Replace every mutable field of the book with `id`
    async fn update_book(&self, id: BookId, input: BookNotId) -> Result<(), ModelError>;

    /// Remove the book with `id`; succeeds when nothing matched
    async fn delete(&self, id: BookId) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed [`BookRepository`]
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    db: Database,
}

impl PgBookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn try_update(&self, id: BookId, input: BookNotId) -> Result<(), Failure> {
        let mut params = input.into_params();
        params.push(SqlParam::Uuid(id));

        let affected = self.db.execute(UPDATE_BOOK, params).await?;
        if affected == 0 {
            return Err(ModelError::not_found(id).into());
        }
        Ok(())
    }
}

fn rows_to_books(rows: &[PgRow]) -> Result<Vec<Book>, sqlx::Error> {
    rows.iter().map(Book::from_row).collect()
}

#[async_trait]
impl BookRepository for PgBookRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Book>, sqlx::Error> {
        let rows = self.db.fetch(SELECT_ALL, Vec::new()).await?;
        let books = rows_to_books(&rows)?;

        tracing::debug!(count = books.len(), "Fetched books");
        Ok(books)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, sqlx::Error> {
        let rows = self.db.fetch(SELECT_BY_ID, vec![SqlParam::Uuid(id)]).await?;
        Ok(rows_to_books(&rows)?.into_iter().next())
    }

    #[instrument(skip(self, input))]
    async fn create_book(&self, input: BookNotId) -> Result<BookId, ModelError> {
        let id = Uuid::new_v4();
        let mut params = vec![SqlParam::Uuid(id)];
        params.extend(input.into_params());

        self.db.execute(INSERT_BOOK, params).await.map_err(|e| {
            tracing::warn!(error = %e, "Book insert failed");
            ModelError::creation_failed(e)
        })?;

        tracing::info!(book_id = %id, "Created book");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    async fn update_book(&self, id: BookId, input: BookNotId) -> Result<(), ModelError> {
        self.try_update(id, input).await.map_err(|failure| {
            tracing::warn!(failure = ?failure, "Book update failed");
            failure.translate(ModelError::update_failed)
        })?;

        tracing::info!(book_id = %id, "Updated book");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: BookId) -> Result<(), sqlx::Error> {
        let affected = self.db.execute(DELETE_BOOK, vec![SqlParam::Uuid(id)]).await?;

        tracing::debug!(book_id = %id, affected, "Deleted book");
        Ok(())
    }
}
