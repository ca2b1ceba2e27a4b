use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::ModelError;
use super::models::{Book, BookId, BookNotId};
use super::repository::BookRepository;

/// In-process [`BookRepository`] keeping books in insertion order.
///
/// Used by tests and local tooling; it never produces store errors.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn get_all(&self) -> Result<Vec<Book>, sqlx::Error> {
        Ok(self.books.read().await.clone())
    }

    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, sqlx::Error> {
        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn create_book(&self, input: BookNotId) -> Result<BookId, ModelError> {
        let id = Uuid::new_v4();
        self.books.write().await.push(Book::new(id, input));
        Ok(id)
    }

    async fn update_book(&self, id: BookId, input: BookNotId) -> Result<(), ModelError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| ModelError::not_found(id))?;
        *book = Book::new(id, input);
        Ok(())
    }

    async fn delete(&self, id: BookId) -> Result<(), sqlx::Error> {
        self.books.write().await.retain(|book| book.id != id);
        Ok(())
    }
}
