use bookshelf_db::SqlParam;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identifier of a stored book, minted once at creation.
pub type BookId = Uuid;

/// A persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub categories: Vec<String>,
    pub link: String,
    pub year: i32,
    /// Stored in the case-sensitive `"imageURL"` column.
    #[serde(rename = "imageURL")]
    #[sqlx(rename = "imageURL")]
    pub image_url: String,
}

/// Book payload without an identifier, used for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookNotId {
    pub title: String,
    pub author: String,
    pub categories: Vec<String>,
    pub link: String,
    pub year: i32,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl Book {
    pub fn new(id: BookId, input: BookNotId) -> Self {
        Self {
            id,
            title: input.title,
            author: input.author,
            categories: input.categories,
            link: input.link,
            year: input.year,
            image_url: input.image_url,
        }
    }
}

impl BookNotId {
    /// Bind values for the mutable columns, in
    /// `title, author, categories, link, year, "imageURL"` order.
    pub(crate) fn into_params(self) -> Vec<SqlParam> {
        vec![
            self.title.into(),
            self.author.into(),
            self.categories.into(),
            self.link.into(),
            self.year.into(),
            self.image_url.into(),
        ]
    }
}
