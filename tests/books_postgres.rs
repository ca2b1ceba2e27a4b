//! Repository tests against PostgreSQL.
//!
//! Tests marked `requires database` expect the local test credentials:
//! `NODE_ENV=test cargo test -- --ignored`

mod common;

use bookshelf_app::books::{BookRepository, ModelError, PgBookRepository};
use bookshelf_db::Database;
use bookshelf_kernel::settings::DatabaseSettings;
use common::{revised_input, sample_input};
use uuid::Uuid;

const TEST_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        categories TEXT[] NOT NULL,
        link TEXT NOT NULL,
        year INTEGER NOT NULL,
        "imageURL" TEXT NOT NULL
    )
"#;

async fn live_repository() -> PgBookRepository {
    let db = Database::connect(&DatabaseSettings::test_fixture())
        .await
        .expect("pool creation failed");
    db.execute(TEST_SCHEMA, Vec::new())
        .await
        .expect("schema setup failed");
    PgBookRepository::new(db)
}

async fn closed_repository() -> PgBookRepository {
    let db = Database::connect_lazy(&DatabaseSettings::test_fixture());
    db.close().await;
    PgBookRepository::new(db)
}

#[tokio::test]
async fn insert_failure_becomes_creation_failed() {
    let repo = closed_repository().await;

    let err = repo.create_book(sample_input()).await.unwrap_err();

    assert!(matches!(err, ModelError::CreationFailed { .. }));
    assert_eq!(err.body().message, "can not create book");
    assert_eq!(err.body().status, 400);
}

#[tokio::test]
async fn store_failure_during_update_becomes_update_failed() {
    let repo = closed_repository().await;

    let err = repo
        .update_book(Uuid::new_v4(), revised_input())
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::UpdateFailed { .. }));
    assert_eq!(err.body().status, 400);
}

#[tokio::test]
async fn reads_and_deletes_surface_store_errors_untouched() {
    let repo = closed_repository().await;

    assert!(matches!(
        repo.get_all().await,
        Err(sqlx::Error::PoolClosed)
    ));
    assert!(matches!(
        repo.get_by_id(Uuid::new_v4()).await,
        Err(sqlx::Error::PoolClosed)
    ));
    assert!(matches!(
        repo.delete(Uuid::new_v4()).await,
        Err(sqlx::Error::PoolClosed)
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_then_get_by_id_round_trips() {
    let repo = live_repository().await;

    let id = repo.create_book(sample_input()).await.unwrap();
    let book = repo.get_by_id(id).await.unwrap().expect("book exists");

    assert_eq!(book.id, id);
    assert_eq!(book.title, "A");
    assert_eq!(book.author, "B");
    assert_eq!(book.categories, vec!["x".to_string()]);
    assert_eq!(book.link, "http://l");
    assert_eq!(book.year, 2000);
    assert_eq!(book.image_url, "http://i");

    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_of_unknown_id_is_not_found() {
    let repo = live_repository().await;
    let id = Uuid::new_v4();

    let err = repo.update_book(id, revised_input()).await.unwrap_err();

    assert!(matches!(err, ModelError::NotFound { id: got } if got == id));
    assert_eq!(err.body().status, 400);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_replaces_every_field() {
    let repo = live_repository().await;
    let id = repo.create_book(sample_input()).await.unwrap();

    repo.update_book(id, revised_input()).await.unwrap();

    let book = repo.get_by_id(id).await.unwrap().unwrap();
    let expected = revised_input();
    assert_eq!(book.title, expected.title);
    assert_eq!(book.author, expected.author);
    assert_eq!(book.categories, expected.categories);
    assert_eq!(book.link, expected.link);
    assert_eq!(book.year, expected.year);
    assert_eq!(book.image_url, expected.image_url);

    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_id_reads_empty_and_deletes_cleanly() {
    let repo = live_repository().await;
    let id = Uuid::new_v4();

    assert!(repo.get_by_id(id).await.unwrap().is_none());
    repo.delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_all_includes_created_book() {
    let repo = live_repository().await;
    let id = repo.create_book(sample_input()).await.unwrap();

    let books = repo.get_all().await.unwrap();
    assert!(books.iter().any(|book| book.id == id));

    repo.delete(id).await.unwrap();
}
