use sqlx::SqlitePool;

use crate::error::StoreError;

use super::models::{Book, BookPatch, DeletedBook, NewBook};

const BOOK_COLUMNS: &str = "id, title, author, genre, description, cover_url";

/// SQL-backed catalog store.
#[derive(Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn get(&self, id: i64) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("Not Found"))
    }

    /// Validate and insert a new book, returning the stored row.
    pub async fn create(&self, new: NewBook) -> Result<Book, StoreError> {
        let title = require(&new.title, "title", "Title must not be blank")?;
        let author = require(&new.author, "author", "Author must not be blank")?;
        let genre = require(&new.genre, "genre", "Genre must not be blank")?;
        let description = require(&new.description, "description", "Description must not be blank")?;
        let cover_url = require(&new.cover_url, "coverUrl", "Cover URL must not be blank")?;

        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, genre, description, cover_url)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(title)
        .bind(author)
        .bind(genre)
        .bind(description)
        .bind(cover_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(book_id = book.id, "book created");

        Ok(book)
    }

    /// Merge the patch over the stored row and persist the result. Empty or
    /// absent fields keep their stored value.
    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<Book, StoreError> {
        let current = self.get(id).await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET title = ?, author = ?, genre = ?, description = ?, cover_url = ?
             WHERE id = ?
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(merge(patch.title, current.title))
        .bind(merge(patch.author, current.author))
        .bind(merge(patch.genre, current.genre))
        .bind(merge(patch.description, current.description))
        .bind(merge(patch.cover_url, current.cover_url))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Delete a book, returning a snapshot of the removed row.
    pub async fn delete(&self, id: i64) -> Result<DeletedBook, StoreError> {
        let deleted = sqlx::query_as::<_, DeletedBook>(
            "DELETE FROM books WHERE id = ?
             RETURNING title, author, genre, description, cover_url",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("Not Found"))?;

        tracing::info!(book_id = id, "book deleted");

        Ok(deleted)
    }
}

fn require(value: &Option<String>, field: &str, message: &str) -> Result<String, StoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(StoreError::invalid_input(field, message)),
    }
}

fn merge(candidate: Option<String>, current: String) -> String {
    match candidate {
        Some(v) if !v.is_empty() => v,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_kernel::Module;

    use crate::modules::books::BooksModule;

    use super::*;

    async fn store() -> BookStore {
        let pool = bookshelf_db::connect_memory().await.unwrap();
        let migrations: Vec<_> = BooksModule::new(pool.clone())
            .migrations()
            .into_iter()
            .map(|m| ("books".to_string(), m))
            .collect();
        bookshelf_db::run_migrations(&pool, &migrations).await.unwrap();
        BookStore::new(pool)
    }

    fn dune() -> NewBook {
        NewBook {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            genre: Some("Science Fiction".to_string()),
            description: Some("A desert planet and its spice".to_string()),
            cover_url: Some("https://covers.example/dune.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_list_returns_it() {
        let store = store().await;

        let book = store.create(dune()).await.unwrap();
        assert_eq!(book.title, "Dune");
        assert!(book.id >= 1);

        let books = store.list().await.unwrap();
        assert_eq!(books, vec![book]);
    }

    #[tokio::test]
    async fn list_is_ordered_by_title() {
        let store = store().await;

        store
            .create(NewBook {
                title: Some("Neuromancer".to_string()),
                ..dune()
            })
            .await
            .unwrap();
        store.create(dune()).await.unwrap();

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Neuromancer"]);
    }

    #[tokio::test]
    async fn validation_reports_first_missing_field_in_order() {
        let store = store().await;

        let err = store.create(NewBook::default()).await.unwrap_err();
        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "title");
                assert_eq!(message, "Title must not be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = store
            .create(NewBook {
                title: Some("Dune".to_string()),
                author: Some("".to_string()),
                ..dune()
            })
            .await
            .unwrap_err();
        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "author");
                assert_eq!(message, "Author must not be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_cover_url_is_reported_last() {
        let store = store().await;

        let err = store
            .create(NewBook {
                cover_url: None,
                ..dune()
            })
            .await
            .unwrap_err();
        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "coverUrl");
                assert_eq!(message, "Cover URL must not be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_missing_book_is_not_found() {
        let store = store().await;

        let err = store.get(99).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_merges_only_non_empty_fields() {
        let store = store().await;
        let book = store.create(dune()).await.unwrap();

        let updated = store
            .update(
                book.id,
                BookPatch {
                    title: Some("Dune Messiah".to_string()),
                    author: Some("".to_string()),
                    ..BookPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, "Frank Herbert");
        assert_eq!(updated.genre, book.genre);
    }

    #[tokio::test]
    async fn update_missing_book_is_not_found() {
        let store = store().await;

        let err = store.update(99, BookPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_returns_snapshot_and_removes_row() {
        let store = store().await;
        let book = store.create(dune()).await.unwrap();

        let deleted = store.delete(book.id).await.unwrap();
        assert_eq!(deleted.title, "Dune");

        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete(book.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
