use sqlx::SqlitePool;

use crate::error::StoreError;

use super::models::{Favorite, FavoriteBook};

/// SQL-backed favorites store. Every operation is scoped by the
/// authenticated user id; the UNIQUE(user_id, book_id) constraint is the
/// authoritative duplicate guard.
#[derive(Clone)]
pub struct FavoriteStore {
    pool: SqlitePool,
}

impl FavoriteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The user's favorites joined with their books, ordered by book title.
    pub async fn list(&self, user_id: i64) -> Result<Vec<FavoriteBook>, StoreError> {
        let favorites = sqlx::query_as::<_, FavoriteBook>(
            "SELECT favorites.id, favorites.user_id, favorites.book_id,
                    books.title, books.author, books.genre,
                    books.description, books.cover_url
             FROM favorites
             INNER JOIN books ON books.id = favorites.book_id
             WHERE favorites.user_id = ?
             ORDER BY books.title ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    /// True iff a favorites row exists for the pair.
    pub async fn check(&self, user_id: i64, book_id: i64) -> Result<bool, StoreError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = ? AND book_id = ?)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    /// Insert a favorites row. Duplicate pairs conflict; a book id that
    /// matches no catalog row fails the foreign key and maps to not-found.
    pub async fn add(&self, user_id: i64, book_id: i64) -> Result<Favorite, StoreError> {
        let inserted = sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, book_id) VALUES (?, ?)
             RETURNING id, user_id, book_id",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(favorite) => {
                tracing::info!(user_id, book_id, "favorite added");
                Ok(favorite)
            }
            Err(err) if bookshelf_db::is_unique_violation(&err) => {
                Err(StoreError::conflict("Favorite already exists"))
            }
            Err(err) if bookshelf_db::is_foreign_key_violation(&err) => {
                Err(StoreError::not_found("Book not found"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete exactly the (user_id, book_id) row, returning it.
    pub async fn remove(&self, user_id: i64, book_id: i64) -> Result<Favorite, StoreError> {
        let removed = sqlx::query_as::<_, Favorite>(
            "DELETE FROM favorites WHERE user_id = ? AND book_id = ?
             RETURNING id, user_id, book_id",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("Favorite not found"))?;

        tracing::info!(user_id, book_id, "favorite removed");

        Ok(removed)
    }
}
