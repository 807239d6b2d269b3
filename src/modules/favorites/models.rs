use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A favorites row: one (user, book) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
}

/// A favorites row joined with its book, as served by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBook {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
}
