use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog entry as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
}

/// Payload for creating a book.
///
/// Fields arrive optional so the store can report the first missing one in
/// its fixed order instead of the deserializer rejecting the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// Partial update payload. Empty or absent fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// Snapshot of a deleted row, echoed back without its id.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub cover_url: String,
}
