use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as served to clients. The password hash never
/// leaves the store, structurally: this type has no field for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Registration payload. Fields arrive optional so the store can report
/// the first missing one in its fixed order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
