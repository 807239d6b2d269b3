use axum::extract::{FromRef, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use bookshelf_auth::{AuthUser, TokenVerifier};
use bookshelf_http::error::AppError;

use crate::error::StoreError;

use super::models::{Favorite, FavoriteBook};
use super::store::FavoriteStore;

/// Router state: the store plus the verifier the [`AuthUser`] extractor
/// pulls out via `FromRef`.
#[derive(Clone)]
pub struct FavoritesState {
    store: FavoriteStore,
    verifier: TokenVerifier,
}

impl FromRef<FavoritesState> for TokenVerifier {
    fn from_ref(state: &FavoritesState) -> TokenVerifier {
        state.verifier.clone()
    }
}

pub fn router(store: FavoriteStore, verifier: TokenVerifier) -> Router {
    Router::new()
        .route(
            "/",
            get(list_favorites)
                .post(add_favorite)
                .delete(remove_favorite),
        )
        .route("/check", get(check_favorite))
        .with_state(FavoritesState { store, verifier })
}

/// Body carrying a book id, which clients send either as a JSON integer or
/// as an integer string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookIdBody {
    book_id: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckQuery {
    book_id: Option<String>,
}

async fn list_favorites(
    State(state): State<FavoritesState>,
    user: AuthUser,
) -> Result<Json<Vec<FavoriteBook>>, AppError> {
    Ok(Json(state.store.list(user.user_id).await?))
}

async fn check_favorite(
    State(state): State<FavoritesState>,
    user: AuthUser,
    Query(query): Query<CheckQuery>,
) -> Result<Json<bool>, AppError> {
    let book_id = parse_book_id_str(query.book_id.as_deref())?;
    Ok(Json(state.store.check(user.user_id, book_id).await?))
}

async fn add_favorite(
    State(state): State<FavoritesState>,
    user: AuthUser,
    Json(body): Json<BookIdBody>,
) -> Result<Json<Favorite>, AppError> {
    let book_id = parse_book_id(body.book_id.as_ref())?;
    Ok(Json(state.store.add(user.user_id, book_id).await?))
}

async fn remove_favorite(
    State(state): State<FavoritesState>,
    user: AuthUser,
    body: Option<Json<BookIdBody>>,
) -> Result<Json<Favorite>, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let book_id = parse_book_id(body.book_id.as_ref())?;
    Ok(Json(state.store.remove(user.user_id, book_id).await?))
}

fn parse_book_id(value: Option<&serde_json::Value>) -> Result<i64, AppError> {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(bad_book_id)
}

fn parse_book_id_str(value: Option<&str>) -> Result<i64, AppError> {
    value.and_then(|s| s.parse().ok()).ok_or_else(bad_book_id)
}

fn bad_book_id() -> AppError {
    StoreError::invalid_input("bookId", "Book ID must be an integer").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_id_accepts_integers_and_integer_strings() {
        assert_eq!(parse_book_id(Some(&serde_json::json!(7))).unwrap(), 7);
        assert_eq!(parse_book_id(Some(&serde_json::json!("7"))).unwrap(), 7);
        assert_eq!(parse_book_id_str(Some("7")).unwrap(), 7);
    }

    #[test]
    fn book_id_rejects_everything_else() {
        assert!(parse_book_id(None).is_err());
        assert!(parse_book_id(Some(&serde_json::json!("seven"))).is_err());
        assert!(parse_book_id(Some(&serde_json::json!(1.5))).is_err());
        assert!(parse_book_id(Some(&serde_json::json!(null))).is_err());
        assert!(parse_book_id_str(None).is_err());
        assert!(parse_book_id_str(Some("seven")).is_err());
    }
}
