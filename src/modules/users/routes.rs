use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use bookshelf_http::error::AppError;

use super::models::{NewUser, User};
use super::store::UserStore;

pub fn router(store: UserStore) -> Router {
    Router::new().route("/", post(register)).with_state(store)
}

async fn register(
    State(store): State<UserStore>,
    Json(new): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    Ok(Json(store.register(new).await?))
}
