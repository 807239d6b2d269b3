use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use bookshelf_http::error::AppError;

use super::models::{Book, BookPatch, DeletedBook, NewBook};
use super::store::BookStore;

pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn list_books(State(store): State<BookStore>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.list().await?))
}

async fn get_book(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(store.get(id).await?))
}

async fn create_book(
    State(store): State<BookStore>,
    Json(new): Json<NewBook>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(store.create(new).await?))
}

async fn update_book(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(store.update(id, patch).await?))
}

async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedBook>, AppError> {
    Ok(Json(store.delete(id).await?))
}
