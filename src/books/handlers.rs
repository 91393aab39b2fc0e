use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::models::{Book, BookQuery, BookRequest};
use crate::error::AppResult;
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, MessageResponse},
};
use crate::user_auth::Identity;

/// List books
///
/// GET /api/v1/books
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(BookQuery),
    responses(
        (status = 200, description = "All books, filtered by `q` when given", body = ApiResponse<Vec<Book>>)
    ),
    tag = "Books"
)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.books.list(query.q.as_deref()).await?;
    Ok(Json(ApiResponse::success(books)))
}

/// Get a book
///
/// GET /api/v1/books/{id}
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book", body = ApiResponse<Book>),
        (status = 404, description = "Book not found")
    ),
    tag = "Books"
)]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.books.get(book_id).await?;
    Ok(Json(ApiResponse::success(book)))
}

/// List the caller's books
///
/// GET /api/v1/books/mine
#[utoipa::path(
    get,
    path = "/api/v1/books/mine",
    responses(
        (status = 200, description = "Books authored by the caller", body = ApiResponse<Vec<Book>>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
pub async fn my_books(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.books.mine(&identity).await?;
    Ok(Json(ApiResponse::success(books)))
}

/// Create a book
///
/// POST /api/v1/books
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created, owned by the caller", body = ApiResponse<Book>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<BookRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let book = state.books.create(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(book))))
}

/// Update a book
///
/// PUT /api/v1/books/{id}
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid input or id mismatch"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Book not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(book_id): Path<i64>,
    Json(req): Json<BookRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let msg = state.books.update(&identity, book_id, req).await?;
    Ok(Json(ApiResponse::success(msg)))
}

/// Delete a book
///
/// DELETE /api/v1/books/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book deleted", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Book not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(book_id): Path<i64>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let msg = state.books.delete(&identity, book_id).await?;
    Ok(Json(ApiResponse::success(msg)))
}
