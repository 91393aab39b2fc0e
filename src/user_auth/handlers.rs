use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::models::{AuthResponse, LoginRequest, RegisterRequest};
use super::token::Identity;
use crate::error::AppResult;
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, MessageResponse},
};

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid input or email already exists"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let msg = state.auth.register(req).await?;
    Ok(Json(ApiResponse::success(msg)))
}

/// Login user
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid email or password"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let auth = state.auth.login(req).await?;
    Ok(Json(ApiResponse::success(auth)))
}

/// Buy a book
///
/// POST /api/v1/books/{id}/buy
#[utoipa::path(
    post,
    path = "/api/v1/books/{id}/buy",
    params(
        ("id" = i64, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "\"bought\" or \"already bought\"", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Book not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn buy_book(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(book_id): Path<i64>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let msg = state.auth.purchase(&identity, book_id).await?;
    Ok(Json(ApiResponse::success(msg)))
}

/// Ids of purchased books
///
/// GET /api/v1/user/purchases
#[utoipa::path(
    get,
    path = "/api/v1/user/purchases",
    responses(
        (status = 200, description = "Purchased book ids", body = ApiResponse<Vec<i64>>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn purchased_books(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ApiResponse<Vec<i64>>>> {
    let ids = state.auth.purchased_ids(&identity).await?;
    Ok(Json(ApiResponse::success(ids)))
}
