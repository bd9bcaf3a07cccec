use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::QuoteId;
use crate::models::quote::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/quotes",
    tag = "Quotes",
    operation_id = "listQuotes",
    summary = "List quotes",
    description = "Returns every quote with its live vote count. Supports an exact `author` filter, a case-insensitive `search` over content and author, and sorting by `id`, `content`, `author`, `created_at` (default) or `updated_at`. Ties are broken by id.",
    params(QuoteListQuery),
    responses(
        (status = 200, description = "Quotes", body = Vec<QuoteResponse>),
        (status = 400, description = "Bad sort or order (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_quotes(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<QuoteListQuery>,
) -> Result<Json<Vec<QuoteResponse>>, AppError> {
    let filter = parse_list_query(query)?;
    let quotes = state.catalog.list(&filter).await?;
    Ok(Json(quotes))
}

#[utoipa::path(
    post,
    path = "/quotes",
    tag = "Quotes",
    operation_id = "createQuote",
    summary = "Create a quote",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote created", body = QuoteResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, username = %auth_user.username))]
pub async fn create_quote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateQuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_quote(&payload)?;
    let quote = state.catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

#[utoipa::path(
    get,
    path = "/quotes/{id}",
    tag = "Quotes",
    operation_id = "getQuote",
    summary = "Get a quote by ID",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote", body = QuoteResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_quote(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(id): QuoteId,
) -> Result<Json<QuoteResponse>, AppError> {
    Ok(Json(state.catalog.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/quotes/{id}",
    tag = "Quotes",
    operation_id = "updateQuote",
    summary = "Update a quote",
    description = "Partial update: fields left out of the body keep their current value.",
    params(("id" = i32, Path, description = "Quote ID")),
    request_body = UpdateQuoteRequest,
    responses(
        (status = 200, description = "Quote updated", body = QuoteResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload))]
pub async fn update_quote(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(id): QuoteId,
    AppJson(payload): AppJson<UpdateQuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    validate_update_quote(&payload)?;
    Ok(Json(state.catalog.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/quotes/{id}",
    tag = "Quotes",
    operation_id = "deleteQuote",
    summary = "Delete a quote",
    description = "Soft delete. The quote disappears from every read and vote path; a vote already cast on it can still be removed.",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote deleted", body = MessageResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_quote(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(id): QuoteId,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete(id).await?;
    Ok(Json(MessageResponse::new("Quote deleted successfully")))
}
