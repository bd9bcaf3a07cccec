use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::QuoteId;
use crate::models::vote::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/quotes/{id}/vote",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Vote for a quote",
    description = "Records the caller's vote. A user holds at most one vote across all quotes, and a quote accepts a vote only while it has none. Checks run in that order after the quote lookup.",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 201, description = "Vote recorded", body = CastVoteResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Rejected (ALREADY_VOTED, VOTING_CLOSED)", body = ErrorBody),
        (status = 500, description = "Store unavailable (TRANSIENT_STORE_ERROR, STORE_TIMEOUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, username = %auth_user.username))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(quote_id): QuoteId,
) -> Result<impl IntoResponse, AppError> {
    let record = state.ledger.cast_vote(auth_user.user_id, quote_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CastVoteResponse {
            message: "Vote recorded successfully".into(),
            vote_count: record.vote_count,
            vote: record.vote.into(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/quotes/{id}/vote",
    tag = "Votes",
    operation_id = "revokeVote",
    summary = "Remove your vote from a quote",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Vote removed", body = RevokeVoteResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such vote (VOTE_NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Store unavailable (TRANSIENT_STORE_ERROR, STORE_TIMEOUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, username = %auth_user.username))]
pub async fn revoke_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(quote_id): QuoteId,
) -> Result<Json<RevokeVoteResponse>, AppError> {
    let vote_count = state.ledger.revoke_vote(auth_user.user_id, quote_id).await?;

    Ok(Json(RevokeVoteResponse {
        message: "Vote removed successfully".into(),
        vote_count,
    }))
}

#[utoipa::path(
    get,
    path = "/quotes/{id}/vote/count",
    tag = "Votes",
    operation_id = "voteCount",
    summary = "Vote count of a quote",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Current count", body = VoteCountResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn vote_count(
    State(state): State<AppState>,
    QuoteId(quote_id): QuoteId,
) -> Result<Json<VoteCountResponse>, AppError> {
    let count = state.ledger.vote_count(quote_id).await?;
    Ok(Json(VoteCountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/quotes/{id}/vote/check",
    tag = "Votes",
    operation_id = "checkVote",
    summary = "Whether the caller has voted for a quote",
    params(("id" = i32, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Vote status", body = VoteCheckResponse),
        (status = 400, description = "Invalid quote ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Quote not found (QUOTE_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, username = %auth_user.username))]
pub async fn check_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    QuoteId(quote_id): QuoteId,
) -> Result<Json<VoteCheckResponse>, AppError> {
    let has_voted = state.ledger.has_voted(auth_user.user_id, quote_id).await?;
    Ok(Json(VoteCheckResponse { has_voted }))
}
