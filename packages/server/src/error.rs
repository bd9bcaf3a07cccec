use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::ledger::LedgerError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `QUOTE_NOT_FOUND`,
    /// `VOTE_NOT_FOUND`, `ALREADY_VOTED`, `VOTING_CLOSED`, `USERNAME_TAKEN`,
    /// `TRANSIENT_STORE_ERROR`, `STORE_TIMEOUT`, `INTERNAL_ERROR`.
    #[schema(example = "ALREADY_VOTED")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "You have already voted for a quote")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    QuoteNotFound,
    VoteNotFound,
    AlreadyVoted,
    VotingClosed,
    UsernameTaken,
    /// The store kept reporting conflicts after the retry budget was spent.
    TransientStore(String),
    StoreTimeout,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::QuoteNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "QUOTE_NOT_FOUND",
                    message: "Quote not found".into(),
                },
            ),
            AppError::VoteNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "VOTE_NOT_FOUND",
                    message: "Vote not found".into(),
                },
            ),
            AppError::AlreadyVoted => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "ALREADY_VOTED",
                    message: "You have already voted for a quote".into(),
                },
            ),
            AppError::VotingClosed => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "VOTING_CLOSED",
                    message: "This quote already has a vote".into(),
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::TransientStore(detail) => {
                tracing::error!("Transient store error after retries: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "TRANSIENT_STORE_ERROR",
                        message: "The store is busy, please try again".into(),
                    },
                )
            }
            AppError::StoreTimeout => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    code: "STORE_TIMEOUT",
                    message: "Timed out waiting for the store".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::QuoteNotFound => AppError::QuoteNotFound,
            LedgerError::VoteNotFound => AppError::VoteNotFound,
            LedgerError::AlreadyVoted => AppError::AlreadyVoted,
            LedgerError::VotingClosedForQuote => AppError::VotingClosed,
            LedgerError::UnknownUser => {
                tracing::warn!("Token refers to a user that no longer exists");
                AppError::TokenInvalid
            }
            LedgerError::StoreTimeout => AppError::StoreTimeout,
            LedgerError::Transient(e) => AppError::TransientStore(e.to_string()),
            LedgerError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::QuoteNotFound => AppError::QuoteNotFound,
            CatalogError::Ledger(e) => e.into(),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        LedgerError::from(err).into()
    }
}
