use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

/// Non-negative integer quote id taken from the `{id}` path segment.
///
/// Anything that is not a non-negative integer fitting the id column is
/// rejected as `Invalid quote ID`.
#[derive(Debug, Clone, Copy)]
pub struct QuoteId(pub i32);

impl<S> FromRequestParts<S> for QuoteId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;
        parse_quote_id(&raw).map(QuoteId)
    }
}

fn parse_quote_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<u32>()
        .ok()
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(invalid)
}

fn invalid() -> AppError {
    AppError::Validation("Invalid quote ID".into())
}
