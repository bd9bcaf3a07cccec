use std::collections::HashMap;

use sea_orm::*;

use super::LedgerError;
use crate::entity::{quote, vote};

/// Load a live (not soft-deleted) quote.
pub(crate) async fn find_live_quote<C: ConnectionTrait>(
    conn: &C,
    quote_id: i32,
) -> Result<quote::Model, LedgerError> {
    quote::Entity::find_by_id(quote_id)
        .filter(quote::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(LedgerError::QuoteNotFound)
}

/// The single vote held by `user_id`, if any.
pub(crate) async fn find_user_vote<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Option<vote::Model>, LedgerError> {
    Ok(vote::Entity::find()
        .filter(vote::Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

pub(crate) async fn count_votes<C: ConnectionTrait>(
    conn: &C,
    quote_id: i32,
) -> Result<u64, LedgerError> {
    Ok(vote::Entity::find()
        .filter(vote::Column::QuoteId.eq(quote_id))
        .count(conn)
        .await?)
}

pub(crate) async fn has_vote<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    quote_id: i32,
) -> Result<bool, LedgerError> {
    let count = vote::Entity::find()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::QuoteId.eq(quote_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Vote counts for a batch of quotes. Quotes without votes map to zero.
pub(crate) async fn count_votes_for<C: ConnectionTrait>(
    conn: &C,
    quote_ids: &[i32],
) -> Result<HashMap<i32, u64>, LedgerError> {
    let mut counts: HashMap<i32, u64> = quote_ids.iter().map(|&id| (id, 0)).collect();
    if quote_ids.is_empty() {
        return Ok(counts);
    }

    let votes = vote::Entity::find()
        .filter(vote::Column::QuoteId.is_in(quote_ids.iter().copied()))
        .all(conn)
        .await?;

    for v in votes {
        *counts.entry(v.quote_id).or_insert(0) += 1;
    }
    Ok(counts)
}
