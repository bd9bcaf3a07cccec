//! Vote recording.
//!
//! A user holds at most one vote in the whole system, and a quote accepts a
//! vote only while it has none. Both rules are checked inside a single write
//! transaction on the store's one writer connection, and are backed by UNIQUE
//! constraints on `votes.user_id` and `votes.quote_id`.

mod error;
mod queries;

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use common::RetryPolicy;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnAcquireErr, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

pub use error::LedgerError;

use crate::database::Store;
use crate::entity::vote;

/// A freshly committed vote together with the quote's vote count after commit.
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub vote: vote::Model,
    pub vote_count: u64,
}

#[derive(Clone)]
pub struct VoteLedger {
    store: Store,
    retry: RetryPolicy,
    write_timeout: Duration,
}

impl VoteLedger {
    pub fn new(store: Store, retry: RetryPolicy, write_timeout: Duration) -> Self {
        Self {
            store,
            retry,
            write_timeout,
        }
    }

    /// Bound how long a mutation may wait for the write path.
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// Record a vote by `user_id` on `quote_id`.
    ///
    /// Checks run in this order and the first failure wins: the quote exists,
    /// the user holds no vote, the quote has no vote.
    #[instrument(skip(self))]
    pub async fn cast_vote(&self, user_id: i32, quote_id: i32) -> Result<VoteRecord, LedgerError> {
        let record = self
            .retrying("cast_vote", || self.try_cast_vote(user_id, quote_id))
            .await?;
        info!(vote_id = record.vote.id, "Vote recorded");
        Ok(record)
    }

    /// Remove the vote `user_id` holds on `quote_id` and return the quote's
    /// remaining vote count.
    #[instrument(skip(self))]
    pub async fn revoke_vote(&self, user_id: i32, quote_id: i32) -> Result<u64, LedgerError> {
        let count = self
            .retrying("revoke_vote", || self.try_revoke_vote(user_id, quote_id))
            .await?;
        info!("Vote removed");
        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn vote_count(&self, quote_id: i32) -> Result<u64, LedgerError> {
        let reader = self.store.reader();
        queries::find_live_quote(reader, quote_id).await?;
        queries::count_votes(reader, quote_id).await
    }

    #[instrument(skip(self))]
    pub async fn has_voted(&self, user_id: i32, quote_id: i32) -> Result<bool, LedgerError> {
        let reader = self.store.reader();
        queries::find_live_quote(reader, quote_id).await?;
        queries::has_vote(reader, user_id, quote_id).await
    }

    /// Live vote counts for a batch of quotes, read from committed state.
    pub async fn vote_counts(&self, quote_ids: &[i32]) -> Result<HashMap<i32, u64>, LedgerError> {
        queries::count_votes_for(self.store.reader(), quote_ids).await
    }

    async fn try_cast_vote(&self, user_id: i32, quote_id: i32) -> Result<VoteRecord, LedgerError> {
        let txn = self.begin_write().await?;
        let result = cast_in(&txn, user_id, quote_id).await;
        finish(txn, result).await
    }

    async fn try_revoke_vote(&self, user_id: i32, quote_id: i32) -> Result<u64, LedgerError> {
        let txn = self.begin_write().await?;
        let result = revoke_in(&txn, user_id, quote_id).await;
        finish(txn, result).await
    }

    async fn begin_write(&self) -> Result<DatabaseTransaction, LedgerError> {
        match tokio::time::timeout(self.write_timeout, self.store.writer().begin()).await {
            Ok(Ok(txn)) => Ok(txn),
            Ok(Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))) | Err(_) => {
                warn!(
                    timeout_ms = self.write_timeout.as_millis() as u64,
                    "Timed out waiting for the write path"
                );
                Err(LedgerError::StoreTimeout)
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }

    /// Run `attempt` until it succeeds, fails permanently, or the retry budget
    /// for transient store errors is spent.
    async fn retrying<T, F, Fut>(&self, op: &'static str, mut attempt: F) -> Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let mut tries: u8 = 0;
        loop {
            tries += 1;
            match attempt().await {
                Err(e) if e.is_transient() && self.retry.should_retry(tries) => {
                    let delay = self.retry.backoff(tries);
                    warn!(
                        op,
                        attempt = tries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient store error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_transient() {
                        warn!(op, attempts = tries, error = %e, "Retries exhausted");
                    } else {
                        debug!(op, error = %e, "Rejected");
                    }
                    return Err(e);
                }
                Ok(value) => return Ok(value),
            }
        }
    }
}

async fn cast_in(
    txn: &DatabaseTransaction,
    user_id: i32,
    quote_id: i32,
) -> Result<VoteRecord, LedgerError> {
    queries::find_live_quote(txn, quote_id).await?;

    if queries::find_user_vote(txn, user_id).await?.is_some() {
        return Err(LedgerError::AlreadyVoted);
    }

    if queries::count_votes(txn, quote_id).await? > 0 {
        return Err(LedgerError::VotingClosedForQuote);
    }

    let vote = vote::ActiveModel {
        user_id: Set(user_id),
        quote_id: Set(quote_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(LedgerError::from_vote_insert)?;

    let vote_count = queries::count_votes(txn, quote_id).await?;

    Ok(VoteRecord { vote, vote_count })
}

async fn revoke_in(
    txn: &DatabaseTransaction,
    user_id: i32,
    quote_id: i32,
) -> Result<u64, LedgerError> {
    let result = vote::Entity::delete_many()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::QuoteId.eq(quote_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(LedgerError::VoteNotFound);
    }

    queries::count_votes(txn, quote_id).await
}

/// Commit on success, roll back on failure. The transaction is always closed
/// before the caller sees the result.
async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
