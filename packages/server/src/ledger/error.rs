use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Outcomes of a ledger operation other than success.
///
/// Everything except `Transient` is permanent: the ledger never retries it and
/// the store is left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Quote not found")]
    QuoteNotFound,

    #[error("Vote not found")]
    VoteNotFound,

    #[error("You have already voted for a quote")]
    AlreadyVoted,

    #[error("This quote already has a vote")]
    VotingClosedForQuote,

    /// The authenticated user no longer has a row in `users`.
    #[error("User not found")]
    UnknownUser,

    #[error("Timed out waiting for the write path")]
    StoreTimeout,

    #[error("Transient store error: {0}")]
    Transient(DbErr),

    #[error("Store error: {0}")]
    Store(DbErr),
}

impl LedgerError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Transient(_))
    }

    /// Classify a failed insert into `votes`.
    ///
    /// The UNIQUE constraints back up the in-transaction checks, so a
    /// violation here means a concurrent writer got there first.
    pub(crate) fn from_vote_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                if detail.contains("quote_id") {
                    LedgerError::VotingClosedForQuote
                } else {
                    LedgerError::AlreadyVoted
                }
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => LedgerError::UnknownUser,
            _ => LedgerError::from(err),
        }
    }
}

impl From<DbErr> for LedgerError {
    fn from(err: DbErr) -> Self {
        if is_transient(&err) {
            LedgerError::Transient(err)
        } else {
            LedgerError::Store(err)
        }
    }
}

/// Whether a store error is a conflict with a concurrent transaction (or a
/// momentary connectivity fault) rather than a permanent failure.
fn is_transient(err: &DbErr) -> bool {
    if matches!(err, DbErr::ConnectionAcquire(_)) {
        return true;
    }

    let message = err.to_string().to_ascii_lowercase();
    ["database is locked", "database is busy", "could not serialize", "deadlock"]
        .iter()
        .any(|needle| message.contains(needle))
}
