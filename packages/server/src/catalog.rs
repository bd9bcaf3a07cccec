//! Quote storage and listing. Vote counts are read from the store on every
//! call and never cached.

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Condition, Func, LikeExpr};
use sea_orm::*;
use thiserror::Error;
use tracing::{info, instrument};

use crate::database::Store;
use crate::entity::{quote, vote};
use crate::ledger::{LedgerError, VoteLedger};
use crate::models::quote::{CreateQuoteRequest, QuoteFilter, QuoteResponse, UpdateQuoteRequest};
use crate::models::shared::escape_like;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("quote not found")]
    QuoteNotFound,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
                CatalogError::Ledger(LedgerError::StoreTimeout)
            }
            other => CatalogError::Ledger(LedgerError::from(other)),
        }
    }
}

#[derive(Clone)]
pub struct QuoteCatalog {
    store: Store,
    ledger: VoteLedger,
}

impl QuoteCatalog {
    pub fn new(store: Store, ledger: VoteLedger) -> Self {
        Self { store, ledger }
    }

    /// Insert a quote. Inputs are expected to be validated already; they are
    /// stored trimmed.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: CreateQuoteRequest) -> Result<QuoteResponse, CatalogError> {
        let now = Utc::now();
        let model = quote::ActiveModel {
            content: Set(payload.content.trim().to_string()),
            author: Set(payload.author.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(self.store.writer())
        .await?;

        info!(quote_id = model.id, "Quote created");
        Ok(QuoteResponse::new(model, 0))
    }

    /// Load a live quote and its vote in a single joined read.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<QuoteResponse, CatalogError> {
        let (model, vote) = quote::Entity::find_by_id(id)
            .filter(quote::Column::DeletedAt.is_null())
            .find_also_related(vote::Entity)
            .one(self.store.reader())
            .await?
            .ok_or(CatalogError::QuoteNotFound)?;

        // `votes.quote_id` is UNIQUE, so the join yields at most one vote.
        Ok(QuoteResponse::new(model, u64::from(vote.is_some())))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &QuoteFilter) -> Result<Vec<QuoteResponse>, CatalogError> {
        let mut select = quote::Entity::find().filter(quote::Column::DeletedAt.is_null());

        if let Some(ref author) = filter.author {
            select = select.filter(quote::Column::Author.eq(author.as_str()));
        }

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", escape_like(search).to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(quote::Column::Content)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(quote::Column::Author)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        let models = select
            .order_by(filter.sort.column(), filter.order.clone())
            .order_by_asc(quote::Column::Id)
            .all(self.store.reader())
            .await?;

        let ids: Vec<i32> = models.iter().map(|q| q.id).collect();
        let counts = self.ledger.vote_counts(&ids).await?;

        Ok(models
            .into_iter()
            .map(|q| {
                let vote_count = counts.get(&q.id).copied().unwrap_or(0);
                QuoteResponse::new(q, vote_count)
            })
            .collect())
    }

    /// Apply the fields present in `payload` and bump `updated_at`.
    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        id: i32,
        payload: UpdateQuoteRequest,
    ) -> Result<QuoteResponse, CatalogError> {
        let txn = self.store.writer().begin().await?;

        let existing = match find_live(&txn, id).await {
            Ok(model) => model,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        let mut active: quote::ActiveModel = existing.into();
        if let Some(content) = payload.content {
            active.content = Set(content.trim().to_string());
        }
        if let Some(author) = payload.author {
            active.author = Set(author.trim().to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await?;
        let vote_count = vote::Entity::find()
            .filter(vote::Column::QuoteId.eq(model.id))
            .count(&txn)
            .await?;
        txn.commit().await?;

        info!("Quote updated");
        Ok(QuoteResponse::new(model, vote_count))
    }

    /// Soft delete. Votes already cast on the quote stay revocable.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let result = quote::Entity::update_many()
            .col_expr(quote::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(quote::Column::Id.eq(id))
            .filter(quote::Column::DeletedAt.is_null())
            .exec(self.store.writer())
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::QuoteNotFound);
        }

        info!("Quote deleted");
        Ok(())
    }
}

async fn find_live<C: ConnectionTrait>(conn: &C, id: i32) -> Result<quote::Model, CatalogError> {
    quote::Entity::find_by_id(id)
        .filter(quote::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CatalogError::QuoteNotFound)
}
