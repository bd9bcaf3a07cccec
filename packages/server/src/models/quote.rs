use chrono::{DateTime, Utc};
use sea_orm::Order;
use serde::{Deserialize, Serialize};

use crate::entity::quote;
use crate::error::AppError;

use super::shared::validate_text;

const MAX_CONTENT_CHARS: usize = 2000;
const MAX_AUTHOR_CHARS: usize = 256;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateQuoteRequest {
    #[schema(example = "The only true wisdom is in knowing you know nothing.")]
    pub content: String,
    #[schema(example = "Socrates")]
    pub author: String,
}

pub fn validate_create_quote(payload: &CreateQuoteRequest) -> Result<(), AppError> {
    validate_text(&payload.content, "Content", MAX_CONTENT_CHARS)?;
    validate_text(&payload.author, "Author", MAX_AUTHOR_CHARS)?;
    Ok(())
}

/// Partial update: absent fields are left unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateQuoteRequest {
    pub content: Option<String>,
    pub author: Option<String>,
}

pub fn validate_update_quote(payload: &UpdateQuoteRequest) -> Result<(), AppError> {
    if let Some(ref content) = payload.content {
        validate_text(content, "Content", MAX_CONTENT_CHARS)?;
    }
    if let Some(ref author) = payload.author {
        validate_text(author, "Author", MAX_AUTHOR_CHARS)?;
    }
    Ok(())
}

/// A quote with its live vote count.
#[derive(Serialize, Deserialize, Debug, utoipa::ToSchema)]
pub struct QuoteResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Always 0 or 1.
    #[schema(example = 0)]
    pub vote_count: u64,
}

impl QuoteResponse {
    pub fn new(model: quote::Model, vote_count: u64) -> Self {
        Self {
            id: model.id,
            content: model.content,
            author: model.author,
            created_at: model.created_at,
            updated_at: model.updated_at,
            vote_count,
        }
    }
}

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteListQuery {
    /// Exact author match.
    pub author: Option<String>,
    /// Case-insensitive substring over content and author.
    pub search: Option<String>,
    /// One of `id`, `content`, `author`, `created_at`, `updated_at`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
}

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Content,
    Author,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(self) -> quote::Column {
        match self {
            SortField::Id => quote::Column::Id,
            SortField::Content => quote::Column::Content,
            SortField::Author => quote::Column::Author,
            SortField::CreatedAt => quote::Column::CreatedAt,
            SortField::UpdatedAt => quote::Column::UpdatedAt,
        }
    }
}

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteFilter {
    pub author: Option<String>,
    pub search: Option<String>,
    pub sort: SortField,
    pub order: Order,
}

pub fn parse_list_query(query: QuoteListQuery) -> Result<QuoteFilter, AppError> {
    let sort = match query.sort_by.as_deref().unwrap_or("created_at") {
        "id" => SortField::Id,
        "content" => SortField::Content,
        "author" => SortField::Author,
        "created_at" => SortField::CreatedAt,
        "updated_at" => SortField::UpdatedAt,
        _ => {
            return Err(AppError::Validation(
                "sortBy must be one of: id, content, author, created_at, updated_at".into(),
            ));
        }
    };

    let order = match query.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("desc") => Order::Desc,
        Some("asc") => Order::Asc,
        Some(_) => return Err(AppError::Validation("order must be asc or desc".into())),
    };

    let non_blank = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    Ok(QuoteFilter {
        author: non_blank(query.author),
        search: non_blank(query.search),
        sort,
        order,
    })
}
