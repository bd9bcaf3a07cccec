use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::vote;

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = 1)]
    pub quote_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<vote::Model> for VoteResponse {
    fn from(vote: vote::Model) -> Self {
        Self {
            id: vote.id,
            user_id: vote.user_id,
            quote_id: vote.quote_id,
            created_at: vote.created_at,
        }
    }
}

/// Returned after a vote is recorded.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CastVoteResponse {
    #[schema(example = "Vote recorded successfully")]
    pub message: String,
    /// Vote count of the quote after commit.
    #[serde(rename = "voteCount")]
    #[schema(example = 1)]
    pub vote_count: u64,
    pub vote: VoteResponse,
}

/// Returned after a vote is removed.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RevokeVoteResponse {
    #[schema(example = "Vote removed successfully")]
    pub message: String,
    #[serde(rename = "voteCount")]
    #[schema(example = 0)]
    pub vote_count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteCountResponse {
    #[schema(example = 1)]
    pub count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteCheckResponse {
    pub has_voted: bool,
}
