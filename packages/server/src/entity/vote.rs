use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's single vote. Both foreign keys are UNIQUE: a user holds at most
/// one vote and a quote carries at most one.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(unique)]
    pub quote_id: i32,
    #[sea_orm(belongs_to, from = "quote_id", to = "id")]
    pub quote: HasOne<super::quote::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
