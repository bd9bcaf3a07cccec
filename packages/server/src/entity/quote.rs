use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub content: String,
    #[sea_orm(indexed)]
    pub author: String,

    #[sea_orm(has_one)]
    pub vote: HasOne<super::vote::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft-delete marker. A quote with this set is treated as absent.
    #[sea_orm(indexed)]
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
