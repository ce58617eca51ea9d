//! Revoked token entity.
//!
//! Source of truth for token revocation; the Redis cache in front of
//! this table is an optimization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revoked_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub jti: String,

    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    #[sea_orm(nullable)]
    pub reason: Option<String>,

    pub revoked_at: DateTimeWithTimeZone,

    /// Natural expiry of the revoked token; rows past this are prunable
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
