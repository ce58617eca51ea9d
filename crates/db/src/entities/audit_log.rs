//! Audit log entity. Append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub timestamp: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// Denormalized so entries survive user deletion
    #[sea_orm(nullable)]
    pub user_email: Option<String>,

    pub action: String,

    pub entity_type: String,

    #[sea_orm(nullable)]
    pub entity_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    #[sea_orm(nullable)]
    pub ip_address: Option<String>,

    #[sea_orm(nullable)]
    pub user_agent: Option<String>,

    /// Tamper-evidence fingerprint over the entry fields
    #[sea_orm(unique)]
    pub hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
