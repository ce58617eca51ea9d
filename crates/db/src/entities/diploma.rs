//! Diploma entity.
//!
//! The identifier is a content-derived 64-hex digest, not a UUID.
//! `metadata_json` is an opaque document carrying the signature list,
//! audit breadcrumbs, import provenance and the anchor receipt; typed
//! views live in the core crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diploma")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub student_matricule: String,

    pub student_name: String,

    /// Degree program (e.g. "Licence Informatique")
    pub program: String,

    /// Academic session, a 4-digit year
    pub session: String,

    #[sea_orm(nullable)]
    pub academic_level: Option<String>,

    pub tenant_id: String,

    /// DRAFT | VALIDATED | PARTIALLY_SIGNED | SIGNED | CANCELLED
    pub status: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub metadata_json: Option<String>,

    /// Ledger transaction id, immutable once set
    #[sea_orm(nullable)]
    pub blockchain_tx_id: Option<String>,

    #[sea_orm(nullable)]
    pub blockchain_anchored_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    pub issued_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
