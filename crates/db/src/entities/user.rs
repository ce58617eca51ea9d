//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Stored lowercased; lookups lowercase their input
    #[sea_orm(unique)]
    pub email: String,

    pub full_name: String,

    /// Argon2 hash, never serialized outward
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// SUPER_ADMIN | ADMIN | RECTOR | DEAN | DIRECTOR | SIGNER | VALIDATOR | VIEWER
    pub role: String,

    pub tenant_id: String,

    /// ACTIVE | INACTIVE
    pub status: String,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,

    /// Handwritten signature image (data URL or storage key)
    #[sea_orm(column_type = "Text", nullable)]
    pub signature_img: Option<String>,

    /// Institutional stamp image
    #[sea_orm(column_type = "Text", nullable)]
    pub stamp_img: Option<String>,

    /// Title printed next to the signature (e.g. "Recteur")
    #[sea_orm(nullable)]
    pub official_title: Option<String>,

    pub created_at: DateTimeWithTimeZone,

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
