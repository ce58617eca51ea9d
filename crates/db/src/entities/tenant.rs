//! Tenant entity.
//!
//! Tenants form a tree (ministry, universities, faculties, IPES,
//! departments) via `parent_id`. Rows are soft deleted only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    /// URL-safe short name, unique when present
    #[sea_orm(unique, nullable)]
    pub slug: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// MINISTRY | UNIVERSITY | FACULTY | IPES | DEPARTMENT
    pub tenant_type: String,

    /// Parent tenant in the institutional tree
    #[sea_orm(nullable)]
    pub parent_id: Option<String>,

    #[sea_orm(nullable)]
    pub logo_url: Option<String>,

    #[sea_orm(nullable)]
    pub contact_email: Option<String>,

    #[sea_orm(nullable)]
    pub contact_phone: Option<String>,

    /// PUBLIC | PRIVATE_IPES
    #[sea_orm(nullable)]
    pub legal_status: Option<String>,

    #[sea_orm(nullable)]
    pub registration_number: Option<String>,

    /// Tenant-editable settings document (diploma fields, feature flags)
    #[sea_orm(column_type = "Text", nullable)]
    pub settings_json: Option<String>,

    /// Security policy document
    #[sea_orm(column_type = "Text", nullable)]
    pub security_json: Option<String>,

    /// ACTIVE | INACTIVE | SUSPENDED
    pub status: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = 100)]
    pub max_users: i32,

    #[sea_orm(default_value = 10000)]
    pub max_diplomas: i32,

    #[sea_orm(default_value = 1000)]
    pub storage_quota_mb: i32,

    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,

    #[sea_orm(has_many = "super::diploma::Entity")]
    Diplomas,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::diploma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diplomas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
