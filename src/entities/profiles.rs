use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::accounts::Role;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[sea_orm(string_value = "en")]
    En,
    #[sea_orm(string_value = "sw")]
    Sw,
    #[sea_orm(string_value = "ar")]
    Ar,
    #[sea_orm(string_value = "pt")]
    Pt,
    #[sea_orm(string_value = "it")]
    It,
    #[sea_orm(string_value = "nl")]
    Nl,
    #[sea_orm(string_value = "ru")]
    Ru,
    #[sea_orm(string_value = "fr")]
    Fr,
    #[sea_orm(string_value = "de")]
    De,
    #[sea_orm(string_value = "es")]
    Es,
}

/// One row per account. `variant` mirrors the account role and decides which of the
/// role columns may be non-null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub account_id: String,
    pub variant: Role,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Language,
    pub time_zone: String,
    pub website: Option<String>,
    pub social_media_links: Option<Json>,
    pub position: Option<String>,
    pub club: Option<String>,
    pub national_team: Option<String>,
    pub current_team: Option<String>,
    pub coaching_style: Option<String>,
    pub organisation_name: Option<String>,
    pub organisation_type: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(has_many = "super::profile_statuses::Entity")]
    Statuses,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::profile_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statuses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
