use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Continent {
    #[default]
    #[sea_orm(string_value = "AF")]
    #[serde(rename = "AF")]
    Africa,
    #[sea_orm(string_value = "AN")]
    #[serde(rename = "AN")]
    Antarctica,
    #[sea_orm(string_value = "AS")]
    #[serde(rename = "AS")]
    Asia,
    #[sea_orm(string_value = "EU")]
    #[serde(rename = "EU")]
    Europe,
    #[sea_orm(string_value = "NA")]
    #[serde(rename = "NA")]
    NorthAmerica,
    #[sea_orm(string_value = "SA")]
    #[serde(rename = "SA")]
    SouthAmerica,
    #[sea_orm(string_value = "OC")]
    #[serde(rename = "OC")]
    Oceania,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub short_name: String,
    pub logo: Option<String>,
    pub country: String,
    pub continent: Continent,
    pub description: Option<String>,
    pub year_established: Option<i16>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clubs::Entity")]
    Clubs,
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clubs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
