use sea_orm_migration::prelude::*;

use super::accounts::Accounts;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_table("profiles").await? {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::AccountId).string_len(32).not_null())
                    .col(ColumnDef::new(Profiles::Variant).string_len(50).not_null())
                    .col(ColumnDef::new(Profiles::Country).string_len(2))
                    .col(ColumnDef::new(Profiles::Bio).text())
                    .col(ColumnDef::new(Profiles::Avatar).string_len(200))
                    .col(
                        ColumnDef::new(Profiles::PreferredLanguage)
                            .string_len(100)
                            .not_null()
                            .default("en"),
                    )
                    .col(
                        ColumnDef::new(Profiles::TimeZone)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Profiles::Website).string_len(200))
                    .col(ColumnDef::new(Profiles::SocialMediaLinks).json_binary())
                    .col(ColumnDef::new(Profiles::Position).string_len(100))
                    .col(ColumnDef::new(Profiles::Club).string_len(255))
                    .col(ColumnDef::new(Profiles::NationalTeam).string_len(255))
                    .col(ColumnDef::new(Profiles::CurrentTeam).string_len(255))
                    .col(ColumnDef::new(Profiles::CoachingStyle).string_len(255))
                    .col(ColumnDef::new(Profiles::OrganisationName).string_len(255))
                    .col(ColumnDef::new(Profiles::OrganisationType).string_len(255))
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_account_id")
                            .from(Profiles::Table, Profiles::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
    }

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("profiles_account_id_unique")
                .table(Profiles::Table)
                .col(Profiles::AccountId)
                .unique()
                .to_owned(),
        )
        .await?;

    // Target of the status owner reference; pins a status row to the variant it was
    // created for.
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("profiles_id_variant_unique")
                .table(Profiles::Table)
                .col(Profiles::Id)
                .col(Profiles::Variant)
                .unique()
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
pub(super) enum Profiles {
    Table,
    Id,
    AccountId,
    Variant,
    Country,
    Bio,
    Avatar,
    PreferredLanguage,
    TimeZone,
    Website,
    SocialMediaLinks,
    Position,
    Club,
    NationalTeam,
    CurrentTeam,
    CoachingStyle,
    OrganisationName,
    OrganisationType,
    CreatedAt,
    UpdatedAt,
}
