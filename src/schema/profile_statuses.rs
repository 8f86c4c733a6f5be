use sea_orm_migration::prelude::*;

use super::profiles::Profiles;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_table("profile_statuses").await? {
        manager
            .create_table(
                Table::create()
                    .table(ProfileStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfileStatuses::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProfileStatuses::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileStatuses::ProfileVariant)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfileStatuses::Status)
                            .string_len(100)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(ProfileStatuses::Reason).text())
                    .col(ColumnDef::new(ProfileStatuses::ReconsideredAt).date())
                    .col(
                        ColumnDef::new(ProfileStatuses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProfileStatuses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_statuses_owner")
                            .from(
                                ProfileStatuses::Table,
                                (ProfileStatuses::ProfileId, ProfileStatuses::ProfileVariant),
                            )
                            .to(Profiles::Table, (Profiles::Id, Profiles::Variant))
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
                .name("profile_statuses_profile_id_idx")
                .table(ProfileStatuses::Table)
                .col(ProfileStatuses::ProfileId)
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
enum ProfileStatuses {
    Table,
    Id,
    ProfileId,
    ProfileVariant,
    Status,
    Reason,
    ReconsideredAt,
    CreatedAt,
    UpdatedAt,
}
