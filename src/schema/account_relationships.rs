use sea_orm_migration::prelude::*;

use super::accounts::Accounts;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_table("account_relationships").await? {
        manager
            .create_table(
                Table::create()
                    .table(AccountRelationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountRelationships::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccountRelationships::FollowerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountRelationships::FollowingId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountRelationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_relationships_follower_id")
                            .from(AccountRelationships::Table, AccountRelationships::FollowerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_relationships_following_id")
                            .from(AccountRelationships::Table, AccountRelationships::FollowingId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
    }

    // Also the conflict target of `follow`.
    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("account_relationships_follower_id_following_id_unique")
                .table(AccountRelationships::Table)
                .col(AccountRelationships::FollowerId)
                .col(AccountRelationships::FollowingId)
                .unique()
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("account_relationships_following_id_idx")
                .table(AccountRelationships::Table)
                .col(AccountRelationships::FollowingId)
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
enum AccountRelationships {
    Table,
    Id,
    FollowerId,
    FollowingId,
    CreatedAt,
}
