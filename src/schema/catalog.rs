use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_table("leagues").await? {
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leagues::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leagues::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Leagues::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Leagues::ShortName).string_len(255).not_null())
                    .col(ColumnDef::new(Leagues::Logo).string_len(200))
                    .col(ColumnDef::new(Leagues::Country).string_len(2).not_null())
                    .col(
                        ColumnDef::new(Leagues::Continent)
                            .string_len(2)
                            .not_null()
                            .default("AF"),
                    )
                    .col(ColumnDef::new(Leagues::Description).text())
                    .col(ColumnDef::new(Leagues::YearEstablished).small_integer())
                    .col(
                        ColumnDef::new(Leagues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leagues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
    }

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name("leagues_slug_unique")
                .table(Leagues::Table)
                .col(Leagues::Slug)
                .unique()
                .to_owned(),
        )
        .await?;

    if !manager.has_table("clubs").await? {
        manager
            .create_table(
                Table::create()
                    .table(Clubs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clubs::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clubs::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Clubs::Slug).string_len(255).not_null())
                    .col(ColumnDef::new(Clubs::FullName).string_len(155).not_null())
                    .col(ColumnDef::new(Clubs::ShortName).string_len(55).not_null())
                    .col(ColumnDef::new(Clubs::Logo).string_len(200))
                    .col(ColumnDef::new(Clubs::YearEstablished).small_integer())
                    .col(ColumnDef::new(Clubs::LeagueId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Clubs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Clubs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clubs_league_id")
                            .from(Clubs::Table, Clubs::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
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
                .name("clubs_slug_unique")
                .table(Clubs::Table)
                .col(Clubs::Slug)
                .unique()
                .to_owned(),
        )
        .await?;

    Ok(())
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    Name,
    Slug,
    ShortName,
    Logo,
    Country,
    Continent,
    Description,
    YearEstablished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Clubs {
    Table,
    Id,
    Name,
    Slug,
    FullName,
    ShortName,
    Logo,
    YearEstablished,
    LeagueId,
    CreatedAt,
    UpdatedAt,
}
