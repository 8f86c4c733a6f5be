use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_table("accounts").await? {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Username).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Accounts::PhoneNumber).string_len(15).not_null())
                    .col(ColumnDef::new(Accounts::FirstName).string_len(100))
                    .col(ColumnDef::new(Accounts::LastName).string_len(100))
                    .col(
                        ColumnDef::new(Accounts::Role)
                            .string_len(50)
                            .not_null()
                            .default("REGULAR"),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsModerator)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsDeveloper)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Accounts::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
    }

    for (name, column) in [
        ("accounts_username_unique", Accounts::Username),
        ("accounts_email_unique", Accounts::Email),
        ("accounts_phone_number_unique", Accounts::PhoneNumber),
    ] {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(name)
                    .table(Accounts::Table)
                    .col(column)
                    .unique()
                    .to_owned(),
            )
            .await?;
    }

    Ok(())
}

#[derive(DeriveIden)]
pub(super) enum Accounts {
    Table,
    Id,
    Username,
    Email,
    PhoneNumber,
    FirstName,
    LastName,
    Role,
    PasswordHash,
    IsVerified,
    IsModerator,
    IsDeveloper,
    IsStaff,
    IsSuperuser,
    IsActive,
    DateJoined,
    LastLogin,
    UpdatedAt,
}
