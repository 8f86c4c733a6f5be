use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

mod account_relationships;
mod accounts;
mod catalog;
mod profile_statuses;
mod profiles;

const TABLES: [&str; 6] = [
    "accounts",
    "profiles",
    "profile_statuses",
    "account_relationships",
    "leagues",
    "clubs",
];

/// Creates every table and index that is missing. Safe to run on each start.
pub async fn apply(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(conn);

    accounts::apply(&manager).await?;
    profiles::apply(&manager).await?;
    profile_statuses::apply(&manager).await?;
    account_relationships::apply(&manager).await?;
    catalog::apply(&manager).await?;

    if conn.get_database_backend() == DbBackend::Postgres {
        apply_postgres_invariants(conn).await?;
    }

    tracing::debug!(tables = ?TABLES, "schema applied");
    Ok(())
}

/// Column checks, keyed by constraint name.
const CHECKS: [(&str, &str, &str); 8] = [
    (
        "accounts",
        "accounts_role_check",
        "role IN (''REGULAR'',''FOOTBALLER'',''MANAGER'',''ORGANISATION'')",
    ),
    (
        "profiles",
        "profiles_variant_check",
        "variant IN (''REGULAR'',''FOOTBALLER'',''MANAGER'',''ORGANISATION'')",
    ),
    (
        "profiles",
        "profiles_language_check",
        "preferred_language IN (''en'',''sw'',''ar'',''pt'',''it'',''nl'',''ru'',''fr'',''de'',''es'')",
    ),
    (
        "profiles",
        "profiles_footballer_fields_check",
        "variant = ''FOOTBALLER'' OR (position IS NULL AND club IS NULL AND national_team IS NULL)",
    ),
    (
        "profiles",
        "profiles_manager_fields_check",
        "variant = ''MANAGER'' OR (current_team IS NULL AND coaching_style IS NULL)",
    ),
    (
        "profiles",
        "profiles_organisation_fields_check",
        "variant = ''ORGANISATION'' OR (organisation_name IS NULL AND organisation_type IS NULL)",
    ),
    (
        "profile_statuses",
        "profile_statuses_status_check",
        "status IN (''active'',''suspended'',''banned'')",
    ),
    (
        "leagues",
        "leagues_continent_check",
        "continent IN (''AF'',''AN'',''AS'',''EU'',''NA'',''SA'',''OC'')",
    ),
];

async fn apply_postgres_invariants(conn: &DatabaseConnection) -> Result<(), DbErr> {
    for (table, constraint_name, check) in CHECKS {
        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            format!(
                r#"
DO $$
BEGIN
  IF NOT EXISTS (
    SELECT 1
    FROM pg_constraint
    WHERE conname = '{constraint_name}'
      AND conrelid = '{table}'::regclass
  ) THEN
    EXECUTE 'ALTER TABLE {table}
             ADD CONSTRAINT {constraint_name}
             CHECK ({check})';
  END IF;
END $$;
"#
            ),
        ))
        .await?;
    }

    conn.execute(Statement::from_string(
        DbBackend::Postgres,
        r#"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS trigger AS $$
BEGIN
  NEW.updated_at = now();
  RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#
        .to_string(),
    ))
    .await?;

    for table in TABLES {
        if table == "account_relationships" {
            continue;
        }
        let trigger_name = format!("trg_{}_set_updated_at", table);
        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            format!(
                r#"
DO $$
BEGIN
  IF NOT EXISTS (
    SELECT 1
    FROM pg_trigger
    WHERE tgname = '{trigger_name}'
      AND tgrelid = '{table}'::regclass
  ) THEN
    EXECUTE 'CREATE TRIGGER {trigger_name}
             BEFORE UPDATE ON {table}
             FOR EACH ROW
             EXECUTE FUNCTION set_updated_at()';
  END IF;
END $$;
"#
            ),
        ))
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn apply_is_idempotent_on_sqlite() -> Result<(), DbErr> {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).sqlx_logging(false);
        let conn = Database::connect(options).await?;

        apply(&conn).await?;
        apply(&conn).await?;

        let manager = SchemaManager::new(&conn);
        for table in TABLES {
            assert!(manager.has_table(table).await?, "missing table {table}");
        }
        Ok(())
    }
}
