use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tokio::net::lookup_host;

fn redact_db_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, path) = rest.split_at(authority_end);
    let Some((userinfo, hostport)) = authority.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{hostport}{path}"),
        None => url.to_string(),
    }
}

fn extract_host_port(url: &str) -> Option<(String, u16)> {
    let after_scheme = url.split("://").nth(1)?;
    let authority = after_scheme.split('/').next().unwrap_or(after_scheme);
    let hostport = authority.split('@').last().unwrap_or(authority);
    let mut parts = hostport.split(':');
    let host = parts.next()?.to_string();
    let port = parts
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5432);
    Some((host, port))
}

pub async fn connect(url: Option<&str>) -> Result<DatabaseConnection, DbErr> {
    let url = url.ok_or_else(|| DbErr::Custom("DATABASE_URL is not set".to_string()))?;
    tracing::info!(database_url = %redact_db_url(url), "connecting to database");

    if url.starts_with("postgres") {
        if let Some((host, port)) = extract_host_port(url) {
            match lookup_host((host.as_str(), port)).await {
                Ok(addrs) => {
                    let list: Vec<String> = addrs.map(|addr| addr.to_string()).collect();
                    tracing::debug!(%host, port, addrs = ?list, "resolved database host");
                }
                Err(err) => {
                    tracing::warn!(%host, port, error = %err, "database host lookup failed");
                }
            }
        }
    }

    let mut options = ConnectOptions::new(url.to_string());
    options.sqlx_logging(false);
    if url.starts_with("sqlite") {
        // An in-memory database lives and dies with its single connection.
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_password_only() {
        assert_eq!(
            redact_db_url("postgres://fan:secret@db:5432/fanzone"),
            "postgres://fan:***@db:5432/fanzone"
        );
        assert_eq!(
            redact_db_url("postgres://db:5432/fanzone"),
            "postgres://db:5432/fanzone"
        );
    }

    #[test]
    fn host_port_defaults_to_postgres_port() {
        assert_eq!(
            extract_host_port("postgres://fan:secret@db/fanzone"),
            Some(("db".to_string(), 5432))
        );
        assert_eq!(
            extract_host_port("postgres://db:6543/fanzone"),
            Some(("db".to_string(), 6543))
        );
        assert_eq!(extract_host_port("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn missing_url_is_an_error() {
        assert!(connect(None).await.is_err());
    }
}
