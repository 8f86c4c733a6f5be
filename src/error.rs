use sea_orm::{DbErr, SqlErr, TransactionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("{field} is already taken")]
    Uniqueness { field: &'static str },
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("permission denied")]
    PermissionDenied,
    #[error("missing caller identity")]
    Unauthenticated,
    #[error("{field}: {message}")]
    Conflict { field: &'static str, message: String },
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(DbErr),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Uniqueness { .. } => "uniqueness_error",
            Self::NotFound { .. } => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthenticated => "unauthenticated",
            Self::Conflict { .. } => "conflict",
            Self::Internal(_) => "internal_error",
            Self::Database(_) => "db_error",
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. }
            | Self::Uniqueness { field }
            | Self::Conflict { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Unique violations reported by the store are mapped back onto the column they guard.
/// Postgres reports the index name, SQLite the `table.column` pair; both contain the
/// column name.
const UNIQUE_FIELDS: [&str; 5] = ["username", "email", "phone_number", "slug", "following_id"];

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                match UNIQUE_FIELDS.iter().find(|field| message.contains(*field)) {
                    Some(&"slug") => Self::conflict("slug", "slug already in use"),
                    Some(&"following_id") => Self::Uniqueness {
                        field: "relationship",
                    },
                    Some(field) => Self::Uniqueness { field: *field },
                    None => Self::Database(err),
                }
            }
            _ => Self::Database(err),
        }
    }
}

impl From<TransactionError<ApiError>> for ApiError {
    fn from(err: TransactionError<ApiError>) -> Self {
        match err {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_fields() {
        let err = ApiError::validation("username", "required");
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.field(), Some("username"));
        assert_eq!(err.to_string(), "username: required");

        let err = ApiError::not_found("profile");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "profile not found");
    }
}
