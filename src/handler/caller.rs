use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{domain::Caller, error::ApiError};

pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const ADMIN_HEADER: &str = "x-account-admin";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account_id = header(parts, ACCOUNT_ID_HEADER).ok_or(ApiError::Unauthenticated)?;
        let is_admin = header(parts, ADMIN_HEADER)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Ok(Caller::new(account_id, is_admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Caller, ApiError> {
        let (mut parts, _) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_identity_headers() {
        let caller = extract(
            Request::builder()
                .header(ACCOUNT_ID_HEADER, "abc")
                .header(ADMIN_HEADER, "TRUE")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(caller, Caller::new("abc", true));

        let caller = extract(
            Request::builder()
                .header(ACCOUNT_ID_HEADER, "abc")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap();
        assert!(!caller.is_admin);
    }

    #[tokio::test]
    async fn missing_identity_is_unauthenticated() {
        let err = extract(Request::builder().body(()).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));

        let err = extract(
            Request::builder()
                .header(ACCOUNT_ID_HEADER, "   ")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
