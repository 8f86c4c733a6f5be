use regex::Regex;
use std::sync::LazyLock;

use crate::error::ApiError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("username pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern")
});
static COUNTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("country pattern"));

pub const USERNAME_MAX: usize = 100;
pub const PHONE_MAX: usize = 15;
pub const NAME_MAX: usize = 100;
pub const BIO_MAX: usize = 1000;
pub const REASON_MAX: usize = 1000;
pub const SHORT_TEXT_MAX: usize = 100;
pub const TEXT_MAX: usize = 255;

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::validation(field, "this field is required")),
    }
}

pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::validation(
            field,
            format!("ensure this field has no more than {max} characters"),
        ));
    }
    Ok(())
}

pub fn username(value: Option<&str>) -> Result<String, ApiError> {
    let value = required("username", value)?;
    max_len("username", value, USERNAME_MAX)?;
    if !USERNAME_RE.is_match(value) {
        return Err(ApiError::validation(
            "username",
            "username must be alphanumeric, with no spaces",
        ));
    }
    Ok(value.to_string())
}

pub fn phone_number(value: Option<&str>) -> Result<String, ApiError> {
    let value = required("phone_number", value)?;
    if value.len() > PHONE_MAX || !PHONE_RE.is_match(value) {
        return Err(ApiError::validation(
            "phone_number",
            "phone number must be entered in the format: '+999999999'; up to 15 digits allowed",
        ));
    }
    Ok(value.to_string())
}

/// Lower-cases the domain part only; the local part is case-sensitive.
pub fn email(value: Option<&str>) -> Result<String, ApiError> {
    let value = required("email", value)?;
    if !EMAIL_RE.is_match(value) {
        return Err(ApiError::validation("email", "enter a valid email address"));
    }
    let (local, domain) = value
        .rsplit_once('@')
        .ok_or_else(|| ApiError::validation("email", "enter a valid email address"))?;
    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

pub fn password(value: Option<&str>) -> Result<&str, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::validation("password", "the password must be set")),
    }
}

/// Blank optional text collapses to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    max_len(field, value, max)?;
    Ok(Some(value.to_string()))
}

pub fn required_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<String, ApiError> {
    let value = required(field, value)?;
    max_len(field, value, max)?;
    Ok(value.to_string())
}

pub fn optional_url(field: &'static str, value: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(value) = optional_text(field, value, 200)? else {
        return Ok(None);
    };
    match url::Url::parse(&value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {
            Ok(Some(value))
        }
        _ => Err(ApiError::validation(field, "enter a valid URL")),
    }
}

pub fn country(field: &'static str, value: &str) -> Result<String, ApiError> {
    let value = value.trim().to_ascii_uppercase();
    if !COUNTRY_RE.is_match(&value) {
        return Err(ApiError::validation(
            field,
            "country must be an ISO 3166-1 alpha-2 code",
        ));
    }
    Ok(value)
}

pub fn optional_country(value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => country("country", &value).map(Some),
        _ => Ok(None),
    }
}

pub fn slugify(field: &'static str, name: &str) -> Result<String, ApiError> {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        return Err(ApiError::validation(
            field,
            "name must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert_eq!(username(Some("alice_01.x-y")).unwrap(), "alice_01.x-y");
        assert!(username(Some("has space")).is_err());
        assert!(username(Some("")).is_err());
        assert!(username(None).is_err());
        assert!(username(Some(&"a".repeat(101))).is_err());
    }

    #[test]
    fn phone_numbers() {
        assert!(phone_number(Some("+15551234567")).is_ok());
        assert!(phone_number(Some("123456789")).is_ok());
        assert!(phone_number(Some("+1234")).is_err());
        assert!(phone_number(Some("+1234567890123456")).is_err());
        assert!(phone_number(Some("555-123-4567")).is_err());
    }

    #[test]
    fn emails_normalise_domain() {
        assert_eq!(email(Some("Bob@Example.COM")).unwrap(), "Bob@example.com");
        assert_eq!(email(Some("a@x.com")).unwrap(), "a@x.com");
        assert!(email(Some("not-an-email")).is_err());
        assert!(email(Some("a@b")).is_err());
        assert!(email(None).is_err());
    }

    #[test]
    fn passwords_must_be_present() {
        assert!(password(Some("p")).is_ok());
        assert!(password(Some("")).is_err());
        assert!(password(None).is_err());
    }

    #[test]
    fn urls_and_countries() {
        assert_eq!(
            optional_url("website", Some("https://club.example".into())).unwrap(),
            Some("https://club.example".to_string())
        );
        assert_eq!(optional_url("website", Some(" ".into())).unwrap(), None);
        assert!(optional_url("website", Some("ftp://x".into())).is_err());
        assert_eq!(country("country", "ke").unwrap(), "KE");
        assert!(country("country", "KEN").is_err());
    }

    #[test]
    fn slugs_follow_name() {
        assert_eq!(slugify("name", "Premier League").unwrap(), "premier-league");
        assert_eq!(slugify("name", "  St. Mirren F.C. ").unwrap(), "st-mirren-f-c");
        assert!(slugify("name", "!!!").is_err());
    }

    #[test]
    fn text_limits() {
        assert!(optional_text("bio", Some("x".repeat(BIO_MAX)), BIO_MAX).is_ok());
        assert!(optional_text("bio", Some("x".repeat(BIO_MAX + 1)), BIO_MAX).is_err());
        assert_eq!(optional_text("bio", Some("  ".into()), BIO_MAX).unwrap(), None);
    }
}
