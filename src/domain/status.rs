use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    entities::{
        accounts::Role,
        profile_statuses::{self, ModerationStatus},
    },
    error::ApiError,
};

/// Typed reference to exactly one profile. Replaces the four nullable per-variant
/// foreign keys: zero or several owners cannot be expressed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProfileRef {
    variant: Role,
    profile_id: String,
}

impl ProfileRef {
    pub fn new(variant: Role, profile_id: impl Into<String>) -> Self {
        Self {
            variant,
            profile_id: profile_id.into(),
        }
    }

    /// Builds a reference from the legacy shape with one nullable column per variant.
    /// Exactly one of them must be set.
    pub fn from_owner_columns(
        regular_profile: Option<String>,
        footballer_profile: Option<String>,
        manager_profile: Option<String>,
        organisation_profile: Option<String>,
    ) -> Result<Self, ApiError> {
        let candidates = [
            (Role::Regular, regular_profile),
            (Role::Footballer, footballer_profile),
            (Role::Manager, manager_profile),
            (Role::Organisation, organisation_profile),
        ];
        let mut set = candidates
            .into_iter()
            .filter_map(|(variant, id)| id.filter(|id| !id.is_empty()).map(|id| (variant, id)));

        match (set.next(), set.next()) {
            (Some((variant, id)), None) => Ok(Self::new(variant, id)),
            (None, _) => Err(ApiError::validation(
                "profile",
                "exactly one profile reference must be set, got none",
            )),
            (Some(_), Some(_)) => Err(ApiError::validation(
                "profile",
                "exactly one profile reference must be set, got several",
            )),
        }
    }

    pub fn variant(&self) -> Role {
        self.variant
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// The id under the legacy column for `variant`, `None` for the other three.
    pub fn owner_column(&self, variant: Role) -> Option<&str> {
        (self.variant == variant).then_some(self.profile_id.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusRecord {
    pub id: String,
    pub owner: ProfileRef,
    pub status: ModerationStatus,
    pub reason: Option<String>,
    pub reconsidered_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StatusRecord {
    pub fn regular_profile(&self) -> Option<&str> {
        self.owner.owner_column(Role::Regular)
    }

    pub fn footballer_profile(&self) -> Option<&str> {
        self.owner.owner_column(Role::Footballer)
    }

    pub fn manager_profile(&self) -> Option<&str> {
        self.owner.owner_column(Role::Manager)
    }

    pub fn organisation_profile(&self) -> Option<&str> {
        self.owner.owner_column(Role::Organisation)
    }
}

impl From<profile_statuses::Model> for StatusRecord {
    fn from(model: profile_statuses::Model) -> Self {
        Self {
            id: model.id,
            owner: ProfileRef::new(model.profile_variant, model.profile_id),
            status: model.status,
            reason: model.reason,
            reconsidered_at: model.reconsidered_at,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_owner_column() {
        let owner =
            ProfileRef::from_owner_columns(None, Some("p1".into()), None, None).unwrap();
        assert_eq!(owner.variant(), Role::Footballer);
        assert_eq!(owner.profile_id(), "p1");
        assert_eq!(owner.owner_column(Role::Footballer), Some("p1"));
        assert_eq!(owner.owner_column(Role::Regular), None);

        let none = ProfileRef::from_owner_columns(None, None, None, Some(String::new()));
        assert_eq!(none.unwrap_err().field(), Some("profile"));

        let several =
            ProfileRef::from_owner_columns(Some("a".into()), None, Some("b".into()), None);
        assert!(several.is_err());
    }

    #[test]
    fn status_record_exposes_single_owner() {
        let now = Utc::now();
        let record = StatusRecord::from(profile_statuses::Model {
            id: "s1".into(),
            profile_id: "p1".into(),
            profile_variant: Role::Manager,
            status: ModerationStatus::Banned,
            reason: None,
            reconsidered_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        });
        assert_eq!(record.manager_profile(), Some("p1"));
        assert_eq!(record.regular_profile(), None);
        assert_eq!(record.footballer_profile(), None);
        assert_eq!(record.organisation_profile(), None);
    }
}
