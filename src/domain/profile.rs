use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;

use crate::{
    entities::{
        accounts::Role,
        profiles::{self, Language},
    },
    error::ApiError,
    validation,
};

use super::ProfileRef;

/// Role-specific part of a profile. Only the attributes of the owning account's role
/// exist; the remaining role columns are always written as NULL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileDetails {
    Regular {},
    Footballer {
        position: Option<String>,
        club: Option<String>,
        national_team: Option<String>,
    },
    Manager {
        current_team: Option<String>,
        coaching_style: Option<String>,
    },
    Organisation {
        organisation_name: Option<String>,
        organisation_type: Option<String>,
    },
}

impl ProfileDetails {
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Regular => Self::Regular {},
            Role::Footballer => Self::Footballer {
                position: None,
                club: None,
                national_team: None,
            },
            Role::Manager => Self::Manager {
                current_team: None,
                coaching_style: None,
            },
            Role::Organisation => Self::Organisation {
                organisation_name: None,
                organisation_type: None,
            },
        }
    }

    pub fn variant(&self) -> Role {
        match self {
            Self::Regular {} => Role::Regular,
            Self::Footballer { .. } => Role::Footballer,
            Self::Manager { .. } => Role::Manager,
            Self::Organisation { .. } => Role::Organisation,
        }
    }

    fn from_model(model: &profiles::Model) -> Self {
        match model.variant {
            Role::Regular => Self::Regular {},
            Role::Footballer => Self::Footballer {
                position: model.position.clone(),
                club: model.club.clone(),
                national_team: model.national_team.clone(),
            },
            Role::Manager => Self::Manager {
                current_team: model.current_team.clone(),
                coaching_style: model.coaching_style.clone(),
            },
            Role::Organisation => Self::Organisation {
                organisation_name: model.organisation_name.clone(),
                organisation_type: model.organisation_type.clone(),
            },
        }
    }

    /// Writes the variant and all seven role columns.
    pub fn write_to(&self, active: &mut profiles::ActiveModel) {
        let mut columns: [Option<String>; 7] = Default::default();
        match self {
            Self::Regular {} => {}
            Self::Footballer {
                position,
                club,
                national_team,
            } => {
                columns[0] = position.clone();
                columns[1] = club.clone();
                columns[2] = national_team.clone();
            }
            Self::Manager {
                current_team,
                coaching_style,
            } => {
                columns[3] = current_team.clone();
                columns[4] = coaching_style.clone();
            }
            Self::Organisation {
                organisation_name,
                organisation_type,
            } => {
                columns[5] = organisation_name.clone();
                columns[6] = organisation_type.clone();
            }
        }
        let [position, club, national_team, current_team, coaching_style, organisation_name, organisation_type] =
            columns;
        active.variant = Set(self.variant());
        active.position = Set(position);
        active.club = Set(club);
        active.national_team = Set(national_team);
        active.current_team = Set(current_team);
        active.coaching_style = Set(coaching_style);
        active.organisation_name = Set(organisation_name);
        active.organisation_type = Set(organisation_type);
    }

    /// Applies a partial update. Fields that belong to another variant are rejected.
    pub fn apply(&mut self, patch: RoleFieldsPatch) -> Result<(), ApiError> {
        let variant = self.variant();
        let foreign = patch.fields_outside(variant);
        if let Some(&field) = foreign.first() {
            return Err(ApiError::validation(
                field,
                format!("not applicable to {} profiles", variant.as_str().to_lowercase()),
            ));
        }

        fn merge(
            slot: &mut Option<String>,
            field: &'static str,
            value: Option<String>,
            max: usize,
        ) -> Result<(), ApiError> {
            if value.is_some() {
                *slot = validation::optional_text(field, value, max)?;
            }
            Ok(())
        }

        match self {
            Self::Regular {} => {}
            Self::Footballer {
                position,
                club,
                national_team,
            } => {
                merge(position, "position", patch.position, validation::SHORT_TEXT_MAX)?;
                merge(club, "club", patch.club, validation::TEXT_MAX)?;
                merge(
                    national_team,
                    "national_team",
                    patch.national_team,
                    validation::TEXT_MAX,
                )?;
            }
            Self::Manager {
                current_team,
                coaching_style,
            } => {
                merge(
                    current_team,
                    "current_team",
                    patch.current_team,
                    validation::TEXT_MAX,
                )?;
                merge(
                    coaching_style,
                    "coaching_style",
                    patch.coaching_style,
                    validation::TEXT_MAX,
                )?;
            }
            Self::Organisation {
                organisation_name,
                organisation_type,
            } => {
                merge(
                    organisation_name,
                    "organisation_name",
                    patch.organisation_name,
                    validation::TEXT_MAX,
                )?;
                merge(
                    organisation_type,
                    "organisation_type",
                    patch.organisation_type,
                    validation::TEXT_MAX,
                )?;
            }
        }
        Ok(())
    }
}

/// Role attributes as they arrive in an update payload: any of them may be present.
/// An empty string clears the attribute.
#[derive(Clone, Debug, Default)]
pub struct RoleFieldsPatch {
    pub position: Option<String>,
    pub club: Option<String>,
    pub national_team: Option<String>,
    pub current_team: Option<String>,
    pub coaching_style: Option<String>,
    pub organisation_name: Option<String>,
    pub organisation_type: Option<String>,
}

impl RoleFieldsPatch {
    fn fields_outside(&self, variant: Role) -> Vec<&'static str> {
        let all = [
            ("position", Role::Footballer, &self.position),
            ("club", Role::Footballer, &self.club),
            ("national_team", Role::Footballer, &self.national_team),
            ("current_team", Role::Manager, &self.current_team),
            ("coaching_style", Role::Manager, &self.coaching_style),
            ("organisation_name", Role::Organisation, &self.organisation_name),
            ("organisation_type", Role::Organisation, &self.organisation_type),
        ];
        all.into_iter()
            .filter(|(_, owner, value)| *owner != variant && value.is_some())
            .map(|(field, _, _)| field)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub id: String,
    pub account_id: String,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Language,
    pub time_zone: String,
    pub website: Option<String>,
    pub social_media_links: Option<serde_json::Value>,
    pub details: ProfileDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn variant(&self) -> Role {
        self.details.variant()
    }

    pub fn reference(&self) -> ProfileRef {
        ProfileRef::new(self.variant(), self.id.clone())
    }

    /// Blank time zones fall back to the service-wide default.
    pub fn effective_time_zone<'a>(&'a self, default: &'a str) -> &'a str {
        if self.time_zone.is_empty() {
            default
        } else {
            &self.time_zone
        }
    }
}

impl From<profiles::Model> for Profile {
    fn from(model: profiles::Model) -> Self {
        let details = ProfileDetails::from_model(&model);
        Self {
            id: model.id,
            account_id: model.account_id,
            country: model.country,
            bio: model.bio,
            avatar: model.avatar,
            preferred_language: model.preferred_language,
            time_zone: model.time_zone,
            website: model.website,
            social_media_links: model.social_media_links,
            details,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
