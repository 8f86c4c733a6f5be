use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;
use std::sync::Arc;

use crate::{
    domain::{Caller, Profile, RoleFieldsPatch},
    entities::{
        accounts::Role,
        profiles::{self, Language},
    },
    error::ApiError,
    repo::{account_relationships::AccountRelationshipsRepo, profiles::ProfilesRepo},
    validation,
};

/// Partial profile update. Blank strings clear optional attributes.
#[derive(Clone, Debug, Default)]
pub struct UpdateProfileInput {
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Option<Language>,
    pub time_zone: Option<String>,
    pub website: Option<String>,
    pub social_media_links: Option<serde_json::Value>,
    pub role_fields: RoleFieldsPatch,
}

#[async_trait]
pub trait ProfilesService: Send + Sync {
    async fn get_profile(&self, account_id: &str) -> Result<Profile, ApiError>;
    async fn get(&self, caller: &Caller, id: &str) -> Result<Profile, ApiError>;
    /// Administrators see every profile, everyone else only their own.
    async fn list(&self, caller: &Caller, variant: Option<Role>)
        -> Result<Vec<Profile>, ApiError>;
    async fn update(
        &self,
        caller: &Caller,
        id: &str,
        input: UpdateProfileInput,
    ) -> Result<Profile, ApiError>;
    async fn followers_count(&self, profile: &Profile) -> Result<u64, ApiError>;
    async fn following_count(&self, profile: &Profile) -> Result<u64, ApiError>;
}

pub struct ProfilesServiceImpl {
    profiles_repo: Arc<dyn ProfilesRepo>,
    relationships_repo: Arc<dyn AccountRelationshipsRepo>,
}

impl ProfilesServiceImpl {
    pub fn new(
        profiles_repo: Arc<dyn ProfilesRepo>,
        relationships_repo: Arc<dyn AccountRelationshipsRepo>,
    ) -> Self {
        Self {
            profiles_repo,
            relationships_repo,
        }
    }

    async fn find_owned(&self, caller: &Caller, id: &str) -> Result<profiles::Model, ApiError> {
        let model = self
            .profiles_repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found("profile"))?;
        caller.require_self_or_admin(&model.account_id)?;
        Ok(model)
    }
}

#[async_trait]
impl ProfilesService for ProfilesServiceImpl {
    async fn get_profile(&self, account_id: &str) -> Result<Profile, ApiError> {
        self.profiles_repo
            .find_by_account_id(account_id)
            .await?
            .map(Profile::from)
            .ok_or(ApiError::not_found("profile"))
    }

    async fn get(&self, caller: &Caller, id: &str) -> Result<Profile, ApiError> {
        Ok(self.find_owned(caller, id).await?.into())
    }

    async fn list(
        &self,
        caller: &Caller,
        variant: Option<Role>,
    ) -> Result<Vec<Profile>, ApiError> {
        let owner = (!caller.is_admin).then_some(caller.account_id.as_str());
        let models = self.profiles_repo.list(variant, owner).await?;
        Ok(models.into_iter().map(Profile::from).collect())
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &str,
        input: UpdateProfileInput,
    ) -> Result<Profile, ApiError> {
        let model = self.find_owned(caller, id).await?;
        let mut details = Profile::from(model.clone()).details;
        details.apply(input.role_fields)?;

        let mut active: profiles::ActiveModel = model.into();
        if input.country.is_some() {
            active.country = Set(validation::optional_country(input.country)?);
        }
        if input.bio.is_some() {
            active.bio = Set(validation::optional_text(
                "bio",
                input.bio,
                validation::BIO_MAX,
            )?);
        }
        if input.avatar.is_some() {
            active.avatar = Set(validation::optional_url("avatar", input.avatar)?);
        }
        if input.website.is_some() {
            active.website = Set(validation::optional_url("website", input.website)?);
        }
        if let Some(time_zone) = input.time_zone {
            let time_zone = time_zone.trim().to_string();
            validation::max_len("time_zone", &time_zone, validation::SHORT_TEXT_MAX)?;
            active.time_zone = Set(time_zone);
        }
        if let Some(language) = input.preferred_language {
            active.preferred_language = Set(language);
        }
        if let Some(links) = input.social_media_links {
            active.social_media_links = Set((!links.is_null()).then_some(links));
        }
        details.write_to(&mut active);
        active.updated_at = Set(Utc::now().into());

        let updated = self.profiles_repo.update(active).await?;
        tracing::info!(profile_id = %updated.id, account_id = %updated.account_id, "profile updated");
        Ok(updated.into())
    }

    async fn followers_count(&self, profile: &Profile) -> Result<u64, ApiError> {
        Ok(self
            .relationships_repo
            .count_by_following(&profile.account_id)
            .await?)
    }

    async fn following_count(&self, profile: &Profile) -> Result<u64, ApiError> {
        Ok(self
            .relationships_repo
            .count_by_follower(&profile.account_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ProfileDetails,
        entities::accounts,
        service::accounts::CreateAccountInput,
        state::{testing::memory_state, AppState},
    };
    use serde_json::json;

    async fn account(state: &AppState, username: &str, n: u32, role: Role) -> accounts::Model {
        state
            .accounts()
            .create(CreateAccountInput {
                username: Some(username.to_string()),
                email: Some(format!("{username}@example.com")),
                phone_number: Some(format!("+2547100{n:05}")),
                password: Some("pw".to_string()),
                role,
                is_verified: true,
                ..CreateAccountInput::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn owner_updates_shared_and_role_fields() {
        let state = memory_state().await;
        let striker = account(&state, "striker", 1, Role::Footballer).await;
        let caller = Caller::new(striker.id.clone(), false);
        let profile = state.profiles().get_profile(&striker.id).await.unwrap();

        let updated = state
            .profiles()
            .update(
                &caller,
                &profile.id,
                UpdateProfileInput {
                    country: Some("ke".into()),
                    bio: Some("  Goals.  ".into()),
                    website: Some("https://striker.example.com".into()),
                    preferred_language: Some(Language::Sw),
                    social_media_links: Some(json!({"x": "@striker"})),
                    role_fields: RoleFieldsPatch {
                        position: Some("Striker".into()),
                        club: Some("Gor Mahia".into()),
                        ..RoleFieldsPatch::default()
                    },
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.country.as_deref(), Some("KE"));
        assert_eq!(updated.bio.as_deref(), Some("Goals."));
        assert_eq!(updated.preferred_language, Language::Sw);
        assert_eq!(updated.social_media_links, Some(json!({"x": "@striker"})));
        assert_eq!(
            updated.details,
            ProfileDetails::Footballer {
                position: Some("Striker".into()),
                club: Some("Gor Mahia".into()),
                national_team: None,
            }
        );
        assert_eq!(updated.effective_time_zone("Africa/Nairobi"), "Africa/Nairobi");
    }

    #[tokio::test]
    async fn other_variant_fields_are_rejected() {
        let state = memory_state().await;
        let striker = account(&state, "striker", 1, Role::Footballer).await;
        let caller = Caller::new(striker.id.clone(), false);
        let profile = state.profiles().get_profile(&striker.id).await.unwrap();

        let err = state
            .profiles()
            .update(
                &caller,
                &profile.id,
                UpdateProfileInput {
                    role_fields: RoleFieldsPatch {
                        organisation_name: Some("FKF".into()),
                        ..RoleFieldsPatch::default()
                    },
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("organisation_name"));

        let err = state
            .profiles()
            .update(
                &caller,
                &profile.id,
                UpdateProfileInput {
                    country: Some("Kenya".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("country"));
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_touch_a_profile() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1, Role::Regular).await;
        let bob = account(&state, "bob", 2, Role::Regular).await;
        let profile = state.profiles().get_profile(&alice.id).await.unwrap();

        let bob_caller = Caller::new(bob.id.clone(), false);
        let err = state
            .profiles()
            .update(
                &bob_caller,
                &profile.id,
                UpdateProfileInput {
                    bio: Some("hacked".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PermissionDenied));
        assert!(state.profiles().get(&bob_caller, &profile.id).await.is_err());

        let admin = Caller::new("staff", true);
        let updated = state
            .profiles()
            .update(
                &admin,
                &profile.id,
                UpdateProfileInput {
                    bio: Some("moderated".into()),
                    ..UpdateProfileInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("moderated"));
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_caller() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1, Role::Regular).await;
        account(&state, "bob", 2, Role::Regular).await;
        account(&state, "coach", 3, Role::Manager).await;

        let own = state
            .profiles()
            .list(&Caller::new(alice.id.clone(), false), None)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].account_id, alice.id);

        let admin = Caller::new("staff", true);
        assert_eq!(state.profiles().list(&admin, None).await.unwrap().len(), 3);
        let managers = state
            .profiles()
            .list(&admin, Some(Role::Manager))
            .await
            .unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].variant(), Role::Manager);
    }

    #[tokio::test]
    async fn counts_follow_the_graph() {
        let state = memory_state().await;
        let alice = account(&state, "alice", 1, Role::Regular).await;
        let bob = account(&state, "bob", 2, Role::Regular).await;
        state.relationships().follow(&alice.id, &bob.id).await.unwrap();

        let bob_profile = state.profiles().get_profile(&bob.id).await.unwrap();
        let alice_profile = state.profiles().get_profile(&alice.id).await.unwrap();
        assert_eq!(state.profiles().followers_count(&bob_profile).await.unwrap(), 1);
        assert_eq!(state.profiles().following_count(&bob_profile).await.unwrap(), 0);
        assert_eq!(state.profiles().following_count(&alice_profile).await.unwrap(), 1);
    }
}
