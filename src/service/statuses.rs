use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use std::sync::Arc;

use crate::{
    domain::{Profile, ProfileRef, StatusRecord},
    entities::profile_statuses::{self, ModerationStatus},
    error::ApiError,
    ids,
    repo::{profile_statuses::ProfileStatusesRepo, profiles::ProfilesRepo},
    validation,
};

#[derive(Clone, Debug, Default)]
pub struct UpdateStatusInput {
    pub status: Option<ModerationStatus>,
    /// A blank reason clears it.
    pub reason: Option<String>,
    /// `Some(None)` clears the date.
    pub reconsidered_at: Option<Option<NaiveDate>>,
}

#[async_trait]
pub trait StatusesService: Send + Sync {
    async fn set_status(
        &self,
        owner: ProfileRef,
        status: ModerationStatus,
        reason: Option<String>,
        reconsidered_at: Option<NaiveDate>,
    ) -> Result<StatusRecord, ApiError>;
    async fn resolve_owner(&self, record: &StatusRecord) -> Result<Profile, ApiError>;
    /// The most recent status row of a profile.
    async fn current(&self, profile_id: &str) -> Result<Option<StatusRecord>, ApiError>;
    async fn list(&self, profile_id: Option<&str>) -> Result<Vec<StatusRecord>, ApiError>;
    async fn get(&self, id: &str) -> Result<StatusRecord, ApiError>;
    async fn update(&self, id: &str, input: UpdateStatusInput)
        -> Result<StatusRecord, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

pub struct StatusesServiceImpl {
    statuses_repo: Arc<dyn ProfileStatusesRepo>,
    profiles_repo: Arc<dyn ProfilesRepo>,
}

impl StatusesServiceImpl {
    pub fn new(
        statuses_repo: Arc<dyn ProfileStatusesRepo>,
        profiles_repo: Arc<dyn ProfilesRepo>,
    ) -> Self {
        Self {
            statuses_repo,
            profiles_repo,
        }
    }

    async fn find(&self, id: &str) -> Result<profile_statuses::Model, ApiError> {
        self.statuses_repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found("profile status"))
    }
}

#[async_trait]
impl StatusesService for StatusesServiceImpl {
    async fn set_status(
        &self,
        owner: ProfileRef,
        status: ModerationStatus,
        reason: Option<String>,
        reconsidered_at: Option<NaiveDate>,
    ) -> Result<StatusRecord, ApiError> {
        let reason = validation::optional_text("reason", reason, validation::REASON_MAX)?;
        if self
            .profiles_repo
            .find_by_id_and_variant(owner.profile_id(), owner.variant())
            .await?
            .is_none()
        {
            return Err(ApiError::not_found("profile"));
        }

        let now = Utc::now();
        let model = profile_statuses::ActiveModel {
            id: Set(ids::short_id()),
            profile_id: Set(owner.profile_id().to_string()),
            profile_variant: Set(owner.variant()),
            status: Set(status),
            reason: Set(reason),
            reconsidered_at: Set(reconsidered_at),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = self.statuses_repo.insert(model).await?;
        tracing::info!(
            status_id = %inserted.id,
            profile_id = %inserted.profile_id,
            status = ?inserted.status,
            "profile status recorded"
        );
        Ok(inserted.into())
    }

    async fn resolve_owner(&self, record: &StatusRecord) -> Result<Profile, ApiError> {
        self.profiles_repo
            .find_by_id_and_variant(record.owner.profile_id(), record.owner.variant())
            .await?
            .map(Profile::from)
            .ok_or(ApiError::not_found("profile"))
    }

    async fn current(&self, profile_id: &str) -> Result<Option<StatusRecord>, ApiError> {
        Ok(self
            .statuses_repo
            .latest_for_profile(profile_id)
            .await?
            .map(StatusRecord::from))
    }

    async fn list(&self, profile_id: Option<&str>) -> Result<Vec<StatusRecord>, ApiError> {
        let models = self.statuses_repo.list(profile_id).await?;
        Ok(models.into_iter().map(StatusRecord::from).collect())
    }

    async fn get(&self, id: &str) -> Result<StatusRecord, ApiError> {
        Ok(self.find(id).await?.into())
    }

    async fn update(
        &self,
        id: &str,
        input: UpdateStatusInput,
    ) -> Result<StatusRecord, ApiError> {
        let model = self.find(id).await?;
        let mut active: profile_statuses::ActiveModel = model.into();
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if input.reason.is_some() {
            active.reason = Set(validation::optional_text(
                "reason",
                input.reason,
                validation::REASON_MAX,
            )?);
        }
        if let Some(reconsidered_at) = input.reconsidered_at {
            active.reconsidered_at = Set(reconsidered_at);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = self.statuses_repo.update(active).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        if self.statuses_repo.delete_by_id(id).await? == 0 {
            return Err(ApiError::not_found("profile status"));
        }
        tracing::info!(status_id = %id, "profile status deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::accounts::Role, service::accounts::CreateAccountInput,
        state::testing::memory_state,
    };

    #[tokio::test]
    async fn suspended_footballer_has_exactly_one_owner() {
        let state = memory_state().await;
        let striker = state
            .accounts()
            .create(CreateAccountInput {
                username: Some("striker".into()),
                email: Some("striker@example.com".into()),
                phone_number: Some("+254733000001".into()),
                password: Some("pw".into()),
                role: Role::Footballer,
                is_verified: true,
                ..CreateAccountInput::default()
            })
            .await
            .unwrap();
        let profile = state.profiles().get_profile(&striker.id).await.unwrap();
        let until = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

        let record = state
            .statuses()
            .set_status(
                profile.reference(),
                ModerationStatus::Suspended,
                Some("Match fixing inquiry".into()),
                Some(until),
            )
            .await
            .unwrap();

        assert_eq!(record.status, ModerationStatus::Suspended);
        assert_eq!(record.footballer_profile(), Some(profile.id.as_str()));
        assert_eq!(record.regular_profile(), None);
        assert_eq!(record.manager_profile(), None);
        assert_eq!(record.organisation_profile(), None);
        assert_eq!(record.reconsidered_at, Some(until));

        let owner = state.statuses().resolve_owner(&record).await.unwrap();
        assert_eq!(owner.id, profile.id);

        let current = state.statuses().current(&profile.id).await.unwrap();
        assert_eq!(current.map(|status| status.id), Some(record.id));
    }

    #[tokio::test]
    async fn latest_row_is_the_current_status() {
        let state = memory_state().await;
        let alice = state
            .accounts()
            .create(CreateAccountInput {
                username: Some("alice".into()),
                email: Some("alice@example.com".into()),
                phone_number: Some("+254733000004".into()),
                password: Some("pw".into()),
                ..CreateAccountInput::default()
            })
            .await
            .unwrap();
        let profile = state.profiles().get_profile(&alice.id).await.unwrap();

        let first = state
            .statuses()
            .set_status(
                profile.reference(),
                ModerationStatus::Suspended,
                Some("spam".into()),
                None,
            )
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = state
            .statuses()
            .set_status(profile.reference(), ModerationStatus::Active, None, None)
            .await
            .unwrap();
        assert_ne!(first.id, second.id);

        let current = state.statuses().current(&profile.id).await.unwrap().unwrap();
        assert_eq!(current.id, second.id);
        assert_eq!(current.status, ModerationStatus::Active);
    }

    #[tokio::test]
    async fn wrong_variant_or_unknown_profile_is_not_found() {
        let state = memory_state().await;
        let alice = state
            .accounts()
            .create(CreateAccountInput {
                username: Some("alice".into()),
                email: Some("alice@example.com".into()),
                phone_number: Some("+254733000002".into()),
                password: Some("pw".into()),
                ..CreateAccountInput::default()
            })
            .await
            .unwrap();
        let profile = state.profiles().get_profile(&alice.id).await.unwrap();

        let err = state
            .statuses()
            .set_status(
                ProfileRef::new(Role::Manager, profile.id.clone()),
                ModerationStatus::Banned,
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { entity: "profile" }));

        let err = state
            .statuses()
            .set_status(
                ProfileRef::new(Role::Regular, "missing"),
                ModerationStatus::Banned,
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert!(state.statuses().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_rows_can_be_amended_and_removed() {
        let state = memory_state().await;
        let alice = state
            .accounts()
            .create(CreateAccountInput {
                username: Some("alice".into()),
                email: Some("alice@example.com".into()),
                phone_number: Some("+254733000003".into()),
                password: Some("pw".into()),
                ..CreateAccountInput::default()
            })
            .await
            .unwrap();
        let profile = state.profiles().get_profile(&alice.id).await.unwrap();
        let record = state
            .statuses()
            .set_status(
                profile.reference(),
                ModerationStatus::Suspended,
                Some("spam".into()),
                None,
            )
            .await
            .unwrap();

        let updated = state
            .statuses()
            .update(
                &record.id,
                UpdateStatusInput {
                    status: Some(ModerationStatus::Active),
                    reason: Some(String::new()),
                    ..UpdateStatusInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ModerationStatus::Active);
        assert_eq!(updated.reason, None);

        let listed = state.statuses().list(Some(&profile.id)).await.unwrap();
        assert_eq!(listed.len(), 1);

        state.statuses().delete(&record.id).await.unwrap();
        assert!(state.statuses().get(&record.id).await.is_err());
        assert!(state.statuses().delete(&record.id).await.is_err());
    }
}
