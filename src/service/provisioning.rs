use chrono::Utc;
use sea_orm::{DatabaseTransaction, DbErr, Set};

use crate::{
    domain::ProfileDetails,
    entities::{accounts, profiles},
    ids,
    repo::profiles::ProfilesRepo,
};

/// Whether `account` should own a profile right now.
pub fn needs_profile(account: &accounts::Model) -> bool {
    !account.role.requires_verification() || account.is_verified
}

/// Creates the profile matching the account role when the account is eligible and has
/// none yet. Returns the new profile, `None` when nothing was created.
pub async fn provision_profile_txn(
    txn: &DatabaseTransaction,
    profiles_repo: &dyn ProfilesRepo,
    account: &accounts::Model,
) -> Result<Option<profiles::Model>, DbErr> {
    if !needs_profile(account) {
        tracing::debug!(account_id = %account.id, role = account.role.as_str(), "profile deferred until verification");
        return Ok(None);
    }
    if profiles_repo
        .find_by_account_id_with_txn(txn, &account.id)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    let now = Utc::now();
    let mut model = profiles::ActiveModel {
        id: Set(ids::short_id()),
        account_id: Set(account.id.clone()),
        country: Set(None),
        bio: Set(None),
        avatar: Set(None),
        preferred_language: Set(profiles::Language::default()),
        time_zone: Set(String::new()),
        website: Set(None),
        social_media_links: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    ProfileDetails::empty(account.role).write_to(&mut model);

    let profile = profiles_repo.insert_with_txn(txn, model).await?;
    tracing::info!(account_id = %account.id, profile_id = %profile.id, variant = profile.variant.as_str(), "profile provisioned");
    Ok(Some(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::accounts::Role;

    fn account(role: Role, is_verified: bool) -> accounts::Model {
        let now = Utc::now();
        accounts::Model {
            id: "a1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone_number: "+254700000001".into(),
            first_name: None,
            last_name: None,
            role,
            password_hash: String::new(),
            is_verified,
            is_moderator: false,
            is_developer: false,
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: now.into(),
            last_login: None,
            updated_at: now.into(),
        }
    }

    #[test]
    fn regular_accounts_always_get_a_profile() {
        assert!(needs_profile(&account(Role::Regular, false)));
        assert!(needs_profile(&account(Role::Regular, true)));
    }

    #[test]
    fn other_roles_wait_for_verification() {
        for role in [Role::Footballer, Role::Manager, Role::Organisation] {
            assert!(!needs_profile(&account(role, false)));
            assert!(needs_profile(&account(role, true)));
        }
    }
}
