use argon2::{Argon2, PasswordHasher};
use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use sea_orm::{DatabaseTransaction, Set, TransactionTrait};
use std::sync::Arc;

use crate::{
    config::Config,
    domain::{Profile, StatusRecord},
    entities::accounts::{self, Role},
    error::ApiError,
    ids,
    repo::{
        account_relationships::AccountRelationshipsRepo, accounts::AccountsRepo,
        profile_statuses::ProfileStatusesRepo, profiles::ProfilesRepo,
    },
    service::provisioning,
    state::DatabaseClient,
    validation,
};

#[derive(Clone, Debug)]
pub struct CreateAccountInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: bool,
    pub is_moderator: bool,
    pub is_developer: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl Default for CreateAccountInput {
    fn default() -> Self {
        Self {
            username: None,
            email: None,
            phone_number: None,
            password: None,
            role: Role::Regular,
            first_name: None,
            last_name: None,
            is_verified: false,
            is_moderator: false,
            is_developer: false,
            is_staff: false,
            is_superuser: false,
            is_active: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CreateSuperuserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Partial update. The role is deliberately absent: it never changes after creation.
#[derive(Clone, Debug, Default)]
pub struct UpdateAccountInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: Option<bool>,
    pub is_moderator: Option<bool>,
    pub is_developer: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateAccountInput {
    pub fn touches_flags(&self) -> bool {
        [
            self.is_verified,
            self.is_moderator,
            self.is_developer,
            self.is_staff,
            self.is_superuser,
            self.is_active,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// Account together with everything shown on its page.
#[derive(Clone, Debug)]
pub struct AccountDetail {
    pub account: accounts::Model,
    pub profile: Option<Profile>,
    pub status: Option<StatusRecord>,
    pub followers_count: u64,
    pub following_count: u64,
}

#[async_trait]
pub trait AccountsService: Send + Sync {
    async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, ApiError>;
    async fn create_superuser(
        &self,
        input: CreateSuperuserInput,
    ) -> Result<accounts::Model, ApiError>;
    /// Creates the configured superuser unless an account with that username exists.
    async fn bootstrap_superuser(
        &self,
        config: &Config,
    ) -> Result<Option<accounts::Model>, ApiError>;
    async fn get(&self, id: &str) -> Result<accounts::Model, ApiError>;
    async fn detail(&self, id: &str) -> Result<AccountDetail, ApiError>;
    async fn list(&self) -> Result<Vec<accounts::Model>, ApiError>;
    async fn update(
        &self,
        id: &str,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, ApiError>;
    async fn set_verified(&self, id: &str) -> Result<accounts::Model, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

pub struct AccountsServiceImpl {
    db: Arc<dyn DatabaseClient>,
    accounts_repo: Arc<dyn AccountsRepo>,
    profiles_repo: Arc<dyn ProfilesRepo>,
    statuses_repo: Arc<dyn ProfileStatusesRepo>,
    relationships_repo: Arc<dyn AccountRelationshipsRepo>,
}

impl AccountsServiceImpl {
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        accounts_repo: Arc<dyn AccountsRepo>,
        profiles_repo: Arc<dyn ProfilesRepo>,
        statuses_repo: Arc<dyn ProfileStatusesRepo>,
        relationships_repo: Arc<dyn AccountRelationshipsRepo>,
    ) -> Self {
        Self {
            db,
            accounts_repo,
            profiles_repo,
            statuses_repo,
            relationships_repo,
        }
    }

    fn hash_password(password: &str) -> Result<String, ApiError> {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = argon2::password_hash::SaltString::encode_b64(&salt)
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| ApiError::Internal(err.to_string()))?
            .to_string();
        Ok(hash)
    }
}

struct NewAccount {
    username: String,
    email: String,
    phone_number: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

struct AccountChanges {
    username: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    password_hash: Option<String>,
    first_name: Option<Option<String>>,
    last_name: Option<Option<String>>,
}

#[async_trait]
impl AccountsService for AccountsServiceImpl {
    async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, ApiError> {
        let password = validation::password(input.password.as_deref())?;
        let fields = NewAccount {
            username: validation::username(input.username.as_deref())?,
            email: validation::email(input.email.as_deref())?,
            phone_number: validation::phone_number(input.phone_number.as_deref())?,
            password_hash: Self::hash_password(password)?,
            first_name: validation::optional_text(
                "first_name",
                input.first_name.clone(),
                validation::NAME_MAX,
            )?,
            last_name: validation::optional_text(
                "last_name",
                input.last_name.clone(),
                validation::NAME_MAX,
            )?,
        };

        let accounts_repo = self.accounts_repo.clone();
        let profiles_repo = self.profiles_repo.clone();
        let account = self
            .db
            .conn()
            .transaction::<_, accounts::Model, ApiError>(|txn| {
                Box::pin(async move {
                    create_account_txn(
                        txn,
                        accounts_repo.as_ref(),
                        profiles_repo.as_ref(),
                        fields,
                        &input,
                    )
                    .await
                })
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            role = account.role.as_str(),
            "account created"
        );
        Ok(account)
    }

    async fn create_superuser(
        &self,
        input: CreateSuperuserInput,
    ) -> Result<accounts::Model, ApiError> {
        if input.is_staff == Some(false) {
            return Err(ApiError::validation(
                "is_staff",
                "a superuser must have is_staff=true",
            ));
        }
        if input.is_superuser == Some(false) {
            return Err(ApiError::validation(
                "is_superuser",
                "a superuser must have is_superuser=true",
            ));
        }
        if input.email.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            return Err(ApiError::validation("email", "a superuser must have an email"));
        }

        self.create(CreateAccountInput {
            username: input.username,
            email: input.email,
            phone_number: input.phone_number,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            is_staff: true,
            is_superuser: true,
            is_active: true,
            ..CreateAccountInput::default()
        })
        .await
    }

    async fn bootstrap_superuser(
        &self,
        config: &Config,
    ) -> Result<Option<accounts::Model>, ApiError> {
        let (Some(username), Some(email), Some(phone_number), Some(password)) = (
            config.superuser_username.as_ref(),
            config.superuser_email.as_ref(),
            config.superuser_phone.as_ref(),
            config.superuser_password.as_ref(),
        ) else {
            if config.superuser_username.is_some() || config.superuser_password.is_some() {
                tracing::warn!("superuser bootstrap skipped: incomplete SUPERUSER_* settings");
            }
            return Ok(None);
        };

        if self.accounts_repo.find_by_username(username).await?.is_some() {
            tracing::debug!(%username, "superuser already present");
            return Ok(None);
        }

        let account = self
            .create_superuser(CreateSuperuserInput {
                username: Some(username.clone()),
                email: Some(email.clone()),
                phone_number: Some(phone_number.clone()),
                password: Some(password.clone()),
                ..CreateSuperuserInput::default()
            })
            .await?;
        Ok(Some(account))
    }

    async fn get(&self, id: &str) -> Result<accounts::Model, ApiError> {
        self.accounts_repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::not_found("account"))
    }

    async fn detail(&self, id: &str) -> Result<AccountDetail, ApiError> {
        let account = self.get(id).await?;
        let profile = self
            .profiles_repo
            .find_by_account_id(&account.id)
            .await?
            .map(Profile::from);
        let status = match &profile {
            Some(profile) => self
                .statuses_repo
                .latest_for_profile(&profile.id)
                .await?
                .map(StatusRecord::from),
            None => None,
        };
        let followers_count = self
            .relationships_repo
            .count_by_following(&account.id)
            .await?;
        let following_count = self
            .relationships_repo
            .count_by_follower(&account.id)
            .await?;

        Ok(AccountDetail {
            account,
            profile,
            status,
            followers_count,
            following_count,
        })
    }

    async fn list(&self) -> Result<Vec<accounts::Model>, ApiError> {
        Ok(self.accounts_repo.list().await?)
    }

    async fn update(
        &self,
        id: &str,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, ApiError> {
        let changes = AccountChanges {
            username: input
                .username
                .as_deref()
                .map(|value| validation::username(Some(value)))
                .transpose()?,
            email: input
                .email
                .as_deref()
                .map(|value| validation::email(Some(value)))
                .transpose()?,
            phone_number: input
                .phone_number
                .as_deref()
                .map(|value| validation::phone_number(Some(value)))
                .transpose()?,
            password_hash: input
                .password
                .as_deref()
                .map(|value| validation::password(Some(value)).and_then(Self::hash_password))
                .transpose()?,
            first_name: input
                .first_name
                .clone()
                .map(|value| {
                    validation::optional_text("first_name", Some(value), validation::NAME_MAX)
                })
                .transpose()?,
            last_name: input
                .last_name
                .clone()
                .map(|value| {
                    validation::optional_text("last_name", Some(value), validation::NAME_MAX)
                })
                .transpose()?,
        };

        let id = id.to_string();
        let accounts_repo = self.accounts_repo.clone();
        let profiles_repo = self.profiles_repo.clone();
        let account = self
            .db
            .conn()
            .transaction::<_, accounts::Model, ApiError>(|txn| {
                Box::pin(async move {
                    update_account_txn(
                        txn,
                        accounts_repo.as_ref(),
                        profiles_repo.as_ref(),
                        &id,
                        changes,
                        &input,
                    )
                    .await
                })
            })
            .await?;

        tracing::info!(account_id = %account.id, "account updated");
        Ok(account)
    }

    async fn set_verified(&self, id: &str) -> Result<accounts::Model, ApiError> {
        self.update(
            id,
            UpdateAccountInput {
                is_verified: Some(true),
                ..UpdateAccountInput::default()
            },
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let id = id.to_string();
        let accounts_repo = self.accounts_repo.clone();
        let profiles_repo = self.profiles_repo.clone();
        let statuses_repo = self.statuses_repo.clone();
        let relationships_repo = self.relationships_repo.clone();
        self.db
            .conn()
            .transaction::<_, (), ApiError>(|txn| {
                Box::pin(async move {
                    let Some(account) = accounts_repo.find_by_id_with_txn(txn, &id).await? else {
                        return Err(ApiError::not_found("account"));
                    };
                    if let Some(profile) = profiles_repo
                        .find_by_account_id_with_txn(txn, &account.id)
                        .await?
                    {
                        statuses_repo
                            .delete_by_profile_id_with_txn(txn, &profile.id)
                            .await?;
                    }
                    profiles_repo
                        .delete_by_account_id_with_txn(txn, &account.id)
                        .await?;
                    let edges = relationships_repo
                        .delete_by_account_id_with_txn(txn, &account.id)
                        .await?;
                    tracing::info!(account_id = %account.id, edges, "account deleted");
                    accounts_repo.delete_with_txn(txn, account).await?;
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }
}

/// Rejects values already held by an account other than `exclude_id`.
async fn ensure_unique_txn(
    txn: &DatabaseTransaction,
    accounts_repo: &dyn AccountsRepo,
    username: &str,
    email: &str,
    phone_number: &str,
    exclude_id: Option<&str>,
) -> Result<(), ApiError> {
    let taken = accounts_repo
        .find_conflicting_with_txn(txn, username, email, phone_number, exclude_id)
        .await?;
    let field = if taken.iter().any(|other| other.username == username) {
        "username"
    } else if taken.iter().any(|other| other.email == email) {
        "email"
    } else if taken.iter().any(|other| other.phone_number == phone_number) {
        "phone_number"
    } else {
        return Ok(());
    };
    Err(ApiError::Uniqueness { field })
}

async fn create_account_txn(
    txn: &DatabaseTransaction,
    accounts_repo: &dyn AccountsRepo,
    profiles_repo: &dyn ProfilesRepo,
    fields: NewAccount,
    input: &CreateAccountInput,
) -> Result<accounts::Model, ApiError> {
    ensure_unique_txn(
        txn,
        accounts_repo,
        &fields.username,
        &fields.email,
        &fields.phone_number,
        None,
    )
    .await?;

    let now = Utc::now();
    let model = accounts::ActiveModel {
        id: Set(ids::short_id()),
        username: Set(fields.username),
        email: Set(fields.email),
        phone_number: Set(fields.phone_number),
        first_name: Set(fields.first_name),
        last_name: Set(fields.last_name),
        role: Set(input.role),
        password_hash: Set(fields.password_hash),
        is_verified: Set(input.is_verified),
        is_moderator: Set(input.is_moderator),
        is_developer: Set(input.is_developer),
        is_staff: Set(input.is_staff),
        is_superuser: Set(input.is_superuser),
        is_active: Set(input.is_active),
        date_joined: Set(now.into()),
        last_login: Set(None),
        updated_at: Set(now.into()),
    };

    let account = accounts_repo.insert_with_txn(txn, model).await?;
    provisioning::provision_profile_txn(txn, profiles_repo, &account).await?;
    Ok(account)
}

async fn update_account_txn(
    txn: &DatabaseTransaction,
    accounts_repo: &dyn AccountsRepo,
    profiles_repo: &dyn ProfilesRepo,
    id: &str,
    changes: AccountChanges,
    input: &UpdateAccountInput,
) -> Result<accounts::Model, ApiError> {
    let Some(current) = accounts_repo.find_by_id_with_txn(txn, id).await? else {
        return Err(ApiError::not_found("account"));
    };

    if changes.username.is_some() || changes.email.is_some() || changes.phone_number.is_some() {
        ensure_unique_txn(
            txn,
            accounts_repo,
            changes.username.as_deref().unwrap_or(&current.username),
            changes.email.as_deref().unwrap_or(&current.email),
            changes
                .phone_number
                .as_deref()
                .unwrap_or(&current.phone_number),
            Some(&current.id),
        )
        .await?;
    }

    let mut active: accounts::ActiveModel = current.into();
    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(phone_number) = changes.phone_number {
        active.phone_number = Set(phone_number);
    }
    if let Some(password_hash) = changes.password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(value) = input.is_verified {
        active.is_verified = Set(value);
    }
    if let Some(value) = input.is_moderator {
        active.is_moderator = Set(value);
    }
    if let Some(value) = input.is_developer {
        active.is_developer = Set(value);
    }
    if let Some(value) = input.is_staff {
        active.is_staff = Set(value);
    }
    if let Some(value) = input.is_superuser {
        active.is_superuser = Set(value);
    }
    if let Some(value) = input.is_active {
        active.is_active = Set(value);
    }
    active.updated_at = Set(Utc::now().into());

    let account = accounts_repo.update_with_txn(txn, active).await?;
    if account.is_verified {
        provisioning::provision_profile_txn(txn, profiles_repo, &account).await?;
    }
    Ok(account)
}
