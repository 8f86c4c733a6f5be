use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    domain::Caller,
    entities::accounts::{self, Role},
    error::ApiError,
    handler::{
        error::ErrorResponse,
        profiles::{profile_response, ProfileResponse},
        relationships::RelationshipResponse,
        statuses::StatusResponse,
    },
    service::accounts::{CreateAccountInput, UpdateAccountInput},
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateAccount {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: Option<bool>,
    pub is_moderator: Option<bool>,
    pub is_developer: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl CreateAccount {
    /// True when a flag is given with a value other than its default.
    fn overrides_flags(&self) -> bool {
        let defaults = CreateAccountInput::default();
        [
            (self.is_verified, defaults.is_verified),
            (self.is_moderator, defaults.is_moderator),
            (self.is_developer, defaults.is_developer),
            (self.is_staff, defaults.is_staff),
            (self.is_superuser, defaults.is_superuser),
            (self.is_active, defaults.is_active),
        ]
        .into_iter()
        .any(|(given, default)| given.is_some_and(|value| value != default))
    }
}

impl From<CreateAccount> for CreateAccountInput {
    fn from(payload: CreateAccount) -> Self {
        let defaults = CreateAccountInput::default();
        Self {
            username: payload.username,
            email: payload.email,
            phone_number: payload.phone_number,
            password: payload.password,
            role: payload.role.unwrap_or(defaults.role),
            first_name: payload.first_name,
            last_name: payload.last_name,
            is_verified: payload.is_verified.unwrap_or(defaults.is_verified),
            is_moderator: payload.is_moderator.unwrap_or(defaults.is_moderator),
            is_developer: payload.is_developer.unwrap_or(defaults.is_developer),
            is_staff: payload.is_staff.unwrap_or(defaults.is_staff),
            is_superuser: payload.is_superuser.unwrap_or(defaults.is_superuser),
            is_active: payload.is_active.unwrap_or(defaults.is_active),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAccount {
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

impl From<UpdateAccount> for UpdateAccountInput {
    fn from(payload: UpdateAccount) -> Self {
        Self {
            username: payload.username,
            email: payload.email,
            phone_number: payload.phone_number,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            is_verified: payload.is_verified,
            is_moderator: payload.is_moderator,
            is_developer: payload.is_developer,
            is_staff: payload.is_staff,
            is_superuser: payload.is_superuser,
            is_active: payload.is_active,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub is_moderator: bool,
    pub is_developer: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            phone_number: model.phone_number,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            is_verified: model.is_verified,
            is_moderator: model.is_moderator,
            is_developer: model.is_developer,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            is_active: model.is_active,
            date_joined: model.date_joined.with_timezone(&Utc),
            last_login: model.last_login.map(|dt| dt.with_timezone(&Utc)),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AccountDetailResponse {
    pub account: AccountResponse,
    pub profile: Option<ProfileResponse>,
    pub status: Option<StatusResponse>,
    pub followers_count: u64,
    pub following_count: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Created", body = AccountResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Flags need an administrator", body = ErrorResponse),
        (status = 409, description = "Username, email or phone number taken", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<CreateAccount>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    if payload.overrides_flags() {
        caller.require_admin()?;
    }
    let account = state.accounts().create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Accounts by username", body = [AccountResponse]),
        (status = 401, description = "Missing identity", body = ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.accounts().list().await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account with profile, current status and counts", body = AccountDetailResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<AccountDetailResponse>, ApiError> {
    let detail = state.accounts().detail(&id).await?;
    let default_time_zone = &state.config().values().default_time_zone;
    let profile = detail.profile.map(|profile| {
        ProfileResponse::new(
            profile,
            default_time_zone,
            detail.status.as_ref().map(|record| record.status),
            detail.followers_count,
            detail.following_count,
        )
    });

    Ok(Json(AccountDetailResponse {
        account: detail.account.into(),
        profile,
        status: detail.status.map(StatusResponse::from),
        followers_count: detail.followers_count,
        following_count: detail.following_count,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/accounts/{id}",
    request_body = UpdateAccount,
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Updated", body = AccountResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccount>,
) -> Result<Json<AccountResponse>, ApiError> {
    caller.require_self_or_admin(&id)?;
    let input = UpdateAccountInput::from(payload);
    if input.touches_flags() {
        caller.require_admin()?;
    }
    let account = state.accounts().update(&id, input).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 204, description = "Deleted with its profile, statuses and relationships"),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require_self_or_admin(&id)?;
    state.accounts().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/follow",
    params(("id" = String, Path, description = "Account to follow")),
    responses(
        (status = 200, description = "Relationship, new or existing", body = RelationshipResponse),
        (status = 400, description = "Self-follow", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn follow(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<RelationshipResponse>, ApiError> {
    let edge = state
        .relationships()
        .follow(&caller.account_id, &id)
        .await?;
    Ok(Json(edge.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/unfollow",
    params(("id" = String, Path, description = "Account to unfollow")),
    responses(
        (status = 204, description = "Not following, whether or not it was before")
    )
)]
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .relationships()
        .unfollow(&caller.account_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/followers",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Followers, most recent first", body = [AccountResponse]),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn followers(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.relationships().list_followers(&id).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/following",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Followed accounts, most recent first", body = [AccountResponse]),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn following(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.relationships().list_following(&id).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/profile",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Profile of the account", body = ProfileResponse),
        (status = 404, description = "No profile yet", body = ErrorResponse)
    )
)]
pub async fn account_profile(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profiles().get_profile(&id).await?;
    Ok(Json(profile_response(&state, profile).await?))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/accounts", get(list_accounts).post(create_account))
        .route(
            "/api/v1/accounts/:id",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .route("/api/v1/accounts/:id/follow", post(follow))
        .route("/api/v1/accounts/:id/unfollow", post(unfollow))
        .route("/api/v1/accounts/:id/followers", get(followers))
        .route("/api/v1/accounts/:id/following", get(following))
        .route("/api/v1/accounts/:id/profile", get(account_profile))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> CreateAccount {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn default_flag_values_need_no_administrator() {
        assert!(!payload(serde_json::json!({ "username": "alice" })).overrides_flags());
        assert!(!payload(serde_json::json!({
            "is_active": true,
            "is_verified": false,
            "is_staff": false
        }))
        .overrides_flags());
    }

    #[test]
    fn non_default_flag_values_need_an_administrator() {
        assert!(payload(serde_json::json!({ "is_verified": true })).overrides_flags());
        assert!(payload(serde_json::json!({ "is_active": false })).overrides_flags());
        assert!(payload(serde_json::json!({ "is_superuser": true })).overrides_flags());
    }
}
