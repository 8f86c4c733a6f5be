use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::{Caller, ProfileRef, StatusRecord},
    entities::{accounts::Role, profile_statuses::ModerationStatus},
    error::ApiError,
    handler::error::ErrorResponse,
    service::statuses::UpdateStatusInput,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: String,
    pub profile_id: String,
    pub profile_variant: Role,
    pub regular_profile: Option<String>,
    pub footballer_profile: Option<String>,
    pub manager_profile: Option<String>,
    pub organisation_profile: Option<String>,
    pub status: ModerationStatus,
    pub reason: Option<String>,
    pub reconsidered_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StatusRecord> for StatusResponse {
    fn from(record: StatusRecord) -> Self {
        Self {
            regular_profile: record.regular_profile().map(str::to_string),
            footballer_profile: record.footballer_profile().map(str::to_string),
            manager_profile: record.manager_profile().map(str::to_string),
            organisation_profile: record.organisation_profile().map(str::to_string),
            profile_id: record.owner.profile_id().to_string(),
            profile_variant: record.owner.variant(),
            id: record.id,
            status: record.status,
            reason: record.reason,
            reconsidered_at: record.reconsidered_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// The owner is given either as `profile_id` + `profile_variant` or through exactly one
/// of the per-variant fields.
#[derive(Deserialize, ToSchema)]
pub struct CreateStatus {
    pub profile_id: Option<String>,
    pub profile_variant: Option<Role>,
    pub regular_profile: Option<String>,
    pub footballer_profile: Option<String>,
    pub manager_profile: Option<String>,
    pub organisation_profile: Option<String>,
    #[serde(default)]
    pub status: ModerationStatus,
    pub reason: Option<String>,
    pub reconsidered_at: Option<NaiveDate>,
}

impl CreateStatus {
    fn owner(&self) -> Result<ProfileRef, ApiError> {
        match (&self.profile_id, self.profile_variant) {
            (Some(profile_id), Some(variant)) => {
                let legacy = [
                    &self.regular_profile,
                    &self.footballer_profile,
                    &self.manager_profile,
                    &self.organisation_profile,
                ];
                if legacy.iter().any(|value| value.is_some()) {
                    return Err(ApiError::validation(
                        "profile",
                        "exactly one profile reference must be set, got several",
                    ));
                }
                Ok(ProfileRef::new(variant, profile_id.clone()))
            }
            (None, None) => ProfileRef::from_owner_columns(
                self.regular_profile.clone(),
                self.footballer_profile.clone(),
                self.manager_profile.clone(),
                self.organisation_profile.clone(),
            ),
            (None, Some(_)) => Err(ApiError::validation("profile_id", "this field is required")),
            (Some(_), None) => Err(ApiError::validation(
                "profile_variant",
                "this field is required",
            )),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatus {
    pub status: Option<ModerationStatus>,
    pub reason: Option<String>,
    /// `null` clears the date, an absent field leaves it unchanged.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>)]
    pub reconsidered_at: Option<Option<NaiveDate>>,
}

#[derive(Deserialize, IntoParams)]
pub struct StatusFilter {
    pub profile_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/profile-statuses",
    params(StatusFilter),
    responses(
        (status = 200, description = "Status rows, most recent first", body = [StatusResponse]),
        (status = 403, description = "Administrators only", body = ErrorResponse)
    )
)]
pub async fn list_statuses(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<StatusResponse>>, ApiError> {
    caller.require_admin()?;
    let records = state.statuses().list(filter.profile_id.as_deref()).await?;
    Ok(Json(records.into_iter().map(StatusResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile-statuses",
    request_body = CreateStatus,
    responses(
        (status = 201, description = "Created", body = StatusResponse),
        (status = 400, description = "Invalid owner reference", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    )
)]
pub async fn create_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<CreateStatus>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    caller.require_admin()?;
    let owner = payload.owner()?;
    let record = state
        .statuses()
        .set_status(
            owner,
            payload.status,
            payload.reason,
            payload.reconsidered_at,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile-statuses/{id}",
    params(("id" = String, Path, description = "Status id")),
    responses(
        (status = 200, description = "Status", body = StatusResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.statuses().get(&id).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/profile-statuses/{id}",
    request_body = UpdateStatus,
    params(("id" = String, Path, description = "Status id")),
    responses(
        (status = 200, description = "Updated", body = StatusResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatus>,
) -> Result<Json<StatusResponse>, ApiError> {
    caller.require_admin()?;
    let input = UpdateStatusInput {
        status: payload.status,
        reason: payload.reason,
        reconsidered_at: payload.reconsidered_at,
    };
    Ok(Json(state.statuses().update(&id, input).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile-statuses/{id}",
    params(("id" = String, Path, description = "Status id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_status(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.statuses().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/v1/profile-statuses",
            get(list_statuses).post(create_status),
        )
        .route(
            "/api/v1/profile-statuses/:id",
            get(get_status).patch(update_status).delete(delete_status),
        )
        .with_state(state)
}
