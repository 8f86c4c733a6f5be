use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::{Caller, Profile, ProfileDetails, RoleFieldsPatch},
    entities::{accounts::Role, profile_statuses::ModerationStatus, profiles::Language},
    error::ApiError,
    handler::error::ErrorResponse,
    service::profiles::UpdateProfileInput,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub account_id: String,
    pub variant: Role,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Language,
    pub time_zone: String,
    pub website: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub social_media_links: Option<serde_json::Value>,
    /// Attributes of the profile variant only.
    #[schema(value_type = Object)]
    pub details: ProfileDetails,
    pub status: Option<ModerationStatus>,
    pub followers_count: u64,
    pub following_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new(
        profile: Profile,
        default_time_zone: &str,
        status: Option<ModerationStatus>,
        followers_count: u64,
        following_count: u64,
    ) -> Self {
        let time_zone = profile.effective_time_zone(default_time_zone).to_string();
        Self {
            variant: profile.variant(),
            id: profile.id,
            account_id: profile.account_id,
            country: profile.country,
            bio: profile.bio,
            avatar: profile.avatar,
            preferred_language: profile.preferred_language,
            time_zone,
            website: profile.website,
            social_media_links: profile.social_media_links,
            details: profile.details,
            status,
            followers_count,
            following_count,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Adds the current status and the follow counts.
pub(crate) async fn profile_response(
    state: &AppState,
    profile: Profile,
) -> Result<ProfileResponse, ApiError> {
    let followers_count = state.profiles().followers_count(&profile).await?;
    let following_count = state.profiles().following_count(&profile).await?;
    let status = state
        .statuses()
        .current(&profile.id)
        .await?
        .map(|record| record.status);
    Ok(ProfileResponse::new(
        profile,
        &state.config().values().default_time_zone,
        status,
        followers_count,
        following_count,
    ))
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub country: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Option<Language>,
    pub time_zone: Option<String>,
    pub website: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub social_media_links: Option<serde_json::Value>,
    pub position: Option<String>,
    pub club: Option<String>,
    pub national_team: Option<String>,
    pub current_team: Option<String>,
    pub coaching_style: Option<String>,
    pub organisation_name: Option<String>,
    pub organisation_type: Option<String>,
}

impl From<UpdateProfile> for UpdateProfileInput {
    fn from(payload: UpdateProfile) -> Self {
        Self {
            country: payload.country,
            bio: payload.bio,
            avatar: payload.avatar,
            preferred_language: payload.preferred_language,
            time_zone: payload.time_zone,
            website: payload.website,
            social_media_links: payload.social_media_links,
            role_fields: RoleFieldsPatch {
                position: payload.position,
                club: payload.club,
                national_team: payload.national_team,
                current_team: payload.current_team,
                coaching_style: payload.coaching_style,
                organisation_name: payload.organisation_name,
                organisation_type: payload.organisation_type,
            },
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct ProfileFilter {
    /// REGULAR, FOOTBALLER, MANAGER or ORGANISATION.
    pub variant: Option<Role>,
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    params(ProfileFilter),
    responses(
        (status = 200, description = "Profiles visible to the caller", body = [ProfileResponse]),
        (status = 401, description = "Missing identity", body = ErrorResponse)
    )
)]
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(filter): Query<ProfileFilter>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let profiles = state.profiles().list(&caller, filter.variant).await?;
    let mut response = Vec::with_capacity(profiles.len());
    for profile in profiles {
        response.push(profile_response(&state, profile).await?);
    }
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profiles().get(&caller, &id).await?;
    Ok(Json(profile_response(&state, profile).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/profiles/{id}",
    request_body = UpdateProfile,
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Updated", body = ProfileResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .profiles()
        .update(&caller, &id, payload.into())
        .await?;
    Ok(Json(profile_response(&state, profile).await?))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/profiles", get(list_profiles))
        .route("/api/v1/profiles/:id", get(get_profile).patch(update_profile))
        .with_state(state)
}
