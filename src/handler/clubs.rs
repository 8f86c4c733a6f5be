use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    domain::Caller, entities::clubs, error::ApiError, handler::error::ErrorResponse,
    service::catalog::ClubInput, state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub full_name: String,
    pub short_name: String,
    pub logo: Option<String>,
    pub year_established: Option<i16>,
    pub league_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<clubs::Model> for ClubResponse {
    fn from(model: clubs::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            full_name: model.full_name,
            short_name: model.short_name,
            logo: model.logo,
            year_established: model.year_established,
            league_id: model.league_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ClubPayload {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub year_established: Option<i16>,
    /// League id or slug.
    pub league: Option<String>,
}

impl From<ClubPayload> for ClubInput {
    fn from(payload: ClubPayload) -> Self {
        Self {
            name: payload.name,
            full_name: payload.full_name,
            short_name: payload.short_name,
            logo: payload.logo,
            year_established: payload.year_established,
            league: payload.league,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/clubs",
    responses(
        (status = 200, description = "Clubs by name", body = [ClubResponse])
    )
)]
pub async fn list_clubs(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
) -> Result<Json<Vec<ClubResponse>>, ApiError> {
    let clubs = state.clubs().list().await?;
    Ok(Json(clubs.into_iter().map(ClubResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/clubs",
    request_body = ClubPayload,
    responses(
        (status = 201, description = "Created", body = ClubResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn create_club(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<ClubPayload>,
) -> Result<(StatusCode, Json<ClubResponse>), ApiError> {
    caller.require_admin()?;
    let club = state.clubs().create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(club.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/clubs/{key}",
    params(("key" = String, Path, description = "Club id or slug")),
    responses(
        (status = 200, description = "Club", body = ClubResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_club(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(key): Path<String>,
) -> Result<Json<ClubResponse>, ApiError> {
    Ok(Json(state.clubs().get(&key).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/clubs/{key}",
    request_body = ClubPayload,
    params(("key" = String, Path, description = "Club id or slug")),
    responses(
        (status = 200, description = "Updated, slug recomputed from the name", body = ClubResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn update_club(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(key): Path<String>,
    Json(payload): Json<ClubPayload>,
) -> Result<Json<ClubResponse>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.clubs().update(&key, payload.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clubs/{key}",
    params(("key" = String, Path, description = "Club id or slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_club(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.clubs().delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/clubs", get(list_clubs).post(create_club))
        .route(
            "/api/v1/clubs/:key",
            get(get_club).patch(update_club).delete(delete_club),
        )
        .with_state(state)
}
