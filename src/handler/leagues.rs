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
    domain::Caller,
    entities::leagues::{self, Continent},
    error::ApiError,
    handler::{clubs::ClubResponse, error::ErrorResponse},
    service::catalog::LeagueInput,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct LeagueResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub short_name: String,
    pub logo: Option<String>,
    pub country: String,
    pub continent: Continent,
    pub description: Option<String>,
    pub year_established: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<leagues::Model> for LeagueResponse {
    fn from(model: leagues::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            short_name: model.short_name,
            logo: model.logo,
            country: model.country,
            continent: model.continent,
            description: model.description,
            year_established: model.year_established,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Used for both create and update; on update absent fields are left unchanged.
#[derive(Deserialize, ToSchema)]
pub struct LeaguePayload {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub logo: Option<String>,
    pub country: Option<String>,
    pub continent: Option<Continent>,
    pub description: Option<String>,
    pub year_established: Option<i16>,
}

impl From<LeaguePayload> for LeagueInput {
    fn from(payload: LeaguePayload) -> Self {
        Self {
            name: payload.name,
            short_name: payload.short_name,
            logo: payload.logo,
            country: payload.country,
            continent: payload.continent,
            description: payload.description,
            year_established: payload.year_established,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/leagues",
    responses(
        (status = 200, description = "Leagues, newest first", body = [LeagueResponse])
    )
)]
pub async fn list_leagues(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
) -> Result<Json<Vec<LeagueResponse>>, ApiError> {
    let leagues = state.leagues().list().await?;
    Ok(Json(leagues.into_iter().map(LeagueResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/leagues",
    request_body = LeaguePayload,
    responses(
        (status = 201, description = "Created", body = LeagueResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn create_league(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<LeaguePayload>,
) -> Result<(StatusCode, Json<LeagueResponse>), ApiError> {
    caller.require_admin()?;
    let league = state.leagues().create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(league.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/leagues/{key}",
    params(("key" = String, Path, description = "League id or slug")),
    responses(
        (status = 200, description = "League", body = LeagueResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_league(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(key): Path<String>,
) -> Result<Json<LeagueResponse>, ApiError> {
    Ok(Json(state.leagues().get(&key).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/leagues/{key}",
    request_body = LeaguePayload,
    params(("key" = String, Path, description = "League id or slug")),
    responses(
        (status = 200, description = "Updated, slug recomputed from the name", body = LeagueResponse),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn update_league(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(key): Path<String>,
    Json(payload): Json<LeaguePayload>,
) -> Result<Json<LeagueResponse>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.leagues().update(&key, payload.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{key}",
    params(("key" = String, Path, description = "League id or slug")),
    responses(
        (status = 204, description = "Deleted together with its clubs"),
        (status = 403, description = "Administrators only", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_league(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.leagues().delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/leagues/{key}/clubs",
    params(("key" = String, Path, description = "League id or slug")),
    responses(
        (status = 200, description = "Clubs of the league by name", body = [ClubResponse]),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn league_clubs(
    State(state): State<Arc<AppState>>,
    _caller: Caller,
    Path(key): Path<String>,
) -> Result<Json<Vec<ClubResponse>>, ApiError> {
    let clubs = state.clubs().list_by_league(&key).await?;
    Ok(Json(clubs.into_iter().map(ClubResponse::from).collect()))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/leagues", get(list_leagues).post(create_league))
        .route(
            "/api/v1/leagues/:key",
            get(get_league).patch(update_league).delete(delete_league),
        )
        .route("/api/v1/leagues/:key/clubs", get(league_clubs))
        .with_state(state)
}
