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
    entities::account_relationships,
    error::ApiError,
    handler::error::ErrorResponse,
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct RelationshipResponse {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<account_relationships::Model> for RelationshipResponse {
    fn from(model: account_relationships::Model) -> Self {
        Self {
            id: model.id,
            follower_id: model.follower_id,
            following_id: model.following_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateRelationship {
    pub following_id: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/relationships",
    responses(
        (status = 200, description = "Accounts the caller follows, most recent first", body = [RelationshipResponse]),
        (status = 401, description = "Missing identity", body = ErrorResponse)
    )
)]
pub async fn list_relationships(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<Json<Vec<RelationshipResponse>>, ApiError> {
    let edges = state.relationships().list_edges(&caller).await?;
    Ok(Json(edges.into_iter().map(RelationshipResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/relationships",
    request_body = CreateRelationship,
    responses(
        (status = 201, description = "Caller now follows the account", body = RelationshipResponse),
        (status = 400, description = "Self-follow", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn create_relationship(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Json(payload): Json<CreateRelationship>,
) -> Result<(StatusCode, Json<RelationshipResponse>), ApiError> {
    let edge = state
        .relationships()
        .follow(&caller.account_id, &payload.following_id)
        .await?;
    Ok((StatusCode::CREATED, Json(edge.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/relationships/{id}",
    params(("id" = String, Path, description = "Relationship id")),
    responses(
        (status = 200, description = "Relationship", body = RelationshipResponse),
        (status = 404, description = "Not found among the caller's relationships", body = ErrorResponse)
    )
)]
pub async fn get_relationship(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<RelationshipResponse>, ApiError> {
    Ok(Json(state.relationships().get_edge(&caller, &id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/relationships/{id}",
    params(("id" = String, Path, description = "Relationship id")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 404, description = "Not found among the caller's relationships", body = ErrorResponse)
    )
)]
pub async fn delete_relationship(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.relationships().delete_edge(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/v1/relationships",
            get(list_relationships).post(create_relationship),
        )
        .route(
            "/api/v1/relationships/:id",
            get(get_relationship).delete(delete_relationship),
        )
        .with_state(state)
}
