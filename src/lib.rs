pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod handler;
pub mod ids;
pub mod openapi;
pub mod repo;
pub mod schema;
pub mod service;
pub mod state;
pub mod validation;

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handler::health::routes(state.clone()))
        .merge(handler::accounts::routes(state.clone()))
        .merge(handler::profiles::routes(state.clone()))
        .merge(handler::statuses::routes(state.clone()))
        .merge(handler::relationships::routes(state.clone()))
        .merge(handler::leagues::routes(state.clone()))
        .merge(handler::clubs::routes(state))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
}
