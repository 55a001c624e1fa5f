// HTTP controllers - map routes to resource handlers

pub mod comment_controller;
pub mod params;
pub mod resource_controller;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::core::Timestamp;
use crate::error::AppResult;

pub use comment_controller::comment_router;
pub use resource_controller::resource_router;

pub const AUTHORS_PATH: &str = "/v1/authors";
pub const PAGES_PATH: &str = "/v1/pages";

/// Full API router: health, authors, pages and page comments
pub fn create_router(state: AppState) -> Router {
    let default_limit = state.config.api.default_limit;

    Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone())
        .merge(resource_router(state.authors.clone(), AUTHORS_PATH, default_limit))
        .merge(resource_router(state.pages.clone(), PAGES_PATH, default_limit))
        .merge(comment_router(state))
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.database.health_check().await?;
    Ok(Json(json!({
        "status": "healthy",
        "service": "blog-api",
        "timestamp": Timestamp::now().value(),
    })))
}
