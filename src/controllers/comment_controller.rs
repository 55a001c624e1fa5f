// Comment Controller - comments are only reachable under their page

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::params::{parse_body, parse_id, ListParams};
use crate::app_state::AppState;
use crate::entities::Comment;
use crate::error::{AppError, AppResult};
use crate::infrastructure::FieldFilter;

pub fn comment_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/pages/{id}/comments",
            get(list_page_comments).post(post_page_comment),
        )
        .route("/v1/pages/{id}/comments/{comment_id}", get(get_page_comment))
        .with_state(state)
}

pub async fn list_page_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<Comment>>> {
    let page_id = parse_id(&id)?;
    let (limit, offset) = ListParams::from_pairs(pairs).resolve(state.config.api.default_limit);
    let comments = state
        .comments
        .list(limit, offset, vec![FieldFilter::eq("page_id", page_id.value())])
        .await?;
    Ok(Json(comments))
}

pub async fn get_page_comment(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<Comment>> {
    let page_id = parse_id(&id)?;
    let comment = state
        .comments
        .get(parse_id(&comment_id)?)
        .await?
        .filter(|comment| comment.belongs_to(page_id))
        .ok_or_else(|| AppError::resource_not_found(&comment_id))?;
    Ok(Json(comment))
}

/// Creates a comment on an existing page; the page in the path wins over
/// any `page_id` in the body.
pub async fn post_page_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let page_id = parse_id(&id)?;
    if state.pages.get(page_id).await?.is_none() {
        return Err(AppError::resource_not_found(&id));
    }

    let mut fields = parse_body(&body)?;
    fields.insert("page_id".to_string(), Value::from(page_id.value()));

    let created = state.comments.create(&fields).await?;
    let comment_id = created
        .id
        .ok_or_else(|| AppError::Internal("Stored comment has no id".to_string()))?;
    let location = format!("/v1/pages/{}/comments/{}", page_id, comment_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response())
}
