// Resource Controller - the CRUD routes shared by authors and pages

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::params::{parse_body, parse_id, ListParams};
use crate::core::ObjectId;
use crate::ent_framework::{Entity, Schema};
use crate::error::{AppError, AppResult};
use crate::handlers::ResourceHandler;

#[derive(Clone)]
pub struct ResourceState<E: Entity> {
    pub handler: ResourceHandler<E>,
    /// Collection path, e.g. `/v1/authors`
    pub base_path: &'static str,
    pub default_limit: u32,
}

impl<E: Entity> ResourceState<E> {
    fn location(&self, id: ObjectId) -> String {
        format!("{}/{}", self.base_path, id)
    }

    async fn get_or_404(&self, raw_id: &str) -> AppResult<E> {
        let id = parse_id(raw_id)?;
        self.handler
            .get(id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(raw_id))
    }
}

fn assigned_id<E: Entity>(entity: &E) -> AppResult<ObjectId> {
    entity
        .id()
        .ok_or_else(|| AppError::Internal(format!("Stored {} has no id", E::ENTITY_TYPE)))
}

fn redirect(status: StatusCode, location: String) -> Response {
    (status, [(header::LOCATION, location)]).into_response()
}

/// Routes for `base_path`, `base_path/new` and `base_path/{id}`
pub fn resource_router<E: Entity>(
    handler: ResourceHandler<E>,
    base_path: &'static str,
    default_limit: u32,
) -> Router {
    let state = ResourceState {
        handler,
        base_path,
        default_limit,
    };

    Router::new()
        .route(base_path, get(list_resources::<E>).post(post_resource::<E>))
        .route(&format!("{}/new", base_path), get(new_resource_form::<E>))
        .route(
            &format!("{}/{{id}}", base_path),
            get(get_resource::<E>)
                .put(put_resource::<E>)
                .patch(patch_resource::<E>)
                .delete(delete_resource::<E>),
        )
        .with_state(state)
}

pub async fn list_resources<E: Entity>(
    State(state): State<ResourceState<E>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Vec<E>>> {
    let (limit, offset) = ListParams::from_pairs(pairs).resolve(state.default_limit);
    let entities = state.handler.list(limit, offset, Vec::new()).await?;
    Ok(Json(entities))
}

/// Field description a client needs to build a create form
pub async fn new_resource_form<E: Entity>(State(state): State<ResourceState<E>>) -> Json<Schema> {
    Json(state.handler.schema().clone())
}

pub async fn get_resource<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> AppResult<Json<E>> {
    Ok(Json(state.get_or_404(&id).await?))
}

pub async fn post_resource<E: Entity>(
    State(state): State<ResourceState<E>>,
    body: Bytes,
) -> AppResult<Response> {
    let fields = parse_body(&body)?;
    let created = state.handler.create(&fields).await?;
    let location = state.location(assigned_id(&created)?);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

/// Replaces the resource, or creates a new one (with a fresh id) when the
/// requested id is not stored.
pub async fn put_resource<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let fields = parse_body(&body)?;
    let existing = match id.parse::<ObjectId>() {
        Ok(object_id) => state.handler.get(object_id).await?,
        Err(_) => None,
    };

    match existing {
        Some(entity) => {
            let replaced = state.handler.replace(entity, &fields).await?;
            Ok(redirect(StatusCode::NO_CONTENT, state.location(assigned_id(&replaced)?)))
        }
        None => {
            let created = state.handler.create(&fields).await?;
            let created_id = assigned_id(&created)?;
            info!("PUT {}/{} created {} instead", state.base_path, id, created_id);
            Ok(redirect(StatusCode::CREATED, state.location(created_id)))
        }
    }
}

pub async fn patch_resource<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let entity = state.get_or_404(&id).await?;
    let fields = parse_body(&body)?;
    let patched = state.handler.patch_partial(entity, &fields).await?;
    Ok(redirect(StatusCode::NO_CONTENT, state.location(assigned_id(&patched)?)))
}

pub async fn delete_resource<E: Entity>(
    State(state): State<ResourceState<E>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let entity = state.get_or_404(&id).await?;
    state.handler.delete(assigned_id(&entity)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
