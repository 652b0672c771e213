//! Mutual relationship handlers, including the per-character views.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, PageQuery};
use crate::response::{self, JsonResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use blackbook_core::service::relationship_service::{
    RelationshipInput, RelationshipService, RelationshipUpdate,
};
use blackbook_core::{ResourceId, UniverseId};

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    PageQuery(page): PageQuery,
) -> ApiResult<JsonResponse> {
    let relationships = state
        .run(move |conn| {
            RelationshipService::sqlite(conn)?.list(user.id, universe_id, page)
        })
        .await?;
    response::page("relationships", &relationships)
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    JsonBody(input): JsonBody<RelationshipInput>,
) -> ApiResult<JsonResponse> {
    let relationship = state
        .run(move |conn| RelationshipService::sqlite(conn)?.create(user.id, universe_id, &input))
        .await?;
    response::created("relationship", &relationship)
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath<ResourceId>,
) -> ApiResult<JsonResponse> {
    let relationship = state
        .run(move |conn| RelationshipService::sqlite(conn)?.get(user.id, id))
        .await?;
    response::ok("relationship", &relationship)
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath<ResourceId>,
    JsonBody(update): JsonBody<RelationshipUpdate>,
) -> ApiResult<JsonResponse> {
    let relationship = state
        .run(move |conn| RelationshipService::sqlite(conn)?.rename(user.id, id, &update))
        .await?;
    response::ok("relationship", &relationship)
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath<ResourceId>,
) -> ApiResult<StatusCode> {
    state
        .run(move |conn| RelationshipService::sqlite(conn)?.delete(user.id, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/characters/:id/relationships`
pub async fn for_character(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(character_id): IdPath<ResourceId>,
) -> ApiResult<JsonResponse> {
    let views = state
        .run(move |conn| RelationshipService::sqlite(conn)?.for_character(user.id, character_id))
        .await?;
    response::list("relationships", &views)
}

/// `GET /api/characters/:id/relationships/:relationship_id`
pub async fn show_for_character(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath((character_id, id)): IdPath<(ResourceId, ResourceId)>,
) -> ApiResult<JsonResponse> {
    let view = state
        .run(move |conn| RelationshipService::sqlite(conn)?.view_as(user.id, character_id, id))
        .await?;
    response::ok("relationship", &view)
}
