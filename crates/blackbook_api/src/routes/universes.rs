//! Universe and collaborator handlers.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, PageQuery};
use crate::response::{self, JsonResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use blackbook_core::service::universe_service::UniverseService;
use blackbook_core::{UniverseId, UserId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UniverseInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CollaboratorInput {
    pub user_id: UserId,
}

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PageQuery(page): PageQuery,
) -> ApiResult<JsonResponse> {
    let universes = state
        .run(move |conn| {
            UniverseService::sqlite(conn).list(user.id, page)
        })
        .await?;
    response::page("universes", &universes)
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<UniverseInput>,
) -> ApiResult<JsonResponse> {
    let universe = state
        .run(move |conn| UniverseService::sqlite(conn).create(user.id, &input.name))
        .await?;
    response::created("universe", &universe)
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
) -> ApiResult<JsonResponse> {
    let universe = state
        .run(move |conn| UniverseService::sqlite(conn).get(user.id, universe_id))
        .await?;
    response::ok("universe", &universe)
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    JsonBody(input): JsonBody<UniverseInput>,
) -> ApiResult<JsonResponse> {
    let universe = state
        .run(move |conn| UniverseService::sqlite(conn).rename(user.id, universe_id, &input.name))
        .await?;
    response::ok("universe", &universe)
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
) -> ApiResult<StatusCode> {
    state
        .run(move |conn| UniverseService::sqlite(conn).destroy(user.id, universe_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    JsonBody(input): JsonBody<CollaboratorInput>,
) -> ApiResult<JsonResponse> {
    let universe = state
        .run(move |conn| {
            UniverseService::sqlite(conn).add_collaborator(user.id, universe_id, input.user_id)
        })
        .await?;
    response::created("universe", &universe)
}

pub async fn remove_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath((universe_id, user_id)): IdPath<(UniverseId, UserId)>,
) -> ApiResult<JsonResponse> {
    let universe = state
        .run(move |conn| {
            UniverseService::sqlite(conn).remove_collaborator(user.id, universe_id, user_id)
        })
        .await?;
    response::ok("universe", &universe)
}
