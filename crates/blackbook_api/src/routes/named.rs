//! Handlers shared by characters, locations, items and traits.
//!
//! The kind arrives as a request extension set on each kind's sub-router.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, PageQuery};
use crate::response::{self, JsonResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use blackbook_core::service::named_service::{
    NamedResourceInput, NamedResourceService, NamedResourceUpdate,
};
use blackbook_core::{ResourceId, ResourceKind, UniverseId, UserId};

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath(universe_id): IdPath<UniverseId>,
    PageQuery(page): PageQuery,
) -> ApiResult<JsonResponse> {
    let resources = state
        .run(move |conn| {
            NamedResourceService::sqlite(conn, kind)?.list(user.id, universe_id, page)
        })
        .await?;
    response::page(kind.json_plural_key(), &resources)
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath(universe_id): IdPath<UniverseId>,
    JsonBody(input): JsonBody<NamedResourceInput>,
) -> ApiResult<JsonResponse> {
    let resource = state
        .run(move |conn| {
            NamedResourceService::sqlite(conn, kind)?.create(user.id, universe_id, &input)
        })
        .await?;
    response::created(kind.json_key(), &resource)
}

pub async fn show_in_universe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath((universe_id, id)): IdPath<(UniverseId, ResourceId)>,
) -> ApiResult<JsonResponse> {
    show_scoped(state, user.id, kind, id, Some(universe_id)).await
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath(id): IdPath<ResourceId>,
) -> ApiResult<JsonResponse> {
    show_scoped(state, user.id, kind, id, None).await
}

pub async fn update_in_universe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath((universe_id, id)): IdPath<(UniverseId, ResourceId)>,
    JsonBody(update): JsonBody<NamedResourceUpdate>,
) -> ApiResult<JsonResponse> {
    update_scoped(state, user.id, kind, id, Some(universe_id), update).await
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath(id): IdPath<ResourceId>,
    JsonBody(update): JsonBody<NamedResourceUpdate>,
) -> ApiResult<JsonResponse> {
    update_scoped(state, user.id, kind, id, None, update).await
}

pub async fn destroy_in_universe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath((universe_id, id)): IdPath<(UniverseId, ResourceId)>,
) -> ApiResult<StatusCode> {
    destroy_scoped(state, user.id, kind, id, Some(universe_id)).await
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Extension(kind): Extension<ResourceKind>,
    IdPath(id): IdPath<ResourceId>,
) -> ApiResult<StatusCode> {
    destroy_scoped(state, user.id, kind, id, None).await
}

async fn show_scoped(
    state: AppState,
    actor: UserId,
    kind: ResourceKind,
    id: ResourceId,
    expected_universe: Option<UniverseId>,
) -> ApiResult<JsonResponse> {
    let resource = state
        .run(move |conn| {
            NamedResourceService::sqlite(conn, kind)?.get(actor, id, expected_universe)
        })
        .await?;
    response::ok(kind.json_key(), &resource)
}

async fn update_scoped(
    state: AppState,
    actor: UserId,
    kind: ResourceKind,
    id: ResourceId,
    expected_universe: Option<UniverseId>,
    update: NamedResourceUpdate,
) -> ApiResult<JsonResponse> {
    let resource = state
        .run(move |conn| {
            NamedResourceService::sqlite(conn, kind)?.update(actor, id, expected_universe, &update)
        })
        .await?;
    response::ok(kind.json_key(), &resource)
}

async fn destroy_scoped(
    state: AppState,
    actor: UserId,
    kind: ResourceKind,
    id: ResourceId,
    expected_universe: Option<UniverseId>,
) -> ApiResult<StatusCode> {
    state
        .run(move |conn| {
            NamedResourceService::sqlite(conn, kind)?.delete(actor, id, expected_universe)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
