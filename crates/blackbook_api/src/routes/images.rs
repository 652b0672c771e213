//! Image and image tag handlers.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, PageQuery};
use crate::response::{self, JsonResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use blackbook_core::service::image_service::{ImageInput, ImageService, ImageUpdate};
use blackbook_core::{ResourceId, UniverseId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TagInput {
    pub character_id: ResourceId,
}

pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    PageQuery(page): PageQuery,
) -> ApiResult<JsonResponse> {
    let images = state
        .run(move |conn| {
            ImageService::sqlite(conn)?.list_images(user.id, universe_id, page)
        })
        .await?;
    response::page("images", &images)
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(universe_id): IdPath<UniverseId>,
    JsonBody(input): JsonBody<ImageInput>,
) -> ApiResult<JsonResponse> {
    let image = state
        .run(move |conn| ImageService::sqlite(conn)?.create_image(user.id, universe_id, &input))
        .await?;
    response::created("image", &image)
}

pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(image_id): IdPath<ResourceId>,
) -> ApiResult<JsonResponse> {
    let image = state
        .run(move |conn| ImageService::sqlite(conn)?.get_image(user.id, image_id, None))
        .await?;
    response::ok("image", &image)
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(image_id): IdPath<ResourceId>,
    JsonBody(update): JsonBody<ImageUpdate>,
) -> ApiResult<JsonResponse> {
    let image = state
        .run(move |conn| {
            ImageService::sqlite(conn)?.update_image(user.id, image_id, None, &update)
        })
        .await?;
    response::ok("image", &image)
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(image_id): IdPath<ResourceId>,
) -> ApiResult<StatusCode> {
    state
        .run(move |conn| ImageService::sqlite(conn)?.delete_image(user.id, image_id, None))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn tags(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(image_id): IdPath<ResourceId>,
) -> ApiResult<JsonResponse> {
    let tags = state
        .run(move |conn| ImageService::sqlite(conn)?.list_tags(user.id, image_id))
        .await?;
    response::list("image_tags", &tags)
}

pub async fn tag(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath(image_id): IdPath<ResourceId>,
    JsonBody(input): JsonBody<TagInput>,
) -> ApiResult<JsonResponse> {
    let tag = state
        .run(move |conn| {
            ImageService::sqlite(conn)?.tag_character(user.id, image_id, input.character_id)
        })
        .await?;
    response::created("image_tag", &tag)
}

pub async fn untag(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    IdPath((image_id, tag_id)): IdPath<(ResourceId, ResourceId)>,
) -> ApiResult<StatusCode> {
    state
        .run(move |conn| ImageService::sqlite(conn)?.untag(user.id, image_id, tag_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
