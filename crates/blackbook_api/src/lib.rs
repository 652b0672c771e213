//! HTTP boundary for BlackBook.
//!
//! # Responsibility
//! - Authenticate requests and hand the actor to core services.
//! - Translate results into JSON envelopes and failures into status codes.
//!
//! # Invariants
//! - Every `/api` route requires a bearer token.
//! - `ApiError::into_response` is the only place failures become HTTP.

pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::{Extension, Router};
use blackbook_core::ResourceKind;

pub use error::{ApiError, ApiResult, UNAUTHENTICATED_MESSAGE};
pub use state::AppState;

/// Builds the full application router over `state`.
pub fn router(state: AppState) -> Router {
    let named = ResourceKind::NAMED
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(named_routes(kind)));

    Router::new()
        .route("/api/me", get(routes::users::me))
        .route(
            "/api/universes",
            get(routes::universes::index).post(routes::universes::create),
        )
        .route(
            "/api/universes/:universe_id",
            get(routes::universes::show)
                .put(routes::universes::update)
                .delete(routes::universes::destroy),
        )
        .route(
            "/api/universes/:universe_id/collaborators",
            post(routes::universes::add_collaborator),
        )
        .route(
            "/api/universes/:universe_id/collaborators/:user_id",
            delete(routes::universes::remove_collaborator),
        )
        .route(
            "/api/universes/:universe_id/images",
            get(routes::images::index).post(routes::images::create),
        )
        .route(
            "/api/images/:image_id",
            get(routes::images::show)
                .put(routes::images::update)
                .delete(routes::images::destroy),
        )
        .route(
            "/api/images/:image_id/tags",
            get(routes::images::tags).post(routes::images::tag),
        )
        .route(
            "/api/images/:image_id/tags/:tag_id",
            delete(routes::images::untag),
        )
        .route(
            "/api/universes/:universe_id/relationships",
            get(routes::relationships::index).post(routes::relationships::create),
        )
        .route(
            "/api/relationships/:id",
            get(routes::relationships::show)
                .put(routes::relationships::update)
                .delete(routes::relationships::destroy),
        )
        .route(
            "/api/characters/:id/relationships",
            get(routes::relationships::for_character),
        )
        .route(
            "/api/characters/:id/relationships/:relationship_id",
            get(routes::relationships::show_for_character),
        )
        .merge(named)
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(state)
}

/// Nested and shallow routes of one named kind, tagged with the kind.
fn named_routes(kind: ResourceKind) -> Router<AppState> {
    let plural = kind.json_plural_key();
    Router::new()
        .route(
            &format!("/api/universes/:universe_id/{plural}"),
            get(routes::named::index).post(routes::named::create),
        )
        .route(
            &format!("/api/universes/:universe_id/{plural}/:id"),
            get(routes::named::show_in_universe)
                .put(routes::named::update_in_universe)
                .delete(routes::named::destroy_in_universe),
        )
        .route(
            &format!("/api/{plural}/:id"),
            get(routes::named::show)
                .put(routes::named::update)
                .delete(routes::named::destroy),
        )
        .layer(Extension(kind))
}
