//! Extractors whose rejections use the `{"errors": [...]}` body.

use crate::error::ApiError;
use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use blackbook_core::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `axum::extract::Path` whose rejection is an `ApiError::InvalidPath`.
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| ApiError::InvalidPath(rejection.body_text()))
    }
}

/// `axum::Json` whose rejection is an `ApiError::MalformedBody`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
    }
}

/// Validated `?page=&per_page=` window.
///
/// Bad values map to `InvalidPaginationParameter`; a query string that does
/// not deserialize at all (such as a repeated key) is an `ApiError::InvalidQuery`.
pub struct PageQuery(pub Page);

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<String>,
    per_page: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
        let page = Page::parse(params.page.as_deref(), params.per_page.as_deref())?;
        Ok(Self(page))
    }
}
