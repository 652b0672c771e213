//! Bearer-token authentication extractor.

use crate::error::ApiError;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use blackbook_core::service::user_service::UserService;
use blackbook_core::User;
use log::debug;

/// The authenticated actor of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            debug!("event=auth module=api status=error reason=missing_token");
            return Err(ApiError::Unauthenticated);
        };

        let user = state
            .run(move |conn| UserService::sqlite(conn).authenticate(&token))
            .await?;
        match user {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("event=auth module=api status=error reason=unknown_token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
