use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::response::{self, JsonResponse};

/// `GET /api/me`
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<JsonResponse> {
    response::ok("user", &user)
}
