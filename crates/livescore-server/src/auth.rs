//! Admin authorization.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::AppState;

/// Request header carrying the shared admin secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extractor that admits a request only when its admin token matches.
///
/// Mutating handlers take this as an argument; extraction rejects the
/// request with `401 Unauthorized` when the header is absent or wrong,
/// before the body is ever read.
pub struct RequireAdmin;

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if state.gate.authorize(token) {
            Ok(RequireAdmin)
        } else {
            tracing::debug!("Rejected request with missing or invalid admin token");
            Err(ApiError::Unauthorized)
        }
    }
}
