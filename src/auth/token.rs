use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use subtle::ConstantTimeEq;

use crate::{errors::AppError, state::AppState};

// --- Extractor for routes reserved to operators and the gateway bridge ---
// Holding one in a handler's arguments means the caller presented the
// configured API token.
pub struct ApiAuthorized;

impl<S> FromRequestParts<S> for ApiAuthorized
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // No token configured: the routes stay locked.
        let Some(expected) = app_state.api_token.as_deref() else {
            return Err(AppError::InvalidToken);
        };

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::InvalidToken)?;

        if !token_matches(bearer.token(), expected) {
            tracing::warn!("Rejected request with a wrong API token");
            return Err(AppError::InvalidToken);
        }

        Ok(ApiAuthorized)
    }
}

fn token_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
