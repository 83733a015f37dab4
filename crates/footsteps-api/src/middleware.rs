use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Guards analytics with a static bearer token when one is configured.
pub async fn require_analytics_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.analytics_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let presented = req.headers().typed_get::<Authorization<Bearer>>();
    match presented {
        Some(auth) if token_matches(auth.token(), expected) => Ok(next.run(req).await),
        _ => {
            warn!("Rejected analytics request without a valid token");
            Err(ApiError::Unauthorized)
        }
    }
}

fn token_matches(presented: &str, expected: &str) -> bool {
    bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}
