use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use tracing::info;

use footsteps_types::api::{ApiResponse, WaitlistEmailRequest, WaitlistRequest};
use footsteps_types::models::WaitlistRow;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation;

/// POST /api/waitlist: full three-step submission.
pub async fn join_waitlist(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<WaitlistRequest>, ApiError>,
) -> Result<Json<ApiResponse<Vec<WaitlistRow>>>, ApiError> {
    let signup = validation::waitlist_signup(req)?;
    let features = signup.suggested_feature.as_ref().map_or(0, Vec::len);

    let rows = state
        .store
        .insert_waitlist(signup)
        .await
        .map_err(|e| ApiError::internal("Failed to join waitlist. Please try again.", e))?;

    info!("Waitlist signup stored ({} features selected)", features);
    Ok(Json(ApiResponse::ok("Successfully joined the waitlist!", rows)))
}

/// POST /api/waitlist/email: email-only fast path from the first wizard step.
pub async fn capture_email(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<WaitlistEmailRequest>, ApiError>,
) -> Result<Json<ApiResponse<Vec<WaitlistRow>>>, ApiError> {
    let signup = validation::waitlist_email(req)?;

    let rows = state
        .store
        .insert_waitlist(signup)
        .await
        .map_err(|e| ApiError::internal("Failed to save email. Please try again.", e))?;

    info!("Waitlist email captured");
    Ok(Json(ApiResponse::ok("Email captured successfully", rows)))
}
