use axum::{Json, extract::State, http::HeaderMap};
use axum_extra::extract::WithRejection;
use tracing::info;

use footsteps_mail::Ticket;
use footsteps_types::api::{EmailStatus, SupportRequest, SupportResponse};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{self, RequestMeta};

/// POST /api/support: store the ticket, then notify by email on a best-effort basis.
pub async fn submit_support(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<Option<SupportRequest>>, ApiError>,
) -> Result<Json<SupportResponse>, ApiError> {
    // A `null` body is checked like an empty form.
    let req = req.unwrap_or_default();
    let message = validation::support_message(req, RequestMeta::from_headers(&headers))?;

    let rows = state
        .store
        .insert_support_message(message.clone())
        .await
        .map_err(|e| ApiError::internal_opaque("Failed to submit support message.", e))?;

    info!("Support message stored (category {})", message.category);

    let email_delivery = match &state.notifier {
        Some(notifier) => Some(notifier.notify_support(&Ticket::new(&message, rows.first())).await),
        None => None,
    };

    Ok(Json(SupportResponse {
        success: true,
        message: "Thanks! Your message was sent.".to_string(),
        data: rows,
        email_status: EmailStatus::from(email_delivery),
        email_delivery,
    }))
}
