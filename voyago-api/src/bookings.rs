use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use voyago_booking::Actor;
use voyago_domain::TicketBooking;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets/{ticket_id}/bookings", post(book_ticket))
        .route("/v1/bookings/{booking_id}", get(booking_detail))
        .route("/v1/bookings/{booking_id}/cancel", post(cancel_booking))
}

fn actor(auth: AuthUser) -> Actor {
    Actor {
        user_id: auth.user_id,
        is_admin: auth.is_admin,
    }
}

/// Book a seat, debiting the ticket price from the caller's account.
async fn book_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(ticket_id): Path<Uuid>,
) -> Result<(StatusCode, Json<TicketBooking>), AppError> {
    let booking = state
        .bookings
        .book(ticket_id, auth.user_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn booking_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<TicketBooking>, AppError> {
    let booking = state
        .store
        .get_ticket_booking(booking_id)
        .await
        .map_err(AppError::from_domain)?;

    if booking.user_id != auth.user_id && !auth.is_admin {
        return Err(AppError::AuthorizationError(
            "not allowed to view this booking".to_string(),
        ));
    }
    Ok(Json(booking))
}

/// Cancel a booking for an 80% refund. Owner or admin only; cancelling an
/// already cancelled booking succeeds without further effect.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<TicketBooking>, AppError> {
    let booking = state
        .bookings
        .cancel(booking_id, actor(auth))
        .await
        .map_err(AppError::from_domain)?;
    Ok(Json(booking))
}
