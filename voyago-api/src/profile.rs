use axum::{extract::State, routing::get, Extension, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use voyago_domain::{TicketBooking, TourBooking};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/me", get(view_profile))
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    user_id: Uuid,
    username: String,
    email: Option<String>,
    credit: Decimal,
    ticket_bookings: Vec<TicketBooking>,
    tour_bookings: Vec<TourBooking>,
}

/// The caller's account balance and booking history.
async fn view_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .store
        .get_user(auth.user_id)
        .await
        .map_err(AppError::from_domain)?;
    let account = state
        .store
        .account_for_user(auth.user_id)
        .await
        .map_err(AppError::from_domain)?;
    let ticket_bookings = state.store.ticket_bookings_for_user(auth.user_id).await;

    // Tour bookings hang off the traveler identity, not the user row
    let tour_bookings = match state.store.traveler_for_user(auth.user_id).await {
        Ok(traveler) => state.store.tour_bookings_for_traveler(traveler.id).await,
        Err(_) => Vec::new(),
    };

    Ok(Json(ProfileResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        credit: account.credit,
        ticket_bookings,
        tour_bookings,
    }))
}
