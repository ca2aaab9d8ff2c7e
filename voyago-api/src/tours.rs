use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use voyago_booking::Actor;
use voyago_domain::{Tour, TourBooking};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Public catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tours", get(list_tours))
        .route("/v1/tours/{tour_id}", get(tour_detail))
}

/// Routes requiring an authenticated traveler.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tours/{tour_id}/bookings", post(book_tour))
        .route(
            "/v1/tour-bookings/{booking_id}/cancel",
            post(cancel_tour_booking),
        )
}

async fn list_tours(State(state): State<AppState>) -> Json<Vec<Tour>> {
    Json(state.store.list_tours().await)
}

async fn tour_detail(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<Tour>, AppError> {
    let tour = state
        .store
        .get_tour(tour_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok(Json(tour))
}

/// Book a tour place. Capacity-gated; nothing is charged.
async fn book_tour(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(tour_id): Path<Uuid>,
) -> Result<(StatusCode, Json<TourBooking>), AppError> {
    let booking = state
        .tours
        .book(tour_id, auth.user_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn cancel_tour_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<TourBooking>, AppError> {
    let booking = state
        .tours
        .cancel(
            booking_id,
            Actor {
                user_id: auth.user_id,
                is_admin: auth.is_admin,
            },
        )
        .await
        .map_err(AppError::from_domain)?;
    Ok(Json(booking))
}
