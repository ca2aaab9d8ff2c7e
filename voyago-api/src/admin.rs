use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use voyago_domain::{Ticket, TicketBooking, TicketType, Tour, TourBooking};

use crate::error::AppError;
use crate::state::AppState;

/// Operator surface. The admin middleware gates every route here.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/tickets", post(create_ticket))
        .route("/v1/admin/tickets/{ticket_id}", delete(delete_ticket))
        .route("/v1/admin/tours", post(create_tour))
        .route("/v1/admin/tours/{tour_id}", delete(delete_tour))
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/tour-bookings", get(list_tour_bookings))
}

#[derive(Debug, Deserialize)]
struct CreateTicketRequest {
    number: String,
    vehicle_type: String,
    origin: String,
    destination: String,
    ticket_type: TicketType,
    departure_datetime: DateTime<Utc>,
    arrival_datetime: DateTime<Utc>,
    capacity: i32,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct CreateTourRequest {
    travel_date: NaiveDate,
    return_date: NaiveDate,
    accommodation_details: String,
    capacity: i32,
    price: Decimal,
}

async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    if req.capacity < 0 || req.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "capacity and price must be non-negative".to_string(),
        ));
    }

    let ticket = state
        .store
        .insert_ticket(Ticket {
            id: Uuid::new_v4(),
            number: req.number,
            vehicle_type: req.vehicle_type,
            origin: req.origin,
            destination: req.destination,
            ticket_type: req.ticket_type,
            departure_datetime: req.departure_datetime,
            arrival_datetime: req.arrival_datetime,
            capacity: req.capacity,
            price: req.price,
            unique_code: Uuid::new_v4(),
        })
        .await;

    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete_ticket(ticket_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_tour(
    State(state): State<AppState>,
    Json(req): Json<CreateTourRequest>,
) -> Result<(StatusCode, Json<Tour>), AppError> {
    if req.capacity < 0 || req.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "capacity and price must be non-negative".to_string(),
        ));
    }
    if req.return_date < req.travel_date {
        return Err(AppError::ValidationError(
            "return date precedes travel date".to_string(),
        ));
    }

    let tour = state
        .store
        .insert_tour(Tour {
            id: Uuid::new_v4(),
            travel_date: req.travel_date,
            return_date: req.return_date,
            accommodation_details: req.accommodation_details,
            capacity: req.capacity,
            price: req.price,
        })
        .await;

    Ok((StatusCode::CREATED, Json(tour)))
}

async fn delete_tour(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete_tour(tour_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_bookings(State(state): State<AppState>) -> Json<Vec<TicketBooking>> {
    Json(state.store.list_ticket_bookings().await)
}

async fn list_tour_bookings(State(state): State<AppState>) -> Json<Vec<TourBooking>> {
    Json(state.store.list_tour_bookings().await)
}
