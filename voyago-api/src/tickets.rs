use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use voyago_domain::Ticket;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", get(list_tickets))
        .route("/v1/tickets/{ticket_id}", get(get_ticket))
}

/// Tickets that have not yet departed and advertise available capacity.
async fn list_tickets(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.store.list_available_tickets(Utc::now()).await)
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state
        .store
        .get_ticket(ticket_id)
        .await
        .map_err(AppError::from_domain)?;
    Ok(Json(ticket))
}
