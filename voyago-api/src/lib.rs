use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod state;
pub mod tickets;
pub mod tours;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Customer routes behind the auth middleware
    let authed = Router::new()
        .merge(bookings::routes())
        .merge(tours::booking_routes())
        .merge(profile::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Operator routes behind the admin middleware
    let admin = admin::routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth::require_admin,
    ));

    Router::new()
        .merge(auth::routes())
        .merge(tickets::routes())
        .merge(tours::routes())
        .merge(authed)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
