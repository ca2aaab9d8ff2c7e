use std::sync::Arc;

use voyago_booking::{BookingEngine, TourBookingEngine};
use voyago_store::MemoryStore;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub bookings: Arc<BookingEngine>,
    pub tours: Arc<TourBookingEngine>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, auth: AuthConfig) -> Self {
        Self {
            bookings: Arc::new(BookingEngine::new(store.clone())),
            tours: Arc::new(TourBookingEngine::new(store.clone())),
            store,
            auth,
        }
    }
}
