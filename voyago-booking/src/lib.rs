pub mod tickets;
pub mod tours;

pub use tickets::BookingEngine;
pub use tours::TourBookingEngine;

use uuid::Uuid;

/// The identity performing a booking operation, as resolved by the
/// request boundary. Admins may cancel any booking.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_admin: bool,
}
