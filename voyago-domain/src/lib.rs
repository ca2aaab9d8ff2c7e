pub mod account;
pub mod error;
pub mod money;
pub mod ticket;
pub mod tour;

pub use account::{Account, User};
pub use error::DomainError;
pub use ticket::{Ticket, TicketBooking, TicketType};
pub use tour::{Tour, TourBooking, Traveler};
