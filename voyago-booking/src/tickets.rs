use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use voyago_domain::{DomainError, TicketBooking};
use voyago_store::MemoryStore;

use crate::Actor;

/// Creates and cancels ticket bookings against the credit ledger.
///
/// Each operation takes the store's write guard once, so the debit and the
/// booking row commit together or not at all.
pub struct BookingEngine {
    store: Arc<MemoryStore>,
}

impl BookingEngine {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Book a seat on `ticket_id` for `user_id`.
    ///
    /// Debits the ticket price from the user's account and assigns
    /// seat_number = prior booking count + 1. There is no duplicate
    /// prevention and no capacity check: seat numbers keep climbing past
    /// `ticket.capacity` (tickets advertise capacity but never enforce it).
    pub async fn book(&self, ticket_id: Uuid, user_id: Uuid) -> Result<TicketBooking, DomainError> {
        let mut tables = self.store.write().await;

        let price = tables.ticket(ticket_id)?.price;
        let seat_number = tables.booking_count_for_ticket(ticket_id) + 1;

        // Fails here on insufficient credit, before any row is written
        tables.account_for_user_mut(user_id)?.debit(price)?;

        let booking = TicketBooking::new(ticket_id, user_id, seat_number);
        tables.ticket_bookings.insert(booking.id, booking.clone());

        info!(
            booking_id = %booking.id,
            ticket_id = %ticket_id,
            seat_number,
            %price,
            "ticket booked"
        );
        Ok(booking)
    }

    /// Cancel a booking, crediting 80% of the ticket price back to the
    /// booking owner's account.
    ///
    /// Only the owner or an admin may cancel. Cancelling an already
    /// cancelled booking is a no-op that returns the settled booking.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        actor: Actor,
    ) -> Result<TicketBooking, DomainError> {
        let mut tables = self.store.write().await;

        let booking = tables.ticket_booking(booking_id)?;
        if booking.user_id != actor.user_id && !actor.is_admin {
            return Err(DomainError::Forbidden("cancel this booking"));
        }

        let owner_id = booking.user_id;
        let price = tables.ticket(booking.ticket_id)?.price;

        let booking = tables.ticket_booking_mut(booking_id)?;
        let Some(refund) = booking.cancel(price) else {
            // Already cancelled: same refund_amount, no further credit
            return Ok(booking.clone());
        };
        let booking = booking.clone();

        tables.account_for_user_mut(owner_id)?.credit(refund);

        info!(booking_id = %booking_id, %refund, "ticket booking cancelled");
        Ok(booking)
    }
}
