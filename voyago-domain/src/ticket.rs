use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Train,
    Flight,
}

/// A bookable transportation slot. Immutable inventory.
///
/// `capacity` is advertised (and hides the ticket from listings when zero)
/// but is deliberately not enforced at booking time; see the engine tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub number: String,
    pub vehicle_type: String,
    pub origin: String,
    pub destination: String,
    pub ticket_type: TicketType,
    pub departure_datetime: DateTime<Utc>,
    pub arrival_datetime: DateTime<Utc>,
    pub capacity: i32,
    pub price: Decimal,
    pub unique_code: Uuid,
}

impl Ticket {
    /// Listed to customers: has not departed and advertises seats.
    pub fn is_listed(&self, now: DateTime<Utc>) -> bool {
        self.departure_datetime > now && self.capacity > 0
    }
}

/// A seat on a ticket, held by a user.
///
/// Seat numbers are sequential per ticket (prior booking count + 1) and
/// are never reused after cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketBooking {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub seat_number: i32,
    pub booking_code: Uuid,
    pub is_cancelled: bool,
    pub refund_amount: Decimal,
}

impl TicketBooking {
    pub fn new(ticket_id: Uuid, user_id: Uuid, seat_number: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            user_id,
            seat_number,
            booking_code: Uuid::new_v4(),
            is_cancelled: false,
            refund_amount: Decimal::ZERO,
        }
    }

    /// Mark cancelled and settle the refund, exactly once.
    ///
    /// Returns the refund owed to the owner's account, or `None` when the
    /// booking was already cancelled (re-cancellation is a no-op).
    pub fn cancel(&mut self, ticket_price: Decimal) -> Option<Decimal> {
        if self.is_cancelled {
            return None;
        }
        self.is_cancelled = true;
        self.refund_amount = money::refund_for(ticket_price);
        Some(self.refund_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn ticket(departure_in: Duration, capacity: i32) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            number: "TR-104".to_string(),
            vehicle_type: "InterCity 225".to_string(),
            origin: "London".to_string(),
            destination: "Edinburgh".to_string(),
            ticket_type: TicketType::Train,
            departure_datetime: now + departure_in,
            arrival_datetime: now + departure_in + Duration::hours(5),
            capacity,
            price: dec!(80.00),
            unique_code: Uuid::new_v4(),
        }
    }

    #[test]
    fn listing_hides_departed_and_zero_capacity() {
        let now = Utc::now();
        assert!(ticket(Duration::hours(2), 10).is_listed(now));
        assert!(!ticket(Duration::hours(-2), 10).is_listed(now));
        assert!(!ticket(Duration::hours(2), 0).is_listed(now));
    }

    #[test]
    fn cancel_settles_refund_once() {
        let mut booking = TicketBooking::new(Uuid::new_v4(), Uuid::new_v4(), 1);
        assert_eq!(booking.cancel(dec!(80.00)), Some(dec!(64.00)));
        assert!(booking.is_cancelled);
        assert_eq!(booking.refund_amount, dec!(64.00));

        // Second cancel is a no-op, even with a different price
        assert_eq!(booking.cancel(dec!(120.00)), None);
        assert_eq!(booking.refund_amount, dec!(64.00));
    }
}
