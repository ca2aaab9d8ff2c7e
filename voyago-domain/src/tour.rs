use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money;

/// A multi-day tour package. Immutable inventory.
///
/// Unlike tickets, `capacity` is enforced: booking is refused once active
/// bookings reach it. `price` is advertised but nothing is charged at
/// booking time; it only feeds the refund on cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: Uuid,
    pub travel_date: NaiveDate,
    pub return_date: NaiveDate,
    pub accommodation_details: String,
    pub capacity: i32,
    pub price: Decimal,
}

/// Identity required to book tours, distinct from the general account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traveler {
    pub id: Uuid,
    pub user_id: Uuid,
    pub additional_info: Option<String>,
}

impl Traveler {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            additional_info: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourBooking {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub traveler_id: Uuid,
    pub is_cancelled: bool,
    pub refund_amount: Option<Decimal>,
}

impl TourBooking {
    pub fn new(tour_id: Uuid, traveler_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            tour_id,
            traveler_id,
            is_cancelled: false,
            refund_amount: None,
        }
    }

    /// Mark cancelled and settle the refund, exactly once.
    pub fn cancel(&mut self, tour_price: Decimal) -> Option<Decimal> {
        if self.is_cancelled {
            return None;
        }
        self.is_cancelled = true;
        let refund = money::refund_for(tour_price);
        self.refund_amount = Some(refund);
        Some(refund)
    }
}
