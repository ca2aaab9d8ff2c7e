use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use voyago_domain::{DomainError, TourBooking};
use voyago_store::MemoryStore;

use crate::Actor;

/// Creates and cancels tour bookings.
///
/// Capacity is counted and the row inserted under a single write guard,
/// so a full tour cannot be overbooked by interleaved requests.
pub struct TourBookingEngine {
    store: Arc<MemoryStore>,
}

impl TourBookingEngine {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Book a place on `tour_id` for the traveler belonging to `user_id`.
    ///
    /// Fails with `TourFull` once active bookings reach the tour's
    /// capacity. Nothing is charged: the tour price only feeds the refund
    /// on cancellation.
    pub async fn book(&self, tour_id: Uuid, user_id: Uuid) -> Result<TourBooking, DomainError> {
        let mut tables = self.store.write().await;

        let capacity = tables.tour(tour_id)?.capacity;
        let traveler_id = tables.traveler_for_user(user_id)?.id;

        if tables.active_booking_count_for_tour(tour_id) >= capacity {
            return Err(DomainError::TourFull(tour_id));
        }

        let booking = TourBooking::new(tour_id, traveler_id);
        tables.tour_bookings.insert(booking.id, booking.clone());

        info!(booking_id = %booking.id, tour_id = %tour_id, "tour booked");
        Ok(booking)
    }

    /// Cancel a tour booking, crediting 80% of the tour price to the
    /// traveler's user account.
    ///
    /// Only the booking's traveler or an admin may cancel; re-cancellation
    /// is a no-op returning the settled booking.
    pub async fn cancel(&self, booking_id: Uuid, actor: Actor) -> Result<TourBooking, DomainError> {
        let mut tables = self.store.write().await;

        let booking = tables.tour_booking(booking_id)?;
        let traveler_user_id = tables.traveler(booking.traveler_id)?.user_id;
        if traveler_user_id != actor.user_id && !actor.is_admin {
            return Err(DomainError::Forbidden("cancel this tour booking"));
        }

        let price = tables.tour(booking.tour_id)?.price;

        let booking = tables.tour_booking_mut(booking_id)?;
        let Some(refund) = booking.cancel(price) else {
            return Ok(booking.clone());
        };
        let booking = booking.clone();

        tables
            .account_for_user_mut(traveler_user_id)?
            .credit(refund);

        info!(booking_id = %booking_id, %refund, "tour booking cancelled");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use voyago_domain::Tour;

    async fn seed_user(store: &MemoryStore, name: &str) -> Uuid {
        store
            .register_user(name, None, "hash".to_string(), false)
            .await
            .unwrap()
            .id
    }

    async fn seed_tour(store: &MemoryStore, capacity: i32, price: Decimal) -> Uuid {
        store
            .insert_tour(Tour {
                id: Uuid::new_v4(),
                travel_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                return_date: NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(),
                accommodation_details: "Hotel Mira, half board".to_string(),
                capacity,
                price,
            })
            .await
            .id
    }

    #[tokio::test]
    async fn booking_a_tour_charges_nothing() {
        // The tour price is advertised but never collected at booking
        // time; only the refund path touches the ledger.
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let user = seed_user(&store, "alice").await;
        let tour = seed_tour(&store, 5, dec!(250.00)).await;

        let booking = engine.book(tour, user).await.unwrap();
        assert!(!booking.is_cancelled);
        assert_eq!(booking.refund_amount, None);

        let account = store.account_for_user(user).await.unwrap();
        assert_eq!(account.credit, dec!(100.00));
    }

    #[tokio::test]
    async fn capacity_is_enforced_at_the_boundary() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let tour = seed_tour(&store, 2, dec!(250.00)).await;

        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;
        let carol = seed_user(&store, "carol").await;

        engine.book(tour, alice).await.unwrap();
        engine.book(tour, bob).await.unwrap();

        let err = engine.book(tour, carol).await.unwrap_err();
        assert!(matches!(err, DomainError::TourFull(id) if id == tour));
    }

    #[tokio::test]
    async fn cancellation_frees_a_slot() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let tour = seed_tour(&store, 1, dec!(250.00)).await;

        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;

        let booking = engine.book(tour, alice).await.unwrap();
        assert!(engine.book(tour, bob).await.is_err());

        engine
            .cancel(
                booking.id,
                Actor {
                    user_id: alice,
                    is_admin: false,
                },
            )
            .await
            .unwrap();

        engine.book(tour, bob).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_refunds_eighty_percent_of_tour_price() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let user = seed_user(&store, "alice").await;
        let tour = seed_tour(&store, 5, dec!(250.00)).await;

        let booking = engine.book(tour, user).await.unwrap();
        let cancelled = engine
            .cancel(
                booking.id,
                Actor {
                    user_id: user,
                    is_admin: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(cancelled.refund_amount, Some(dec!(200.00)));
        // Refunded without ever having been charged
        let account = store.account_for_user(user).await.unwrap();
        assert_eq!(account.credit, dec!(300.00));
    }

    #[tokio::test]
    async fn cancel_twice_is_a_noop_after_the_first() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let user = seed_user(&store, "alice").await;
        let tour = seed_tour(&store, 5, dec!(250.00)).await;
        let actor = Actor {
            user_id: user,
            is_admin: false,
        };

        let booking = engine.book(tour, user).await.unwrap();
        let first = engine.cancel(booking.id, actor).await.unwrap();
        let second = engine.cancel(booking.id, actor).await.unwrap();

        assert_eq!(first.refund_amount, second.refund_amount);
        let account = store.account_for_user(user).await.unwrap();
        assert_eq!(account.credit, dec!(300.00));
    }

    #[tokio::test]
    async fn cancel_by_another_traveler_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let alice = seed_user(&store, "alice").await;
        let mallory = seed_user(&store, "mallory").await;
        let tour = seed_tour(&store, 5, dec!(250.00)).await;

        let booking = engine.book(tour, alice).await.unwrap();
        let err = engine
            .cancel(
                booking.id,
                Actor {
                    user_id: mallory,
                    is_admin: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let stored = store.get_tour_booking(booking.id).await.unwrap();
        assert!(!stored.is_cancelled);
    }

    #[tokio::test]
    async fn admin_may_cancel_refunding_the_traveler() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let alice = seed_user(&store, "alice").await;
        let admin = store
            .register_user("ops", None, "hash".to_string(), true)
            .await
            .unwrap();
        let tour = seed_tour(&store, 5, dec!(100.00)).await;

        let booking = engine.book(tour, alice).await.unwrap();
        engine
            .cancel(
                booking.id,
                Actor {
                    user_id: admin.id,
                    is_admin: true,
                },
            )
            .await
            .unwrap();

        let account = store.account_for_user(alice).await.unwrap();
        assert_eq!(account.credit, dec!(180.00));
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_count_against_capacity() {
        let store = Arc::new(MemoryStore::new());
        let engine = TourBookingEngine::new(store.clone());
        let tour = seed_tour(&store, 2, dec!(50.00)).await;

        let alice = seed_user(&store, "alice").await;
        let booking = engine.book(tour, alice).await.unwrap();
        engine
            .cancel(
                booking.id,
                Actor {
                    user_id: alice,
                    is_admin: false,
                },
            )
            .await
            .unwrap();

        // Two fresh travelers still fit
        let bob = seed_user(&store, "bob").await;
        let carol = seed_user(&store, "carol").await;
        engine.book(tour, bob).await.unwrap();
        engine.book(tour, carol).await.unwrap();
    }
}
