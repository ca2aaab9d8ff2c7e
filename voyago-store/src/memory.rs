use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;
use uuid::Uuid;

use voyago_domain::{
    Account, DomainError, Ticket, TicketBooking, Tour, TourBooking, Traveler, User,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
}

/// The persisted tables. All entity lookups that the original schema did
/// through relationship traversal are explicit methods here, each failing
/// with `NotFound` when the row is absent.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: HashMap<Uuid, User>,
    pub accounts: HashMap<Uuid, Account>,
    pub travelers: HashMap<Uuid, Traveler>,
    pub tickets: HashMap<Uuid, Ticket>,
    pub tours: HashMap<Uuid, Tour>,
    pub ticket_bookings: HashMap<Uuid, TicketBooking>,
    pub tour_bookings: HashMap<Uuid, TourBooking>,
}

impl Tables {
    pub fn user(&self, id: Uuid) -> Result<&User, DomainError> {
        self.users
            .get(&id)
            .ok_or(DomainError::not_found("user", id))
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn ticket(&self, id: Uuid) -> Result<&Ticket, DomainError> {
        self.tickets
            .get(&id)
            .ok_or(DomainError::not_found("ticket", id))
    }

    pub fn tour(&self, id: Uuid) -> Result<&Tour, DomainError> {
        self.tours
            .get(&id)
            .ok_or(DomainError::not_found("tour", id))
    }

    pub fn ticket_booking(&self, id: Uuid) -> Result<&TicketBooking, DomainError> {
        self.ticket_bookings
            .get(&id)
            .ok_or(DomainError::not_found("booking", id))
    }

    pub fn ticket_booking_mut(&mut self, id: Uuid) -> Result<&mut TicketBooking, DomainError> {
        self.ticket_bookings
            .get_mut(&id)
            .ok_or(DomainError::not_found("booking", id))
    }

    pub fn tour_booking(&self, id: Uuid) -> Result<&TourBooking, DomainError> {
        self.tour_bookings
            .get(&id)
            .ok_or(DomainError::not_found("tour booking", id))
    }

    pub fn tour_booking_mut(&mut self, id: Uuid) -> Result<&mut TourBooking, DomainError> {
        self.tour_bookings
            .get_mut(&id)
            .ok_or(DomainError::not_found("tour booking", id))
    }

    /// Explicit replacement for `user.profile`.
    pub fn account_for_user(&self, user_id: Uuid) -> Result<&Account, DomainError> {
        self.accounts
            .values()
            .find(|a| a.user_id == user_id)
            .ok_or(DomainError::MissingIdentity {
                entity: "account",
                user_id,
            })
    }

    pub fn account_for_user_mut(&mut self, user_id: Uuid) -> Result<&mut Account, DomainError> {
        self.accounts
            .values_mut()
            .find(|a| a.user_id == user_id)
            .ok_or(DomainError::MissingIdentity {
                entity: "account",
                user_id,
            })
    }

    /// Explicit replacement for `user.traveler`.
    pub fn traveler_for_user(&self, user_id: Uuid) -> Result<&Traveler, DomainError> {
        self.travelers
            .values()
            .find(|t| t.user_id == user_id)
            .ok_or(DomainError::MissingIdentity {
                entity: "traveler",
                user_id,
            })
    }

    pub fn traveler(&self, id: Uuid) -> Result<&Traveler, DomainError> {
        self.travelers
            .get(&id)
            .ok_or(DomainError::not_found("traveler", id))
    }

    /// All bookings ever made against a ticket, cancelled ones included.
    /// Seat numbering is sequential over this count.
    pub fn booking_count_for_ticket(&self, ticket_id: Uuid) -> i32 {
        self.ticket_bookings
            .values()
            .filter(|b| b.ticket_id == ticket_id)
            .count() as i32
    }

    /// Non-cancelled bookings against a tour; compared with capacity.
    pub fn active_booking_count_for_tour(&self, tour_id: Uuid) -> i32 {
        self.tour_bookings
            .values()
            .filter(|b| b.tour_id == tour_id && !b.is_cancelled)
            .count() as i32
    }
}

/// The system of record. One write guard spans each booking/cancellation
/// operation, so ledger mutation, counting, and row insertion commit
/// atomically and capacity checks are serialized with insertion.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }

    /// Register a user: the User row, its Account (signup credit) and its
    /// Traveler identity are created in one transaction.
    pub async fn register_user(
        &self,
        username: &str,
        email: Option<String>,
        password_hash: String,
        is_admin: bool,
    ) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.user_by_username(username).is_some() {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email,
            password_hash,
            is_admin,
        };
        let account = Account::open(user.id);
        let traveler = Traveler::new(user.id);

        tables.users.insert(user.id, user.clone());
        tables.accounts.insert(account.id, account);
        tables.travelers.insert(traveler.id, traveler);

        info!(username, is_admin, "registered user");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.read().await.user(id).cloned()
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.read().await.user_by_username(username).cloned()
    }

    pub async fn account_for_user(&self, user_id: Uuid) -> Result<Account, DomainError> {
        self.read().await.account_for_user(user_id).cloned()
    }

    pub async fn traveler_for_user(&self, user_id: Uuid) -> Result<Traveler, DomainError> {
        self.read().await.traveler_for_user(user_id).cloned()
    }

    /// Tickets shown to customers: not yet departed, capacity advertised.
    pub async fn list_available_tickets(&self, now: DateTime<Utc>) -> Vec<Ticket> {
        let tables = self.read().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .values()
            .filter(|t| t.is_listed(now))
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.departure_datetime);
        tickets
    }

    pub async fn get_ticket(&self, id: Uuid) -> Result<Ticket, DomainError> {
        self.read().await.ticket(id).cloned()
    }

    pub async fn list_tours(&self) -> Vec<Tour> {
        let tables = self.read().await;
        let mut tours: Vec<Tour> = tables.tours.values().cloned().collect();
        tours.sort_by_key(|t| t.travel_date);
        tours
    }

    pub async fn get_tour(&self, id: Uuid) -> Result<Tour, DomainError> {
        self.read().await.tour(id).cloned()
    }

    pub async fn get_ticket_booking(&self, id: Uuid) -> Result<TicketBooking, DomainError> {
        self.read().await.ticket_booking(id).cloned()
    }

    pub async fn get_tour_booking(&self, id: Uuid) -> Result<TourBooking, DomainError> {
        self.read().await.tour_booking(id).cloned()
    }

    pub async fn ticket_bookings_for_user(&self, user_id: Uuid) -> Vec<TicketBooking> {
        self.read()
            .await
            .ticket_bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn tour_bookings_for_traveler(&self, traveler_id: Uuid) -> Vec<TourBooking> {
        self.read()
            .await
            .tour_bookings
            .values()
            .filter(|b| b.traveler_id == traveler_id)
            .cloned()
            .collect()
    }

    pub async fn list_ticket_bookings(&self) -> Vec<TicketBooking> {
        self.read().await.ticket_bookings.values().cloned().collect()
    }

    pub async fn list_tour_bookings(&self) -> Vec<TourBooking> {
        self.read().await.tour_bookings.values().cloned().collect()
    }

    pub async fn insert_ticket(&self, ticket: Ticket) -> Ticket {
        let mut tables = self.write().await;
        tables.tickets.insert(ticket.id, ticket.clone());
        info!(ticket_id = %ticket.id, number = %ticket.number, "ticket created");
        ticket
    }

    pub async fn delete_ticket(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.write().await;
        tables
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::not_found("ticket", id))
    }

    pub async fn insert_tour(&self, tour: Tour) -> Tour {
        let mut tables = self.write().await;
        tables.tours.insert(tour.id, tour.clone());
        info!(tour_id = %tour.id, "tour created");
        tour
    }

    pub async fn delete_tour(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.write().await;
        tables
            .tours
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::not_found("tour", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn registration_creates_account_and_traveler() {
        let store = MemoryStore::new();
        let user = store
            .register_user("alice", None, "hash".to_string(), false)
            .await
            .unwrap();

        let account = store.account_for_user(user.id).await.unwrap();
        assert_eq!(account.credit, dec!(100.00));

        let traveler = store.traveler_for_user(user.id).await.unwrap();
        assert_eq!(traveler.user_id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        store
            .register_user("alice", None, "hash".to_string(), false)
            .await
            .unwrap();

        let err = store
            .register_user("alice", None, "other".to_string(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(_)));

        // The failed registration left no partial rows behind
        let tables = store.read().await;
        assert_eq!(tables.users.len(), 1);
        assert_eq!(tables.accounts.len(), 1);
        assert_eq!(tables.travelers.len(), 1);
    }

    #[tokio::test]
    async fn lookups_fail_for_unknown_user() {
        let store = MemoryStore::new();
        let ghost = Uuid::new_v4();
        assert!(store.account_for_user(ghost).await.is_err());
        assert!(store.traveler_for_user(ghost).await.is_err());
    }
}
