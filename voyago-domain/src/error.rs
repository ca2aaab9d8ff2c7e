use rust_decimal::Decimal;
use uuid::Uuid;

/// Business-rule failures surfaced by the ledger and booking engines.
///
/// None of these are fatal; the request boundary translates each into a
/// user-visible response.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("insufficient credit: need {required}, have {available}")]
    InsufficientCredit {
        required: Decimal,
        available: Decimal,
    },

    #[error("tour {0} is fully booked")]
    TourFull(Uuid),

    #[error("not allowed to {0}")]
    Forbidden(&'static str),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("no {entity} registered for user {user_id}")]
    MissingIdentity { entity: &'static str, user_id: Uuid },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}
