use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::money;

/// An authenticated identity. Admins may operate on any booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

/// Spendable credit balance, one per user.
///
/// Every mutation goes through [`Account::debit`] or [`Account::credit`];
/// the balance is persisted by the store immediately after either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub credit: Decimal,
}

impl Account {
    /// Open an account with the standard signup credit.
    pub fn open(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            credit: money::SIGNUP_CREDIT,
        }
    }

    /// Withdraw `amount`, failing without mutation if the balance is short.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if self.credit < amount {
            return Err(DomainError::InsufficientCredit {
                required: amount,
                available: self.credit,
            });
        }
        self.credit -= amount;
        Ok(())
    }

    /// Deposit `amount` unconditionally (refunds).
    pub fn credit(&mut self, amount: Decimal) {
        self.credit += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_account_starts_with_signup_credit() {
        let account = Account::open(Uuid::new_v4());
        assert_eq!(account.credit, dec!(100.00));
    }

    #[test]
    fn debit_requires_sufficient_balance() {
        let mut account = Account::open(Uuid::new_v4());
        account.debit(dec!(80.00)).unwrap();
        assert_eq!(account.credit, dec!(20.00));

        let err = account.debit(dec!(20.01)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientCredit { .. }));
        // Failed debit leaves the balance untouched
        assert_eq!(account.credit, dec!(20.00));
    }

    #[test]
    fn debit_allows_exact_balance() {
        let mut account = Account::open(Uuid::new_v4());
        account.debit(dec!(100.00)).unwrap();
        assert_eq!(account.credit, dec!(0.00));
    }

    #[test]
    fn credit_is_unconditional() {
        let mut account = Account::open(Uuid::new_v4());
        account.credit(dec!(64.00));
        assert_eq!(account.credit, dec!(164.00));
    }
}
