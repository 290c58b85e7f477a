//! Customer accounts
//!
//! A customer account carries the running balance the synchronization
//! protocol keeps consistent with the bill ledger. Accounts are looked up
//! by phone number within a business; the name travels for display and
//! creation.

use chrono::{DateTime, Utc};
use core_kernel::{BusinessId, CustomerId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BillingError;

/// Lookup key for a customer
///
/// The phone number is the unique key within a business; the name is what
/// gets written onto a freshly created account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerKey {
    pub name: String,
    pub phone: String,
}

impl CustomerKey {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Rejects keys with missing identity before any store call
    pub fn validate(&self) -> Result<(), BillingError> {
        if self.name.trim().is_empty() {
            return Err(BillingError::validation("customer name is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(BillingError::validation("customer phone is required"));
        }
        Ok(())
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.phone)
    }
}

/// A customer account with its running balance
///
/// # Invariant
///
/// `balance` always equals the `balance_amount` of the customer's most
/// recent bill, after accounting for independent adjustments (bill
/// deletions). The synchronization protocol exists solely to preserve
/// this; nothing else may write the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAccount {
    pub id: CustomerId,
    pub business: BusinessId,
    pub name: String,
    pub phone: String,
    /// What the customer currently owes, in paise
    pub balance: Money,
    /// Walk-in customers are created implicitly at the counter
    pub is_walkin: bool,
    /// Optimistic concurrency token; bumped on every balance write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerAccount {
    /// Creates a fresh account with a zero balance
    pub fn new(business: BusinessId, name: impl Into<String>, phone: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: CustomerId::new_v7(),
            business,
            is_walkin: name.contains("Walk-in"),
            name,
            phone: phone.into(),
            balance: Money::zero(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The account's lookup key
    pub fn key(&self) -> CustomerKey {
        CustomerKey::new(self.name.clone(), self.phone.clone())
    }
}
