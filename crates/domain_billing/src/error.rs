//! Billing domain errors

use core_kernel::{BillId, Money, MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur in the billing domain
///
/// The taxonomy follows the protocol's propagation policy: validation
/// errors are raised before any store call, store errors abort the
/// operation, and consistency errors mark the window where the ledger and
/// the customer account disagree.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Input rejected before any store call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bill not found
    #[error("Bill not found: {0}")]
    BillNotFound(BillId),

    /// Customer account not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// A store operation failed; no partial state was left behind
    #[error("Store error: {0}")]
    Store(#[from] PortError),

    /// The bill write succeeded but balance propagation failed
    ///
    /// The ledger and the customer account now disagree. The bill persists;
    /// the caller decides whether to retry the balance write or queue the
    /// record for reconciliation. Carries enough identity to reconcile.
    #[error(
        "Ledger and account diverged: bill {bill_id} persisted but balance {attempted_balance} \
         could not be written for customer {customer}"
    )]
    Consistency {
        bill_id: BillId,
        customer: String,
        attempted_balance: Money,
        #[source]
        source: PortError,
    },

    /// Monetary conversion failed at the boundary
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Bill lifecycle violation
    #[error("Invalid state transition: {0}")]
    InvalidState(String),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    /// Returns true if the ledger and account are known to disagree
    pub fn is_consistency(&self) -> bool {
        matches!(self, BillingError::Consistency { .. })
    }

    /// Returns true if retrying the whole operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, BillingError::Store(e) if e.is_transient())
    }
}
