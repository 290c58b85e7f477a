//! Billing Domain - Bill Totals and Balance Synchronization
//!
//! This crate implements the money/balance engine and the protocol that
//! keeps customer balances consistent with the bill ledger.
//!
//! # Money/Balance Engine
//!
//! [`totals::compute_totals`] is the single pure computation behind every
//! bill: integer-paise arithmetic deriving the transaction amount, the
//! total due, the new balance and any overpayment (advance) from a
//! previous balance, line items, charges and the amount paid.
//!
//! # Balance Synchronization Protocol
//!
//! [`BillingService`] sequences every bill mutation so the customer's
//! stored balance always tracks the ledger: recompute from authoritative
//! state, write the ledger entry, propagate the balance with a
//! version-checked conditional write, re-read to resynchronize.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingService, CreateBillRequest, CustomerKey};
//!
//! let service = BillingService::new(ledger, balances);
//! let bill = service.create_bill(business, request).await?;
//! assert_eq!(bill.balance_amount, expected_balance);
//! ```

pub mod bill;
pub mod customer;
pub mod error;
pub mod ports;
pub mod service;
pub mod totals;

pub use bill::{BillLineItem, BillRecord, BillStatus, PaymentDetails, PaymentMethod};
pub use customer::{CustomerAccount, CustomerKey};
pub use error::BillingError;
pub use ports::{BalanceStore, LedgerStore};
pub use service::{BillingConfig, BillingService, CreateBillRequest, UpdateBillRequest};
pub use totals::{compute_totals, BillTotals, TotalsInput};
