//! Procurement Domain - Suppliers, Products, and Purchases
//!
//! Back-office records for what the shop buys: the supplier directory
//! (with idempotent registration and autocomplete suggestions), the
//! product catalog, and the purchase history.

pub mod error;
pub mod ports;
pub mod product;
pub mod purchase;
pub mod service;
pub mod supplier;

pub use error::ProcurementError;
pub use ports::ProcurementStore;
pub use product::Product;
pub use purchase::PurchaseRecord;
pub use service::ProcurementService;
pub use supplier::{Supplier, SupplierLookup};
