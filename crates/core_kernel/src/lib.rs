//! Core Kernel - Foundational types and utilities for the shop billing system
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money as integer paise with decimal boundary conversion
//! - Strongly-typed identifiers
//! - Port abstractions and the shared port error taxonomy

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use error::CoreError;
pub use identifiers::{
    BillId, BusinessId, CustomerId, ProductId, PurchaseId, SalaryPaymentId, SupplierId,
};
pub use money::{Money, MoneyError};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};
