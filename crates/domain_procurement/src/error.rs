//! Procurement domain errors

use core_kernel::{PortError, ProductId, SupplierId};
use thiserror::Error;

/// Errors that can occur in the procurement domain
#[derive(Debug, Error)]
pub enum ProcurementError {
    /// Input rejected before any store call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Supplier not found
    #[error("Supplier not found: {0}")]
    SupplierNotFound(SupplierId),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A store operation failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl ProcurementError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProcurementError::Validation(message.into())
    }
}
