//! Payroll domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the payroll domain
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Input rejected before any store call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store operation failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl PayrollError {
    pub fn validation(message: impl Into<String>) -> Self {
        PayrollError::Validation(message.into())
    }
}
