//! Payroll Domain - Salary Payments
//!
//! A flat journal of salary payouts with derived monthly totals.

pub mod error;
pub mod ports;
pub mod salary;
pub mod service;

pub use error::PayrollError;
pub use ports::PayrollStore;
pub use salary::{monthly_total, SalaryPayment};
pub use service::PayrollService;
