//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. The port adapters in [`crate::adapters`] sit on top of them.
//!
//! # Principles
//!
//! - Every query is scoped by `business_id`; tenant isolation lives in the
//!   WHERE clause, not in the caller's discipline.
//! - Customer balance writes are concurrency-safe: conditional on a
//!   version column, or pushed server-side as a single atomic UPDATE.
//! - Monetary NUMERIC(14,2) columns convert to integer paise at this
//!   boundary and nowhere else.
//!
//! # Expected schema
//!
//! ```sql
//! CREATE TABLE customers (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     name TEXT NOT NULL,
//!     phone TEXT NOT NULL,
//!     balance NUMERIC(14,2) NOT NULL DEFAULT 0,
//!     is_walkin BOOLEAN NOT NULL DEFAULT FALSE,
//!     version BIGINT NOT NULL DEFAULT 0,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     UNIQUE (business_id, phone)
//! );
//!
//! CREATE TABLE bills (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     bill_number TEXT NOT NULL,
//!     customer_name TEXT NOT NULL,
//!     customer_phone TEXT NOT NULL,
//!     bill_date DATE NOT NULL,
//!     items JSONB NOT NULL DEFAULT '[]',
//!     total_amount NUMERIC(14,2) NOT NULL,
//!     paid_amount NUMERIC(14,2) NOT NULL,
//!     balance_amount NUMERIC(14,2) NOT NULL,
//!     advance_amount NUMERIC(14,2) NOT NULL,
//!     delivery_charge NUMERIC(14,2) NOT NULL,
//!     cleaning_charge NUMERIC(14,2) NOT NULL,
//!     payment_method TEXT NOT NULL,
//!     upi_type TEXT,
//!     bank_name TEXT,
//!     check_number TEXT,
//!     cash_amount NUMERIC(14,2),
//!     gpay_amount NUMERIC(14,2),
//!     status TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE suppliers (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     name TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     UNIQUE (business_id, name)
//! );
//!
//! CREATE TABLE products (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     name TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE purchases (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     purchase_date DATE NOT NULL,
//!     product_id UUID REFERENCES products (id),
//!     supplier_id UUID REFERENCES suppliers (id),
//!     quantity_kg NUMERIC(12,3),
//!     price_per_kg NUMERIC(14,2)
//! );
//!
//! CREATE TABLE salaries (
//!     id UUID PRIMARY KEY,
//!     business_id UUID NOT NULL,
//!     salary_date DATE NOT NULL,
//!     amount NUMERIC(14,2) NOT NULL
//! );
//! ```

pub mod bills;
pub mod catalog;
pub mod customers;
pub mod payroll;

pub use bills::BillRepository;
pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use payroll::PayrollRepository;

use crate::error::DatabaseError;

/// Maps an SQLx error through the PostgreSQL error-code classification
pub(crate) fn map_sqlx(error: sqlx::Error) -> DatabaseError {
    DatabaseError::from(&error)
}
