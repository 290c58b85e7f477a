//! Infrastructure Database Layer
//!
//! PostgreSQL implementations of the domain store ports, built on SQLx.
//!
//! # Architecture
//!
//! The crate is layered the same way for every aggregate:
//!
//! - `repositories` own the SQL and the row types,
//! - `adapters` implement the domain port traits on top of them,
//!   translating errors onto the shared `PortError` taxonomy.
//!
//! Concurrency-sensitive writes (the customer balance) use a version
//! column for conditional overwrites and single-statement atomic deltas;
//! the expected schema is documented in [`repositories`].
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{StoreSettings, create_pool};
//! use infra_db::adapters::{PostgresBalanceAdapter, PostgresLedgerAdapter};
//!
//! let settings = StoreSettings::from_env()?;
//! let pool = create_pool(settings.database_config()).await?;
//! let ledger = PostgresLedgerAdapter::new(pool.clone());
//! let balances = PostgresBalanceAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;
pub mod settings;

pub use adapters::{
    PostgresBalanceAdapter, PostgresLedgerAdapter, PostgresPayrollAdapter,
    PostgresProcurementAdapter,
};
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use settings::StoreSettings;
