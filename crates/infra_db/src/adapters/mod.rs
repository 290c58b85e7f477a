//! Domain adapters
//!
//! Adapter implementations for the domain store ports, connecting the
//! domain interfaces to the PostgreSQL repository layer. Each adapter
//! translates between domain models and row types and maps
//! [`DatabaseError`] onto the shared [`PortError`] taxonomy.

pub mod billing;
pub mod payroll;
pub mod procurement;

pub use billing::{PostgresBalanceAdapter, PostgresLedgerAdapter};
pub use payroll::PostgresPayrollAdapter;
pub use procurement::PostgresProcurementAdapter;

use chrono::Utc;
use core_kernel::{AdapterHealth, HealthCheckResult, PortError};
use sqlx::PgPool;

use crate::error::DatabaseError;

/// Maps a database error onto the port taxonomy
///
/// `entity`/`id` shape the NotFound message; stale versions and duplicate
/// keys surface as conflicts so callers can classify them as retryable.
pub(crate) fn to_port_error(
    entity: &'static str,
    id: impl std::fmt::Display,
    error: DatabaseError,
) -> PortError {
    match error {
        DatabaseError::NotFound(_) => PortError::not_found(entity, id),
        DatabaseError::StaleVersion(message) => PortError::conflict(message),
        DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
        e if e.is_connection_error() => PortError::connection(e.to_string()),
        e => PortError::Internal {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
    }
}

/// Shared health check: one round trip through the pool
pub(crate) async fn check_pool(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        },
        Err(e) => HealthCheckResult {
            adapter_id: adapter_id.to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(format!("Database error: {}", e)),
            checked_at: Utc::now(),
        },
    }
}
