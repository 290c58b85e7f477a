//! PostgreSQL payroll adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{BusinessId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_payroll::{PayrollStore, SalaryPayment};

use super::{check_pool, to_port_error};
use crate::repositories::PayrollRepository;

/// PostgreSQL-backed implementation of `PayrollStore`
#[derive(Debug, Clone)]
pub struct PostgresPayrollAdapter {
    repository: PayrollRepository,
    pool: PgPool,
}

impl PostgresPayrollAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PayrollRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPayrollAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPayrollAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        check_pool(&self.pool, "postgres-payroll-adapter").await
    }
}

#[async_trait]
impl PayrollStore for PostgresPayrollAdapter {
    #[instrument(skip(self, payment), fields(payment = %payment.id))]
    async fn add_payment(
        &self,
        _business: BusinessId,
        payment: SalaryPayment,
    ) -> Result<SalaryPayment, PortError> {
        let id = payment.id;
        let row = self
            .repository
            .insert(&payment)
            .await
            .map_err(|e| to_port_error("SalaryPayment", id, e))?;
        Ok(row.into_payment())
    }

    async fn list_payments(
        &self,
        business: BusinessId,
    ) -> Result<Vec<SalaryPayment>, PortError> {
        let rows = self
            .repository
            .list(business)
            .await
            .map_err(|e| to_port_error("SalaryPayment", business, e))?;
        Ok(rows.into_iter().map(|row| row.into_payment()).collect())
    }
}
