//! PostgreSQL billing adapters
//!
//! `PostgresLedgerAdapter` and `PostgresBalanceAdapter` are the internal
//! (database) implementations of the billing domain's two store ports.
//! Wire them into `BillingService` at startup:
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresBalanceAdapter, PostgresLedgerAdapter};
//! use domain_billing::BillingService;
//! use std::sync::Arc;
//!
//! let service = BillingService::new(
//!     Arc::new(PostgresLedgerAdapter::new(pool.clone())),
//!     Arc::new(PostgresBalanceAdapter::new(pool)),
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{BillId, BusinessId, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError};
use domain_billing::{BalanceStore, BillRecord, CustomerAccount, CustomerKey, LedgerStore};

use super::{check_pool, to_port_error};
use crate::repositories::{BillRepository, CustomerRepository};

/// PostgreSQL-backed implementation of `LedgerStore`
#[derive(Debug, Clone)]
pub struct PostgresLedgerAdapter {
    repository: BillRepository,
    pool: PgPool,
}

impl PostgresLedgerAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillRepository::new(pool.clone()),
            pool,
        }
    }

    /// Direct access to the underlying repository
    pub fn repository(&self) -> &BillRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLedgerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLedgerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        check_pool(&self.pool, "postgres-ledger-adapter").await
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerAdapter {
    #[instrument(skip(self, bill), fields(bill_id = %bill.id))]
    async fn create_bill(
        &self,
        _business: BusinessId,
        bill: BillRecord,
    ) -> Result<BillRecord, PortError> {
        let id = bill.id;
        let row = self
            .repository
            .insert(&bill)
            .await
            .map_err(|e| to_port_error("Bill", id, e))?;
        row.into_record().map_err(|e| to_port_error("Bill", id, e))
    }

    #[instrument(skip(self, bill), fields(bill_id = %bill.id))]
    async fn update_bill(
        &self,
        _business: BusinessId,
        bill: BillRecord,
    ) -> Result<BillRecord, PortError> {
        let id = bill.id;
        let row = self
            .repository
            .update(&bill)
            .await
            .map_err(|e| to_port_error("Bill", id, e))?;
        row.into_record().map_err(|e| to_port_error("Bill", id, e))
    }

    #[instrument(skip(self))]
    async fn delete_bill(&self, business: BusinessId, id: BillId) -> Result<(), PortError> {
        self.repository
            .delete(business, id)
            .await
            .map_err(|e| to_port_error("Bill", id, e))
    }

    async fn get_bill(&self, business: BusinessId, id: BillId) -> Result<BillRecord, PortError> {
        let row = self
            .repository
            .get(business, id)
            .await
            .map_err(|e| to_port_error("Bill", id, e))?;
        row.into_record().map_err(|e| to_port_error("Bill", id, e))
    }

    async fn bills_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<Vec<BillRecord>, PortError> {
        let rows = self
            .repository
            .list_for_customer(business, phone)
            .await
            .map_err(|e| to_port_error("Bill", phone, e))?;
        rows.into_iter()
            .map(|row| row.into_record().map_err(|e| to_port_error("Bill", phone, e)))
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_bills_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<u64, PortError> {
        self.repository
            .delete_for_customer(business, phone)
            .await
            .map_err(|e| to_port_error("Bill", phone, e))
    }
}

/// PostgreSQL-backed implementation of `BalanceStore`
#[derive(Debug, Clone)]
pub struct PostgresBalanceAdapter {
    repository: CustomerRepository,
    pool: PgPool,
}

impl PostgresBalanceAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Direct access to the underlying repository
    pub fn repository(&self) -> &CustomerRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBalanceAdapter {}

#[async_trait]
impl HealthCheckable for PostgresBalanceAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        check_pool(&self.pool, "postgres-balance-adapter").await
    }
}

#[async_trait]
impl BalanceStore for PostgresBalanceAdapter {
    async fn get_account(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<CustomerAccount, PortError> {
        let row = self
            .repository
            .get(business, phone)
            .await
            .map_err(|e| to_port_error("Customer", phone, e))?;
        Ok(row.into_account())
    }

    #[instrument(skip(self, key), fields(customer = %key))]
    async fn get_or_create_account(
        &self,
        business: BusinessId,
        key: &CustomerKey,
    ) -> Result<CustomerAccount, PortError> {
        let row = self
            .repository
            .get_or_create(business, key)
            .await
            .map_err(|e| to_port_error("Customer", &key.phone, e))?;
        Ok(row.into_account())
    }

    #[instrument(skip(self), fields(balance = %balance))]
    async fn set_balance(
        &self,
        business: BusinessId,
        phone: &str,
        balance: Money,
        expected_version: i64,
    ) -> Result<CustomerAccount, PortError> {
        let row = self
            .repository
            .set_balance_versioned(business, phone, balance, expected_version)
            .await
            .map_err(|e| to_port_error("Customer", phone, e))?;
        Ok(row.into_account())
    }

    #[instrument(skip(self), fields(delta = %delta))]
    async fn adjust_balance(
        &self,
        business: BusinessId,
        phone: &str,
        delta: Money,
    ) -> Result<CustomerAccount, PortError> {
        let row = self
            .repository
            .adjust_balance(business, phone, delta)
            .await
            .map_err(|e| to_port_error("Customer", phone, e))?;
        Ok(row.into_account())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, business: BusinessId, phone: &str) -> Result<(), PortError> {
        self.repository
            .delete(business, phone)
            .await
            .map_err(|e| to_port_error("Customer", phone, e))
    }

    async fn list_accounts(
        &self,
        business: BusinessId,
    ) -> Result<Vec<CustomerAccount>, PortError> {
        let rows = self
            .repository
            .list(business)
            .await
            .map_err(|e| to_port_error("Customer", business, e))?;
        Ok(rows.into_iter().map(|row| row.into_account()).collect())
    }
}
