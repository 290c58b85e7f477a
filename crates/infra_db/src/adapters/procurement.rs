//! PostgreSQL procurement adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{BusinessId, DomainPort, HealthCheckResult, HealthCheckable, PortError, ProductId, SupplierId};
use domain_procurement::{
    Product, ProcurementStore, PurchaseRecord, Supplier, SupplierLookup,
};

use super::{check_pool, to_port_error};
use crate::repositories::CatalogRepository;

/// PostgreSQL-backed implementation of `ProcurementStore`
#[derive(Debug, Clone)]
pub struct PostgresProcurementAdapter {
    repository: CatalogRepository,
    pool: PgPool,
}

impl PostgresProcurementAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CatalogRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresProcurementAdapter {}

#[async_trait]
impl HealthCheckable for PostgresProcurementAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        check_pool(&self.pool, "postgres-procurement-adapter").await
    }
}

#[async_trait]
impl ProcurementStore for PostgresProcurementAdapter {
    #[instrument(skip(self))]
    async fn get_or_create_supplier(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<SupplierLookup, PortError> {
        self.repository
            .get_or_create_supplier(business, name)
            .await
            .map_err(|e| to_port_error("Supplier", name, e))
    }

    async fn supplier_suggestions(
        &self,
        business: BusinessId,
        search: &str,
    ) -> Result<Vec<Supplier>, PortError> {
        let rows = self
            .repository
            .supplier_suggestions(business, search)
            .await
            .map_err(|e| to_port_error("Supplier", search, e))?;
        Ok(rows.into_iter().map(|row| row.into_supplier()).collect())
    }

    #[instrument(skip(self))]
    async fn delete_supplier(
        &self,
        business: BusinessId,
        id: SupplierId,
    ) -> Result<(), PortError> {
        self.repository
            .delete_supplier(business, id)
            .await
            .map_err(|e| to_port_error("Supplier", id, e))
    }

    async fn list_suppliers(&self, business: BusinessId) -> Result<Vec<Supplier>, PortError> {
        let rows = self
            .repository
            .supplier_suggestions(business, "")
            .await
            .map_err(|e| to_port_error("Supplier", business, e))?;
        Ok(rows.into_iter().map(|row| row.into_supplier()).collect())
    }

    async fn create_product(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<Product, PortError> {
        let row = self
            .repository
            .insert_product(business, name)
            .await
            .map_err(|e| to_port_error("Product", name, e))?;
        Ok(row.into_product())
    }

    async fn rename_product(
        &self,
        business: BusinessId,
        id: ProductId,
        name: &str,
    ) -> Result<Product, PortError> {
        let row = self
            .repository
            .rename_product(business, id, name)
            .await
            .map_err(|e| to_port_error("Product", id, e))?;
        Ok(row.into_product())
    }

    async fn delete_product(
        &self,
        business: BusinessId,
        id: ProductId,
    ) -> Result<(), PortError> {
        self.repository
            .delete_product(business, id)
            .await
            .map_err(|e| to_port_error("Product", id, e))
    }

    async fn list_products(&self, business: BusinessId) -> Result<Vec<Product>, PortError> {
        let rows = self
            .repository
            .list_products(business)
            .await
            .map_err(|e| to_port_error("Product", business, e))?;
        Ok(rows.into_iter().map(|row| row.into_product()).collect())
    }

    #[instrument(skip(self, purchase), fields(purchase = %purchase.id))]
    async fn add_purchase(
        &self,
        _business: BusinessId,
        purchase: PurchaseRecord,
    ) -> Result<PurchaseRecord, PortError> {
        let id = purchase.id;
        let row = self
            .repository
            .insert_purchase(&purchase)
            .await
            .map_err(|e| to_port_error("Purchase", id, e))?;
        Ok(row.into_record())
    }

    async fn list_purchases(
        &self,
        business: BusinessId,
    ) -> Result<Vec<PurchaseRecord>, PortError> {
        let rows = self
            .repository
            .list_purchases(business)
            .await
            .map_err(|e| to_port_error("Purchase", business, e))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }
}
