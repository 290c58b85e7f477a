//! Procurement application service
//!
//! Thin orchestration over the procurement store: boundary validation and
//! logging. The store owns the mechanics; the service owns what counts as
//! acceptable input.

use std::sync::Arc;

use core_kernel::{BusinessId, ProductId, SupplierId};
use tracing::{info, instrument};

use crate::error::ProcurementError;
use crate::ports::ProcurementStore;
use crate::product::Product;
use crate::purchase::PurchaseRecord;
use crate::supplier::{Supplier, SupplierLookup};

/// The procurement application service
#[derive(Clone)]
pub struct ProcurementService {
    store: Arc<dyn ProcurementStore>,
}

impl ProcurementService {
    pub fn new(store: Arc<dyn ProcurementStore>) -> Self {
        Self { store }
    }

    /// Registers a supplier, returning the existing one on a name match
    #[instrument(skip(self), fields(business = %business))]
    pub async fn register_supplier(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<SupplierLookup, ProcurementError> {
        if name.trim().is_empty() {
            return Err(ProcurementError::validation("supplier name is required"));
        }
        let lookup = self.store.get_or_create_supplier(business, name).await?;
        info!(
            supplier = %lookup.supplier.name,
            is_new = lookup.is_new,
            "supplier registered"
        );
        Ok(lookup)
    }

    /// Autocomplete suggestions for a partial supplier name
    pub async fn supplier_suggestions(
        &self,
        business: BusinessId,
        search: &str,
    ) -> Result<Vec<Supplier>, ProcurementError> {
        Ok(self.store.supplier_suggestions(business, search).await?)
    }

    /// Removes a supplier and their purchase history
    #[instrument(skip(self), fields(business = %business, supplier = %id))]
    pub async fn delete_supplier(
        &self,
        business: BusinessId,
        id: SupplierId,
    ) -> Result<(), ProcurementError> {
        self.store.delete_supplier(business, id).await.map_err(|e| {
            if e.is_not_found() {
                ProcurementError::SupplierNotFound(id)
            } else {
                ProcurementError::Store(e)
            }
        })?;
        info!("supplier and purchase history removed");
        Ok(())
    }

    pub async fn list_suppliers(
        &self,
        business: BusinessId,
    ) -> Result<Vec<Supplier>, ProcurementError> {
        Ok(self.store.list_suppliers(business).await?)
    }

    /// Adds a product to the catalog
    pub async fn add_product(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<Product, ProcurementError> {
        if name.trim().is_empty() {
            return Err(ProcurementError::validation("product name is required"));
        }
        Ok(self.store.create_product(business, name).await?)
    }

    /// Renames a product
    pub async fn rename_product(
        &self,
        business: BusinessId,
        id: ProductId,
        name: &str,
    ) -> Result<Product, ProcurementError> {
        if name.trim().is_empty() {
            return Err(ProcurementError::validation("product name is required"));
        }
        self.store
            .rename_product(business, id, name)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ProcurementError::ProductNotFound(id)
                } else {
                    ProcurementError::Store(e)
                }
            })
    }

    /// Removes a product
    pub async fn delete_product(
        &self,
        business: BusinessId,
        id: ProductId,
    ) -> Result<(), ProcurementError> {
        self.store.delete_product(business, id).await.map_err(|e| {
            if e.is_not_found() {
                ProcurementError::ProductNotFound(id)
            } else {
                ProcurementError::Store(e)
            }
        })
    }

    pub async fn list_products(
        &self,
        business: BusinessId,
    ) -> Result<Vec<Product>, ProcurementError> {
        Ok(self.store.list_products(business).await?)
    }

    /// Records a stock purchase
    #[instrument(skip(self, purchase), fields(business = %business))]
    pub async fn record_purchase(
        &self,
        business: BusinessId,
        purchase: PurchaseRecord,
    ) -> Result<PurchaseRecord, ProcurementError> {
        let recorded = self.store.add_purchase(business, purchase).await?;
        info!(purchase = %recorded.id, cost = %recorded.cost(), "purchase recorded");
        Ok(recorded)
    }

    /// Purchase history, most recent first
    pub async fn list_purchases(
        &self,
        business: BusinessId,
    ) -> Result<Vec<PurchaseRecord>, ProcurementError> {
        Ok(self.store.list_purchases(business).await?)
    }
}
