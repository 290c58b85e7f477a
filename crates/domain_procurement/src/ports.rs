//! Procurement domain port
//!
//! One store trait covers the procurement aggregates: suppliers, products
//! and purchase records. Supplier creation is a single idempotent store
//! operation; there is exactly one code path per logical operation, and
//! the adapter owns the mechanism. Every operation is scoped by
//! `BusinessId`.

use async_trait::async_trait;
use core_kernel::{BusinessId, DomainPort, PortError, ProductId, SupplierId};

use crate::product::Product;
use crate::purchase::PurchaseRecord;
use crate::supplier::{Supplier, SupplierLookup};

/// The store of suppliers, products and purchases
#[async_trait]
pub trait ProcurementStore: DomainPort {
    // ------------------------------------------------------------------
    // Suppliers
    // ------------------------------------------------------------------

    /// Fetches the supplier named `name`, creating it if missing
    ///
    /// Idempotent on the trimmed name within a business.
    async fn get_or_create_supplier(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<SupplierLookup, PortError>;

    /// Suppliers whose names contain `search` (case-insensitive), ordered
    /// by name; an empty search returns everything
    async fn supplier_suggestions(
        &self,
        business: BusinessId,
        search: &str,
    ) -> Result<Vec<Supplier>, PortError>;

    /// Removes a supplier and cascades to their purchase records
    async fn delete_supplier(
        &self,
        business: BusinessId,
        id: SupplierId,
    ) -> Result<(), PortError>;

    /// All suppliers for a business, ordered by name
    async fn list_suppliers(&self, business: BusinessId) -> Result<Vec<Supplier>, PortError>;

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// Creates a product
    async fn create_product(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<Product, PortError>;

    /// Renames a product
    async fn rename_product(
        &self,
        business: BusinessId,
        id: ProductId,
        name: &str,
    ) -> Result<Product, PortError>;

    /// Removes a product
    async fn delete_product(&self, business: BusinessId, id: ProductId)
        -> Result<(), PortError>;

    /// All products for a business, ordered by name
    async fn list_products(&self, business: BusinessId) -> Result<Vec<Product>, PortError>;

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    /// Appends a purchase record
    async fn add_purchase(
        &self,
        business: BusinessId,
        purchase: PurchaseRecord,
    ) -> Result<PurchaseRecord, PortError>;

    /// All purchases for a business, most recent first
    async fn list_purchases(
        &self,
        business: BusinessId,
    ) -> Result<Vec<PurchaseRecord>, PortError>;
}

/// In-memory mock store for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of `ProcurementStore`
    #[derive(Debug, Default)]
    pub struct MockProcurementStore {
        suppliers: Arc<RwLock<HashMap<SupplierId, Supplier>>>,
        products: Arc<RwLock<HashMap<ProductId, Product>>>,
        purchases: Arc<RwLock<Vec<PurchaseRecord>>>,
    }

    impl MockProcurementStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MockProcurementStore {}

    #[async_trait]
    impl ProcurementStore for MockProcurementStore {
        async fn get_or_create_supplier(
            &self,
            business: BusinessId,
            name: &str,
        ) -> Result<SupplierLookup, PortError> {
            let trimmed = name.trim();
            let mut suppliers = self.suppliers.write().await;

            if let Some(existing) = suppliers
                .values()
                .find(|s| s.business == business && s.name.eq_ignore_ascii_case(trimmed))
            {
                return Ok(SupplierLookup {
                    supplier: existing.clone(),
                    is_new: false,
                });
            }

            let supplier = Supplier::new(business, trimmed);
            suppliers.insert(supplier.id, supplier.clone());
            Ok(SupplierLookup {
                supplier,
                is_new: true,
            })
        }

        async fn supplier_suggestions(
            &self,
            business: BusinessId,
            search: &str,
        ) -> Result<Vec<Supplier>, PortError> {
            let needle = search.trim().to_lowercase();
            let mut matches: Vec<_> = self
                .suppliers
                .read()
                .await
                .values()
                .filter(|s| s.business == business && s.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            matches.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(matches)
        }

        async fn delete_supplier(
            &self,
            business: BusinessId,
            id: SupplierId,
        ) -> Result<(), PortError> {
            let mut suppliers = self.suppliers.write().await;
            match suppliers.get(&id) {
                Some(supplier) if supplier.business == business => {
                    suppliers.remove(&id);
                    self.purchases
                        .write()
                        .await
                        .retain(|p| p.supplier_id != Some(id));
                    Ok(())
                }
                _ => Err(PortError::not_found("Supplier", id)),
            }
        }

        async fn list_suppliers(
            &self,
            business: BusinessId,
        ) -> Result<Vec<Supplier>, PortError> {
            self.supplier_suggestions(business, "").await
        }

        async fn create_product(
            &self,
            business: BusinessId,
            name: &str,
        ) -> Result<Product, PortError> {
            let product = Product::new(business, name);
            self.products
                .write()
                .await
                .insert(product.id, product.clone());
            Ok(product)
        }

        async fn rename_product(
            &self,
            business: BusinessId,
            id: ProductId,
            name: &str,
        ) -> Result<Product, PortError> {
            let mut products = self.products.write().await;
            let product = products
                .get_mut(&id)
                .filter(|p| p.business == business)
                .ok_or_else(|| PortError::not_found("Product", id))?;
            product.name = name.trim().to_string();
            Ok(product.clone())
        }

        async fn delete_product(
            &self,
            business: BusinessId,
            id: ProductId,
        ) -> Result<(), PortError> {
            let mut products = self.products.write().await;
            match products.get(&id) {
                Some(product) if product.business == business => {
                    products.remove(&id);
                    Ok(())
                }
                _ => Err(PortError::not_found("Product", id)),
            }
        }

        async fn list_products(&self, business: BusinessId) -> Result<Vec<Product>, PortError> {
            let mut products: Vec<_> = self
                .products
                .read()
                .await
                .values()
                .filter(|p| p.business == business)
                .cloned()
                .collect();
            products.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(products)
        }

        async fn add_purchase(
            &self,
            business: BusinessId,
            purchase: PurchaseRecord,
        ) -> Result<PurchaseRecord, PortError> {
            debug_assert_eq!(purchase.business, business);
            self.purchases.write().await.push(purchase.clone());
            Ok(purchase)
        }

        async fn list_purchases(
            &self,
            business: BusinessId,
        ) -> Result<Vec<PurchaseRecord>, PortError> {
            let mut purchases: Vec<_> = self
                .purchases
                .read()
                .await
                .iter()
                .filter(|p| p.business == business)
                .cloned()
                .collect();
            purchases.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
            Ok(purchases)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProcurementStore;
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_get_or_create_supplier_is_idempotent() {
        let store = MockProcurementStore::new();
        let business = BusinessId::new();

        let first = store
            .get_or_create_supplier(business, "Mandi Fresh")
            .await
            .unwrap();
        assert!(first.is_new);

        let again = store
            .get_or_create_supplier(business, "  mandi fresh ")
            .await
            .unwrap();
        assert!(!again.is_new);
        assert_eq!(again.supplier.id, first.supplier.id);
    }

    #[tokio::test]
    async fn test_supplier_suggestions_filter_and_sort() {
        let store = MockProcurementStore::new();
        let business = BusinessId::new();
        for name in ["Veggie Van", "Mandi Fresh", "Mandi Gate"] {
            store.get_or_create_supplier(business, name).await.unwrap();
        }

        let matches = store.supplier_suggestions(business, "mandi").await.unwrap();
        let names: Vec<_> = matches.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Mandi Fresh", "Mandi Gate"]);
    }

    #[tokio::test]
    async fn test_delete_supplier_cascades_to_purchases() {
        let store = MockProcurementStore::new();
        let business = BusinessId::new();
        let supplier = store
            .get_or_create_supplier(business, "Mandi Fresh")
            .await
            .unwrap()
            .supplier;

        let purchase =
            PurchaseRecord::new(business, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
                .with_supplier(supplier.id);
        store.add_purchase(business, purchase).await.unwrap();

        store.delete_supplier(business, supplier.id).await.unwrap();
        assert!(store.list_purchases(business).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchases_listed_most_recent_first() {
        let store = MockProcurementStore::new();
        let business = BusinessId::new();
        for (y, m, d) in [(2024, 1, 5), (2024, 3, 2), (2024, 2, 11)] {
            let purchase =
                PurchaseRecord::new(business, NaiveDate::from_ymd_opt(y, m, d).unwrap());
            store.add_purchase(business, purchase).await.unwrap();
        }

        let purchases = store.list_purchases(business).await.unwrap();
        let dates: Vec<_> = purchases.iter().map(|p| p.purchase_date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = MockProcurementStore::new();
        let business_a = BusinessId::new();
        let business_b = BusinessId::new();

        store
            .get_or_create_supplier(business_a, "Mandi Fresh")
            .await
            .unwrap();

        assert!(store.list_suppliers(business_b).await.unwrap().is_empty());
    }
}
