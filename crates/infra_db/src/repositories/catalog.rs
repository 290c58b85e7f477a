//! Catalog repository: suppliers, products, purchases
//!
//! Supplier get-or-create is a single safe statement (`ON CONFLICT DO
//! NOTHING` + re-read); supplier deletion cascades to purchases inside one
//! transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{BusinessId, Money, ProductId, PurchaseId, SupplierId};
use domain_procurement::{Product, PurchaseRecord, Supplier, SupplierLookup};

use super::map_sqlx;
use crate::error::DatabaseError;

/// Database row for a supplier
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupplierRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl SupplierRow {
    pub fn into_supplier(self) -> Supplier {
        Supplier {
            id: SupplierId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// Database row for a product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_product(self) -> Product {
        Product {
            id: ProductId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// Database row for a purchase
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PurchaseRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub purchase_date: NaiveDate,
    pub product_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub quantity_kg: Option<Decimal>,
    pub price_per_kg: Option<Decimal>,
}

impl PurchaseRow {
    pub fn into_record(self) -> PurchaseRecord {
        PurchaseRecord {
            id: PurchaseId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            purchase_date: self.purchase_date,
            product_id: self.product_id.map(ProductId::from_uuid),
            supplier_id: self.supplier_id.map(SupplierId::from_uuid),
            quantity_kg: self.quantity_kg,
            price_per_kg: self.price_per_kg.map(Money::from_decimal_lossy),
        }
    }
}

/// Repository for the procurement aggregates
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the supplier named `name`, creating it if missing
    pub async fn get_or_create_supplier(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<SupplierLookup, DatabaseError> {
        let supplier = Supplier::new(business, name);
        let inserted = sqlx::query_as::<_, SupplierRow>(
            "INSERT INTO suppliers (id, business_id, name, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (business_id, name) DO NOTHING \
             RETURNING id, business_id, name, created_at",
        )
        .bind(supplier.id.as_uuid())
        .bind(business.as_uuid())
        .bind(&supplier.name)
        .bind(supplier.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if let Some(row) = inserted {
            return Ok(SupplierLookup {
                supplier: row.into_supplier(),
                is_new: true,
            });
        }

        let existing = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, business_id, name, created_at FROM suppliers \
             WHERE business_id = $1 AND name = $2",
        )
        .bind(business.as_uuid())
        .bind(&supplier.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| DatabaseError::not_found("Supplier", &supplier.name))?;

        Ok(SupplierLookup {
            supplier: existing.into_supplier(),
            is_new: false,
        })
    }

    /// Suppliers whose names contain `search`, ordered by name
    pub async fn supplier_suggestions(
        &self,
        business: BusinessId,
        search: &str,
    ) -> Result<Vec<SupplierRow>, DatabaseError> {
        sqlx::query_as::<_, SupplierRow>(
            "SELECT id, business_id, name, created_at FROM suppliers \
             WHERE business_id = $1 AND name ILIKE $2 \
             ORDER BY name",
        )
        .bind(business.as_uuid())
        .bind(format!("%{}%", search.trim()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// Removes a supplier and their purchases in one transaction
    pub async fn delete_supplier(
        &self,
        business: BusinessId,
        id: SupplierId,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        sqlx::query("DELETE FROM purchases WHERE business_id = $1 AND supplier_id = $2")
            .bind(business.as_uuid())
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        let result = sqlx::query("DELETE FROM suppliers WHERE business_id = $1 AND id = $2")
            .bind(business.as_uuid())
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Supplier", id));
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Inserts a product
    pub async fn insert_product(
        &self,
        business: BusinessId,
        name: &str,
    ) -> Result<ProductRow, DatabaseError> {
        let product = Product::new(business, name);
        sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (id, business_id, name, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, business_id, name, created_at",
        )
        .bind(product.id.as_uuid())
        .bind(business.as_uuid())
        .bind(&product.name)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// Renames a product
    pub async fn rename_product(
        &self,
        business: BusinessId,
        id: ProductId,
        name: &str,
    ) -> Result<ProductRow, DatabaseError> {
        sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET name = $3 WHERE business_id = $1 AND id = $2 \
             RETURNING id, business_id, name, created_at",
        )
        .bind(business.as_uuid())
        .bind(id.as_uuid())
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| DatabaseError::not_found("Product", id))
    }

    /// Removes a product
    pub async fn delete_product(
        &self,
        business: BusinessId,
        id: ProductId,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE business_id = $1 AND id = $2")
            .bind(business.as_uuid())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Product", id));
        }
        Ok(())
    }

    /// All products for a business, ordered by name
    pub async fn list_products(
        &self,
        business: BusinessId,
    ) -> Result<Vec<ProductRow>, DatabaseError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, business_id, name, created_at FROM products \
             WHERE business_id = $1 ORDER BY name",
        )
        .bind(business.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// Inserts a purchase record
    pub async fn insert_purchase(
        &self,
        record: &PurchaseRecord,
    ) -> Result<PurchaseRow, DatabaseError> {
        sqlx::query_as::<_, PurchaseRow>(
            "INSERT INTO purchases \
                 (id, business_id, purchase_date, product_id, supplier_id, quantity_kg, price_per_kg) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, business_id, purchase_date, product_id, supplier_id, quantity_kg, price_per_kg",
        )
        .bind(record.id.as_uuid())
        .bind(record.business.as_uuid())
        .bind(record.purchase_date)
        .bind(record.product_id.map(|id| *id.as_uuid()))
        .bind(record.supplier_id.map(|id| *id.as_uuid()))
        .bind(record.quantity_kg)
        .bind(record.price_per_kg.map(|m| m.to_decimal()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// All purchases for a business, most recent first
    pub async fn list_purchases(
        &self,
        business: BusinessId,
    ) -> Result<Vec<PurchaseRow>, DatabaseError> {
        sqlx::query_as::<_, PurchaseRow>(
            "SELECT id, business_id, purchase_date, product_id, supplier_id, quantity_kg, price_per_kg \
             FROM purchases WHERE business_id = $1 \
             ORDER BY purchase_date DESC",
        )
        .bind(business.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
