//! Purchase records
//!
//! One row per stock purchase from a supplier: date, what, how much, at
//! what rate. Product and supplier references are optional; partial rows
//! happen at the counter and the history is still worth listing.

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money, ProductId, PurchaseId, SupplierId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A recorded stock purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub business: BusinessId,
    pub purchase_date: NaiveDate,
    pub product_id: Option<ProductId>,
    pub supplier_id: Option<SupplierId>,
    /// Quantity in kilograms, as recorded
    pub quantity_kg: Option<Decimal>,
    /// Rate per kilogram
    pub price_per_kg: Option<Money>,
}

impl PurchaseRecord {
    pub fn new(business: BusinessId, purchase_date: NaiveDate) -> Self {
        Self {
            id: PurchaseId::new_v7(),
            business,
            purchase_date,
            product_id: None,
            supplier_id: None,
            quantity_kg: None,
            price_per_kg: None,
        }
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn with_quantity(mut self, quantity_kg: Decimal, price_per_kg: Money) -> Self {
        self.quantity_kg = Some(quantity_kg);
        self.price_per_kg = Some(price_per_kg);
        self
    }

    /// Total cost of the purchase in paise
    ///
    /// quantity × rate, rounded half away from zero to whole paise; zero
    /// when either side is missing.
    pub fn cost(&self) -> Money {
        match (self.quantity_kg, self.price_per_kg) {
            (Some(quantity), Some(rate)) => quantity
                .checked_mul(rate.to_decimal())
                .map(Money::from_decimal_lossy)
                .unwrap_or_default(),
            _ => Money::zero(),
        }
    }
}
