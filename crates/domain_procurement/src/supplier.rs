//! Suppliers
//!
//! Suppliers are unique by name within a business. Creation is idempotent:
//! re-registering an existing name returns the stored supplier.

use chrono::{DateTime, Utc};
use core_kernel::{BusinessId, SupplierId};
use serde::{Deserialize, Serialize};

/// A supplier the shop buys from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub business: BusinessId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Supplier {
    /// Creates a supplier with a trimmed name
    pub fn new(business: BusinessId, name: impl Into<String>) -> Self {
        Self {
            id: SupplierId::new_v7(),
            business,
            name: name.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a get-or-create lookup
#[derive(Debug, Clone)]
pub struct SupplierLookup {
    pub supplier: Supplier,
    /// True if the lookup created the supplier
    pub is_new: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_the_name() {
        let supplier = Supplier::new(BusinessId::new(), "  Mandi Fresh  ");
        assert_eq!(supplier.name, "Mandi Fresh");
    }
}
