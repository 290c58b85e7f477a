//! Products

use chrono::{DateTime, Utc};
use core_kernel::{BusinessId, ProductId};
use serde::{Deserialize, Serialize};

/// A product the shop stocks and sells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub business: BusinessId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(business: BusinessId, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::new_v7(),
            business,
            name: name.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
