//! Customer repository
//!
//! Owns the `customers` table. Balance writes come in two shapes, both
//! safe under concurrent writers:
//!
//! - a conditional overwrite guarded by the `version` column, failing with
//!   [`DatabaseError::StaleVersion`] when a concurrent writer got there
//!   first, and
//! - an atomic server-side delta (`balance = balance + $n`) in a single
//!   round trip.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{BusinessId, CustomerId, Money};
use domain_billing::{CustomerAccount, CustomerKey};

use super::map_sqlx;
use crate::error::DatabaseError;

const COLUMNS: &str =
    "id, business_id, name, phone, balance, is_walkin, version, created_at, updated_at";

/// Database row for a customer account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub phone: String,
    pub balance: Decimal,
    pub is_walkin: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRow {
    /// Maps the row to the domain type
    ///
    /// Balance columns are NUMERIC(14,2) written from integer paise, so
    /// the conversion back is exact.
    pub fn into_account(self) -> CustomerAccount {
        CustomerAccount {
            id: CustomerId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            name: self.name,
            phone: self.phone,
            balance: Money::from_decimal_lossy(self.balance),
            is_walkin: self.is_walkin,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for customer accounts
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches an account by phone within a business
    pub async fn get(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<CustomerRow, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE business_id = $1 AND phone = $2");
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(business.as_uuid())
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DatabaseError::not_found("Customer", phone))
    }

    /// Fetches the account for `key`, creating it with a zero balance when
    /// missing
    ///
    /// The insert races safely: `ON CONFLICT DO NOTHING` plus a re-read
    /// makes concurrent get-or-create calls converge on one row.
    pub async fn get_or_create(
        &self,
        business: BusinessId,
        key: &CustomerKey,
    ) -> Result<CustomerRow, DatabaseError> {
        let account = CustomerAccount::new(business, key.name.trim(), key.phone.trim());
        let query = format!(
            "INSERT INTO customers ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (business_id, phone) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(account.id.as_uuid())
            .bind(business.as_uuid())
            .bind(&account.name)
            .bind(&account.phone)
            .bind(account.balance.to_decimal())
            .bind(account.is_walkin)
            .bind(account.version)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match inserted {
            Some(row) => Ok(row),
            None => self.get(business, &account.phone).await,
        }
    }

    /// Conditionally overwrites the balance
    ///
    /// Succeeds only when the stored version still equals
    /// `expected_version`; bumps the version on success.
    pub async fn set_balance_versioned(
        &self,
        business: BusinessId,
        phone: &str,
        balance: Money,
        expected_version: i64,
    ) -> Result<CustomerRow, DatabaseError> {
        let query = format!(
            "UPDATE customers \
             SET balance = $1, version = version + 1, updated_at = $2 \
             WHERE business_id = $3 AND phone = $4 AND version = $5 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(balance.to_decimal())
            .bind(Utc::now())
            .bind(business.as_uuid())
            .bind(phone)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        match updated {
            Some(row) => Ok(row),
            // Zero rows: either the account is gone or the version moved.
            None => match self.get(business, phone).await {
                Ok(_) => Err(DatabaseError::stale_version("Customer", phone)),
                Err(e) => Err(e),
            },
        }
    }

    /// Applies a delta to the balance atomically server-side
    pub async fn adjust_balance(
        &self,
        business: BusinessId,
        phone: &str,
        delta: Money,
    ) -> Result<CustomerRow, DatabaseError> {
        let query = format!(
            "UPDATE customers \
             SET balance = balance + $1, version = version + 1, updated_at = $2 \
             WHERE business_id = $3 AND phone = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(delta.to_decimal())
            .bind(Utc::now())
            .bind(business.as_uuid())
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DatabaseError::not_found("Customer", phone))
    }

    /// Removes an account
    pub async fn delete(&self, business: BusinessId, phone: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE business_id = $1 AND phone = $2")
            .bind(business.as_uuid())
            .bind(phone)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", phone));
        }
        Ok(())
    }

    /// All accounts for a business, ordered by name
    pub async fn list(&self, business: BusinessId) -> Result<Vec<CustomerRow>, DatabaseError> {
        let query =
            format!("SELECT {COLUMNS} FROM customers WHERE business_id = $1 ORDER BY name");
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(business.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }
}
