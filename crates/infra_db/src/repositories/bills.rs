//! Bill repository
//!
//! Owns the `bills` table. Line items travel as a JSONB payload; all
//! monetary columns are NUMERIC(14,2) written from integer paise.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{BillId, BusinessId, Money};
use domain_billing::{BillRecord, BillStatus, PaymentDetails, PaymentMethod};

use super::map_sqlx;
use crate::error::DatabaseError;

const COLUMNS: &str = "id, business_id, bill_number, customer_name, customer_phone, bill_date, \
                       items, total_amount, paid_amount, balance_amount, advance_amount, \
                       delivery_charge, cleaning_charge, payment_method, upi_type, bank_name, \
                       check_number, cash_amount, gpay_amount, status, created_at";

/// Database row for a bill
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub bill_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub bill_date: NaiveDate,
    pub items: serde_json::Value,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub advance_amount: Decimal,
    pub delivery_charge: Decimal,
    pub cleaning_charge: Decimal,
    pub payment_method: String,
    pub upi_type: Option<String>,
    pub bank_name: Option<String>,
    pub check_number: Option<String>,
    pub cash_amount: Option<Decimal>,
    pub gpay_amount: Option<Decimal>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BillRow {
    /// Maps the row to the domain type
    pub fn into_record(self) -> Result<BillRecord, DatabaseError> {
        let items = serde_json::from_value(self.items)
            .map_err(|e| DatabaseError::SerializationError(format!("bill items: {e}")))?;

        Ok(BillRecord {
            id: BillId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            bill_number: self.bill_number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            bill_date: self.bill_date,
            items,
            total_amount: Money::from_decimal_lossy(self.total_amount),
            paid_amount: Money::from_decimal_lossy(self.paid_amount),
            balance_amount: Money::from_decimal_lossy(self.balance_amount),
            advance_amount: Money::from_decimal_lossy(self.advance_amount),
            delivery_charge: Money::from_decimal_lossy(self.delivery_charge),
            cleaning_charge: Money::from_decimal_lossy(self.cleaning_charge),
            payment: PaymentDetails {
                method: method_from_str(&self.payment_method)?,
                upi_type: self.upi_type,
                bank_name: self.bank_name,
                check_number: self.check_number,
                cash_amount: self.cash_amount.map(Money::from_decimal_lossy),
                gpay_amount: self.gpay_amount.map(Money::from_decimal_lossy),
            },
            status: status_from_str(&self.status)?,
            created_at: self.created_at,
        })
    }
}

fn method_to_str(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "cash",
        PaymentMethod::Upi => "upi",
        PaymentMethod::Check => "check",
        PaymentMethod::CashGpay => "cash_gpay",
    }
}

fn method_from_str(s: &str) -> Result<PaymentMethod, DatabaseError> {
    match s {
        "cash" => Ok(PaymentMethod::Cash),
        "upi" => Ok(PaymentMethod::Upi),
        "check" => Ok(PaymentMethod::Check),
        "cash_gpay" => Ok(PaymentMethod::CashGpay),
        other => Err(DatabaseError::SerializationError(format!(
            "unknown payment method '{other}'"
        ))),
    }
}

fn status_to_str(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Draft => "draft",
        BillStatus::Persisted => "persisted",
        BillStatus::Updated => "updated",
        BillStatus::Deleted => "deleted",
    }
}

fn status_from_str(s: &str) -> Result<BillStatus, DatabaseError> {
    match s {
        "draft" => Ok(BillStatus::Draft),
        "persisted" => Ok(BillStatus::Persisted),
        "updated" => Ok(BillStatus::Updated),
        "deleted" => Ok(BillStatus::Deleted),
        other => Err(DatabaseError::SerializationError(format!(
            "unknown bill status '{other}'"
        ))),
    }
}

/// Repository for bill records
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a bill
    pub async fn insert(&self, record: &BillRecord) -> Result<BillRow, DatabaseError> {
        let items = serde_json::to_value(&record.items)
            .map_err(|e| DatabaseError::SerializationError(format!("bill items: {e}")))?;

        let query = format!(
            "INSERT INTO bills ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BillRow>(&query)
            .bind(record.id.as_uuid())
            .bind(record.business.as_uuid())
            .bind(&record.bill_number)
            .bind(&record.customer_name)
            .bind(&record.customer_phone)
            .bind(record.bill_date)
            .bind(items)
            .bind(record.total_amount.to_decimal())
            .bind(record.paid_amount.to_decimal())
            .bind(record.balance_amount.to_decimal())
            .bind(record.advance_amount.to_decimal())
            .bind(record.delivery_charge.to_decimal())
            .bind(record.cleaning_charge.to_decimal())
            .bind(method_to_str(record.payment.method))
            .bind(&record.payment.upi_type)
            .bind(&record.payment.bank_name)
            .bind(&record.payment.check_number)
            .bind(record.payment.cash_amount.map(|m| m.to_decimal()))
            .bind(record.payment.gpay_amount.map(|m| m.to_decimal()))
            .bind(status_to_str(record.status))
            .bind(record.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    /// Rewrites an existing bill
    pub async fn update(&self, record: &BillRecord) -> Result<BillRow, DatabaseError> {
        let items = serde_json::to_value(&record.items)
            .map_err(|e| DatabaseError::SerializationError(format!("bill items: {e}")))?;

        let query = format!(
            "UPDATE bills SET \
                 bill_number = $3, customer_name = $4, customer_phone = $5, bill_date = $6, \
                 items = $7, total_amount = $8, paid_amount = $9, balance_amount = $10, \
                 advance_amount = $11, delivery_charge = $12, cleaning_charge = $13, \
                 payment_method = $14, upi_type = $15, bank_name = $16, check_number = $17, \
                 cash_amount = $18, gpay_amount = $19, status = $20 \
             WHERE id = $1 AND business_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BillRow>(&query)
            .bind(record.id.as_uuid())
            .bind(record.business.as_uuid())
            .bind(&record.bill_number)
            .bind(&record.customer_name)
            .bind(&record.customer_phone)
            .bind(record.bill_date)
            .bind(items)
            .bind(record.total_amount.to_decimal())
            .bind(record.paid_amount.to_decimal())
            .bind(record.balance_amount.to_decimal())
            .bind(record.advance_amount.to_decimal())
            .bind(record.delivery_charge.to_decimal())
            .bind(record.cleaning_charge.to_decimal())
            .bind(method_to_str(record.payment.method))
            .bind(&record.payment.upi_type)
            .bind(&record.payment.bank_name)
            .bind(&record.payment.check_number)
            .bind(record.payment.cash_amount.map(|m| m.to_decimal()))
            .bind(record.payment.gpay_amount.map(|m| m.to_decimal()))
            .bind(status_to_str(record.status))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DatabaseError::not_found("Bill", record.id))
    }

    /// Removes a bill
    pub async fn delete(&self, business: BusinessId, id: BillId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM bills WHERE business_id = $1 AND id = $2")
            .bind(business.as_uuid())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Bill", id));
        }
        Ok(())
    }

    /// Fetches a bill by id
    pub async fn get(&self, business: BusinessId, id: BillId) -> Result<BillRow, DatabaseError> {
        let query = format!("SELECT {COLUMNS} FROM bills WHERE business_id = $1 AND id = $2");
        sqlx::query_as::<_, BillRow>(&query)
            .bind(business.as_uuid())
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DatabaseError::not_found("Bill", id))
    }

    /// All bills for one customer, most recent first
    pub async fn list_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<Vec<BillRow>, DatabaseError> {
        let query = format!(
            "SELECT {COLUMNS} FROM bills \
             WHERE business_id = $1 AND customer_phone = $2 \
             ORDER BY bill_date DESC, created_at DESC"
        );
        sqlx::query_as::<_, BillRow>(&query)
            .bind(business.as_uuid())
            .bind(phone)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    /// Removes every bill for one customer; returns how many went
    pub async fn delete_for_customer(
        &self,
        business: BusinessId,
        phone: &str,
    ) -> Result<u64, DatabaseError> {
        let result =
            sqlx::query("DELETE FROM bills WHERE business_id = $1 AND customer_phone = $2")
                .bind(business.as_uuid())
                .bind(phone)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }
}
