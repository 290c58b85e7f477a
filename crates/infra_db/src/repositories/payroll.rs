//! Payroll repository

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{BusinessId, Money, SalaryPaymentId};
use domain_payroll::SalaryPayment;

use super::map_sqlx;
use crate::error::DatabaseError;

/// Database row for a salary payment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalaryRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub salary_date: NaiveDate,
    pub amount: Decimal,
}

impl SalaryRow {
    pub fn into_payment(self) -> SalaryPayment {
        SalaryPayment {
            id: SalaryPaymentId::from_uuid(self.id),
            business: BusinessId::from_uuid(self.business_id),
            salary_date: self.salary_date,
            amount: Money::from_decimal_lossy(self.amount),
        }
    }
}

/// Repository for salary payments
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a salary payment
    pub async fn insert(&self, payment: &SalaryPayment) -> Result<SalaryRow, DatabaseError> {
        sqlx::query_as::<_, SalaryRow>(
            "INSERT INTO salaries (id, business_id, salary_date, amount) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, business_id, salary_date, amount",
        )
        .bind(payment.id.as_uuid())
        .bind(payment.business.as_uuid())
        .bind(payment.salary_date)
        .bind(payment.amount.to_decimal())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// All payments for a business, most recent first
    pub async fn list(&self, business: BusinessId) -> Result<Vec<SalaryRow>, DatabaseError> {
        sqlx::query_as::<_, SalaryRow>(
            "SELECT id, business_id, salary_date, amount FROM salaries \
             WHERE business_id = $1 ORDER BY salary_date DESC",
        )
        .bind(business.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
