//! Payroll application service

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money};
use tracing::{info, instrument};

use crate::error::PayrollError;
use crate::ports::PayrollStore;
use crate::salary::{monthly_total, SalaryPayment};

/// The payroll application service
#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Records a salary payout
    ///
    /// A zero or negative amount is rejected before the store is touched.
    #[instrument(skip(self), fields(business = %business, date = %salary_date))]
    pub async fn record_payment(
        &self,
        business: BusinessId,
        salary_date: NaiveDate,
        amount: Money,
    ) -> Result<SalaryPayment, PayrollError> {
        if !amount.is_positive() {
            return Err(PayrollError::validation(
                "salary amount must be greater than zero",
            ));
        }
        let payment = self
            .store
            .add_payment(business, SalaryPayment::new(business, salary_date, amount))
            .await?;
        info!(payment = %payment.id, amount = %payment.amount, "salary recorded");
        Ok(payment)
    }

    /// Payment history, most recent first
    pub async fn list_payments(
        &self,
        business: BusinessId,
    ) -> Result<Vec<SalaryPayment>, PayrollError> {
        Ok(self.store.list_payments(business).await?)
    }

    /// Total paid out in a calendar month
    pub async fn month_total(
        &self,
        business: BusinessId,
        year: i32,
        month: u32,
    ) -> Result<Money, PayrollError> {
        let payments = self.store.list_payments(business).await?;
        Ok(monthly_total(&payments, year, month))
    }
}
