//! Salary payment records
//!
//! Salaries are a flat payment journal: one row per payout with a date
//! and an amount. Monthly totals are derived, not stored.

use chrono::{Datelike, NaiveDate};
use core_kernel::{BusinessId, Money, SalaryPaymentId};
use serde::{Deserialize, Serialize};

/// One salary payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPayment {
    pub id: SalaryPaymentId,
    pub business: BusinessId,
    pub salary_date: NaiveDate,
    pub amount: Money,
}

impl SalaryPayment {
    pub fn new(business: BusinessId, salary_date: NaiveDate, amount: Money) -> Self {
        Self {
            id: SalaryPaymentId::new_v7(),
            business,
            salary_date,
            amount,
        }
    }
}

/// Sums the payments that fall in the given calendar month
pub fn monthly_total(payments: &[SalaryPayment], year: i32, month: u32) -> Money {
    payments
        .iter()
        .filter(|p| p.salary_date.year() == year && p.salary_date.month() == month)
        .map(|p| p.amount)
        .sum()
}
