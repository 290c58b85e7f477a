//! Bill records
//!
//! A bill is the persisted ledger entry for one customer transaction:
//! line items, charges, the computed totals and how it was paid.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{BillId, BusinessId, Money};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;
use crate::totals::BillTotals;

/// Bill lifecycle
///
/// `Draft → Persisted → {Updated}* → Deleted`; no other transitions.
/// `Draft` exists only on the client side before the first successful
/// persist; the store never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    Persisted,
    Updated,
    Deleted,
}

impl BillStatus {
    /// Returns true if the record may still be mutated through the protocol
    pub fn is_live(&self) -> bool {
        matches!(self, BillStatus::Persisted | BillStatus::Updated)
    }
}

/// How a bill was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Check,
    /// Split between cash and GPay
    CashGpay,
}

/// Payment-method metadata attached to a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    /// UPI app or handle, when paid by UPI
    pub upi_type: Option<String>,
    /// Issuing bank, when paid by check
    pub bank_name: Option<String>,
    /// Check number, when paid by check
    pub check_number: Option<String>,
    /// Cash portion of a split payment
    pub cash_amount: Option<Money>,
    /// GPay portion of a split payment
    pub gpay_amount: Option<Money>,
}

impl PaymentDetails {
    /// Plain cash payment
    pub fn cash() -> Self {
        Self {
            method: PaymentMethod::Cash,
            upi_type: None,
            bank_name: None,
            check_number: None,
            cash_amount: None,
            gpay_amount: None,
        }
    }

    /// UPI payment
    pub fn upi(upi_type: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Upi,
            upi_type: Some(upi_type.into()),
            ..Self::cash()
        }
    }

    /// Check payment
    pub fn check(bank_name: impl Into<String>, check_number: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Check,
            bank_name: Some(bank_name.into()),
            check_number: Some(check_number.into()),
            ..Self::cash()
        }
    }

    /// Split cash/GPay payment
    pub fn cash_gpay(cash_amount: Money, gpay_amount: Money) -> Self {
        Self {
            method: PaymentMethod::CashGpay,
            cash_amount: Some(cash_amount),
            gpay_amount: Some(gpay_amount),
            ..Self::cash()
        }
    }

    /// Checks that the metadata matches the method
    pub fn validate(&self) -> Result<(), BillingError> {
        match self.method {
            PaymentMethod::Check if self.check_number.is_none() => Err(
                BillingError::validation("check payment requires a check number"),
            ),
            PaymentMethod::CashGpay
                if self.cash_amount.is_none() && self.gpay_amount.is_none() =>
            {
                Err(BillingError::validation(
                    "split payment requires a cash or gpay portion",
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self::cash()
    }
}

/// One line on a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLineItem {
    /// Position on the bill, 1-based
    pub serial_no: u32,
    /// Item name as entered
    pub item: String,
    /// Quantity as entered, free text ("12.5")
    pub weight: String,
    /// Rate per unit as entered, free text ("120")
    pub rate: String,
    /// Line amount in paise
    pub amount: Money,
}

impl BillLineItem {
    /// Creates a line item, deriving the amount from weight × rate
    ///
    /// Weight and rate are kept as entered; unparseable values contribute
    /// zero to the amount (the lossy policy of the input boundary).
    pub fn new(serial_no: u32, item: impl Into<String>, weight: &str, rate: &str) -> Self {
        let amount = Self::line_amount(weight, rate);
        Self {
            serial_no,
            item: item.into(),
            weight: weight.to_string(),
            rate: rate.to_string(),
            amount,
        }
    }

    /// Creates a line item with an explicitly provided amount
    pub fn with_amount(
        serial_no: u32,
        item: impl Into<String>,
        weight: &str,
        rate: &str,
        amount: Money,
    ) -> Self {
        Self {
            serial_no,
            item: item.into(),
            weight: weight.to_string(),
            rate: rate.to_string(),
            amount,
        }
    }

    /// Derives a line amount from free-text weight and rate
    ///
    /// Rounds the decimal product half away from zero to whole paise.
    pub fn line_amount(weight: &str, rate: &str) -> Money {
        use rust_decimal::Decimal;
        use std::str::FromStr;

        let weight = Decimal::from_str(weight.trim()).unwrap_or_default();
        let rate = Decimal::from_str(rate.trim()).unwrap_or_default();
        weight
            .checked_mul(rate)
            .map(Money::from_decimal_lossy)
            .unwrap_or_default()
    }
}

/// A persisted bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    /// Unique identifier
    pub id: BillId,
    /// Owning tenant
    pub business: BusinessId,
    /// Human-readable bill number
    pub bill_number: String,
    /// Customer display name
    pub customer_name: String,
    /// Customer phone; the customer lookup key within the business
    pub customer_phone: String,
    /// Bill date as entered
    pub bill_date: NaiveDate,
    /// Line items
    pub items: Vec<BillLineItem>,
    /// Amount due before payment: previous balance + transaction amount
    pub total_amount: Money,
    /// Amount the customer paid
    pub paid_amount: Money,
    /// Outstanding balance after this bill
    pub balance_amount: Money,
    /// Overpayment beyond the total due
    pub advance_amount: Money,
    pub delivery_charge: Money,
    pub cleaning_charge: Money,
    /// How the bill was paid
    pub payment: PaymentDetails,
    /// Lifecycle state; the store only ever sees live records
    pub status: BillStatus,
    /// When the record was first created
    pub created_at: DateTime<Utc>,
}

impl BillRecord {
    /// Creates a draft bill for a customer
    ///
    /// Monetary outputs are zero until [`BillRecord::apply_totals`] runs;
    /// the record stays `Draft` until the first successful persist.
    pub fn draft(
        business: BusinessId,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        bill_date: NaiveDate,
    ) -> Self {
        Self {
            id: BillId::new_v7(),
            business,
            bill_number: generate_bill_number(),
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            bill_date,
            items: Vec::new(),
            total_amount: Money::zero(),
            paid_amount: Money::zero(),
            balance_amount: Money::zero(),
            advance_amount: Money::zero(),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            payment: PaymentDetails::cash(),
            status: BillStatus::Draft,
            created_at: Utc::now(),
        }
    }

    /// Sum of the line-item amounts
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// The bill's own contribution to the customer balance
    ///
    /// items + charges − paid: what this bill added to (or removed from)
    /// the running balance, independent of what the balance was before.
    pub fn own_contribution(&self) -> Money {
        self.items_total() + self.delivery_charge + self.cleaning_charge - self.paid_amount
    }

    /// Writes engine outputs onto the record
    pub fn apply_totals(&mut self, totals: &BillTotals) {
        self.total_amount = totals.total_amount;
        self.balance_amount = totals.new_balance;
        self.advance_amount = totals.advance_amount;
    }

    /// Marks the record persisted after the first successful store write
    pub fn mark_persisted(&mut self) -> Result<(), BillingError> {
        match self.status {
            BillStatus::Draft => {
                self.status = BillStatus::Persisted;
                Ok(())
            }
            other => Err(BillingError::InvalidState(format!(
                "cannot persist a bill in state {other:?}"
            ))),
        }
    }

    /// Marks the record updated after a successful store rewrite
    pub fn mark_updated(&mut self) -> Result<(), BillingError> {
        if self.status.is_live() {
            self.status = BillStatus::Updated;
            Ok(())
        } else {
            Err(BillingError::InvalidState(format!(
                "cannot update a bill in state {:?}",
                self.status
            )))
        }
    }

    /// Marks the record deleted
    pub fn mark_deleted(&mut self) -> Result<(), BillingError> {
        if self.status.is_live() {
            self.status = BillStatus::Deleted;
            Ok(())
        } else {
            Err(BillingError::InvalidState(format!(
                "cannot delete a bill in state {:?}",
                self.status
            )))
        }
    }
}

/// Generates a human-readable bill number from the wall clock
fn generate_bill_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("B-{}", duration.as_millis() % 10_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft() -> BillRecord {
        BillRecord::draft(
            BusinessId::new(),
            "Asha Traders",
            "9876543210",
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_draft_starts_empty() {
        let bill = draft();
        assert_eq!(bill.status, BillStatus::Draft);
        assert!(bill.items.is_empty());
        assert!(bill.total_amount.is_zero());
        assert!(bill.bill_number.starts_with("B-"));
    }

    #[test]
    fn test_line_amount_from_weight_and_rate() {
        let item = BillLineItem::new(1, "Onion", "12.5", "120");
        assert_eq!(item.amount.paise(), 150000); // 12.5 × 120 = ₹1500.00
    }

    #[test]
    fn test_line_amount_zeroes_junk_input() {
        assert_eq!(BillLineItem::line_amount("abc", "120"), Money::zero());
        assert_eq!(BillLineItem::line_amount("12.5", ""), Money::zero());
    }

    #[test]
    fn test_items_total_sums_lines() {
        let mut bill = draft();
        bill.items.push(BillLineItem::new(1, "Onion", "10", "100"));
        bill.items.push(BillLineItem::new(2, "Potato", "5", "40"));
        assert_eq!(bill.items_total().paise(), 120000);
    }

    #[test]
    fn test_own_contribution() {
        let mut bill = draft();
        bill.items.push(BillLineItem::new(1, "Onion", "10", "100")); // ₹1000
        bill.delivery_charge = Money::from_paise(5000);
        bill.paid_amount = Money::from_paise(50000);
        assert_eq!(bill.own_contribution().paise(), 100000 + 5000 - 50000);
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut bill = draft();
        bill.mark_persisted().unwrap();
        assert_eq!(bill.status, BillStatus::Persisted);
        bill.mark_updated().unwrap();
        bill.mark_updated().unwrap();
        assert_eq!(bill.status, BillStatus::Updated);
        bill.mark_deleted().unwrap();
        assert_eq!(bill.status, BillStatus::Deleted);
    }

    #[test]
    fn test_lifecycle_rejects_bad_transitions() {
        let mut bill = draft();
        assert!(bill.mark_updated().is_err());
        assert!(bill.mark_deleted().is_err());

        bill.mark_persisted().unwrap();
        assert!(bill.mark_persisted().is_err());

        bill.mark_deleted().unwrap();
        assert!(bill.mark_updated().is_err());
    }

    #[test]
    fn test_payment_details_validation() {
        assert!(PaymentDetails::cash().validate().is_ok());
        assert!(PaymentDetails::upi("gpay").validate().is_ok());
        assert!(
            PaymentDetails::check("State Bank", "001234")
                .validate()
                .is_ok()
        );

        let bad_check = PaymentDetails {
            method: PaymentMethod::Check,
            check_number: None,
            ..PaymentDetails::cash()
        };
        assert!(bad_check.validate().is_err());

        let bad_split = PaymentDetails {
            method: PaymentMethod::CashGpay,
            ..PaymentDetails::cash()
        };
        assert!(bad_split.validate().is_err());
    }
}
