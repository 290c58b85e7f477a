//! Test fixtures
//!
//! Pre-built test data for common entities, so tests only spell out what
//! they actually care about.

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money};
use domain_billing::CustomerKey;

/// Common money amounts, in paise
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// ₹1500.00 of items
    pub fn items_total() -> Money {
        Money::from_paise(150_000)
    }

    /// ₹50.00 delivery charge
    pub fn delivery_charge() -> Money {
        Money::from_paise(5_000)
    }

    /// ₹20.00 cleaning charge
    pub fn cleaning_charge() -> Money {
        Money::from_paise(2_000)
    }

    /// ₹1000.00 paid
    pub fn paid_amount() -> Money {
        Money::from_paise(100_000)
    }

    /// The outstanding balance those amounts leave behind: ₹570.00
    pub fn outstanding_balance() -> Money {
        Money::from_paise(57_000)
    }
}

/// Common dates
pub struct DateFixtures;

impl DateFixtures {
    /// A bill date in the middle of the test period
    pub fn bill_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// A date one week later
    pub fn next_week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 22).unwrap()
    }
}

/// Common identity fixtures
pub struct IdentityFixtures;

impl IdentityFixtures {
    pub fn business() -> BusinessId {
        BusinessId::new_v7()
    }

    /// The regular customer most tests bill against
    pub fn regular_customer() -> CustomerKey {
        CustomerKey::new("Asha Traders", "9876543210")
    }

    /// A counter customer with no stable identity
    pub fn walkin_customer() -> CustomerKey {
        CustomerKey::new("Walk-in Customer", "0000000000")
    }

    pub fn supplier_name() -> &'static str {
        "Mandi Fresh"
    }

    pub fn product_name() -> &'static str {
        "Onion"
    }
}
