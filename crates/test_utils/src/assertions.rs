//! Custom test assertions
//!
//! Assertion helpers for domain types with more meaningful failure
//! messages than bare `assert_eq!`.

use core_kernel::Money;
use domain_billing::{BillRecord, BillTotals, CustomerAccount};

/// Asserts that a money value equals an expected number of paise
pub fn assert_paise(actual: Money, expected_paise: i64) {
    assert_eq!(
        actual.paise(),
        expected_paise,
        "expected {} paise (₹{}), got {} paise (₹{})",
        expected_paise,
        Money::from_paise(expected_paise),
        actual.paise(),
        actual
    );
}

/// Asserts that a money value is exactly zero
pub fn assert_money_zero(actual: Money) {
    assert!(actual.is_zero(), "expected zero, got ₹{}", actual);
}

/// Asserts the engine's core invariant: at most one of balance and
/// advance is nonzero, and they reconcile with total − paid
pub fn assert_totals_reconcile(totals: &BillTotals, paid: Money) {
    assert!(
        totals.new_balance.is_zero() || totals.advance_amount.is_zero(),
        "balance ₹{} and advance ₹{} cannot both be nonzero",
        totals.new_balance,
        totals.advance_amount
    );
    assert_eq!(
        totals.new_balance.paise() - totals.advance_amount.paise(),
        totals.total_amount.paise() - paid.paise(),
        "balance/advance do not reconcile with total − paid"
    );
}

/// Asserts that the account balance matches a bill's balance amount,
/// the invariant the synchronization protocol maintains
pub fn assert_balance_synchronized(account: &CustomerAccount, bill: &BillRecord) {
    assert_eq!(
        account.balance, bill.balance_amount,
        "customer {} balance ₹{} does not match bill {} balance ₹{}",
        account.phone, account.balance, bill.id, bill.balance_amount
    );
}
