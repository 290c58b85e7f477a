//! Bill totals computation
//!
//! The money/balance engine: pure, deterministic arithmetic over integer
//! paise. Given a customer's previous balance, the line-item total, charges
//! and the amount paid, it derives the transaction total, the amount due,
//! the new balance and any overpayment (advance).
//!
//! No I/O, no side effects; conversion from decimal input happens before
//! this module is reached.

use core_kernel::Money;

/// Monetary inputs for one bill computation
///
/// Constructed per call, never persisted. Inputs are non-negative by
/// convention; negative values do not panic, they simply flow through the
/// integer arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsInput {
    /// What the customer owed before this bill
    pub previous_balance: Money,
    /// Sum of line-item amounts
    pub items_total: Money,
    pub delivery_charge: Money,
    pub cleaning_charge: Money,
    /// Amount the customer paid against the total due
    pub paid_amount: Money,
}

/// Computed monetary outputs of one bill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillTotals {
    /// Amount due before payment: previous balance + transaction amount
    pub total_amount: Money,
    /// max(0, total - paid); the balance never goes negative
    pub new_balance: Money,
    /// max(0, paid - total); overpayment beyond what was due
    pub advance_amount: Money,
    /// New charges this transaction: items + charges, excluding the
    /// previous balance
    pub transaction_amount: Money,
}

impl BillTotals {
    /// Returns true if the customer neither owes nor overpaid
    pub fn is_settled(&self) -> bool {
        self.new_balance.is_zero() && self.advance_amount.is_zero()
    }
}

/// Computes the totals for one bill
///
/// Exact integer arithmetic; saturates at the `i64` paise extremes rather
/// than wrapping. At most one of `new_balance` and `advance_amount` is
/// nonzero.
pub fn compute_totals(input: TotalsInput) -> BillTotals {
    let charges = input.delivery_charge.saturating_add(input.cleaning_charge);
    let transaction_amount = input.items_total.saturating_add(charges);
    let total_amount = input.previous_balance.saturating_add(transaction_amount);
    let new_balance = total_amount
        .saturating_sub(input.paid_amount)
        .clamp_non_negative();
    let advance_amount = input
        .paid_amount
        .saturating_sub(total_amount)
        .clamp_non_negative();

    BillTotals {
        total_amount,
        new_balance,
        advance_amount,
        transaction_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paise(p: i64) -> Money {
        Money::from_paise(p)
    }

    #[test]
    fn test_new_bill_with_partial_payment() {
        // ₹1500.00 of items, ₹50 delivery, ₹20 cleaning, ₹1000 paid
        let totals = compute_totals(TotalsInput {
            previous_balance: Money::zero(),
            items_total: paise(150000),
            delivery_charge: paise(5000),
            cleaning_charge: paise(2000),
            paid_amount: paise(100000),
        });

        assert_eq!(totals.total_amount, paise(157000));
        assert_eq!(totals.new_balance, paise(57000));
        assert_eq!(totals.advance_amount, Money::zero());
        assert_eq!(totals.transaction_amount, paise(157000));
    }

    #[test]
    fn test_balance_only_payment_with_overpay() {
        // Paying ₹600 against an outstanding ₹570 balance, nothing bought
        let totals = compute_totals(TotalsInput {
            previous_balance: paise(57000),
            items_total: Money::zero(),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: paise(60000),
        });

        assert_eq!(totals.total_amount, paise(57000));
        assert_eq!(totals.new_balance, Money::zero());
        assert_eq!(totals.advance_amount, paise(3000));
        assert_eq!(totals.transaction_amount, Money::zero());
    }

    #[test]
    fn test_exact_payment_is_settled() {
        let totals = compute_totals(TotalsInput {
            previous_balance: paise(10000),
            items_total: paise(5000),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: paise(15000),
        });

        assert!(totals.is_settled());
    }

    #[test]
    fn test_all_zero_inputs() {
        let totals = compute_totals(TotalsInput::default());
        assert_eq!(totals.total_amount, Money::zero());
        assert!(totals.is_settled());
    }

    #[test]
    fn test_transaction_amount_excludes_previous_balance() {
        let totals = compute_totals(TotalsInput {
            previous_balance: paise(99999),
            items_total: paise(100),
            delivery_charge: paise(10),
            cleaning_charge: paise(5),
            paid_amount: Money::zero(),
        });

        assert_eq!(totals.transaction_amount, paise(115));
        assert_eq!(totals.total_amount, paise(100114));
    }

    #[test]
    fn test_negative_input_does_not_panic() {
        let totals = compute_totals(TotalsInput {
            previous_balance: paise(-500),
            items_total: paise(1000),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: paise(200),
        });

        assert_eq!(totals.total_amount, paise(500));
        assert_eq!(totals.new_balance, paise(300));
    }

    #[test]
    fn test_engine_is_pure() {
        let input = TotalsInput {
            previous_balance: paise(123),
            items_total: paise(456),
            delivery_charge: paise(78),
            cleaning_charge: paise(9),
            paid_amount: paise(300),
        };

        assert_eq!(compute_totals(input), compute_totals(input));
    }
}
