//! Property-based test generators
//!
//! Proptest strategies for generating random test data that stays inside
//! the domain's conventions (non-negative paise amounts, plausible dates).

use chrono::NaiveDate;
use core_kernel::Money;
use domain_billing::{BillLineItem, TotalsInput};
use proptest::prelude::*;

/// Strategy for non-negative paise amounts
pub fn amount_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000_000i64).prop_map(Money::from_paise)
}

/// Strategy for paise amounts that can be negative
pub fn signed_amount_strategy() -> impl Strategy<Value = Money> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(Money::from_paise)
}

/// Strategy for complete engine inputs
pub fn totals_input_strategy() -> impl Strategy<Value = TotalsInput> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(
            |(previous_balance, items_total, delivery_charge, cleaning_charge, paid_amount)| {
                TotalsInput {
                    previous_balance,
                    items_total,
                    delivery_charge,
                    cleaning_charge,
                    paid_amount,
                }
            },
        )
}

/// Strategy for plausible bill dates
pub fn bill_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy for a small list of line items with integer weights and rates
pub fn line_items_strategy() -> impl Strategy<Value = Vec<BillLineItem>> {
    prop::collection::vec((1u32..100u32, 1u32..1000u32), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (weight, rate))| {
                BillLineItem::new(
                    i as u32 + 1,
                    format!("Item {}", i + 1),
                    &weight.to_string(),
                    &rate.to_string(),
                )
            })
            .collect()
    })
}
