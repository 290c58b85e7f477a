//! Unit tests for the Money module
//!
//! Tests cover paise conversion, rounding at the decimal boundary,
//! lossy vs. strict parsing, and arithmetic edge cases.

use core_kernel::{Money, MoneyError};
use rust_decimal_macros::dec;

mod conversion {
    use super::*;

    #[test]
    fn test_from_decimal_exact_two_places() {
        let m = Money::from_decimal(dec!(1570.00)).unwrap();
        assert_eq!(m.paise(), 157000);
    }

    #[test]
    fn test_from_decimal_rounds_to_nearest_paisa() {
        assert_eq!(Money::from_decimal(dec!(0.014)).unwrap().paise(), 1);
        assert_eq!(Money::from_decimal(dec!(0.016)).unwrap().paise(), 2);
    }

    #[test]
    fn test_half_paisa_rounds_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(0.015)).unwrap().paise(), 2);
        assert_eq!(Money::from_decimal(dec!(0.025)).unwrap().paise(), 3);
        assert_eq!(Money::from_decimal(dec!(-0.015)).unwrap().paise(), -2);
    }

    #[test]
    fn test_to_decimal_divides_exactly() {
        assert_eq!(Money::from_paise(157000).to_decimal(), dec!(1570.00));
        assert_eq!(Money::from_paise(1).to_decimal(), dec!(0.01));
        assert_eq!(Money::from_paise(-550).to_decimal(), dec!(-5.50));
    }

    #[test]
    fn test_round_trip_equals_two_decimal_rounding() {
        for raw in [dec!(12.344), dec!(12.345), dec!(12.346), dec!(0.004)] {
            let money = Money::from_decimal(raw).unwrap();
            let redone = Money::from_decimal(money.to_decimal()).unwrap();
            assert_eq!(money, redone);
        }
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_strict_accepts_plain_decimals() {
        assert_eq!(Money::parse_strict("1500").unwrap().paise(), 150000);
        assert_eq!(Money::parse_strict("0.05").unwrap().paise(), 5);
        assert_eq!(Money::parse_strict("-12.50").unwrap().paise(), -1250);
    }

    #[test]
    fn test_strict_rejects_empty_input() {
        assert!(matches!(
            Money::parse_strict("   "),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_strict_rejects_non_numeric_input() {
        for junk in ["NaN", "abc", "12.3.4", "₹100"] {
            assert!(
                matches!(Money::parse_strict(junk), Err(MoneyError::InvalidAmount(_))),
                "expected {junk:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_lossy_zeroes_everything_strict_rejects() {
        for junk in ["", "NaN", "abc", "12.3.4"] {
            assert_eq!(Money::parse_lossy(junk), Money::zero());
        }
    }

    #[test]
    fn test_lossy_parses_valid_input_identically() {
        assert_eq!(
            Money::parse_lossy("42.50"),
            Money::parse_strict("42.50").unwrap()
        );
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_addition_is_exact_integer_addition() {
        let a = Money::from_paise(150000);
        let b = Money::from_paise(5000);
        let c = Money::from_paise(2000);
        assert_eq!((a + b + c).paise(), 157000);
    }

    #[test]
    fn test_subtraction_can_go_negative() {
        let result = Money::from_paise(57000) - Money::from_paise(60000);
        assert!(result.is_negative());
        assert_eq!(result.paise(), -3000);
    }

    #[test]
    fn test_clamp_non_negative_floors_at_zero() {
        let overdrawn = Money::from_paise(57000) - Money::from_paise(60000);
        assert_eq!(overdrawn.clamp_non_negative(), Money::zero());
    }

    #[test]
    fn test_assign_operators() {
        let mut total = Money::zero();
        total += Money::from_paise(100);
        total += Money::from_paise(250);
        total -= Money::from_paise(50);
        assert_eq!(total.paise(), 300);
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        let max = Money::from_paise(i64::MAX);
        assert_eq!(
            max.checked_add(Money::from_paise(1)),
            Err(MoneyError::Overflow)
        );
    }
}
