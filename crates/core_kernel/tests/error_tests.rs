//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::ports::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("customer phone is required");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "customer phone is required"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_state() {
    let error = CoreError::invalid_state("Cannot delete a bill that was never persisted");

    match error {
        CoreError::InvalidStateTransition(msg) => assert!(msg.contains("Cannot delete")),
        _ => panic!("Expected InvalidStateTransition error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::InvalidAmount("abc".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
    assert!(core_error.to_string().contains("abc"));
}

#[test]
fn test_port_error_classification() {
    assert!(PortError::timeout("create_bill", 30_000).is_transient());
    assert!(PortError::conflict("stale version").is_transient());
    assert!(!PortError::validation("bad input").is_transient());
    assert!(PortError::not_found("Customer", "CUST-1").is_not_found());
}
