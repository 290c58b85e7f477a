//! Protocol tests for domain_billing
//!
//! Exercises the balance synchronization protocol end-to-end against the
//! in-memory mock stores: create/update/delete sequencing, failure
//! windows, conflict retries and tenant isolation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money, PortError};
use domain_billing::ports::mock::{MockBalanceStore, MockLedgerStore};
use domain_billing::{
    BalanceStore, BillLineItem, BillingConfig, BillingError, BillingService, CreateBillRequest,
    CustomerKey, PaymentDetails, UpdateBillRequest,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (
    BillingService,
    Arc<MockLedgerStore>,
    Arc<MockBalanceStore>,
    BusinessId,
) {
    init_tracing();
    let ledger = Arc::new(MockLedgerStore::new());
    let balances = Arc::new(MockBalanceStore::new());
    let service = BillingService::new(ledger.clone(), balances.clone());
    (service, ledger, balances, BusinessId::new())
}

fn asha() -> CustomerKey {
    CustomerKey::new("Asha Traders", "9876543210")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn paise(p: i64) -> Money {
    Money::from_paise(p)
}

/// ₹1500 of items, ₹50 delivery, ₹20 cleaning, ₹1000 paid
fn scenario_a_request() -> CreateBillRequest {
    CreateBillRequest {
        customer: asha(),
        bill_date: date(2024, 3, 1),
        items: vec![BillLineItem::new(1, "Onion", "12.5", "120")],
        delivery_charge: paise(5000),
        cleaning_charge: paise(2000),
        paid_amount: paise(100000),
        payment: PaymentDetails::cash(),
    }
}

mod create_bill {
    use super::*;

    #[tokio::test]
    async fn test_first_bill_computes_and_propagates() {
        let (service, ledger, balances, business) = setup();

        let bill = service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        assert_eq!(bill.total_amount, paise(157000));
        assert_eq!(bill.balance_amount, paise(57000));
        assert_eq!(bill.advance_amount, Money::zero());
        assert_eq!(bill.paid_amount, paise(100000));

        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, paise(57000));
        assert_eq!(account.version, 1);
        assert_eq!(ledger.bill_count().await, 1);
    }

    #[tokio::test]
    async fn test_second_bill_folds_previous_balance_and_tracks_advance() {
        let (service, _ledger, balances, business) = setup();

        service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        // Paying ₹600 against the outstanding ₹570, nothing bought
        let mut settle = CreateBillRequest::new(asha(), date(2024, 3, 8));
        settle.paid_amount = paise(60000);
        let bill = service.create_bill(business, settle).await.unwrap();

        assert_eq!(bill.total_amount, paise(57000));
        assert_eq!(bill.balance_amount, Money::zero());
        assert_eq!(bill.advance_amount, paise(3000));

        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, Money::zero());
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_write() {
        let (service, ledger, balances, business) = setup();

        let mut request = scenario_a_request();
        request.customer = CustomerKey::new("Asha Traders", "   ");

        let result = service.create_bill(business, request).await;
        assert!(matches!(result, Err(BillingError::Validation(_))));
        assert_eq!(ledger.bill_count().await, 0);
        assert!(balances.list_accounts(business).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bill_write_failure_aborts_without_customer_update() {
        let (service, ledger, balances, business) = setup();
        ledger
            .fail_next_create(PortError::connection("backend unavailable"))
            .await;

        let result = service.create_bill(business, scenario_a_request()).await;
        assert!(matches!(result, Err(BillingError::Store(_))));
        assert_eq!(ledger.bill_count().await, 0);

        // The account was created during the read step but its balance was
        // never touched
        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, Money::zero());
        assert_eq!(account.version, 0);
    }

    #[tokio::test]
    async fn test_balance_write_failure_is_a_consistency_error() {
        let (service, ledger, balances, business) = setup();
        balances
            .fail_next_set_balance(PortError::connection("backend unavailable"))
            .await;

        let result = service.create_bill(business, scenario_a_request()).await;

        match result {
            Err(BillingError::Consistency {
                customer,
                attempted_balance,
                ..
            }) => {
                assert_eq!(customer, "9876543210");
                assert_eq!(attempted_balance, paise(57000));
            }
            other => panic!("expected Consistency error, got {other:?}"),
        }

        // The known failure window: the bill persisted, the account did not
        // move
        assert_eq!(ledger.bill_count().await, 1);
        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, Money::zero());
    }

    #[tokio::test]
    async fn test_lost_balance_race_retries_without_duplicating_the_bill() {
        let (service, ledger, balances, business) = setup();
        balances
            .fail_next_set_balance(PortError::conflict("version check failed"))
            .await;

        let bill = service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        assert_eq!(bill.balance_amount, paise(57000));
        assert_eq!(ledger.bill_count().await, 1);

        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, paise(57000));
    }

    #[tokio::test]
    async fn test_store_timeout_is_a_transient_store_error() {
        let (_, ledger, balances, business) = setup();
        balances.with_latency(Duration::from_millis(50)).await;

        let service = BillingService::new(ledger, balances).with_config(BillingConfig {
            op_timeout: Duration::from_millis(5),
            max_balance_retries: 3,
        });

        let result = service.create_bill(business, scenario_a_request()).await;
        match result {
            Err(ref e @ BillingError::Store(ref port_error)) => {
                assert!(matches!(port_error, PortError::Timeout { .. }));
                assert!(e.is_transient());
            }
            other => panic!("expected Store(Timeout), got {other:?}"),
        }
    }
}

mod update_bill {
    use super::*;

    /// A bill whose balance contribution was ₹200 is edited to ₹350; the
    /// customer balance must move by exactly ₹150.
    #[tokio::test]
    async fn test_edit_recomputes_against_same_previous_balance() {
        let (service, _ledger, balances, business) = setup();

        let mut original = CreateBillRequest::new(asha(), date(2024, 3, 1));
        original.items = vec![BillLineItem::new(1, "Onion", "2", "100")]; // ₹200
        let bill = service.create_bill(business, original).await.unwrap();
        assert_eq!(bill.balance_amount, paise(20000));

        let before = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(before.balance, paise(20000));

        let edit = UpdateBillRequest {
            bill_date: bill.bill_date,
            items: vec![BillLineItem::new(1, "Onion", "3.5", "100")], // ₹350
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: Money::zero(),
            payment: PaymentDetails::cash(),
        };
        let updated = service.update_bill(business, bill.id, edit).await.unwrap();

        assert_eq!(updated.balance_amount, paise(35000));

        let after = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(after.balance, paise(35000));
        assert_eq!(after.balance - before.balance, paise(15000));
    }

    #[tokio::test]
    async fn test_noop_edit_does_not_inflate_the_balance() {
        let (service, _ledger, balances, business) = setup();

        let bill = service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        let edit = UpdateBillRequest {
            bill_date: bill.bill_date,
            items: bill.items.clone(),
            delivery_charge: bill.delivery_charge,
            cleaning_charge: bill.cleaning_charge,
            paid_amount: bill.paid_amount,
            payment: bill.payment.clone(),
        };
        let updated = service.update_bill(business, bill.id, edit).await.unwrap();

        // Re-saving unchanged fields must not double-count the previous
        // balance
        assert_eq!(updated.balance_amount, bill.balance_amount);
        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, paise(57000));
    }

    #[tokio::test]
    async fn test_missing_bill_is_rejected() {
        let (service, _ledger, _balances, business) = setup();

        let edit = UpdateBillRequest {
            bill_date: date(2024, 3, 1),
            items: Vec::new(),
            delivery_charge: Money::zero(),
            cleaning_charge: Money::zero(),
            paid_amount: Money::zero(),
            payment: PaymentDetails::cash(),
        };
        let result = service
            .update_bill(business, core_kernel::BillId::new(), edit)
            .await;
        assert!(matches!(result, Err(BillingError::BillNotFound(_))));
    }
}

mod delete_bill {
    use super::*;

    /// Deleting a customer's only bill returns their balance to zero.
    #[tokio::test]
    async fn test_delete_reverses_balance_contribution() {
        let (service, ledger, balances, business) = setup();

        let bill = service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();
        assert_eq!(
            balances
                .get_account(business, "9876543210")
                .await
                .unwrap()
                .balance,
            paise(57000)
        );

        service.delete_bill(business, bill.id).await.unwrap();

        assert_eq!(ledger.bill_count().await, 0);
        let account = balances.get_account(business, "9876543210").await.unwrap();
        assert_eq!(account.balance, Money::zero());
    }

    #[tokio::test]
    async fn test_missing_bill_is_rejected() {
        let (service, _ledger, _balances, business) = setup();
        let result = service
            .delete_bill(business, core_kernel::BillId::new())
            .await;
        assert!(matches!(result, Err(BillingError::BillNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_customer_skips_adjustment_but_deletes_the_bill() {
        let (service, ledger, balances, business) = setup();

        let bill = service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();
        balances.delete_account(business, "9876543210").await.unwrap();

        // Not fatal: the bill goes, the adjustment is skipped
        service.delete_bill(business, bill.id).await.unwrap();
        assert_eq!(ledger.bill_count().await, 0);
    }
}

mod customer_operations {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent_on_phone() {
        let (service, _ledger, _balances, business) = setup();

        let first = service
            .get_or_create_customer(business, &asha())
            .await
            .unwrap();
        let second = service
            .get_or_create_customer(business, &CustomerKey::new("Different Name", "9876543210"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Asha Traders");
    }

    #[tokio::test]
    async fn test_refresh_returns_authoritative_balance() {
        let (service, _ledger, balances, business) = setup();

        service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        // Something else moves the balance behind our back
        balances
            .adjust_balance(business, "9876543210", paise(-7000))
            .await
            .unwrap();

        let refreshed = service
            .refresh_customer(business, "9876543210")
            .await
            .unwrap();
        assert_eq!(refreshed.balance, paise(50000));
    }

    #[tokio::test]
    async fn test_delete_customer_cascades_to_bills() {
        let (service, ledger, _balances, business) = setup();

        service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();
        let mut second = CreateBillRequest::new(asha(), date(2024, 3, 8));
        second.paid_amount = paise(10000);
        service.create_bill(business, second).await.unwrap();
        assert_eq!(ledger.bill_count().await, 2);

        service.delete_customer(business, "9876543210").await.unwrap();

        assert_eq!(ledger.bill_count().await, 0);
        let result = service.refresh_customer(business, "9876543210").await;
        assert!(matches!(result, Err(BillingError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn test_latest_balance_by_phone_picks_most_recent_bill() {
        let (service, _ledger, _balances, business) = setup();

        service
            .create_bill(business, scenario_a_request())
            .await
            .unwrap();

        let mut later = CreateBillRequest::new(asha(), date(2024, 4, 2));
        later.items = vec![BillLineItem::new(1, "Potato", "10", "30")]; // ₹300
        later.paid_amount = paise(7000); // pays ₹70 of ₹570 + ₹300
        service.create_bill(business, later).await.unwrap();

        let latest = service
            .latest_balance_by_phone(business, "9876543210")
            .await
            .unwrap();
        assert_eq!(latest, paise(57000 + 30000 - 7000));
    }

    #[tokio::test]
    async fn test_latest_balance_for_unknown_phone_is_zero() {
        let (service, _ledger, _balances, business) = setup();
        let latest = service
            .latest_balance_by_phone(business, "0000000000")
            .await
            .unwrap();
        assert_eq!(latest, Money::zero());
    }
}

mod tenant_isolation {
    use super::*;

    #[tokio::test]
    async fn test_same_phone_in_two_businesses_is_independent() {
        let (service, _ledger, balances, business_a) = setup();
        let business_b = BusinessId::new();

        service
            .create_bill(business_a, scenario_a_request())
            .await
            .unwrap();
        service
            .create_bill(business_b, scenario_a_request())
            .await
            .unwrap();

        // Settle only business A's balance
        let mut settle = CreateBillRequest::new(asha(), date(2024, 3, 9));
        settle.paid_amount = paise(57000);
        service.create_bill(business_a, settle).await.unwrap();

        let in_a = balances
            .get_account(business_a, "9876543210")
            .await
            .unwrap();
        let in_b = balances
            .get_account(business_b, "9876543210")
            .await
            .unwrap();
        assert_eq!(in_a.balance, Money::zero());
        assert_eq!(in_b.balance, paise(57000));
    }
}
