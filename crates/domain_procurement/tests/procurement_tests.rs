//! Service-level tests for domain_procurement

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{BusinessId, Money};
use domain_procurement::ports::mock::MockProcurementStore;
use domain_procurement::{ProcurementError, ProcurementService, PurchaseRecord};
use rust_decimal_macros::dec;

fn setup() -> (ProcurementService, BusinessId) {
    let store = Arc::new(MockProcurementStore::new());
    (ProcurementService::new(store), BusinessId::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_register_supplier_then_reuse() {
    let (service, business) = setup();

    let first = service
        .register_supplier(business, "Mandi Fresh")
        .await
        .unwrap();
    assert!(first.is_new);

    let again = service
        .register_supplier(business, "mandi fresh")
        .await
        .unwrap();
    assert!(!again.is_new);
    assert_eq!(again.supplier.id, first.supplier.id);
}

#[tokio::test]
async fn test_register_supplier_rejects_blank_name() {
    let (service, business) = setup();
    let result = service.register_supplier(business, "   ").await;
    assert!(matches!(result, Err(ProcurementError::Validation(_))));
}

#[tokio::test]
async fn test_product_lifecycle() {
    let (service, business) = setup();

    let product = service.add_product(business, "Onion").await.unwrap();
    let renamed = service
        .rename_product(business, product.id, "Red Onion")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Red Onion");

    service.delete_product(business, product.id).await.unwrap();
    assert!(service.list_products(business).await.unwrap().is_empty());

    let missing = service.delete_product(business, product.id).await;
    assert!(matches!(missing, Err(ProcurementError::ProductNotFound(_))));
}

#[tokio::test]
async fn test_purchase_history_with_costs() {
    let (service, business) = setup();

    let supplier = service
        .register_supplier(business, "Mandi Fresh")
        .await
        .unwrap()
        .supplier;
    let product = service.add_product(business, "Onion").await.unwrap();

    let purchase = PurchaseRecord::new(business, date(2024, 3, 1))
        .with_supplier(supplier.id)
        .with_product(product.id)
        .with_quantity(dec!(25), Money::from_paise(2200)); // 25 kg at ₹22
    let recorded = service.record_purchase(business, purchase).await.unwrap();
    assert_eq!(recorded.cost().paise(), 55000); // ₹550

    let history = service.list_purchases(business).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].supplier_id, Some(supplier.id));
}

#[tokio::test]
async fn test_deleting_supplier_clears_their_purchases() {
    let (service, business) = setup();

    let supplier = service
        .register_supplier(business, "Mandi Fresh")
        .await
        .unwrap()
        .supplier;
    let purchase = PurchaseRecord::new(business, date(2024, 3, 1)).with_supplier(supplier.id);
    service.record_purchase(business, purchase).await.unwrap();

    service.delete_supplier(business, supplier.id).await.unwrap();
    assert!(service.list_purchases(business).await.unwrap().is_empty());

    let missing = service.delete_supplier(business, supplier.id).await;
    assert!(matches!(
        missing,
        Err(ProcurementError::SupplierNotFound(_))
    ));
}
