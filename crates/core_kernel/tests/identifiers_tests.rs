//! Tests for strongly-typed identifiers

use core_kernel::{BillId, BusinessId, CustomerId, SupplierId};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn test_display_includes_prefix() {
    assert!(BillId::new().to_string().starts_with("BILL-"));
    assert!(CustomerId::new().to_string().starts_with("CUST-"));
    assert!(BusinessId::new().to_string().starts_with("BIZ-"));
}

#[test]
fn test_parse_round_trip() {
    let id = SupplierId::new_v7();
    let parsed: SupplierId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn test_parse_bare_uuid() {
    let uuid = Uuid::new_v4();
    let parsed: BillId = uuid.to_string().parse().unwrap();
    assert_eq!(parsed.as_uuid(), &uuid);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("not-a-uuid".parse::<BillId>().is_err());
}

#[test]
fn test_ids_are_unique() {
    let ids: HashSet<_> = (0..100).map(|_| CustomerId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_v7_ids_are_distinct() {
    let ids: HashSet<_> = (0..100).map(|_| BillId::new_v7()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_serde_is_transparent() {
    let id = BillId::new();
    let json = serde_json::to_string(&id).unwrap();
    // Serializes as the bare UUID string, no prefix
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    let back: BillId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}
