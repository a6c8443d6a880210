//! End-to-end checkout behaviour against real stores.

use std::sync::Arc;

use agro_core::{Catalog, CatalogItem, CoreError, Money};
use agro_db::{
    CartRepository, DbConfig, KeyValueStore, LoadSource, MemoryStore, MenuRepository,
    SalesRepository, SqliteStore, CART_KEY,
};
use agro_till::print::{NoPrinter, TerminalPrinter};
use agro_till::state::{Register, CHECKOUT_MESSAGE};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::rstest;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn two_item_menu() -> Catalog {
    Catalog::new(vec![
        CatalogItem::new("A", "Item A", Money::from_minor(100)),
        CatalogItem::new("B", "Item B", Money::from_minor(20)),
    ])
    .unwrap()
}

fn register_with_menu(catalog: &Catalog) -> Register {
    let store = MemoryStore::new();
    MenuRepository::new(&store).save(catalog).unwrap();
    Register::with_defaults(Box::new(store))
}

#[test]
fn test_worked_example_subtotal() {
    let mut register = register_with_menu(&two_item_menu());
    register.set_quantity("A", 2);
    register.set_quantity("B", 3);

    let mut printer = TerminalPrinter::new(Vec::new(), 32);
    let outcome = register.checkout(&mut printer, noon()).unwrap();

    assert_eq!(outcome.bill.subtotal, Money::from_minor(260));
    assert_eq!(outcome.bill.items.len(), 2);
    assert_eq!(outcome.bill.items[0].id, "A");
    assert_eq!(outcome.bill.items[0].line_total, Money::from_minor(200));
    assert_eq!(outcome.bill.items[1].line_total, Money::from_minor(60));
    assert_eq!(outcome.message(), CHECKOUT_MESSAGE);

    let text = String::from_utf8(printer.into_inner()).unwrap();
    assert!(text.contains("₹260"));
}

#[rstest]
#[case::nothing(&[])]
#[case::only_unknown_ids(&[("m_retired", 4)])]
fn test_nothing_billable_is_rejected(#[case] entries: &[(&str, i64)]) {
    let mut register = Register::with_defaults(Box::new(MemoryStore::new()));
    for (id, qty) in entries {
        register.set_quantity(id, *qty);
    }
    let cart_before = register.cart().clone();

    let result = register.checkout(&mut NoPrinter, noon());

    assert!(matches!(result, Err(CoreError::EmptyCart)));
    assert!(register.sales().is_empty());
    assert_eq!(register.cart(), &cart_before);
}

#[test]
fn test_checkout_appends_one_bill_and_empties_cart() {
    let mut register = Register::with_defaults(Box::new(MemoryStore::new()));
    register.set_quantity("m_dosa", 2);
    register.set_quantity("m_tea", 3);
    let expected = register.cart().subtotal(register.catalog());

    let outcome = register.checkout(&mut NoPrinter, noon()).unwrap();

    assert_eq!(outcome.bill.subtotal, expected);
    assert_eq!(register.sales().len(), 1);
    assert!(register.cart().is_empty());

    let stored = SalesRepository::new(register.store()).load();
    assert_eq!(stored.source, LoadSource::Stored);
    assert_eq!(stored.value.all(), register.sales().all());
    assert!(CartRepository::new(register.store()).load().value.is_empty());
}

#[test]
fn test_print_failure_still_saves() {
    let mut register = Register::with_defaults(Box::new(MemoryStore::new()));
    register.set_quantity("m_parotta", 4);

    let outcome = register.checkout(&mut NoPrinter, noon()).unwrap();

    assert!(!outcome.bill.printed);
    assert!(outcome.saved);
    assert!(outcome.print_warning.is_some());
    assert!(outcome.message().starts_with("Bill saved to local sales history."));
    assert_eq!(register.sales().len(), 1);
    assert!(register.cart().is_empty());
}

#[test]
fn test_storage_failure_keeps_bill_in_session() {
    let store = Arc::new(MemoryStore::new());
    let mut register = Register::with_defaults(Box::new(Arc::clone(&store)));
    register.set_quantity("m_chicken_rice", 1);

    store.set_reject_writes(true);
    let mut printer = TerminalPrinter::new(Vec::new(), 32);
    let outcome = register.checkout(&mut printer, noon()).unwrap();

    assert!(!outcome.saved);
    assert!(outcome.bill.printed);
    assert_eq!(register.sales().len(), 1);
    assert!(register.cart().is_empty());

    // The store still holds the pre-checkout state
    assert!(SalesRepository::new(&*store).load().value.is_empty());
    assert_eq!(
        CartRepository::new(&*store).load().value.quantity("m_chicken_rice"),
        1
    );
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agropos.db");

    let bill_id = {
        let store = SqliteStore::open(DbConfig::new(&path)).unwrap();
        let mut register = Register::with_defaults(Box::new(store));
        register.set_quantity("m_tea", 2);
        let outcome = register.checkout(&mut NoPrinter, noon()).unwrap();
        register.set_quantity("m_dosa", 5);
        outcome.bill.id
    };

    let store = SqliteStore::open(DbConfig::new(&path)).unwrap();
    let register = Register::with_defaults(Box::new(store));

    assert_eq!(register.restored().cart, LoadSource::Stored);
    assert_eq!(register.restored().sales, LoadSource::Stored);
    assert_eq!(register.restored().menu, LoadSource::Missing);
    assert_eq!(register.cart().quantity("m_dosa"), 5);
    assert_eq!(register.sales().len(), 1);
    assert_eq!(register.sales().all()[0].id, bill_id);
}

#[test]
fn test_created_at_never_goes_backwards_across_sessions() {
    let store = Arc::new(MemoryStore::new());

    let first = {
        let mut register = Register::with_defaults(Box::new(Arc::clone(&store)));
        register.set_quantity("m_tea", 1);
        register.checkout(&mut NoPrinter, noon()).unwrap().bill
    };

    // Clock moved back an hour between sessions
    let mut register = Register::with_defaults(Box::new(Arc::clone(&store)));
    register.set_quantity("m_tea", 1);
    let second = register
        .checkout(&mut NoPrinter, noon() - Duration::hours(1))
        .unwrap()
        .bill;

    assert!(second.created_at >= first.created_at);
    assert_ne!(second.id, first.id);
    assert_eq!(register.sales().len(), 2);
}

#[test]
fn test_corrupt_cart_falls_back_without_touching_sales() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut register = Register::with_defaults(Box::new(Arc::clone(&store)));
        register.set_quantity("m_tea", 1);
        register.checkout(&mut NoPrinter, noon()).unwrap();
    }
    store.set(CART_KEY, "{\"m_tea\": \"lots\"").unwrap();

    let register = Register::with_defaults(Box::new(Arc::clone(&store)));

    assert_eq!(register.restored().cart, LoadSource::Corrupt);
    assert!(register.cart().is_empty());
    assert_eq!(register.sales().len(), 1);
}
