use std::sync::Arc;

use super::*;
use crate::storage::MemoryStore;

fn product(id: &str, stock: Option<u32>) -> Product {
    let mut p = Product::new(id, format!("Producto {id}"), Decimal::new(10, 0));
    p.stock = stock;
    p
}

#[test]
fn delta_on_empty_cart_clamps_to_stock_and_notifies() {
    let mut cart = Cart::new();
    let p = product("1", Some(3));

    let outcome = cart.add(&p, 5, AddMode::Delta).expect("product has an id");
    assert_eq!(outcome.qty, 3);
    assert!(matches!(
        outcome.notice,
        Some(CartNotice::MaxReached { max: 3, .. })
    ));

    let again = cart.add(&p, 1, AddMode::Delta).unwrap();
    assert_eq!(again.qty, 3);
    assert!(again.notice.is_some());
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(&p.id).unwrap().qty, 3);
}

#[test]
fn set_zero_floors_at_one() {
    let mut cart = Cart::new();
    let p = product("1", Some(10));
    let outcome = cart.add(&p, 0, AddMode::Set).unwrap();
    assert_eq!(outcome.qty, 1);
    assert!(outcome.notice.is_none());
}

#[test]
fn set_replaces_existing_quantity() {
    let mut cart = Cart::new();
    let p = product("1", Some(10));
    cart.add(&p, 2, AddMode::Delta);
    let outcome = cart.add(&p, 7, AddMode::Set).unwrap();
    assert_eq!(outcome.qty, 7);
    assert_eq!(cart.total_units(), 7);
}

#[test]
fn delta_below_one_stays_at_one() {
    let mut cart = Cart::new();
    let p = product("1", Some(10));
    cart.add(&p, 2, AddMode::Delta);
    let outcome = cart.add(&p, -5, AddMode::Delta).unwrap();
    assert_eq!(outcome.qty, 1);
    assert!(outcome.notice.is_none());
}

#[test]
fn unknown_stock_defaults_ceiling_to_999() {
    let mut cart = Cart::new();
    let p = product("1", None);
    let outcome = cart.add(&p, 5_000, AddMode::Set).unwrap();
    assert_eq!(outcome.qty, 999);
}

#[test]
fn product_without_id_is_ignored() {
    let mut cart = Cart::new();
    let p = product("", Some(3));
    assert!(cart.add(&p, 1, AddMode::Delta).is_none());
    assert!(cart.is_empty());
}

#[test]
fn remove_missing_id_is_noop() {
    let mut cart = Cart::new();
    cart.add(&product("1", Some(3)), 1, AddMode::Delta);
    assert!(!cart.remove(&EntityId::from("nope")));
    assert_eq!(cart.len(), 1);
}

#[test]
fn remove_and_clear() {
    let mut cart = Cart::new();
    cart.add(&product("1", Some(3)), 1, AddMode::Delta);
    cart.add(&product("2", Some(3)), 1, AddMode::Delta);
    assert!(cart.remove(&EntityId::from("1")));
    assert_eq!(cart.len(), 1);
    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn subtotal_uses_final_price() {
    let mut cart = Cart::new();
    let mut p = product("1", Some(10));
    p.discount_pct = Decimal::new(10, 0);
    cart.add(&p, 3, AddMode::Delta);
    assert_eq!(cart.subtotal(), Decimal::new(27, 0));
}

#[test]
fn store_persists_and_restores_identical_lines() {
    let storage = Arc::new(MemoryStore::new());

    let mut store = CartStore::load(Arc::clone(&storage)).unwrap();
    store.add(&product("1", Some(5)), 2, AddMode::Delta).unwrap();
    store.add(&product("2", None), 4, AddMode::Set).unwrap();
    let saved = store.cart().clone();

    let restored = CartStore::load(Arc::clone(&storage)).unwrap();
    assert_eq!(restored.cart(), &saved);
    let ids: Vec<_> = restored
        .cart()
        .lines()
        .iter()
        .map(|l| (l.product.id.as_str().to_string(), l.qty))
        .collect();
    assert_eq!(ids, vec![("1".to_string(), 2), ("2".to_string(), 4)]);
}

#[test]
fn store_discards_corrupt_value() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(CART_STORAGE_KEY, "{not json").unwrap();
    let store = CartStore::load(storage).unwrap();
    assert!(store.cart().is_empty());
}

#[test]
fn store_clear_persists_empty_cart() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = CartStore::load(Arc::clone(&storage)).unwrap();
    store.add(&product("1", Some(5)), 1, AddMode::Delta).unwrap();
    store.clear().unwrap();
    assert_eq!(storage.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}
