//! Cart behaviour as seen by the pages sharing one store.

use bite_cache::{KeyValueStore, MemoryStore};
use bite_commerce::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn inr(amount: i64) -> Money {
    Money::new(amount * 100)
}

fn store_over(backing: Rc<MemoryStore>) -> CartStore<Rc<MemoryStore>> {
    CartStore::open(backing, DEFAULT_CART_KEY, Rc::new(NoticeQueue::new()))
}

#[test]
fn test_pizza_twice() {
    let store = store_over(Rc::new(MemoryStore::new()));

    store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
    store.add_item("p1", "Pizza", inr(10), "veg").unwrap();

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);

    let totals = store.totals().unwrap();
    assert_eq!(totals.count, 2);
    assert_eq!(totals.subtotal, inr(20));
}

#[test]
fn test_soda_set_to_zero() {
    let store = store_over(Rc::new(MemoryStore::new()));

    store.add_item("p2", "Soda", inr(2), "veg").unwrap();
    let outcome = store.set_quantity(&ItemId::new("p2"), 0);

    assert!(matches!(outcome.change, CartChange::Removed { .. }));
    assert!(store.items().iter().all(|i| i.id.as_str() != "p2"));
}

#[test]
fn test_repeat_adds_count_calls_and_keep_first_attributes() {
    let store = store_over(Rc::new(MemoryStore::new()));
    let calls = [
        ("Paneer Tikka", 180, "veg"),
        ("Paneer Tikka (new)", 200, "non-veg"),
        ("Tikka", 1, "vegan"),
        ("Paneer", 999, "veg"),
    ];

    for (name, price, kind) in calls {
        store.add_item("m1", name, inr(price), kind).unwrap();
    }

    let item = store.get(&ItemId::new("m1")).unwrap();
    assert_eq!(item.quantity, calls.len() as i64);
    assert_eq!(item.name, "Paneer Tikka");
    assert_eq!(item.price, inr(180));
    assert_eq!(item.kind, "veg");
}

#[test]
fn test_totals_track_items_through_mutations() {
    let store = store_over(Rc::new(MemoryStore::new()));
    let check = |store: &CartStore<Rc<MemoryStore>>| {
        let items = store.items();
        let totals = store.totals().unwrap();
        let count: i64 = items.iter().map(|i| i.quantity).sum();
        let subtotal: i64 = items
            .iter()
            .map(|i| i.price.amount_minor * i.quantity)
            .sum();
        assert_eq!(totals.count, count);
        assert_eq!(totals.subtotal.amount_minor, subtotal);
    };

    store.add_item("a", "Idli", inr(40), "veg").unwrap();
    check(&store);
    store.add_item("b", "Vada", Money::new(3550), "veg").unwrap();
    check(&store);
    store.set_quantity(&ItemId::new("b"), 7);
    check(&store);
    store.add_item("a", "Idli", inr(40), "veg").unwrap();
    check(&store);
    store.set_quantity(&ItemId::new("a"), -3);
    check(&store);
    store.remove_item(&ItemId::new("b"));
    check(&store);
    assert_eq!(store.totals().unwrap().count, 0);
}

#[test]
fn test_remove_twice_same_as_once() {
    let backing = Rc::new(MemoryStore::new());
    let store = store_over(backing.clone());
    store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
    store.add_item("p2", "Soda", inr(2), "veg").unwrap();

    store.remove_item(&ItemId::new("p1"));
    let items_once = store.items();
    let stored_once = backing.get_raw(DEFAULT_CART_KEY).unwrap();

    let outcome = store.remove_item(&ItemId::new("p1"));
    assert_eq!(outcome.change, CartChange::Unchanged);
    assert_eq!(store.items(), items_once);
    assert_eq!(backing.get_raw(DEFAULT_CART_KEY).unwrap(), stored_once);
}

#[test]
fn test_cart_survives_reload() {
    let backing = Rc::new(MemoryStore::new());
    {
        let store = store_over(backing.clone());
        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        store.add_item("p2", "Soda", inr(2), "veg").unwrap();
        store.set_quantity(&ItemId::new("p2"), 3);
    }

    let store = store_over(backing);
    let items = store.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id.as_str(), "p1");
    assert_eq!(items[1].quantity, 3);
    assert_eq!(store.totals().unwrap().subtotal, inr(16));
}

#[test]
fn test_badge_and_sidebar_stay_in_sync() {
    let store = store_over(Rc::new(MemoryStore::new()));
    let badge = Rc::new(RefCell::new(0_i64));
    let sidebar = Rc::new(RefCell::new(Vec::<String>::new()));

    let badge_view = badge.clone();
    store.subscribe(move |cart| *badge_view.borrow_mut() = cart.item_count().unwrap());
    let sidebar_view = sidebar.clone();
    store.subscribe(move |cart| {
        *sidebar_view.borrow_mut() = cart.items().iter().map(|i| i.name.clone()).collect();
    });

    store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
    store.add_item("p2", "Soda", inr(2), "veg").unwrap();
    store.add_item("p2", "Soda", inr(2), "veg").unwrap();
    assert_eq!(*badge.borrow(), 3);
    assert_eq!(*sidebar.borrow(), vec!["Pizza".to_string(), "Soda".to_string()]);

    store.clear();
    assert_eq!(*badge.borrow(), 0);
    assert!(sidebar.borrow().is_empty());
}

#[test]
fn test_stored_records_are_normalized_on_load() {
    let raw = r#"[
        {"id":"p1","name":"Pizza","price":10,"type":"veg","quantity":1},
        {"id":"p2","name":"Soda","price":2,"type":"veg","quantity":0},
        {"id":"p1","name":"Pizza","price":12,"type":"veg","quantity":2}
    ]"#;
    let store = store_over(Rc::new(MemoryStore::with_entries([(DEFAULT_CART_KEY, raw)])));

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[0].price, inr(10));
}
