//! The persisted cart shared by every page.

use crate::cart::{AddResult, Cart, CartTotals, CheckoutSummary, LineItem, PricingConfig, QuantityResult};
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::Money;
use crate::notice::{Notice, NoticeSink};
use bite_cache::{Cache, KeyValueStore};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Storage slot the cart lives in unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Callback run after every mutation with the fresh cart.
pub type Subscriber = Rc<dyn Fn(&Cart)>;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a mutation did to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    Inserted { id: ItemId },
    Incremented { id: ItemId, quantity: i64 },
    QuantitySet { id: ItemId, quantity: i64 },
    Removed { item: LineItem },
    Cleared,
    /// The target id was not in the cart.
    Unchanged,
}

/// Result of a store mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub change: CartChange,
    /// False when the write to storage failed. The in-memory cart still
    /// reflects the change.
    pub persisted: bool,
}

/// Single source of truth for the cart.
///
/// Every mutation writes the whole cart to storage, then calls each
/// subscriber with a copy of the new state before returning.
///
/// ```
/// use bite_cache::MemoryStore;
/// use bite_commerce::cart::CartStore;
/// use bite_commerce::money::Money;
/// use bite_commerce::notice::NoticeQueue;
/// use std::rc::Rc;
///
/// let store = CartStore::open(MemoryStore::new(), "cart", Rc::new(NoticeQueue::new()));
/// store.add_item("p1", "Pizza", Money::new(1000), "veg").unwrap();
/// store.add_item("p1", "Pizza", Money::new(1000), "veg").unwrap();
///
/// let totals = store.totals().unwrap();
/// assert_eq!(totals.count, 2);
/// assert_eq!(totals.subtotal.amount_minor, 2000);
/// ```
pub struct CartStore<S: KeyValueStore> {
    cache: Cache<S>,
    key: String,
    cart: RefCell<Cart>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    notices: Rc<dyn NoticeSink>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored under `key`.
    ///
    /// A missing, unreadable or corrupt slot yields an empty cart.
    pub fn open(store: S, key: impl Into<String>, notices: Rc<dyn NoticeSink>) -> Self {
        let cache = Cache::new(store);
        let key = key.into();
        let cart = load_cart(&cache, &key);

        Self {
            cache,
            key,
            cart: RefCell::new(cart),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            notices,
        }
    }

    /// Add one unit of an item.
    ///
    /// A repeat add only bumps the quantity; the name, price and type from
    /// the first add are kept.
    pub fn add_item(
        &self,
        id: impl Into<ItemId>,
        name: &str,
        price: Money,
        kind: &str,
    ) -> Result<MutationOutcome, CommerceError> {
        let id = id.into();
        let result = self
            .cart
            .borrow_mut()
            .add_item(id.clone(), name, price, kind)?;

        let (change, notice) = match result {
            AddResult::Inserted => {
                info!(item = %id, "Added item to cart");
                (
                    CartChange::Inserted { id },
                    Notice::success(format!("{} added to cart!", name)),
                )
            }
            AddResult::Incremented { quantity } => {
                info!(item = %id, quantity, "Incremented cart item");
                (
                    CartChange::Incremented { id, quantity },
                    Notice::success(format!("{} quantity updated!", name)),
                )
            }
        };

        let outcome = self.commit(change);
        self.notices.notify(notice);
        Ok(outcome)
    }

    /// Set an item's quantity. Zero or less removes it; an unknown id
    /// changes nothing but is still persisted and announced.
    pub fn set_quantity(&self, id: &ItemId, quantity: i64) -> MutationOutcome {
        let result = self.cart.borrow_mut().set_quantity(id, quantity);

        let change = match result {
            QuantityResult::Updated { quantity } => {
                info!(item = %id, quantity, "Updated cart item quantity");
                CartChange::QuantitySet {
                    id: id.clone(),
                    quantity,
                }
            }
            QuantityResult::Removed(item) => {
                info!(item = %id, requested = quantity, "Removed cart item via quantity");
                self.notices.notify(Notice::info("Item removed from cart"));
                CartChange::Removed { item }
            }
            QuantityResult::Missing => {
                debug!(item = %id, "Quantity update for item not in cart");
                CartChange::Unchanged
            }
        };

        self.commit(change)
    }

    /// Remove an item if present. Calling it twice is the same as once.
    pub fn remove_item(&self, id: &ItemId) -> MutationOutcome {
        let removed = self.cart.borrow_mut().remove_item(id);

        let change = match removed {
            Some(item) => {
                info!(item = %id, "Removed cart item");
                self.notices
                    .notify(Notice::info(format!("{} removed from cart", item.name)));
                CartChange::Removed { item }
            }
            None => CartChange::Unchanged,
        };

        self.commit(change)
    }

    /// Empty the cart, e.g. after a successful checkout.
    pub fn clear(&self) -> MutationOutcome {
        self.cart.borrow_mut().clear();
        info!("Cleared cart");
        self.commit(CartChange::Cleared)
    }

    /// Copy of the current line items.
    pub fn items(&self) -> Vec<LineItem> {
        self.cart.borrow().items().to_vec()
    }

    /// Copy of the whole cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Look up one item.
    pub fn get(&self, id: &ItemId) -> Option<LineItem> {
        self.cart.borrow().get(id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.borrow().is_empty()
    }

    /// Count and subtotal, recomputed from the current items.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        self.cart.borrow().totals()
    }

    /// Subtotal, delivery fee, tax and total.
    pub fn summary(&self, pricing: &PricingConfig) -> Result<CheckoutSummary, CommerceError> {
        CheckoutSummary::from_totals(&self.totals()?, pricing)
    }

    /// Run `callback` after every mutation.
    pub fn subscribe(&self, callback: impl Fn(&Cart) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Stop calling a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Re-read the cart from storage, e.g. after another tab changed it.
    pub fn reload(&self) {
        let cart = load_cart(&self.cache, &self.key);
        *self.cart.borrow_mut() = cart;
        self.notify_subscribers();
    }

    /// The storage slot name.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn commit(&self, change: CartChange) -> MutationOutcome {
        let persisted = self.persist();
        self.notify_subscribers();
        MutationOutcome { change, persisted }
    }

    fn persist(&self) -> bool {
        let result = self.cache.set(&self.key, &*self.cart.borrow());
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist cart");
                self.notices
                    .notify(Notice::error("Could not save your cart. Changes may be lost on reload."));
                false
            }
        }
    }

    fn notify_subscribers(&self) {
        // Subscribers may call back into the store.
        let snapshot = self.snapshot();
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in subscribers {
            callback(&snapshot);
        }
    }
}

fn load_cart<S: KeyValueStore>(cache: &Cache<S>, key: &str) -> Cart {
    match cache.get::<Vec<LineItem>>(key) {
        Ok(Some(items)) => {
            let cart = Cart::from_items(items);
            debug!(key, items = cart.unique_item_count(), "Loaded cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "Stored cart unreadable, starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{NoticeKind, NoticeQueue};
    use bite_cache::MemoryStore;

    fn inr(amount: i64) -> Money {
        Money::new(amount * 100)
    }

    fn open(store: Rc<MemoryStore>) -> (CartStore<Rc<MemoryStore>>, Rc<NoticeQueue>) {
        let notices = Rc::new(NoticeQueue::new());
        let cart = CartStore::open(store, DEFAULT_CART_KEY, notices.clone());
        (cart, notices)
    }

    #[test]
    fn test_add_persists_before_notifying() {
        let backing = Rc::new(MemoryStore::new());
        let (store, _) = open(backing.clone());

        let seen = Rc::new(RefCell::new(None));
        let seen_clone = seen.clone();
        let raw = backing.clone();
        store.subscribe(move |_cart| {
            *seen_clone.borrow_mut() = raw.get_raw(DEFAULT_CART_KEY).unwrap();
        });

        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        let stored = seen.borrow().clone().unwrap();
        assert!(stored.contains("\"p1\""));
    }

    #[test]
    fn test_corrupt_storage_is_empty_cart() {
        let backing = Rc::new(MemoryStore::with_entries([(DEFAULT_CART_KEY, "[{oops")]));
        let (store, _) = open(backing);
        assert!(store.is_empty());
        assert_eq!(store.totals().unwrap().count, 0);
    }

    #[test]
    fn test_quantity_overflow_reports_error() {
        let (store, _) = open(Rc::new(MemoryStore::new()));
        store.add_item("a", "Water", inr(0), "veg").unwrap();
        store.add_item("b", "Salt", inr(0), "veg").unwrap();

        assert!(store.set_quantity(&ItemId::new("a"), i64::MAX).persisted);
        store.set_quantity(&ItemId::new("b"), 1);

        assert!(matches!(store.totals(), Err(CommerceError::Overflow)));
        assert!(matches!(
            store.summary(&PricingConfig::default()),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_stored_huge_quantity_reports_error() {
        let raw = format!(
            r#"[{{"id":"a","name":"Water","price":0,"type":"veg","quantity":{}}},
               {{"id":"b","name":"Salt","price":1.5,"type":"veg","quantity":1}}]"#,
            i64::MAX
        );
        let backing = Rc::new(MemoryStore::with_entries([(DEFAULT_CART_KEY, raw.as_str())]));
        let (store, _) = open(backing);

        assert_eq!(store.items().len(), 2);
        assert!(matches!(store.totals(), Err(CommerceError::Overflow)));

        store.remove_item(&ItemId::new("b"));
        assert_eq!(store.totals().unwrap().count, i64::MAX);
    }

    #[test]
    fn test_wrong_shape_is_empty_cart() {
        let backing = Rc::new(MemoryStore::with_entries([(DEFAULT_CART_KEY, r#"{"p1": 2}"#)]));
        let (store, _) = open(backing);
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_failure_keeps_mutation_and_notifies() {
        let backing = Rc::new(MemoryStore::new());
        let (store, notices) = open(backing.clone());
        backing.reject_writes(true);

        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        store.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        let outcome = store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        assert!(!outcome.persisted);
        assert_eq!(store.items().len(), 1);
        assert_eq!(calls.get(), 1);

        let drained = notices.drain();
        assert!(drained.iter().any(|n| n.kind == NoticeKind::Error));
        assert!(backing.get_raw(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_notice_messages() {
        let (store, notices) = open(Rc::new(MemoryStore::new()));

        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        store.remove_item(&ItemId::new("p1"));
        store.add_item("p2", "Soda", inr(2), "veg").unwrap();
        store.set_quantity(&ItemId::new("p2"), 0);

        let messages: Vec<String> = notices.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Pizza added to cart!",
                "Pizza quantity updated!",
                "Pizza removed from cart",
                "Soda added to cart!",
                "Item removed from cart",
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let (store, _) = open(Rc::new(MemoryStore::new()));
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let id = store.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        store.clear();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_subscriber_may_mutate_store() {
        let store = Rc::new(CartStore::open(
            MemoryStore::new(),
            DEFAULT_CART_KEY,
            Rc::new(NoticeQueue::new()),
        ));
        let weak = Rc::downgrade(&store);
        store.subscribe(move |cart| {
            if cart.item_count().unwrap() > 2 {
                if let Some(store) = weak.upgrade() {
                    store.set_quantity(&ItemId::new("p1"), 2);
                }
            }
        });

        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        assert_eq!(store.get(&ItemId::new("p1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_items_is_a_copy() {
        let (store, _) = open(Rc::new(MemoryStore::new()));
        store.add_item("p1", "Pizza", inr(10), "veg").unwrap();

        let mut items = store.items();
        items[0].quantity = 99;
        items.clear();

        assert_eq!(store.get(&ItemId::new("p1")).unwrap().quantity, 1);
    }

    #[test]
    fn test_reload_picks_up_external_write() {
        let backing = Rc::new(MemoryStore::new());
        let (store, _) = open(backing.clone());
        backing
            .set_raw(
                DEFAULT_CART_KEY,
                r#"[{"id":"p9","name":"Lassi","price":60,"type":"veg","quantity":3}]"#,
            )
            .unwrap();

        store.reload();
        assert_eq!(store.totals().unwrap().count, 3);
    }

    #[test]
    fn test_summary() {
        let (store, _) = open(Rc::new(MemoryStore::new()));
        store.add_item("p1", "Biryani", inr(200), "non-veg").unwrap();
        let summary = store.summary(&PricingConfig::default()).unwrap();
        assert_eq!(summary.total, inr(250));
    }
}
