//! Cart and line item types.

use crate::cart::CartTotals;
use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One menu item in the cart.
///
/// Serializes to the persisted record shape
/// `{"id", "name", "price", "type", "quantity"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Menu item identifier; unique within a cart.
    pub id: ItemId,
    /// Display label.
    pub name: String,
    /// Unit price.
    #[serde(with = "crate::money::decimal")]
    pub price: Money,
    /// Classification tag such as `veg` or `non-veg`. Display only.
    #[serde(rename = "type")]
    pub kind: String,
    /// Always at least 1 while the item is in a cart.
    pub quantity: i64,
}

impl LineItem {
    /// Create a line item with quantity 1.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: Money,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            kind: kind.into(),
            quantity: 1,
        }
    }

    /// `price * quantity`.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// Result of adding an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// A new line item was created with quantity 1.
    Inserted,
    /// The existing line item's quantity went up by one.
    Incremented { quantity: i64 },
}

/// Result of setting a quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityResult {
    /// The item now has the requested quantity.
    Updated { quantity: i64 },
    /// The requested quantity was not positive; the item is gone.
    Removed(LineItem),
    /// No item with that id.
    Missing,
}

/// The ordered line items of a shopping cart.
///
/// Ids are unique and every quantity is positive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored records, restoring the invariants.
    ///
    /// Records with a non-positive quantity are dropped. A repeated id is
    /// folded into its first occurrence: attributes of the first record
    /// win and quantities add up.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity <= 0 {
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of an item.
    ///
    /// An existing item only has its quantity incremented; its stored
    /// name, price and type are kept even when the new values differ.
    pub fn add_item(
        &mut self,
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: Money,
        kind: impl Into<String>,
    ) -> Result<AddResult, CommerceError> {
        let id = id.into();

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
            existing.quantity = existing
                .quantity
                .checked_add(1)
                .ok_or(CommerceError::Overflow)?;
            return Ok(AddResult::Incremented {
                quantity: existing.quantity,
            });
        }

        if price.is_negative() {
            return Err(CommerceError::InvalidPrice {
                item: id.into_inner(),
                price: price.display(),
            });
        }

        self.items.push(LineItem::new(id, name, price, kind));
        Ok(AddResult::Inserted)
    }

    /// Set an item's quantity. Zero or less removes the item.
    pub fn set_quantity(&mut self, id: &ItemId, quantity: i64) -> QuantityResult {
        if quantity <= 0 {
            return match self.remove_item(id) {
                Some(item) => QuantityResult::Removed(item),
                None => QuantityResult::Missing,
            };
        }

        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                QuantityResult::Updated { quantity }
            }
            None => QuantityResult::Missing,
        }
    }

    /// Remove an item, returning it if it was present.
    pub fn remove_item(&mut self, id: &ItemId) -> Option<LineItem> {
        let index = self.items.iter().position(|i| &i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of distinct items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> Result<i64, CommerceError> {
        self.items
            .iter()
            .try_fold(0_i64, |count, item| count.checked_add(item.quantity))
            .ok_or(CommerceError::Overflow)
    }

    /// Sum of `price * quantity` over all items.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.items.iter().try_fold(Money::zero(), |subtotal, item| {
            subtotal
                .try_add(&item.total()?)
                .ok_or(CommerceError::Overflow)
        })
    }

    /// Item count and subtotal, computed from the current items.
    pub fn totals(&self) -> Result<CartTotals, CommerceError> {
        Ok(CartTotals {
            count: self.item_count()?,
            subtotal: self.subtotal()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(amount: i64) -> Money {
        Money::new(amount * 100)
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let result = cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();

        assert_eq!(result, AddResult::Inserted);
        assert_eq!(cart.item_count().unwrap(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        let result = cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();

        assert_eq!(result, AddResult::Incremented { quantity: 2 });
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count().unwrap(), 2);
    }

    #[test]
    fn test_repeat_add_keeps_first_attributes() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        cart.add_item("p1", "Pizza Large", inr(15), "non-veg").unwrap();
        cart.add_item("p1", "Pizza XL", inr(20), "vegan").unwrap();

        let item = cart.get(&ItemId::new("p1")).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.name, "Pizza");
        assert_eq!(item.price, inr(10));
        assert_eq!(item.kind, "veg");
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut cart = Cart::new();
        let result = cart.add_item("p1", "Refund", inr(-1), "veg");
        assert!(matches!(result, Err(CommerceError::InvalidPrice { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();

        let result = cart.set_quantity(&ItemId::new("p1"), 5);
        assert_eq!(result, QuantityResult::Updated { quantity: 5 });
        assert_eq!(cart.item_count().unwrap(), 5);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        for quantity in [0, -1, i64::MIN] {
            let mut cart = Cart::new();
            cart.add_item("p2", "Soda", inr(2), "veg").unwrap();

            let result = cart.set_quantity(&ItemId::new("p2"), quantity);
            assert!(matches!(result, QuantityResult::Removed(_)));
            assert!(cart.get(&ItemId::new("p2")).is_none());
        }
    }

    #[test]
    fn test_set_quantity_missing_item() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity(&ItemId::new("ghost"), 3),
            QuantityResult::Missing
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_twice() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        cart.add_item("p2", "Soda", inr(2), "veg").unwrap();

        assert!(cart.remove_item(&ItemId::new("p1")).is_some());
        let after_first = cart.clone();
        assert!(cart.remove_item(&ItemId::new("p1")).is_none());
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        cart.add_item("p1", "Pizza", inr(10), "veg").unwrap();
        cart.add_item("p2", "Soda", inr(2), "veg").unwrap();

        let totals = cart.totals().unwrap();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.subtotal, inr(22));
    }

    #[test]
    fn test_empty_totals() {
        let totals = Cart::new().totals().unwrap();
        assert_eq!(totals.count, 0);
        assert!(totals.subtotal.is_zero());
    }

    #[test]
    fn test_subtotal_overflow() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Gold", Money::new(i64::MAX), "veg")
            .unwrap();
        cart.set_quantity(&ItemId::new("p1"), 2);
        assert!(matches!(cart.subtotal(), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_item_count_overflow() {
        let mut cart = Cart::new();
        cart.add_item("a", "Water", Money::zero(), "veg").unwrap();
        cart.add_item("b", "Salt", Money::zero(), "veg").unwrap();
        cart.set_quantity(&ItemId::new("a"), i64::MAX);

        assert_eq!(cart.item_count().unwrap(), i64::MAX);
        assert_eq!(cart.subtotal().unwrap(), Money::zero());

        cart.set_quantity(&ItemId::new("b"), 1);
        assert!(matches!(cart.item_count(), Err(CommerceError::Overflow)));
        assert!(matches!(cart.totals(), Err(CommerceError::Overflow)));

        cart.remove_item(&ItemId::new("b"));
        assert_eq!(cart.totals().unwrap().count, i64::MAX);
    }

    #[test]
    fn test_from_items_with_huge_quantities() {
        let mut big = LineItem::new("p1", "Pizza", Money::zero(), "veg");
        big.quantity = i64::MAX;
        let cart = Cart::from_items(vec![big.clone(), big.clone()]);
        assert_eq!(cart.get(&ItemId::new("p1")).unwrap().quantity, i64::MAX);
        assert_eq!(cart.item_count().unwrap(), i64::MAX);

        let other = LineItem::new("p2", "Soda", inr(2), "veg");
        let cart = Cart::from_items(vec![big, other]);
        assert!(matches!(cart.totals(), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let mut duplicate = LineItem::new("p1", "Pizza (stale)", inr(99), "veg");
        duplicate.quantity = 2;
        let mut zero = LineItem::new("p3", "Ghost", inr(5), "veg");
        zero.quantity = 0;

        let cart = Cart::from_items(vec![
            LineItem::new("p1", "Pizza", inr(10), "veg"),
            zero,
            duplicate,
        ]);

        assert_eq!(cart.unique_item_count(), 1);
        let item = cart.get(&ItemId::new("p1")).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.name, "Pizza");
    }

    #[test]
    fn test_persisted_shape() {
        let mut cart = Cart::new();
        cart.add_item("p1", "Paneer Tikka", Money::new(24950), "veg")
            .unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "p1",
                "name": "Paneer Tikka",
                "price": 249.5,
                "type": "veg",
                "quantity": 1
            }])
        );
    }

    #[test]
    fn test_reads_records_written_by_the_old_site() {
        let raw = r#"[{"id":"m7","name":"Dosa","price":80,"type":"veg","quantity":2}]"#;
        let cart: Cart = serde_json::from_str(raw).unwrap();
        assert_eq!(cart.items()[0].price, inr(80));
        assert_eq!(cart.item_count().unwrap(), 2);
    }
}
