//! Cart domain for the ByteBites storefront.
//!
//! - **Cart**: line items, totals and the persisted [`cart::CartStore`]
//! - **Money**: rupee amounts in paise
//! - **Notices**: transient messages for the user
//!
//! # Example
//!
//! ```rust
//! use bite_commerce::prelude::*;
//! use bite_cache::MemoryStore;
//! use std::rc::Rc;
//!
//! let notices = Rc::new(NoticeQueue::new());
//! let store = CartStore::open(MemoryStore::new(), DEFAULT_CART_KEY, notices.clone());
//!
//! store.add_item("p2", "Soda", Money::new(200), "veg").unwrap();
//! store.set_quantity(&ItemId::new("p2"), 0);
//!
//! assert!(store.get(&ItemId::new("p2")).is_none());
//! assert_eq!(notices.drain().len(), 2);
//! ```

pub mod cart;
pub mod error;
pub mod ids;
pub mod money;
pub mod notice;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    pub use crate::cart::{
        Cart, CartChange, CartStore, CartTotals, CheckoutSummary, LineItem, MutationOutcome,
        PricingConfig, SubscriptionId, DEFAULT_CART_KEY,
    };
    pub use crate::notice::{Notice, NoticeKind, NoticeQueue, NoticeSink};
}
