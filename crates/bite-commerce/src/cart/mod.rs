//! Shopping cart module.
//!
//! Contains the cart model, its pricing and the persisted store that pages
//! share.

mod cart;
mod pricing;
mod store;

pub use cart::{AddResult, Cart, LineItem, QuantityResult};
pub use pricing::{
    CartTotals, CheckoutSummary, PricingConfig, DEFAULT_DELIVERY_FEE, DEFAULT_TAX_RATE_PERCENT,
};
pub use store::{CartChange, CartStore, MutationOutcome, Subscriber, SubscriptionId, DEFAULT_CART_KEY};
