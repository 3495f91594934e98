//! Cart totals and the checkout breakdown.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Default flat delivery fee, in major units.
pub const DEFAULT_DELIVERY_FEE: f64 = 40.0;

/// Default tax rate applied to the subtotal.
pub const DEFAULT_TAX_RATE_PERCENT: f64 = 5.0;

/// Item count and subtotal of a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of quantities.
    pub count: i64,
    /// Sum of `price * quantity`.
    pub subtotal: Money,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty() -> Self {
        Self {
            count: 0,
            subtotal: Money::zero(),
        }
    }
}

/// Fees applied on top of the subtotal at checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat fee per order, in major units.
    pub delivery_fee: f64,
    /// Percentage of the subtotal charged as tax.
    pub tax_rate_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee: DEFAULT_DELIVERY_FEE,
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
        }
    }
}

/// Breakdown shown in the cart sidebar and on the checkout page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub tax: Money,
    /// subtotal + delivery fee + tax
    pub total: Money,
}

impl CheckoutSummary {
    /// Price a cart's totals. An empty cart owes nothing, not even delivery.
    pub fn from_totals(totals: &CartTotals, config: &PricingConfig) -> Result<Self, CommerceError> {
        if totals.count == 0 {
            let zero = Money::zero();
            return Ok(Self {
                subtotal: zero,
                delivery_fee: zero,
                tax: zero,
                total: zero,
            });
        }

        let delivery_fee = Money::from_decimal(config.delivery_fee);
        let tax = totals.subtotal.percentage(config.tax_rate_percent);
        let total = Money::try_sum([totals.subtotal, delivery_fee, tax].iter())
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            subtotal: totals.subtotal,
            delivery_fee,
            tax,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_adds_fee_and_tax() {
        let totals = CartTotals {
            count: 2,
            subtotal: Money::new(20000),
        };
        let summary = CheckoutSummary::from_totals(&totals, &PricingConfig::default()).unwrap();

        assert_eq!(summary.delivery_fee.amount_minor, 4000);
        assert_eq!(summary.tax.amount_minor, 1000);
        assert_eq!(summary.total.amount_minor, 25000);
    }

    #[test]
    fn test_empty_cart_summary_is_zero() {
        let summary = CheckoutSummary::from_totals(
            &CartTotals::empty(),
            &PricingConfig::default(),
        )
        .unwrap();
        assert!(summary.total.is_zero());
        assert!(summary.delivery_fee.is_zero());
    }

    #[test]
    fn test_custom_pricing() {
        let config = PricingConfig {
            delivery_fee: 0.0,
            tax_rate_percent: 18.0,
        };
        let totals = CartTotals {
            count: 1,
            subtotal: Money::new(10000),
        };
        let summary = CheckoutSummary::from_totals(&totals, &config).unwrap();
        assert_eq!(summary.total.amount_minor, 11800);
    }

    #[test]
    fn test_pricing_config_partial_override() {
        let config: PricingConfig = serde_json::from_str(r#"{"tax_rate_percent": 12.0}"#).unwrap();
        assert_eq!(config.delivery_fee, DEFAULT_DELIVERY_FEE);
        assert_eq!(config.tax_rate_percent, 12.0);
    }
}
