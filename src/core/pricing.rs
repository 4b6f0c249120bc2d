//! Pricing engine - pure order arithmetic.
//!
//! All amounts are integers in the smallest currency unit. Tax and deposit are
//! minimums the customer has to meet, so every fractional result is rounded
//! up (ceiling), never down or to nearest. Unit prices are not clamped: an
//! option with a large enough discount can produce a zero or negative price.

use crate::core::order::{LineItem, OptionSelections};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Share of the total that must be paid up front (0.5).
pub const DEPOSIT_FRACTION: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Tax rate used when the configuration does not name one (10%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// How order totals are computed.
///
/// Two totals formulas exist: with tax (`total = subtotal + ceil(subtotal * rate)`)
/// and without (`total = subtotal`). Which one applies is an explicit setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Whether tax is added on top of the subtotal
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    /// Tax rate as a fraction (0.10 = 10%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

const fn default_tax_enabled() -> bool {
    true
}

const fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_enabled: default_tax_enabled(),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

impl PricingConfig {
    /// Configuration for the formula without tax.
    #[must_use]
    pub const fn without_tax() -> Self {
        Self {
            tax_enabled: false,
            tax_rate: Decimal::ZERO,
        }
    }

    /// Configuration with tax at the given rate.
    #[must_use]
    pub const fn with_tax(tax_rate: Decimal) -> Self {
        Self {
            tax_enabled: true,
            tax_rate,
        }
    }
}

/// Computed money figures for a whole order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of all line subtotals
    pub subtotal: i64,
    /// Tax on the subtotal, zero when tax is disabled
    pub tax: i64,
    /// Amount the customer owes
    pub total: i64,
    /// Deposit (DP) due now
    pub deposit: i64,
}

/// Price of one portion: base price plus every selected option's delta.
#[must_use]
pub fn unit_price(base_price: i64, selections: &OptionSelections) -> i64 {
    base_price + selections.price_delta()
}

/// Price of `quantity` portions.
#[must_use]
pub fn line_subtotal(base_price: i64, selections: &OptionSelections, quantity: u32) -> i64 {
    unit_price(base_price, selections) * i64::from(quantity)
}

/// Sum of the line subtotals.
#[must_use]
pub fn order_subtotal(items: &[LineItem]) -> i64 {
    items.iter().map(|item| item.subtotal).sum()
}

/// `ceil(subtotal * rate)`.
#[must_use]
pub fn tax_amount(subtotal: i64, tax_rate: Decimal) -> i64 {
    ceil_mul(subtotal, tax_rate)
}

/// `ceil(total * 0.5)`.
#[must_use]
pub fn deposit_amount(total: i64) -> i64 {
    ceil_mul(total, DEPOSIT_FRACTION)
}

/// Subtotal, tax, total and deposit for a list of line items.
#[must_use]
pub fn order_totals(items: &[LineItem], config: &PricingConfig) -> OrderTotals {
    totals_from_subtotal(order_subtotal(items), config)
}

/// Same as [`order_totals`] when only the subtotal is known.
#[must_use]
pub fn totals_from_subtotal(subtotal: i64, config: &PricingConfig) -> OrderTotals {
    let tax = if config.tax_enabled {
        tax_amount(subtotal, config.tax_rate)
    } else {
        0
    };
    let total = subtotal + tax;

    OrderTotals {
        subtotal,
        tax,
        total,
        deposit: deposit_amount(total),
    }
}

// Rates are validated to 0..=1 at config load, so the product always fits i64.
fn ceil_mul(amount: i64, factor: Decimal) -> i64 {
    let product = (Decimal::from(amount) * factor).ceil();
    product
        .to_i64()
        .unwrap_or(if product.is_sign_negative() { i64::MIN } else { i64::MAX })
}
