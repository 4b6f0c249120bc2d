//! Order builder - the customer's in-progress cart.
//!
//! A cart is an ordered list of [`LineItem`]s. Adding a menu item with the same
//! option selection as an existing line bumps that line's quantity instead of
//! appending a duplicate. Each booking session owns its own cart; it is never
//! shared between sessions.

use crate::{
    core::{
        menu,
        message::{CurrencyFormat, format_currency},
        pricing::{self, OrderTotals, PricingConfig},
    },
    entities::menu_item,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// The option chosen for one variant, with its price delta.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Sambal Ijo")
    pub name: String,
    /// Price delta applied on top of the base price
    pub price: i64,
}

/// Variant name → chosen option.
///
/// Backed by a `BTreeMap`, so two selections with the same content compare
/// equal regardless of the order in which options were picked. This equality
/// is the cart's merge key together with the menu item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSelections(BTreeMap<String, SelectedOption>);

impl OptionSelections {
    /// Empty selection, used for menu items without variants.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Chooses `option` for `variant`, replacing an earlier choice.
    pub fn select(&mut self, variant: impl Into<String>, option: SelectedOption) {
        self.0.insert(variant.into(), option);
    }

    /// Whether `variant` has a chosen option.
    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.0.contains_key(variant)
    }

    /// True when nothing has been chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all chosen options' price deltas.
    #[must_use]
    pub fn price_delta(&self) -> i64 {
        self.0.values().map(|option| option.price).sum()
    }

    /// Flattened, human-readable form stored on bookings and used in messages:
    /// `"Pilihan Bagian Ayam: Dada (+Rp 5.000), Pilihan Sambal: Sambal Terasi"`.
    /// Deltas are shown only when non-zero. `None` for an empty selection.
    #[must_use]
    pub fn describe(&self, currency: &CurrencyFormat) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(variant, option)| match option.price {
                0 => format!("{variant}: {}", option.name),
                delta if delta > 0 => format!(
                    "{variant}: {} (+{})",
                    option.name,
                    format_currency(delta, currency)
                ),
                delta => format!(
                    "{variant}: {} ({})",
                    option.name,
                    format_currency(delta, currency)
                ),
            })
            .collect();

        Some(parts.join(", "))
    }
}

impl FromIterator<(String, SelectedOption)> for OptionSelections {
    fn from_iter<T: IntoIterator<Item = (String, SelectedOption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Most portions a single line item may hold.
pub const MAX_LINE_QUANTITY: u32 = 1_000;

fn quantity_exceeded(menu_name: &str) -> Error {
    Error::validation(format!(
        "Quantity for '{menu_name}' cannot exceed {MAX_LINE_QUANTITY} portions"
    ))
}

/// One cart entry: a menu item, its resolved options, quantity and subtotal.
///
/// Invariant: `subtotal == (base_price + selections.price_delta()) * quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Menu item id
    pub menu_id: i64,
    /// Menu item name at the time it was added
    pub menu_name: String,
    /// Menu item base price at the time it was added
    pub base_price: i64,
    /// Chosen options
    pub selections: OptionSelections,
    /// Number of portions, always at least 1 while in a cart
    pub quantity: u32,
    /// Line total
    pub subtotal: i64,
}

impl LineItem {
    fn new(menu: &menu_item::Model, selections: OptionSelections) -> Self {
        let mut item = Self {
            menu_id: menu.id,
            menu_name: menu.name.clone(),
            base_price: menu.price,
            selections,
            quantity: 1,
            subtotal: 0,
        };
        item.recompute();
        item
    }

    /// Price of a single portion.
    #[must_use]
    pub fn unit_price(&self) -> i64 {
        pricing::unit_price(self.base_price, &self.selections)
    }

    /// Sets a positive quantity, rejecting anything above the line cap.
    fn set_quantity(&mut self, quantity: i64) -> Result<()> {
        if quantity > i64::from(MAX_LINE_QUANTITY) {
            return Err(quantity_exceeded(&self.menu_name));
        }
        self.quantity = u32::try_from(quantity)?;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.subtotal = pricing::line_subtotal(self.base_price, &self.selections, self.quantity);
    }

    fn matches(&self, menu_id: i64, selections: &OptionSelections) -> bool {
        self.menu_id == menu_id && &self.selections == selections
    }
}

/// The in-progress order of one booking session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds one portion of `menu` with `selections`.
    ///
    /// Merges into the line with the same menu id and identical selection, or
    /// appends a new line with quantity 1. Completeness of the selection is
    /// the caller's responsibility (see `core::wizard`). Returns the index of
    /// the affected line.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the merged line would exceed
    /// [`MAX_LINE_QUANTITY`].
    pub fn add(&mut self, menu: &menu_item::Model, selections: OptionSelections) -> Result<usize> {
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.matches(menu.id, &selections))
        {
            let item = &mut self.items[index];
            item.set_quantity(i64::from(item.quantity) + 1)?;
            return Ok(index);
        }

        self.items.push(LineItem::new(menu, selections));
        Ok(self.items.len() - 1)
    }

    /// Changes the quantity of line `index` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIndex`] if `index` is out of range, or
    /// [`Error::Validation`] if the line would exceed [`MAX_LINE_QUANTITY`].
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<()> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(Error::InvalidIndex { index, len })?;

        let quantity = i64::from(item.quantity) + i64::from(delta);
        if quantity <= 0 {
            self.items.remove(index);
            return Ok(());
        }

        item.set_quantity(quantity)
    }

    /// Removes line `index` and returns it.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<LineItem> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::InvalidIndex { index, len });
        }
        Ok(self.items.remove(index))
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consumes the cart, returning its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of portions across all lines.
    #[must_use]
    pub fn portion_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Totals for the current contents, computed fresh on every call.
    #[must_use]
    pub fn totals(&self, config: &PricingConfig) -> OrderTotals {
        pricing::order_totals(&self.items, config)
    }
}

/// An order line as submitted by a client: which menu item, which option
/// name per variant, and how many portions. Prices are never taken from the
/// client; they are resolved from the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Menu item id
    pub menu_id: i64,
    /// Variant name → option name
    #[serde(default)]
    pub selections: BTreeMap<String, String>,
    /// Number of portions
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Builds a cart server-side from client order requests.
///
/// Every menu item is loaded from the database and every requested option is
/// resolved to its current price delta. Requests for the same item and
/// selection merge into one line.
///
/// # Errors
/// Returns an error if:
/// - A quantity is zero or a line exceeds [`MAX_LINE_QUANTITY`]
/// - A menu item does not exist
/// - A variant is left without a selection, or an option is unknown
/// - The database query fails
#[instrument(skip(db, requests), fields(lines = requests.len()))]
pub async fn build_cart(db: &DatabaseConnection, requests: &[OrderItemRequest]) -> Result<Cart> {
    let mut cart = Cart::new();

    for request in requests {
        if request.quantity == 0 || request.quantity > MAX_LINE_QUANTITY {
            return Err(Error::validation(format!(
                "Quantity for menu item {} must be between 1 and {MAX_LINE_QUANTITY}",
                request.menu_id
            )));
        }

        let detail = menu::get_menu_item_detail(db, request.menu_id)
            .await?
            .ok_or(Error::MenuItemNotFound {
                id: request.menu_id,
            })?;

        let selections = detail.resolve_selections(&request.selections)?;
        let index = cart.add(&detail.item, selections)?;
        if request.quantity > 1 {
            cart.update_quantity(index, i32::try_from(request.quantity - 1)?)?;
        }
    }

    debug!(lines = cart.len(), portions = cart.portion_count(), "Cart built");
    Ok(cart)
}
