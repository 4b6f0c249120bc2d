//! Booking wizard - step gating for the reservation flow.
//!
//! The flow is linear: customer data → menu selection → payment →
//! confirmation. Moving forward requires the current step's gate to pass;
//! a blocked move is a silent no-op (the action is simply unavailable).
//! Moving back is never gated. Confirmation is terminal and is only entered
//! once the booking has been stored.

use crate::{
    core::{
        menu::MenuItemDetail,
        order::{Cart, OptionSelections},
        pricing::{OrderTotals, PricingConfig},
    },
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Seating used when the customer does not pick one.
pub const DEFAULT_SEATING: &str = "Indoor";

/// Customer fields collected in the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    /// Name of the person booking
    #[serde(default)]
    pub customer_name: String,
    /// WhatsApp number
    #[serde(default)]
    pub phone: String,
    /// Optional Instagram handle
    #[serde(default)]
    pub instagram: Option<String>,
    /// Booking date as entered (`YYYY-MM-DD`)
    #[serde(default)]
    pub booking_date: String,
    /// Party size
    #[serde(default = "default_pax")]
    pub pax: i32,
    /// Seating choice (spot name or free text)
    #[serde(default = "default_seating")]
    pub seating: String,
}

const fn default_pax() -> i32 {
    2
}

fn default_seating() -> String {
    DEFAULT_SEATING.to_string()
}

impl Default for CustomerData {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            phone: String::new(),
            instagram: None,
            booking_date: String::new(),
            pax: default_pax(),
            seating: default_seating(),
        }
    }
}

/// Step 1 gate: name, phone and date filled in, at least one diner.
#[must_use]
pub fn can_advance_customer_data(customer: &CustomerData) -> bool {
    !customer.customer_name.is_empty()
        && !customer.phone.is_empty()
        && !customer.booking_date.is_empty()
        && customer.pax >= 1
}

/// Step 2 gate: at least one line item, whatever its value.
#[must_use]
pub fn can_advance_menu_selection(cart: &Cart) -> bool {
    !cart.is_empty()
}

/// Step 3 gate: a payment proof has been attached.
#[must_use]
pub fn can_submit(payment_proof: Option<&str>) -> bool {
    payment_proof.is_some_and(|proof| !proof.is_empty())
}

/// Names of the item's variants that have no chosen option.
#[must_use]
pub fn missing_variants(menu: &MenuItemDetail, selections: &OptionSelections) -> Vec<String> {
    menu.variants
        .iter()
        .map(|detail| &detail.variant.name)
        .filter(|name| !selections.contains(name))
        .cloned()
        .collect()
}

/// Every variant of `menu` must have exactly one chosen option before the
/// item can become a line item.
///
/// # Errors
/// Returns [`Error::IncompleteSelection`] naming the variants left open.
pub fn ensure_selection_complete(menu: &MenuItemDetail, selections: &OptionSelections) -> Result<()> {
    let missing = missing_variants(menu, selections);
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::IncompleteSelection {
        menu: menu.item.name.clone(),
        missing,
    })
}

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Customer data entry
    CustomerData,
    /// Menu browsing and cart
    MenuSelection,
    /// Payment proof upload and submission
    Payment,
    /// Booking stored; terminal
    Confirmation,
}

impl WizardStep {
    /// One-based step number, as shown in the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::CustomerData => 1,
            Self::MenuSelection => 2,
            Self::Payment => 3,
            Self::Confirmation => 4,
        }
    }
}

/// State of one customer's booking session.
///
/// Owns its cart; a wizard is never shared between sessions.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    pricing: PricingConfig,
    /// Customer fields, edited freely in any step
    pub customer: CustomerData,
    cart: Cart,
    payment_proof: Option<String>,
    booking_id: Option<i64>,
}

impl BookingWizard {
    /// Fresh session at the customer-data step.
    #[must_use]
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            step: WizardStep::CustomerData,
            pricing,
            customer: CustomerData::default(),
            cart: Cart::new(),
            payment_proof: None,
            booking_id: None,
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// The session's cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Attached payment proof reference.
    #[must_use]
    pub fn payment_proof(&self) -> Option<&str> {
        self.payment_proof.as_deref()
    }

    /// Id of the stored booking, once confirmed.
    #[must_use]
    pub const fn booking_id(&self) -> Option<i64> {
        self.booking_id
    }

    /// Current totals of the cart.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.cart.totals(&self.pricing)
    }

    /// Whether the forward action of the current step is available.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::CustomerData => can_advance_customer_data(&self.customer),
            WizardStep::MenuSelection => can_advance_menu_selection(&self.cart),
            WizardStep::Payment => can_submit(self.payment_proof()),
            WizardStep::Confirmation => false,
        }
    }

    /// Moves one step forward when the gate passes.
    ///
    /// Payment → Confirmation goes through [`Self::confirm`] instead, because
    /// it needs the stored booking's id. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        let next = match self.step {
            WizardStep::CustomerData => WizardStep::MenuSelection,
            WizardStep::MenuSelection => WizardStep::Payment,
            WizardStep::Payment | WizardStep::Confirmation => return false,
        };
        if !self.can_advance() {
            return false;
        }
        self.step = next;
        true
    }

    /// Moves one step back without any gate. Returns whether the step changed.
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            WizardStep::MenuSelection => WizardStep::CustomerData,
            WizardStep::Payment => WizardStep::MenuSelection,
            WizardStep::CustomerData | WizardStep::Confirmation => return false,
        };
        self.step = previous;
        true
    }

    /// Adds one portion of `menu` to the cart after checking that every
    /// variant has a chosen option.
    ///
    /// # Errors
    /// Returns [`Error::IncompleteSelection`] or a quantity-cap
    /// [`Error::Validation`]; the cart is left unchanged.
    pub fn add_item(&mut self, menu: &MenuItemDetail, selections: OptionSelections) -> Result<()> {
        ensure_selection_complete(menu, &selections)?;
        self.cart.add(&menu.item, selections)?;
        Ok(())
    }

    /// See [`Cart::update_quantity`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidIndex`] if `index` is out of range.
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<()> {
        self.cart.update_quantity(index, delta)
    }

    /// See [`Cart::remove`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidIndex`] if `index` is out of range.
    pub fn remove_item(&mut self, index: usize) -> Result<()> {
        self.cart.remove(index).map(|_| ())
    }

    /// Records the uploaded payment proof. An empty reference clears it.
    pub fn attach_payment_proof(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        self.payment_proof = (!reference.is_empty()).then_some(reference);
    }

    /// Enters the terminal confirmation step after the booking was stored.
    ///
    /// Only possible from the payment step with a proof attached; otherwise a
    /// no-op. Returns whether the step changed.
    pub fn confirm(&mut self, booking_id: i64) -> bool {
        if self.step != WizardStep::Payment || !self.can_advance() {
            return false;
        }
        self.booking_id = Some(booking_id);
        self.step = WizardStep::Confirmation;
        true
    }
}
