//! Domain types for the cart.
//!
//! The cart is an ordered list of line items, at most one per
//! `(package_type, reviews)` pair, none with a zero quantity. The mutation
//! methods on [`CartState`] uphold both rules and carry no side effects, so
//! they can be exercised without a display or storage.

use crate::error::{CartError, Result};
use crate::label::{Money, item_label};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One purchasable entry in the cart.
///
/// Serialized with the field names the site's storage slot uses:
/// `{"type", "reviews", "price", "quantity"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Package identifier, e.g. `basic-package`
    #[serde(rename = "type")]
    pub package_type: String,
    /// Count or tier label, e.g. `10` or `3 months`
    pub reviews: String,
    /// Unit price in dollars
    pub price: f64,
    /// Always at least 1
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item with quantity 1
    #[must_use]
    pub fn new(package_type: impl Into<String>, reviews: impl Into<String>, price: f64) -> Self {
        Self {
            package_type: package_type.into(),
            reviews: reviews.into(),
            price,
            quantity: 1,
        }
    }

    /// Whether this item is the entry for `(package_type, reviews)`
    #[must_use]
    pub fn matches(&self, package_type: &str, reviews: &str) -> bool {
        self.package_type == package_type && self.reviews == reviews
    }

    /// Unit price
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        Money::new(self.price)
    }

    /// `price * quantity`
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }

    /// Human-readable label, e.g. `10 Reviews (Basic Package)`
    #[must_use]
    pub fn label(&self) -> String {
        item_label(&self.reviews, &self.package_type)
    }
}

/// Outcome of [`CartState::decrease`]
#[derive(Clone, Debug, PartialEq)]
pub enum Decrease {
    /// Quantity dropped and the item stays in place
    Decremented {
        /// New quantity
        quantity: u32,
    },
    /// Quantity would have reached zero, so the item was removed
    Removed(LineItem),
}

/// State of the cart feature
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in insertion order
    pub items: Vec<LineItem>,
    /// Whether the cart display is open
    pub cart_open: bool,
    /// Whether the "added to cart" notification is showing
    pub notification_visible: bool,
    /// Bumped on every add; a hide only applies to the current generation
    pub notification_generation: u64,
    /// Bumped on every projection request
    pub revision: u64,
    /// Last informational message shown to the user (if any)
    pub last_message: Option<String>,
    /// When the last order was handed to the messaging link
    pub last_checkout_at: Option<DateTime<Utc>>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart holding `items` (e.g. restored from storage)
    #[must_use]
    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Number of distinct line items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Sum of quantities (the badge count)
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// `sum(price * quantity)`
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CartError::StaleIndex {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Adds one unit of `(package_type, reviews)`.
    ///
    /// Merges into the existing entry when there is one; otherwise appends.
    /// Returns the index of the affected item. The price of an existing
    /// entry is left as first added.
    pub fn add_item(&mut self, package_type: &str, reviews: &str, price: f64) -> usize {
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.matches(package_type, reviews))
        {
            self.items[index].quantity = self.items[index].quantity.saturating_add(1);
            index
        } else {
            self.items.push(LineItem::new(package_type, reviews, price));
            self.items.len() - 1
        }
    }

    /// Adds one to the quantity at `index` and returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StaleIndex`] if `index` is out of range.
    pub fn increase(&mut self, index: usize) -> Result<u32> {
        self.check_index(index)?;
        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_add(1);
        Ok(item.quantity)
    }

    /// Takes one off the quantity at `index`, removing the item at 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StaleIndex`] if `index` is out of range.
    pub fn decrease(&mut self, index: usize) -> Result<Decrease> {
        self.check_index(index)?;
        let item = &mut self.items[index];
        if item.quantity > 1 {
            item.quantity -= 1;
            Ok(Decrease::Decremented {
                quantity: item.quantity,
            })
        } else {
            Ok(Decrease::Removed(self.items.remove(index)))
        }
    }

    /// Removes the item at `index` regardless of quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StaleIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<LineItem> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Empties the cart
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Every user intent the cart reacts to.
///
/// Indices are zero-based positions in [`CartState::items`] as last rendered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CartAction {
    /// Add one unit of a package
    AddItem {
        /// Package identifier
        package_type: String,
        /// Count or tier label
        reviews: String,
        /// Unit price in dollars
        price: f64,
    },

    /// Add one to the quantity at `index`
    IncreaseQuantity {
        /// Item position
        index: usize,
    },

    /// Take one off the quantity at `index` (removing it at 1)
    DecreaseQuantity {
        /// Item position
        index: usize,
    },

    /// Remove the item at `index`
    RemoveItem {
        /// Item position
        index: usize,
    },

    /// Empty the cart
    ClearCart,

    /// Hand the order to the messaging link and reset the cart
    Checkout,

    /// Re-project the current cart onto display and storage
    Render,

    /// Show the cart display
    OpenCart,

    /// Hide the cart display
    CloseCart,

    /// Hide the notification raised by the add with this generation
    HideNotification {
        /// Generation the hide was scheduled for
        generation: u64,
    },
}

impl CartAction {
    /// Convenience constructor for [`CartAction::AddItem`]
    #[must_use]
    pub fn add(package_type: impl Into<String>, reviews: impl Into<String>, price: f64) -> Self {
        Self::AddItem {
            package_type: package_type.into(),
            reviews: reviews.into(),
            price,
        }
    }
}
