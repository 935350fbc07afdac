//! Projection of the cart onto a display surface.
//!
//! [`CartView::project`] is pure: it turns the item list into everything the
//! display needs. [`CartView::apply_to`] then rebuilds the display from
//! scratch, so rendering the same cart twice leaves the display unchanged.

use crate::label::Money;
use crate::types::LineItem;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// One rendered line of the cart list
#[derive(Clone, Debug, PartialEq)]
pub struct ItemRow {
    /// Zero-based position, used by item controls
    pub index: usize,
    /// e.g. `10 Reviews (Basic Package)`
    pub label: String,
    /// e.g. `$12.50 each`
    pub unit_price: String,
    /// Current quantity
    pub quantity: u32,
}

/// Cart badge: total quantity, hidden when zero
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Badge {
    /// Sum of quantities
    pub count: u64,
    /// Whether the badge is shown
    pub visible: bool,
}

impl Badge {
    /// Badge for a quantity sum
    #[must_use]
    pub const fn for_count(count: u64) -> Self {
        Self {
            count,
            visible: count > 0,
        }
    }
}

/// Everything the display shows for one cart snapshot
#[derive(Clone, Debug, PartialEq)]
pub struct CartView {
    /// Rendered lines in cart order
    pub rows: Vec<ItemRow>,
    /// `sum(price * quantity)`
    pub total: Money,
    /// Badge state
    pub badge: Badge,
    /// Whether the "your cart is empty" affordance shows
    pub empty_message_visible: bool,
    /// Whether checkout can be pressed
    pub checkout_enabled: bool,
}

impl CartView {
    /// Projects a cart snapshot
    #[must_use]
    pub fn project(items: &[LineItem]) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemRow {
                index,
                label: item.label(),
                unit_price: format!("{} each", item.unit_price()),
                quantity: item.quantity,
            })
            .collect();
        let count = items.iter().map(|item| u64::from(item.quantity)).sum();
        let is_empty = items.is_empty();

        Self {
            rows,
            total: items.iter().map(LineItem::line_total).sum(),
            badge: Badge::for_count(count),
            empty_message_visible: is_empty,
            checkout_enabled: !is_empty,
        }
    }

    /// Total as displayed, e.g. `$35.00`
    #[must_use]
    pub fn total_text(&self) -> String {
        self.total.to_string()
    }

    /// Rebuilds `display` from this view
    pub fn apply_to(&self, display: &dyn CartDisplay) {
        display.clear_items();
        for row in &self.rows {
            display.append_item(row);
        }
        display.set_total(&self.total_text());
        display.set_badge(self.badge);
        display.set_empty_message_visible(self.empty_message_visible);
        display.set_checkout_enabled(self.checkout_enabled);
    }
}

/// A surface the cart renders onto.
///
/// Methods take `&self`; implementations use interior mutability so one
/// display can be shared by every effect.
pub trait CartDisplay: Send + Sync {
    /// Remove every rendered item row
    fn clear_items(&self);
    /// Append one item row
    fn append_item(&self, row: &ItemRow);
    /// Replace the total text
    fn set_total(&self, text: &str);
    /// Update the badge
    fn set_badge(&self, badge: Badge);
    /// Toggle the empty-cart affordance
    fn set_empty_message_visible(&self, visible: bool);
    /// Enable or disable the checkout control
    fn set_checkout_enabled(&self, enabled: bool);
    /// Open or close the cart display
    fn set_cart_open(&self, open: bool);
    /// Toggle the "added to cart" notification
    fn set_notification_visible(&self, visible: bool);
    /// Show an informational message
    fn show_message(&self, message: &str);
}

/// A single call made on a [`CartDisplay`]
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayCall {
    /// `clear_items`
    ClearItems,
    /// `append_item`
    AppendItem(ItemRow),
    /// `set_total`
    SetTotal(String),
    /// `set_badge`
    SetBadge(Badge),
    /// `set_empty_message_visible`
    SetEmptyMessageVisible(bool),
    /// `set_checkout_enabled`
    SetCheckoutEnabled(bool),
    /// `set_cart_open`
    SetCartOpen(bool),
    /// `set_notification_visible`
    SetNotificationVisible(bool),
    /// `show_message`
    ShowMessage(String),
}

/// What a display currently shows, rebuilt from the calls made on it
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    /// Rendered rows
    pub rows: Vec<ItemRow>,
    /// Total text
    pub total: String,
    /// Badge state
    pub badge: Badge,
    /// Empty-cart affordance
    pub empty_message_visible: bool,
    /// Checkout control
    pub checkout_enabled: bool,
    /// Cart display open
    pub cart_open: bool,
    /// Notification showing
    pub notification_visible: bool,
    /// Messages shown, oldest first
    pub messages: Vec<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: Money::ZERO.to_string(),
            badge: Badge::default(),
            empty_message_visible: true,
            checkout_enabled: false,
            cart_open: false,
            notification_visible: false,
            messages: Vec::new(),
        }
    }
}

impl Screen {
    /// Applies one display call
    pub fn apply(&mut self, call: DisplayCall) {
        match call {
            DisplayCall::ClearItems => self.rows.clear(),
            DisplayCall::AppendItem(row) => self.rows.push(row),
            DisplayCall::SetTotal(text) => self.total = text,
            DisplayCall::SetBadge(badge) => self.badge = badge,
            DisplayCall::SetEmptyMessageVisible(visible) => self.empty_message_visible = visible,
            DisplayCall::SetCheckoutEnabled(enabled) => self.checkout_enabled = enabled,
            DisplayCall::SetCartOpen(open) => self.cart_open = open,
            DisplayCall::SetNotificationVisible(visible) => self.notification_visible = visible,
            DisplayCall::ShowMessage(message) => self.messages.push(message),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cart")?;
        if self.badge.visible {
            write!(f, " [{}]", self.badge.count)?;
        }
        let open = if self.cart_open { "open" } else { "closed" };
        writeln!(f, " ({open})")?;

        if self.empty_message_visible {
            writeln!(f, "  Your cart is empty")?;
        }
        for row in &self.rows {
            writeln!(
                f,
                "  {}. {}  {}  x{}",
                row.index + 1,
                row.label,
                row.unit_price,
                row.quantity
            )?;
        }

        let checkout = if self.checkout_enabled {
            "enabled"
        } else {
            "disabled"
        };
        write!(f, "Total: {}  (checkout {checkout})", self.total)
    }
}

/// Display for the terminal driver.
///
/// Keeps a [`Screen`] the driver prints on demand. Notifications and
/// messages are queued until the driver drains them.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    screen: Mutex<Screen>,
    notices: Mutex<Vec<String>>,
}

impl TerminalDisplay {
    /// Creates a blank display
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of what the display shows
    #[must_use]
    pub fn snapshot(&self) -> Screen {
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes the notices raised since the last drain
    #[must_use]
    pub fn drain_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn apply(&self, call: DisplayCall) {
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(call);
    }

    fn notice(&self, text: String) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
    }
}

impl CartDisplay for TerminalDisplay {
    fn clear_items(&self) {
        self.apply(DisplayCall::ClearItems);
    }

    fn append_item(&self, row: &ItemRow) {
        self.apply(DisplayCall::AppendItem(row.clone()));
    }

    fn set_total(&self, text: &str) {
        self.apply(DisplayCall::SetTotal(text.to_string()));
    }

    fn set_badge(&self, badge: Badge) {
        self.apply(DisplayCall::SetBadge(badge));
    }

    fn set_empty_message_visible(&self, visible: bool) {
        self.apply(DisplayCall::SetEmptyMessageVisible(visible));
    }

    fn set_checkout_enabled(&self, enabled: bool) {
        self.apply(DisplayCall::SetCheckoutEnabled(enabled));
    }

    fn set_cart_open(&self, open: bool) {
        self.apply(DisplayCall::SetCartOpen(open));
    }

    fn set_notification_visible(&self, visible: bool) {
        if visible {
            self.notice("Added to cart!".to_string());
        }
        self.apply(DisplayCall::SetNotificationVisible(visible));
    }

    fn show_message(&self, message: &str) {
        self.notice(message.to_string());
        self.apply(DisplayCall::ShowMessage(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LineItem> {
        let mut basic = LineItem::new("basic-package", "10", 10.0);
        basic.quantity = 2;
        let mut premium = LineItem::new("premium-package", "50", 5.0);
        premium.quantity = 3;
        vec![basic, premium]
    }

    #[test]
    fn projects_rows_total_and_badge() {
        let view = CartView::project(&items());

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].label, "10 Reviews (Basic Package)");
        assert_eq!(view.rows[0].unit_price, "$10.00 each");
        assert_eq!(view.rows[1].index, 1);
        assert_eq!(view.total_text(), "$35.00");
        assert_eq!(view.badge, Badge { count: 5, visible: true });
        assert!(!view.empty_message_visible);
        assert!(view.checkout_enabled);
    }

    #[test]
    fn empty_cart_projection() {
        let view = CartView::project(&[]);

        assert!(view.rows.is_empty());
        assert_eq!(view.total_text(), "$0.00");
        assert!(!view.badge.visible);
        assert!(view.empty_message_visible);
        assert!(!view.checkout_enabled);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let display = TerminalDisplay::new();
        let view = CartView::project(&items());

        view.apply_to(&display);
        let first = display.snapshot();
        view.apply_to(&display);

        assert_eq!(display.snapshot(), first);
        assert_eq!(first.rows.len(), 2);
        assert_eq!(first.total, "$35.00");
    }

    #[test]
    fn terminal_display_queues_notices() {
        let display = TerminalDisplay::new();
        display.set_notification_visible(true);
        display.set_notification_visible(false);
        display.show_message("Your cart is empty. Please add items before ordering.");

        let notices = display.drain_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], "Added to cart!");
        assert!(display.drain_notices().is_empty());
        assert!(!display.snapshot().notification_visible);
    }

    #[test]
    fn screen_text_lists_items_one_based() {
        let display = TerminalDisplay::new();
        CartView::project(&items()).apply_to(&display);
        let text = display.snapshot().to_string();

        assert!(text.starts_with("Cart [5] (closed)"));
        assert!(text.contains("  1. 10 Reviews (Basic Package)  $10.00 each  x2"));
        assert!(text.ends_with("Total: $35.00  (checkout enabled)"));
    }
}
