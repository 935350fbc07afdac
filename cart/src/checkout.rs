//! Order summary and the messaging deep link.
//!
//! Checkout is a one-way hand-off: the cart is rendered into a chat message,
//! wrapped in a deep link, and opened. Nothing is read back.

use crate::error::Result;
use crate::label::Money;
use crate::types::LineItem;
use std::fmt;

/// Shown when checkout is pressed on an empty cart
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Please add items before ordering.";

const GREETING: &str = "🌟 Hello BuyReviewz Team! 🌟";
const INTRO: &str = "I'd like to place an order for Google Reviews:";
const REQUEST: &str = "Could you please guide me on how to provide my Google Business Profile (GBP) link and proceed with the payment? I'm excited to boost my online presence! ✨";
const SIGN_OFF: &str = "Thank you!";

/// One line of the order summary
#[derive(Clone, Debug, PartialEq)]
pub struct OrderLine {
    /// One-based position
    pub position: usize,
    /// Units ordered
    pub quantity: u32,
    /// Item label
    pub label: String,
    /// `price * quantity`
    pub line_total: Money,
}

/// A non-empty cart rendered as an order.
///
/// `Display` yields the chat message text.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSummary {
    /// Lines in cart order
    pub lines: Vec<OrderLine>,
    /// Sum of line totals
    pub total: Money,
}

impl OrderSummary {
    /// Summarises `items`, or `None` for an empty cart
    #[must_use]
    pub fn from_items(items: &[LineItem]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let lines: Vec<OrderLine> = items
            .iter()
            .enumerate()
            .map(|(index, item)| OrderLine {
                position: index + 1,
                quantity: item.quantity,
                label: item.label(),
                line_total: item.line_total(),
            })
            .collect();
        let total = lines.iter().map(|line| line.line_total).sum();

        Some(Self { lines, total })
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GREETING}\n\n{INTRO}\n\n")?;
        for line in &self.lines {
            writeln!(
                f,
                "👉 {}. {} x {} - Price: {}",
                line.position, line.quantity, line.label, line.line_total
            )?;
        }
        write!(
            f,
            "\n🛒 Total Order Value: {} 💰\n\n{REQUEST}\n\n{SIGN_OFF}",
            self.total
        )
    }
}

/// Where orders are sent: `{base_url}/{destination}?text=...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepLink {
    /// e.g. `https://wa.me`
    pub base_url: String,
    /// Phone number in international format without `+`
    pub destination: String,
}

impl DeepLink {
    /// Link to `destination` under `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            destination: destination.into(),
        }
    }

    /// Full URL carrying `summary` as its percent-encoded `text` query
    #[must_use]
    pub fn url_for(&self, summary: &OrderSummary) -> String {
        format!(
            "{}/{}?text={}",
            self.base_url.trim_end_matches('/'),
            self.destination,
            urlencoding::encode(&summary.to_string())
        )
    }
}

/// Opens a deep link in the user's messaging app.
pub trait MessagingLink: Send + Sync {
    /// Opens `url`
    ///
    /// # Errors
    ///
    /// Returns [`crate::CartError::Link`] if the link cannot be opened.
    fn open(&self, url: &str) -> Result<()>;
}

/// Terminal stand-in: logs the link and prints it for the user to follow.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingLink;

impl MessagingLink for LoggingLink {
    fn open(&self, url: &str) -> Result<()> {
        tracing::info!(url_len = url.len(), "Handing order to messaging link");
        println!("Send your order here:\n{url}");
        Ok(())
    }
}

/// Opens the link in a new browser tab.
#[cfg(feature = "web")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLink;

#[cfg(feature = "web")]
impl MessagingLink for BrowserLink {
    fn open(&self, url: &str) -> Result<()> {
        let window = web_sys::window()
            .ok_or_else(|| crate::CartError::Link("no window".to_string()))?;
        window
            .open_with_url_and_target(url, "_blank")
            .map(|_| ())
            .map_err(|error| crate::CartError::Link(format!("{error:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn items() -> Vec<LineItem> {
        let mut basic = LineItem::new("basic-package", "10", 10.0);
        basic.quantity = 2;
        vec![basic, LineItem::new("monthly-plan", "3 months", 45.0)]
    }

    #[test]
    fn empty_cart_has_no_summary() {
        assert!(OrderSummary::from_items(&[]).is_none());
    }

    #[test]
    fn summary_lines_and_total() {
        let summary = OrderSummary::from_items(&items()).unwrap();

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].position, 1);
        assert_eq!(summary.lines[0].line_total.to_string(), "$20.00");
        assert_eq!(summary.total.to_string(), "$65.00");
    }

    #[test]
    fn message_text() {
        let summary = OrderSummary::from_items(&items()).unwrap();
        let expected = "🌟 Hello BuyReviewz Team! 🌟\n\n\
            I'd like to place an order for Google Reviews:\n\n\
            👉 1. 2 x 10 Reviews (Basic Package) - Price: $20.00\n\
            👉 2. 1 x 3 months (Monthly Plan) - Price: $45.00\n\
            \n🛒 Total Order Value: $65.00 💰\n\n\
            Could you please guide me on how to provide my Google Business Profile (GBP) link and proceed with the payment? I'm excited to boost my online presence! ✨\n\n\
            Thank you!";
        assert_eq!(summary.to_string(), expected);
    }

    #[test]
    fn url_encodes_message() {
        let link = DeepLink::new("https://wa.me/", "2348140441506");
        let url = link.url_for(&OrderSummary::from_items(&items()).unwrap());

        assert!(url.starts_with("https://wa.me/2348140441506?text="));
        assert!(url.contains("%0A%0AI%27d%20like"));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));

        let query = url.split_once("?text=").unwrap().1;
        let decoded = urlencoding::decode(query).unwrap();
        assert!(decoded.ends_with("Thank you!"));
    }
}
