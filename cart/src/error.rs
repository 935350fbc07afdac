//! Error types for cart operations.

use thiserror::Error;

/// Result type alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

/// Everything that can go wrong around the cart.
///
/// None of these cross into the reducer as panics: rejected actions are
/// recorded in `CartState::last_message`, and collaborator failures are
/// logged by the effect that hit them.
#[derive(Debug, Error)]
pub enum CartError {
    /// Index no longer refers to an item (e.g. two clicks before a re-render).
    #[error("Item {} is no longer in the cart", index + 1)]
    StaleIndex {
        /// Zero-based index that was requested
        index: usize,
        /// Number of items in the cart at the time
        len: usize,
    },

    /// Price is negative, NaN, or infinite.
    #[error("Invalid price {price} for {package_type}")]
    InvalidPrice {
        /// Package the price was given for
        package_type: String,
        /// The rejected price
        price: f64,
    },

    /// Durable storage I/O failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted cart could not be (de)serialized.
    #[error("Cart data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Durable storage is not reachable (e.g. browser storage disabled).
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The messaging deep link could not be opened.
    #[error("Messaging link failed: {0}")]
    Link(String),

    /// A terminal command could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
