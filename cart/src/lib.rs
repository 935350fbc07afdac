//! Shopping cart for the storefront.
//!
//! The cart is an ordered list of line items kept in durable storage and
//! projected onto a display after every change. Checkout turns the cart into
//! a chat message and hands it to a messaging deep link.
//!
//! - [`CartState`] / [`CartAction`]: the cart and every intent it reacts to
//! - [`CartReducer`]: validates actions, mutates state, returns effects
//! - [`Projector`]: revision-gated persist-and-render
//! - [`CartStorage`], [`CartDisplay`], [`MessagingLink`]: injected collaborators
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_cart::{
//!     CartAction, CartConfig, CartEnvironment, CartReducer, InMemoryStorage, LoggingLink,
//!     TerminalDisplay,
//! };
//! use storefront_core::environment::SystemClock;
//! use storefront_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = CartEnvironment::new(
//!     Arc::new(InMemoryStorage::new()),
//!     Arc::new(TerminalDisplay::new()),
//!     Arc::new(LoggingLink),
//!     Arc::new(SystemClock),
//!     CartConfig::default(),
//! );
//! let store = Store::new(env.restore_state(), CartReducer::new(), env);
//!
//! store.send(CartAction::Render).await?;
//! store.send(CartAction::add("basic-package", "10", 10.0)).await?;
//! store.send(CartAction::Checkout).await?;
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod command;
pub mod config;
pub mod error;
pub mod label;
pub mod mocks;
pub mod projector;
pub mod reducer;
pub mod storage;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use checkout::{DeepLink, EMPTY_CART_MESSAGE, LoggingLink, MessagingLink, OrderSummary};
pub use command::Command;
pub use config::CartConfig;
pub use error::{CartError, Result};
pub use label::Money;
pub use projector::{Projection, Projector};
pub use reducer::{CartEnvironment, CartReducer, describe_metrics};
pub use storage::{CartStorage, FileStorage, InMemoryStorage};
pub use types::{CartAction, CartState, Decrease, LineItem};
pub use view::{Badge, CartDisplay, CartView, ItemRow, Screen, TerminalDisplay};

#[cfg(feature = "web")]
pub use checkout::BrowserLink;
#[cfg(feature = "web")]
pub use storage::LocalStorage;
