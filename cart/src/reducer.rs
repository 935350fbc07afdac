//! Reducer logic for the cart.
//!
//! Every mutation bumps the state's revision and returns a projection effect
//! carrying a snapshot of the items, so storage and display are rebuilt from
//! the canonical list after each change. Rejected actions leave the list
//! untouched and record why in `last_message`.

use crate::checkout::{EMPTY_CART_MESSAGE, MessagingLink, OrderSummary};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::projector::Projector;
use crate::storage::CartStorage;
use crate::types::{CartAction, CartState, Decrease};
use crate::view::CartDisplay;
use std::sync::Arc;
use storefront_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};

/// Environment dependencies for the cart reducer
#[derive(Clone)]
pub struct CartEnvironment {
    /// Durable slot the cart is restored from
    pub storage: Arc<dyn CartStorage>,
    /// Surface the cart renders onto
    pub display: Arc<dyn CartDisplay>,
    /// Where checkout hands the order off
    pub link: Arc<dyn MessagingLink>,
    /// Clock for checkout timestamps
    pub clock: Arc<dyn Clock>,
    /// Cart configuration
    pub config: CartConfig,
    /// Revision-gated persist-and-render over `storage` and `display`
    pub projector: Arc<Projector>,
}

impl CartEnvironment {
    /// Creates a `CartEnvironment`
    #[must_use]
    pub fn new(
        storage: Arc<dyn CartStorage>,
        display: Arc<dyn CartDisplay>,
        link: Arc<dyn MessagingLink>,
        clock: Arc<dyn Clock>,
        config: CartConfig,
    ) -> Self {
        let projector = Arc::new(Projector::new(Arc::clone(&storage), Arc::clone(&display)));
        Self {
            storage,
            display,
            link,
            clock,
            config,
            projector,
        }
    }

    /// Initial state from durable storage (empty if missing or malformed)
    #[must_use]
    pub fn restore_state(&self) -> CartState {
        let state = CartState::with_items(self.storage.load());
        tracing::info!(item_count = state.len(), "Cart restored");
        state
    }
}

/// Describe the cart's metrics to the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!("cart.items.added", "Units added to the cart");
    metrics::describe_counter!("cart.checkouts", "Orders handed to the messaging link");
    metrics::describe_counter!(
        "cart.index.rejected",
        "Quantity or remove actions rejected for a stale item index"
    );
}

/// Reducer for the cart
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `AddItem` price
    fn validate_price(package_type: &str, price: f64) -> Result<(), CartError> {
        if price.is_finite() && price >= 0.0 {
            Ok(())
        } else {
            Err(CartError::InvalidPrice {
                package_type: package_type.to_string(),
                price,
            })
        }
    }

    /// Bumps the revision and snapshots the items for persist-and-render
    fn project(state: &mut CartState, env: &CartEnvironment) -> Effect<CartAction> {
        state.revision += 1;
        let revision = state.revision;
        let items = state.items.clone();
        let projector = Arc::clone(&env.projector);

        Effect::run(async move {
            projector.project(revision, &items);
        })
    }

    /// Runs `f` against the display
    fn on_display<F>(env: &CartEnvironment, f: F) -> Effect<CartAction>
    where
        F: FnOnce(&dyn CartDisplay) + Send + 'static,
    {
        let display = Arc::clone(&env.display);
        Effect::run(async move { f(display.as_ref()) })
    }

    /// Records a rejected index; nothing else changes
    fn reject_index(
        state: &mut CartState,
        error: &CartError,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        tracing::warn!(%error, item_count = state.len(), "Rejected stale item index");
        metrics::counter!("cart.index.rejected").increment(1);
        state.last_message = Some(error.to_string());
        SmallVec::new()
    }

    /// Common tail of a successful mutation
    fn mutated(state: &mut CartState, env: &CartEnvironment) -> SmallVec<[Effect<CartAction>; 4]> {
        state.last_message = None;
        smallvec![Self::project(state, env)]
    }

    fn checkout(state: &mut CartState, env: &CartEnvironment) -> SmallVec<[Effect<CartAction>; 4]> {
        let Some(summary) = OrderSummary::from_items(&state.items) else {
            tracing::info!("Checkout pressed on an empty cart");
            state.last_message = Some(EMPTY_CART_MESSAGE.to_string());
            return smallvec![Self::on_display(env, |display| {
                display.show_message(EMPTY_CART_MESSAGE);
            })];
        };

        let url = env.config.deep_link().url_for(&summary);
        tracing::info!(
            item_count = summary.lines.len(),
            total = %summary.total,
            "Handing order to messaging"
        );
        metrics::counter!("cart.checkouts").increment(1);

        state.clear();
        state.cart_open = false;
        state.last_message = None;
        state.last_checkout_at = Some(env.clock.now());

        let link = Arc::clone(&env.link);
        let hand_off = Effect::run(async move {
            if let Err(error) = link.open(&url) {
                tracing::warn!(%error, "Failed to open messaging link");
            }
        });

        smallvec![Effect::chain(vec![
            hand_off,
            Self::project(state, env),
            Self::on_display(env, |display| display.set_cart_open(false)),
        ])]
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::AddItem {
                package_type,
                reviews,
                price,
            } => {
                if let Err(error) = Self::validate_price(&package_type, price) {
                    tracing::warn!(%error, "Rejected item");
                    let message = error.to_string();
                    state.last_message = Some(message.clone());
                    return smallvec![Self::on_display(env, move |display| {
                        display.show_message(&message);
                    })];
                }

                let index = state.add_item(&package_type, &reviews, price);
                let quantity = state.get(index).map_or(0, |item| item.quantity);
                tracing::info!(index, quantity, package_type = %package_type, "Item added to cart");
                metrics::counter!("cart.items.added").increment(1);

                state.last_message = None;
                state.notification_generation += 1;
                state.notification_visible = true;
                let generation = state.notification_generation;

                smallvec![
                    Self::project(state, env),
                    Self::on_display(env, |display| display.set_notification_visible(true)),
                    Effect::Delay {
                        duration: env.config.notification_duration(),
                        action: Box::new(CartAction::HideNotification { generation }),
                    },
                ]
            },

            CartAction::IncreaseQuantity { index } => match state.increase(index) {
                Ok(quantity) => {
                    tracing::debug!(index, quantity, "Quantity increased");
                    Self::mutated(state, env)
                },
                Err(error) => Self::reject_index(state, &error),
            },

            CartAction::DecreaseQuantity { index } => match state.decrease(index) {
                Ok(Decrease::Decremented { quantity }) => {
                    tracing::debug!(index, quantity, "Quantity decreased");
                    Self::mutated(state, env)
                },
                Ok(Decrease::Removed(item)) => {
                    tracing::debug!(index, label = %item.label(), "Item removed at quantity 1");
                    Self::mutated(state, env)
                },
                Err(error) => Self::reject_index(state, &error),
            },

            CartAction::RemoveItem { index } => match state.remove(index) {
                Ok(item) => {
                    tracing::debug!(index, label = %item.label(), "Item removed");
                    Self::mutated(state, env)
                },
                Err(error) => Self::reject_index(state, &error),
            },

            CartAction::ClearCart => {
                state.clear();
                tracing::info!("Cart cleared");
                Self::mutated(state, env)
            },

            CartAction::Checkout => Self::checkout(state, env),

            CartAction::Render => smallvec![Self::project(state, env)],

            CartAction::OpenCart => {
                state.cart_open = true;
                smallvec![Self::on_display(env, |display| display.set_cart_open(true))]
            },

            CartAction::CloseCart => {
                state.cart_open = false;
                smallvec![Self::on_display(env, |display| display.set_cart_open(false))]
            },

            CartAction::HideNotification { generation } => {
                if generation != state.notification_generation || !state.notification_visible {
                    tracing::trace!(generation, "Notification hide superseded");
                    return SmallVec::new();
                }
                state.notification_visible = false;
                smallvec![Self::on_display(env, |display| display.set_notification_visible(false))]
            },
        }
    }
}
