//! Integration tests for the cart running inside a real Store
//!
//! Effects are spawned on the tokio runtime, so these tests wait on effect
//! handles (or poll briefly) before looking at storage and display.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;
use storefront_cart::mocks::{FailingStorage, RecordingDisplay, RecordingLink};
use storefront_cart::{
    CartAction, CartConfig, CartEnvironment, CartReducer, CartState, CartStorage,
    EMPTY_CART_MESSAGE, FileStorage, InMemoryStorage, LineItem,
};
use storefront_core::environment::Clock;
use storefront_runtime::Store;
use storefront_testing::test_clock;

// ============================================================================
// Test Fixtures
// ============================================================================

type CartStore = Store<CartState, CartAction, CartEnvironment, CartReducer>;

struct Harness {
    store: CartStore,
    storage: Arc<InMemoryStorage>,
    display: Arc<RecordingDisplay>,
    link: Arc<RecordingLink>,
}

fn config(notification_ms: u64) -> CartConfig {
    CartConfig {
        notification_ms,
        ..CartConfig::default()
    }
}

fn harness_with(storage: InMemoryStorage, link: RecordingLink, notification_ms: u64) -> Harness {
    let storage = Arc::new(storage);
    let display = Arc::new(RecordingDisplay::new());
    let link = Arc::new(link);
    let env = CartEnvironment::new(
        storage.clone(),
        display.clone(),
        link.clone(),
        Arc::new(test_clock()),
        config(notification_ms),
    );
    let store = Store::new(env.restore_state(), CartReducer::new(), env);

    Harness {
        store,
        storage,
        display,
        link,
    }
}

fn harness() -> Harness {
    harness_with(InMemoryStorage::new(), RecordingLink::new(), 20)
}

async fn send(store: &CartStore, action: CartAction) {
    let mut handle = store.send(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(5))
        .await
        .expect("effects should settle");
}

/// Polls `check` until it holds or a second passes
async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

fn stored(storage: &InMemoryStorage) -> Vec<LineItem> {
    storage.load()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn startup_render_restores_display() {
    let h = harness_with(
        InMemoryStorage::with_contents(
            r#"[{"type":"basic-package","reviews":"10","price":10,"quantity":2}]"#,
        ),
        RecordingLink::new(),
        20,
    );

    send(&h.store, CartAction::Render).await;

    let screen = h.display.screen();
    assert_eq!(screen.rows.len(), 1);
    assert_eq!(screen.rows[0].label, "10 Reviews (Basic Package)");
    assert_eq!(screen.total, "$20.00");
    assert_eq!(screen.badge.count, 2);
    assert!(screen.checkout_enabled);
}

#[tokio::test]
async fn add_persists_renders_and_notifies() {
    let h = harness();

    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&h.store, CartAction::add("premium-package", "50", 5.0)).await;

    let items = stored(&h.storage);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, 2);

    let screen = h.display.screen();
    assert_eq!(screen.total, "$25.00");
    assert_eq!(screen.badge.count, 3);
    assert!(screen.badge.visible);
    assert!(!screen.empty_message_visible);

    // The last hide has been reduced; its display effect follows shortly
    assert!(!h.store.state(|s| s.notification_visible).await);
    let display = h.display.clone();
    assert!(eventually(move || !display.screen().notification_visible).await);
}

#[tokio::test]
async fn second_add_restarts_notification_window() {
    let h = harness_with(InMemoryStorage::new(), RecordingLink::new(), 400);

    let _first = h
        .store
        .send(CartAction::add("basic-package", "10", 10.0))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let mut second = h
        .store
        .send(CartAction::add("basic-package", "20", 18.0))
        .await
        .unwrap();

    // Past the first add's window, inside the second's
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.store.state(|s| s.notification_visible).await);

    second.wait_with_timeout(Duration::from_secs(5)).await.unwrap();
    assert!(!h.store.state(|s| s.notification_visible).await);
}

#[tokio::test]
async fn quantity_controls_keep_position() {
    let h = harness();
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&h.store, CartAction::add("premium-package", "50", 5.0)).await;
    send(&h.store, CartAction::IncreaseQuantity { index: 0 }).await;
    send(&h.store, CartAction::DecreaseQuantity { index: 0 }).await;

    let items = stored(&h.storage);
    assert_eq!(items[0].package_type, "basic-package");
    assert_eq!(items[0].quantity, 1);

    send(&h.store, CartAction::DecreaseQuantity { index: 0 }).await;
    let items = stored(&h.storage);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].package_type, "premium-package");
    assert_eq!(h.display.screen().rows[0].index, 0);
}

#[tokio::test]
async fn stale_index_changes_nothing() {
    let h = harness();
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    let writes = h.storage.writes();
    let renders = h.display.render_count();

    send(&h.store, CartAction::RemoveItem { index: 3 }).await;
    send(&h.store, CartAction::IncreaseQuantity { index: 1 }).await;

    assert_eq!(h.storage.writes(), writes);
    assert_eq!(h.display.render_count(), renders);
    assert_eq!(h.store.state(CartState::item_count).await, 1);
    let message = h.store.state(|s| s.last_message.clone()).await.unwrap();
    assert_eq!(message, "Item 2 is no longer in the cart");
}

#[tokio::test]
async fn clear_writes_empty_array() {
    let h = harness();
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&h.store, CartAction::ClearCart).await;

    assert_eq!(h.storage.contents().as_deref(), Some("[]"));
    let screen = h.display.screen();
    assert!(screen.rows.is_empty());
    assert!(!screen.badge.visible);
    assert!(screen.empty_message_visible);
    assert!(!screen.checkout_enabled);
}

#[tokio::test]
async fn checkout_hands_off_then_resets() {
    let h = harness();
    send(&h.store, CartAction::OpenCart).await;
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&h.store, CartAction::add("monthly-plan", "3 months", 45.0)).await;

    send(&h.store, CartAction::Checkout).await;

    let opened = h.link.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("https://wa.me/2348140441506?text="));
    assert!(opened[0].contains("Total%20Order%20Value%3A%20%2455.00"));

    assert_eq!(h.storage.contents().as_deref(), Some("[]"));
    let screen = h.display.screen();
    assert!(screen.rows.is_empty());
    assert!(!screen.cart_open);

    let state = h.store.state(Clone::clone).await;
    assert!(state.is_empty());
    assert!(!state.cart_open);
    assert_eq!(state.last_checkout_at, Some(test_clock().now()));
}

#[tokio::test]
async fn checkout_on_empty_cart_does_nothing_external() {
    let h = harness();

    send(&h.store, CartAction::Checkout).await;

    assert!(h.link.opened().is_empty());
    assert_eq!(h.storage.writes(), 0);
    assert_eq!(h.display.screen().messages, vec![EMPTY_CART_MESSAGE.to_string()]);
}

#[tokio::test]
async fn failed_hand_off_still_resets_cart() {
    let h = harness_with(InMemoryStorage::new(), RecordingLink::failing(), 20);
    send(&h.store, CartAction::add("basic-package", "10", 10.0)).await;

    send(&h.store, CartAction::Checkout).await;

    assert_eq!(h.link.opened().len(), 1);
    assert!(stored(&h.storage).is_empty());
}

#[tokio::test]
async fn storage_failures_do_not_block_rendering() {
    let display = Arc::new(RecordingDisplay::new());
    let env = CartEnvironment::new(
        Arc::new(FailingStorage),
        display.clone(),
        Arc::new(RecordingLink::new()),
        Arc::new(test_clock()),
        config(20),
    );
    let store = Store::new(env.restore_state(), CartReducer::new(), env);

    send(&store, CartAction::add("basic-package", "10", 10.0)).await;

    assert_eq!(display.screen().total, "$10.00");
    assert_eq!(store.state(CartState::len).await, 1);
}

#[tokio::test]
async fn reload_reproduces_cart() {
    let dir = tempfile::tempdir().unwrap();
    let make_env = || {
        CartEnvironment::new(
            Arc::new(FileStorage::new(dir.path(), "cart")),
            Arc::new(RecordingDisplay::new()),
            Arc::new(RecordingLink::new()),
            Arc::new(test_clock()),
            config(20),
        )
    };

    let env = make_env();
    let store = Store::new(env.restore_state(), CartReducer::new(), env);
    send(&store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&store, CartAction::add("basic-package", "10", 10.0)).await;
    send(&store, CartAction::add("monthly-plan", "3 months", 45.0)).await;
    let before = store.state(|s| s.items.clone()).await;

    let reloaded = make_env().restore_state();
    assert_eq!(reloaded.items, before);
    assert_eq!(reloaded.items[0].quantity, 2);
}

#[tokio::test]
async fn concurrent_actions_converge_on_latest_snapshot() {
    let h = harness();

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = h.store.clone();
        handles.push(tokio::spawn(async move {
            let reviews = (i % 4).to_string();
            store
                .send(CartAction::add("basic-package", reviews, 1.0))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let mut effects = handle.await.unwrap();
        effects.wait_with_timeout(Duration::from_secs(5)).await.unwrap();
    }

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.item_count(), 20);
    assert_eq!(h.store.environment().projector.last_revision(), state.revision);
    assert_eq!(stored(&h.storage), state.items);
    assert_eq!(h.display.screen().badge.count, 20);
}
