//! Test doubles for the cart's collaborators.

use crate::checkout::MessagingLink;
use crate::error::{CartError, Result};
use crate::storage::CartStorage;
use crate::view::{Badge, CartDisplay, DisplayCall, ItemRow, Screen};
use std::sync::{Mutex, PoisonError};

/// Display that records every call and keeps the resulting [`Screen`].
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    calls: Mutex<Vec<DisplayCall>>,
    screen: Mutex<Screen>,
}

impl RecordingDisplay {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of full re-renders (`clear_items` calls)
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == DisplayCall::ClearItems)
            .count()
    }

    fn record(&self, call: DisplayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(call);
    }
}

impl CartDisplay for RecordingDisplay {
    fn clear_items(&self) {
        self.record(DisplayCall::ClearItems);
    }

    fn append_item(&self, row: &ItemRow) {
        self.record(DisplayCall::AppendItem(row.clone()));
    }

    fn set_total(&self, text: &str) {
        self.record(DisplayCall::SetTotal(text.to_string()));
    }

    fn set_badge(&self, badge: Badge) {
        self.record(DisplayCall::SetBadge(badge));
    }

    fn set_empty_message_visible(&self, visible: bool) {
        self.record(DisplayCall::SetEmptyMessageVisible(visible));
    }

    fn set_checkout_enabled(&self, enabled: bool) {
        self.record(DisplayCall::SetCheckoutEnabled(enabled));
    }

    fn set_cart_open(&self, open: bool) {
        self.record(DisplayCall::SetCartOpen(open));
    }

    fn set_notification_visible(&self, visible: bool) {
        self.record(DisplayCall::SetNotificationVisible(visible));
    }

    fn show_message(&self, message: &str) {
        self.record(DisplayCall::ShowMessage(message.to_string()));
    }
}

/// Messaging link that records opened URLs, optionally failing each open.
#[derive(Debug, Default)]
pub struct RecordingLink {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingLink {
    /// Link whose opens succeed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link whose opens fail after being recorded
    #[must_use]
    pub fn failing() -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// URLs opened so far
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessagingLink for RecordingLink {
    fn open(&self, url: &str) -> Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        if self.fail {
            Err(CartError::Link("popup blocked".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Storage whose slot can neither be read nor written.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStorage;

impl CartStorage for FailingStorage {
    fn read_slot(&self) -> Result<Option<String>> {
        Err(CartError::StorageUnavailable("storage disabled".to_string()))
    }

    fn write_slot(&self, _contents: &str) -> Result<()> {
        Err(CartError::StorageUnavailable("quota exceeded".to_string()))
    }
}
