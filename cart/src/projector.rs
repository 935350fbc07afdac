//! Persist-and-render with a revision gate.
//!
//! Each projection request carries a snapshot and the revision the reducer
//! assigned it. Effect tasks may finish in any order; the projector keeps
//! the highest revision it has applied and drops anything older, so storage
//! and display always converge on the newest cart.

use crate::storage::CartStorage;
use crate::types::LineItem;
use crate::view::{CartDisplay, CartView};
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of [`Projector::project`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    /// Snapshot was persisted and rendered
    Applied,
    /// A newer snapshot was already applied
    Superseded {
        /// Revision already on display
        current: u64,
    },
}

/// Writes cart snapshots to storage and display, newest revision wins.
pub struct Projector {
    storage: Arc<dyn CartStorage>,
    display: Arc<dyn CartDisplay>,
    last_revision: Mutex<u64>,
}

impl Projector {
    /// Projector over the given storage slot and display
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, display: Arc<dyn CartDisplay>) -> Self {
        Self {
            storage,
            display,
            last_revision: Mutex::new(0),
        }
    }

    /// Highest revision applied so far
    #[must_use]
    pub fn last_revision(&self) -> u64 {
        *self
            .last_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Renders and persists `items` unless a newer revision got there first.
    ///
    /// A failed storage write is logged; the display is still updated.
    pub fn project(&self, revision: u64, items: &[LineItem]) -> Projection {
        let mut last = self
            .last_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if revision < *last {
            tracing::debug!(revision, current = *last, "Dropping stale cart snapshot");
            return Projection::Superseded { current: *last };
        }

        CartView::project(items).apply_to(self.display.as_ref());
        if let Err(error) = self.storage.save(items) {
            tracing::warn!(%error, revision, "Failed to persist cart");
        }

        *last = revision;
        tracing::debug!(revision, item_count = items.len(), "Cart projected");
        Projection::Applied
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("last_revision", &self.last_revision())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::FailingStorage;
    use crate::storage::InMemoryStorage;
    use crate::view::TerminalDisplay;

    fn setup() -> (Arc<InMemoryStorage>, Arc<TerminalDisplay>, Projector) {
        let storage = Arc::new(InMemoryStorage::new());
        let display = Arc::new(TerminalDisplay::new());
        let projector = Projector::new(storage.clone(), display.clone());
        (storage, display, projector)
    }

    #[test]
    fn applies_newer_revisions() {
        let (storage, display, projector) = setup();
        let items = vec![LineItem::new("basic", "10", 10.0)];

        assert_eq!(projector.project(1, &items), Projection::Applied);
        assert_eq!(projector.last_revision(), 1);
        assert_eq!(display.snapshot().rows.len(), 1);
        assert_eq!(storage.load(), items);
    }

    #[test]
    fn drops_older_revisions() {
        let (storage, display, projector) = setup();
        let older = vec![LineItem::new("basic", "10", 10.0)];

        projector.project(2, &[]);
        assert_eq!(
            projector.project(1, &older),
            Projection::Superseded { current: 2 }
        );

        assert!(display.snapshot().rows.is_empty());
        assert_eq!(storage.contents().as_deref(), Some("[]"));
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn same_revision_reapplies() {
        let (_storage, _display, projector) = setup();
        assert_eq!(projector.project(0, &[]), Projection::Applied);
        assert_eq!(projector.project(0, &[]), Projection::Applied);
    }

    #[test]
    fn storage_failure_still_renders() {
        let display = Arc::new(TerminalDisplay::new());
        let projector = Projector::new(Arc::new(FailingStorage), display.clone());
        let items = vec![LineItem::new("basic", "10", 10.0)];

        assert_eq!(projector.project(1, &items), Projection::Applied);
        assert_eq!(display.snapshot().total, "$10.00");
    }
}
