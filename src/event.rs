//! Change notification for document edits.
//!
//! Listeners are registered per [`PieceTable`](crate::PieceTable) and invoked
//! synchronously after each mutation. They only receive a shared reference
//! to the event, so a listener cannot call back into the table that is
//! notifying it. A panicking listener propagates to the caller of the
//! mutating method.

use std::fmt;

/// A change to the document, in external (visible) offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// `text` was inserted at `position`.
    Insert { text: String, position: usize },
    /// `length` characters were removed starting at `position`.
    Delete { position: usize, length: usize },
    /// Decorations changed over `start..end`; the text is unchanged.
    Decorate { start: usize, end: usize },
}

/// Handle returned by listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChangeEvent) + 'static>;

/// Registry of change listeners.
#[derive(Default)]
pub struct ChangeListeners {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl ChangeListeners {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Notify every listener in registration order.
    pub fn emit(&mut self, event: &ChangeEvent) {
        tracing::trace!(?event, listeners = self.listeners.len(), "emit change");
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
