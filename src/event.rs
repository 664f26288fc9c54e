//! Listener registry used for control, loader, and physics events.

// ---------------------------------------------------------------------------
// ListenerId
// ---------------------------------------------------------------------------

/// Handle returned by [`EventEmitter::listen`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ---------------------------------------------------------------------------
// EventEmitter
// ---------------------------------------------------------------------------

/// An ordered registry of listeners for events of type `T`.
///
/// Listeners run synchronously, in registration order, on the emitting
/// thread. Removing a listener stops future invocations; an emit already in
/// progress runs to completion.
pub struct EventEmitter<T> {
    listeners: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> EventEmitter<T> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener. Returns a handle for [`unlisten`](Self::unlisten).
    pub fn listen(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Invoke every listener with `event`, in registration order.
    pub fn emit(&mut self, event: &T) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
