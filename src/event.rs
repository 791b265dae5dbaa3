//! Typed synchronous event
//!
//! `Event<S>` keeps an ordered registry of callbacks and invokes them in
//! registration order when fired. The registry may change while a firing is
//! in progress: callbacks can bind, unbind, or fire the same event again.
//!
//! Each firing iterates a snapshot of weak references taken when it starts.
//! A callback bound during the firing is not in the snapshot. A callback
//! unbound during the firing is skipped if the firing has not reached it yet.

use crate::error::{EventError, Result};
use crate::signature::Signature;
use crate::subscription::{Detach, Subscription};
use crate::types::{EventConfig, EventInfo};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback stored for an event with signature `S`
pub type Callback<S> = dyn for<'a> Fn(<S as Signature>::Args<'a>);

/// One registry entry, shared between the registry and in-flight firings
struct Binding<S: Signature> {
    id: u64,
    permanent: bool,
    /// Cleared when the entry leaves the registry
    live: Cell<bool>,
    callback: Box<Callback<S>>,
}

/// State shared between an event and its subscriptions
struct Inner<S: Signature> {
    name: String,
    max_depth: Option<usize>,
    registry: RefCell<Vec<Rc<Binding<S>>>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
    fires: Cell<u64>,
}

impl<S: Signature> Inner<S> {
    fn new(config: EventConfig) -> Self {
        Self {
            name: config.name,
            max_depth: config.max_depth,
            registry: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            depth: Cell::new(0),
            fires: Cell::new(0),
        }
    }

    fn register(&self, callback: Box<Callback<S>>, permanent: bool) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.registry.borrow_mut().push(Rc::new(Binding {
            id,
            permanent,
            live: Cell::new(true),
            callback,
        }));

        tracing::trace!(event = %self.name, id, permanent, "Callback bound");
        id
    }

    fn dispatch(&self, mut args: S::Args<'_>) {
        let snapshot: Vec<Weak<Binding<S>>> = self
            .registry
            .borrow()
            .iter()
            .map(Rc::downgrade)
            .collect();

        let _depth = DepthGuard::enter(&self.depth);
        self.fires.set(self.fires.get() + 1);

        tracing::trace!(
            event = %self.name,
            callbacks = snapshot.len(),
            depth = self.depth.get(),
            "Firing event"
        );

        let mut skipped = 0usize;
        for weak in &snapshot {
            match weak.upgrade() {
                Some(binding) if binding.live.get() => {
                    (binding.callback)(S::reborrow(&mut args));
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::trace!(event = %self.name, skipped, "Skipped callbacks unbound mid-fire");
        }
    }

    fn count(&self, permanent: bool) -> usize {
        self.registry
            .borrow()
            .iter()
            .filter(|binding| binding.permanent == permanent)
            .count()
    }
}

impl<S: Signature> Detach for Inner<S> {
    fn detach(&self, id: u64) -> bool {
        let removed = {
            let mut registry = self.registry.borrow_mut();
            let index = registry.iter().position(|binding| binding.id == id);
            index.map(|index| registry.remove(index))
        };

        // The registry borrow is released before the entry is dropped:
        // its captures may own subscriptions to this same event.
        match removed {
            Some(binding) => {
                binding.live.set(false);
                tracing::trace!(event = %self.name, id, "Callback unbound");
                drop(binding);
                true
            }
            None => false,
        }
    }

    fn is_bound(&self, id: u64) -> bool {
        self.registry.borrow().iter().any(|binding| binding.id == id)
    }
}

/// Tracks nesting of in-progress firings, unwinding included
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// Typed event with scoped and permanent callback registrations
///
/// Single-threaded by construction: the registry lives behind `Rc` and
/// `RefCell`, so `Event` is neither `Send` nor `Sync`.
///
/// Dropping the event orphans every outstanding [`Subscription`]; dropping
/// those afterwards is a no-op.
pub struct Event<S: Signature> {
    inner: Rc<Inner<S>>,
}

impl<S: Signature> Event<S> {
    /// Create an unnamed event without a depth limit
    pub fn new() -> Self {
        Self::from_valid_config(EventConfig::default())
    }

    /// Create an event whose log records carry `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self::from_valid_config(EventConfig::new(name))
    }

    /// Create an event from a config, validating it first
    pub fn with_config(config: EventConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EventConfig) -> Self {
        Self {
            inner: Rc::new(Inner::new(config)),
        }
    }

    /// Register a callback for the whole remaining lifetime of the event
    pub fn permanent_bind<F>(&self, callback: F)
    where
        F: for<'a> Fn(S::Args<'a>) + 'static,
    {
        self.inner.register(Box::new(callback), true);
    }

    /// Register a callback for as long as the returned handle lives
    #[must_use = "dropping the Subscription immediately unbinds the callback"]
    pub fn bind<F>(&self, callback: F) -> Subscription
    where
        F: for<'a> Fn(S::Args<'a>) + 'static,
    {
        let id = self.inner.register(Box::new(callback), false);
        let registry: Weak<Inner<S>> = Rc::downgrade(&self.inner);
        Subscription::new(registry, id)
    }

    /// Invoke every callback registered when this call starts, in order
    ///
    /// Mutable-reference arguments are reborrowed for each callback, so a
    /// write made by one callback is seen by the ones after it. A panic in a
    /// callback propagates to the caller and the remaining callbacks of this
    /// firing do not run.
    pub fn fire(&self, args: S::Args<'_>) {
        self.inner.dispatch(args);
    }

    /// Like [`fire`](Self::fire), but refuse to nest past the configured
    /// `max_depth`
    pub fn try_fire(&self, args: S::Args<'_>) -> Result<()> {
        if let Some(limit) = self.inner.max_depth {
            if self.inner.depth.get() >= limit {
                tracing::warn!(
                    event = %self.inner.name,
                    limit,
                    "Re-entrant fire refused"
                );
                return Err(EventError::DepthExceeded {
                    event: self.inner.name.clone(),
                    limit,
                });
            }
        }

        self.inner.dispatch(args);
        Ok(())
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Depth limit applied by `try_fire`
    pub fn max_depth(&self) -> Option<usize> {
        self.inner.max_depth
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Whether no callback is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Callbacks owned by a live `Subscription`
    pub fn subscription_count(&self) -> usize {
        self.inner.count(false)
    }

    /// Callbacks registered with `permanent_bind`
    pub fn permanent_count(&self) -> usize {
        self.inner.count(true)
    }

    /// Number of firings currently on the stack
    pub fn depth(&self) -> usize {
        self.inner.depth.get()
    }

    /// Whether a firing is in progress
    pub fn is_firing(&self) -> bool {
        self.depth() > 0
    }

    /// Snapshot of the registry counters
    pub fn info(&self) -> EventInfo {
        let permanent = self.permanent_count();
        let bindings = self.len();
        EventInfo {
            name: self.inner.name.clone(),
            bindings,
            subscriptions: bindings - permanent,
            permanent,
            fires: self.inner.fires.get(),
            depth: self.depth(),
        }
    }
}

impl<S: Signature> Default for Event<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signature> Drop for Event<S> {
    fn drop(&mut self) {
        let registry = self.inner.registry.borrow();
        for binding in registry.iter() {
            binding.live.set(false);
        }

        let orphaned = registry.iter().filter(|binding| !binding.permanent).count();
        if orphaned > 0 {
            tracing::debug!(event = %self.inner.name, orphaned, "Event dropped with live subscriptions");
        }
    }
}

impl<S: Signature> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.inner.name)
            .field("bindings", &self.len())
            .field("depth", &self.depth())
            .finish()
    }
}
