//! Scoped registration handles
//!
//! A `Subscription` owns exactly one registration made with `Event::bind`.
//! Dropping it (or calling [`Subscription::release`]) removes that
//! registration. If the event is dropped first the handle becomes orphaned
//! and dropping it does nothing.

use crate::types::SubscriptionState;
use std::fmt;
use std::rc::Weak;

/// Registry side of a subscription, implemented by every event's shared state
pub(crate) trait Detach {
    /// Remove the entry with this id, returning whether it was present
    fn detach(&self, id: u64) -> bool;

    /// Whether an entry with this id is still registered
    fn is_bound(&self, id: u64) -> bool;
}

/// Handle whose lifetime bounds one callback registration
///
/// Not `Clone`: two handles for the same registration would both try to
/// remove it. Moving the handle moves ownership of the registration.
pub struct Subscription {
    event: Option<Weak<dyn Detach>>,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(event: Weak<dyn Detach>, id: u64) -> Self {
        Self {
            event: Some(event),
            id,
        }
    }

    /// Registration id, unique within the owning event
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SubscriptionState {
        match self.event.as_ref().map(Weak::upgrade) {
            None => SubscriptionState::Released,
            Some(None) => SubscriptionState::Orphaned,
            Some(Some(event)) if event.is_bound(self.id) => SubscriptionState::Active,
            Some(Some(_)) => SubscriptionState::Released,
        }
    }

    /// Whether the callback will run on the next firing
    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Unbind now, reporting whether this handle or the event did the cleanup
    pub fn release(mut self) -> SubscriptionState {
        self.unbind()
    }

    fn unbind(&mut self) -> SubscriptionState {
        let Some(event) = self.event.take() else {
            return SubscriptionState::Released;
        };

        match event.upgrade() {
            Some(event) => {
                let removed = event.detach(self.id);
                debug_assert!(removed, "active subscription {} had no registry entry", self.id);
                SubscriptionState::Released
            }
            None => {
                tracing::trace!(id = self.id, "Subscription orphaned, event already dropped");
                SubscriptionState::Orphaned
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeRegistry {
        ids: RefCell<Vec<u64>>,
        detached: RefCell<Vec<u64>>,
    }

    impl Detach for FakeRegistry {
        fn detach(&self, id: u64) -> bool {
            self.detached.borrow_mut().push(id);
            let mut ids = self.ids.borrow_mut();
            let before = ids.len();
            ids.retain(|bound| *bound != id);
            ids.len() != before
        }

        fn is_bound(&self, id: u64) -> bool {
            self.ids.borrow().contains(&id)
        }
    }

    fn registry_with(ids: &[u64]) -> Rc<FakeRegistry> {
        let registry = Rc::new(FakeRegistry::default());
        registry.ids.borrow_mut().extend_from_slice(ids);
        registry
    }

    fn handle(registry: &Rc<FakeRegistry>, id: u64) -> Subscription {
        let weak: Weak<FakeRegistry> = Rc::downgrade(registry);
        Subscription::new(weak, id)
    }

    #[test]
    fn test_drop_detaches_once() {
        let registry = registry_with(&[1, 2]);
        let sub = handle(&registry, 1);
        assert!(sub.is_active());

        drop(sub);
        assert_eq!(*registry.detached.borrow(), vec![1]);
        assert_eq!(*registry.ids.borrow(), vec![2]);
    }

    #[test]
    fn test_release_reports_released() {
        let registry = registry_with(&[7]);
        let sub = handle(&registry, 7);

        assert_eq!(sub.release(), SubscriptionState::Released);
        // Drop after release must not detach a second time
        assert_eq!(*registry.detached.borrow(), vec![7]);
    }

    #[test]
    fn test_orphaned_when_registry_dropped() {
        let registry = registry_with(&[3]);
        let sub = handle(&registry, 3);
        drop(registry);

        assert_eq!(sub.state(), SubscriptionState::Orphaned);
        assert_eq!(sub.release(), SubscriptionState::Orphaned);
    }

    #[test]
    fn test_moved_handle_keeps_registration() {
        let registry = registry_with(&[4]);
        let sub = handle(&registry, 4);
        let mut holder = Vec::new();
        holder.push(sub);

        assert!(registry.is_bound(4));
        assert_eq!(holder[0].id(), 4);
        holder.clear();
        assert!(!registry.is_bound(4));
    }

    #[test]
    fn test_debug_output() {
        let registry = registry_with(&[9]);
        let sub = handle(&registry, 9);
        let text = format!("{:?}", sub);
        assert!(text.contains("id: 9"));
        assert!(text.contains("Active"));
    }
}
