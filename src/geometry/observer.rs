//! Resize and scroll notifications with symmetric teardown.
//!
//! `subscribe` hands back a [`Subscription`]; dropping it removes the
//! listener, so a component that owns its subscription can never leave a
//! listener behind after it is gone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{ScrollOffset, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryEvent {
    Resize(Size),
    Scroll(ScrollOffset),
}

type Listener = Box<dyn FnMut(&GeometryEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    notifying: bool,
    dropped_during_notify: Vec<u64>,
}

#[derive(Clone, Default)]
pub struct GeometryObserver {
    registry: Rc<RefCell<Registry>>,
}

impl GeometryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&GeometryEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn notify(&self, event: GeometryEvent) {
        // Listeners run outside the borrow so they may subscribe or drop
        // subscriptions themselves.
        let mut listeners = {
            let mut registry = self.registry.borrow_mut();
            registry.notifying = true;
            std::mem::take(&mut registry.listeners)
        };
        for (_, listener) in listeners.iter_mut() {
            listener(&event);
        }
        let mut registry = self.registry.borrow_mut();
        let added = std::mem::take(&mut registry.listeners);
        listeners.extend(added);
        let dropped = std::mem::take(&mut registry.dropped_during_notify);
        listeners.retain(|(id, _)| !dropped.contains(id));
        registry.listeners = listeners;
        registry.notifying = false;
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Unsubscribes its listener on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let Ok(mut registry) = registry.try_borrow_mut() else {
                log::warn!("subscription {} dropped while registry borrowed", self.id);
                return;
            };
            if registry.notifying {
                registry.dropped_during_notify.push(self.id);
            } else {
                registry.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_listener_receives_events() {
        let observer = GeometryObserver::new();
        let seen = Rc::new(Cell::new(Size::default()));
        let sink = seen.clone();
        let _sub = observer.subscribe(move |event| {
            if let GeometryEvent::Resize(size) = event {
                sink.set(*size);
            }
        });

        observer.notify(GeometryEvent::Resize(Size::new(320.0, 640.0)));
        assert_eq!(seen.get(), Size::new(320.0, 640.0));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observer = GeometryObserver::new();
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        let sub = observer.subscribe(move |_| sink.set(sink.get() + 1));
        assert_eq!(observer.listener_count(), 1);

        observer.notify(GeometryEvent::Scroll(ScrollOffset::new(0.0, 10.0)));
        sub.unsubscribe();
        observer.notify(GeometryEvent::Scroll(ScrollOffset::new(0.0, 20.0)));

        assert_eq!(count.get(), 1);
        assert_eq!(observer.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_observer_is_harmless() {
        let observer = GeometryObserver::new();
        let sub = observer.subscribe(|_| {});
        drop(observer);
        drop(sub);
    }
}
