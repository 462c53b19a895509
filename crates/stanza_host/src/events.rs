//! Event streams - the platform's subscription primitive
//!
//! An [`EventStream`] broadcasts values (model changes, document edits) to
//! subscribed callbacks on the UI thread. Cancellation is manual: a
//! [`Subscription`] stays active until [`Subscription::unsubscribe`] is
//! called, even if the handle itself is dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::tree::WidgetTree;

/// Callback registered on an [`EventStream`]
pub type StreamCallback<T> = Rc<dyn Fn(&T, &mut WidgetTree) -> anyhow::Result<()>>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, StreamCallback<T>)>,
}

/// Broadcasts values to subscribers
pub struct EventStream<T> {
    subscribers: Rc<RefCell<Subscribers<T>>>,
}

impl<T: 'static> EventStream<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback; it stays registered until the returned
    /// subscription is explicitly cancelled
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T, &mut WidgetTree) -> anyhow::Result<()> + 'static,
    {
        let id = {
            let mut subs = self.subscribers.borrow_mut();
            let id = subs.next_id;
            subs.next_id += 1;
            subs.entries.push((id, Rc::new(callback)));
            id
        };

        let weak = Rc::downgrade(&self.subscribers);
        Subscription {
            id,
            cancel: Some(Box::new(move |id| {
                if let Some(subs) = weak.upgrade() {
                    subs.borrow_mut().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Deliver `value` to every current subscriber in subscription order
    ///
    /// The subscriber list is snapshotted first, so callbacks may subscribe
    /// or unsubscribe while delivery is in progress. The first error stops
    /// delivery and is returned.
    pub fn emit(&self, tree: &mut WidgetTree, value: &T) -> anyhow::Result<()> {
        let snapshot: Vec<StreamCallback<T>> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        tracing::trace!(subscribers = snapshot.len(), "emitting event");
        for callback in snapshot {
            callback(value, tree)?;
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }
}

impl<T: 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribers", &self.subscribers.borrow().entries.len())
            .finish()
    }
}

/// Handle for cancelling a stream subscription
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce(u64)>>,
}

impl Subscription {
    /// Remove the callback from its stream. Calling this more than once is
    /// harmless.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let stream = EventStream::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut tree = WidgetTree::new();

        let first = seen.clone();
        let _a = stream.subscribe(move |value, _tree| {
            first.borrow_mut().push(("a", *value));
            Ok(())
        });
        let second = seen.clone();
        let _b = stream.subscribe(move |value, _tree| {
            second.borrow_mut().push(("b", *value));
            Ok(())
        });

        stream.emit(&mut tree, &7).unwrap();
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe_is_manual_and_idempotent() {
        let stream = EventStream::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let mut tree = WidgetTree::new();

        let counter = hits.clone();
        let mut sub = stream.subscribe(move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        // dropping a clone of the stream changes nothing
        drop(stream.clone());
        stream.emit(&mut tree, &()).unwrap();

        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        stream.emit(&mut tree, &()).unwrap();

        assert_eq!(hits.get(), 1);
        assert_eq!(stream.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_subscription_stays_registered() {
        let stream = EventStream::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let mut tree = WidgetTree::new();

        let counter = hits.clone();
        drop(stream.subscribe(move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        }));

        stream.emit(&mut tree, &()).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(stream.subscriber_count(), 1);
    }

    #[test]
    fn test_first_error_stops_delivery() {
        let stream = EventStream::<u8>::new();
        let reached = Rc::new(Cell::new(false));
        let mut tree = WidgetTree::new();

        let _a = stream.subscribe(|_, _| anyhow::bail!("boom"));
        let flag = reached.clone();
        let _b = stream.subscribe(move |_, _| {
            flag.set(true);
            Ok(())
        });

        let err = stream.emit(&mut tree, &1).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!reached.get());
    }
}
