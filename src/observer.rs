//! Synchronous publish/subscribe used by the tenant registry and entity stores.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Slots<T> = Mutex<Vec<(u64, Callback<T>)>>;

pub struct Subscribers<T: ?Sized> {
    next_id: AtomicU64,
    slots: Arc<Slots<T>>,
}

fn lock<T: ?Sized>(slots: &Slots<T>) -> MutexGuard<'_, Vec<(u64, Callback<T>)>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: ?Sized + 'static> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(callback);
        lock(&self.slots).push((id, callback));

        let slots: Weak<Slots<T>> = Arc::downgrade(&self.slots);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    lock(&slots).retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    /// Invokes every live subscriber in registration order. Callbacks run
    /// outside the lock, so they may subscribe or unsubscribe freely.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.slots)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the subscription alive;
/// call [`Subscription::unsubscribe`] to detach.
#[must_use = "dropping the handle leaves the callback subscribed forever"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_until_unsubscribed() {
        let subs: Subscribers<Vec<u32>> = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let handle = subs.subscribe(move |v: &Vec<u32>| sink.lock().unwrap().push(v.len()));
        subs.notify(&vec![1, 2]);
        assert_eq!(subs.len(), 1);

        handle.unsubscribe();
        subs.notify(&vec![1, 2, 3]);
        assert!(subs.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn unsubscribe_after_owner_dropped_is_harmless() {
        let subs: Subscribers<str> = Subscribers::new();
        let handle = subs.subscribe(|_: &str| {});
        drop(subs);
        handle.unsubscribe();
    }
}
