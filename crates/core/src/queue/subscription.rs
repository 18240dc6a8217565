//! Change-notification subscribers.

use serde::{Deserialize, Serialize};

/// Callback invoked after every successful mutation.
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

/// Ordered set of listeners.
///
/// Listeners are invoked synchronously in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
}

impl Subscribers {
    pub fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_notify_in_subscription_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut subs = Subscribers::default();

        for tag in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            subs.subscribe(Box::new(move || calls.lock().unwrap().push(tag)));
        }

        subs.notify();
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut subs = Subscribers::default();
        let a = subs.subscribe(Box::new(|| {}));
        let b = subs.subscribe(Box::new(|| {}));
        assert_ne!(a, b);

        assert!(subs.unsubscribe(a));
        assert!(!subs.unsubscribe(a));
        assert_eq!(subs.len(), 1);
    }
}
