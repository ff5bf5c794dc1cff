// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::observable::SubscriptionAdded;
use crate::observability::messages::StructuredLog;
use crate::observable::subscription::{Registry, Subscription};
use parking_lot::ReentrantMutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

static NEXT_OBSERVABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Callback registered through [`Observable::subscribe`].
pub(crate) type Callback<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// Construction options for [`Observable::with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservableOptions {
    /// Start empty: subscribers see nothing until the first `update`.
    NoInitialValue,
}

struct State<T> {
    value: Option<T>,
    // Keyed by subscription id; ids only grow, so iteration order is
    // registration order.
    subscribers: BTreeMap<u64, Callback<T>>,
    next_subscription_id: u64,
}

pub(crate) struct Inner<T> {
    id: u64,
    // Held across a whole `update` and across `subscribe`'s immediate
    // delivery, so each subscriber sees values in the order they were set.
    // Re-entrant so callbacks can update or subscribe on the same thread.
    delivery: ReentrantMutex<()>,
    state: Mutex<State<T>>,
    upstream: Mutex<Vec<Subscription>>,
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + 'static> Registry for Inner<T> {
    fn remove(&self, subscription_id: u64) -> Option<usize> {
        // The removed callback may own a whole downstream chain; let it drop
        // only after the lock is released.
        let (removed, remaining) = {
            let mut state = self.lock();
            let removed = state.subscribers.remove(&subscription_id);
            (removed, state.subscribers.len())
        };
        removed.map(|_| remaining)
    }

    fn contains(&self, subscription_id: u64) -> bool {
        self.lock().subscribers.contains_key(&subscription_id)
    }
}

/// A single-slot value container that synchronously notifies its subscribers
/// whenever the value is replaced.
///
/// `Observable` is a handle: clones share the same value and subscriber
/// registry. Notifications run on the thread that calls [`update`], in
/// registration order, before `update` returns. Updates from different
/// threads are delivered one at a time: a second `update` waits until every
/// subscriber has seen the first. The value and registry lock is released
/// before any callback runs, so callbacks may `update` or `subscribe`
/// re-entrantly on the same thread. Callbacks that block on another thread
/// which in turn updates the same observable will deadlock.
///
/// ```
/// use the_observable::Observable;
/// use std::sync::{Arc, Mutex};
///
/// let greeting = Observable::with_value("Hello World".to_string());
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// greeting.subscribe(move |text| sink.lock().unwrap().push(text));
/// greeting.update("Isn't this cool?".to_string());
///
/// assert_eq!(*seen.lock().unwrap(), vec!["Hello World", "Isn't this cool?"]);
/// ```
///
/// [`update`]: Observable::update
pub struct Observable<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + 'static,
{
    /// Create an observable with no current value.
    pub fn new() -> Self {
        Self::from_state(None)
    }

    /// Create an observable already holding `value`.
    pub fn with_value(value: T) -> Self {
        Self::from_state(Some(value))
    }

    pub fn with_options(options: ObservableOptions) -> Self {
        match options {
            ObservableOptions::NoInitialValue => Self::new(),
        }
    }

    fn from_state(value: Option<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_OBSERVABLE_ID.fetch_add(1, Ordering::Relaxed),
                delivery: ReentrantMutex::new(()),
                state: Mutex::new(State {
                    value,
                    subscribers: BTreeMap::new(),
                    next_subscription_id: 1,
                }),
                upstream: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register `callback` for every future update.
    ///
    /// If a value is already present the callback is also invoked with it
    /// immediately, on the calling thread, before `subscribe` returns.
    ///
    /// The returned [`Subscription`] may be dropped freely; the callback stays
    /// registered until [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let _delivering = self.inner.delivery.lock();
        let (subscription_id, current) = {
            let mut state = self.inner.lock();
            let subscription_id = state.next_subscription_id;
            state.next_subscription_id += 1;
            state
                .subscribers
                .insert(subscription_id, Arc::clone(&callback));
            SubscriptionAdded {
                observable_id: self.inner.id,
                subscription_id,
                subscriber_count: state.subscribers.len(),
            }
            .log();
            (subscription_id, state.value.clone())
        };

        if let Some(value) = current {
            callback(value);
        }

        let registry: Weak<dyn Registry> = Arc::downgrade(&self.inner) as Weak<dyn Registry>;
        Subscription::new(self.inner.id, subscription_id, registry)
    }

    /// Replace the current value and notify every subscriber with it.
    pub fn update(&self, value: T) {
        let _delivering = self.inner.delivery.lock();
        let subscribers: Vec<Callback<T>> = {
            let mut state = self.inner.lock();
            state.value = Some(value.clone());
            state.subscribers.values().cloned().collect()
        };

        for callback in subscribers {
            callback(value.clone());
        }
    }

    /// A clone of the current value, if any.
    pub fn value(&self) -> Option<T> {
        self.inner.lock().value.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Process-unique identifier, used in log output.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Unsubscribe this observable from every upstream it was derived from.
    ///
    /// Returns how many upstream edges were still live. Afterwards the
    /// observable keeps its last value but never receives another update from
    /// its sources, and the sources no longer keep it alive.
    pub fn detach(&self) -> usize {
        let edges = std::mem::take(
            &mut *self
                .inner
                .upstream
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        edges.iter().filter(|edge| edge.unsubscribe()).count()
    }

    /// Remember the subscription feeding this observable from upstream.
    pub(crate) fn link_upstream(&self, subscription: Subscription) {
        self.inner
            .upstream
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscription);
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for Observable<T>
where
    T: Clone + Send + 'static,
{
    fn from(value: T) -> Self {
        Self::with_value(value)
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Observable")
            .field("id", &self.inner.id)
            .field("has_value", &state.value.is_some())
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
