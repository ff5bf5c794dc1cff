// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `map` and `flat_map`: derived observables that stay linked to their source.
//!
//! Every combinator follows the same ownership shape. The upstream callback
//! owns the derived observable strongly, and the derived observable keeps
//! only a [`Subscription`](crate::Subscription) (a weak reference) back to
//! the upstream. A chain therefore lives exactly as long as its root, and
//! [`Observable::detach`] cuts it loose without any reference cycle.

use crate::observability::messages::observable::InnerSubscriptionSuperseded;
use crate::observability::messages::StructuredLog;
use crate::observable::{Observable, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

impl<T> Observable<T>
where
    T: Clone + Send + 'static,
{
    /// Derive an observable holding `transform` of every source value.
    ///
    /// If the source already holds a value, the derived observable is
    /// returned already holding its transform, so values propagate eagerly
    /// through a whole chain.
    ///
    /// ```
    /// use the_observable::Observable;
    ///
    /// let greeting = Observable::with_value("World").map(|name| format!("Hello {name}"));
    ///
    /// assert_eq!(greeting.value().as_deref(), Some("Hello World"));
    /// ```
    pub fn map<U, F>(&self, transform: F) -> Observable<U>
    where
        U: Clone + Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let derived = Observable::new();
        let downstream = derived.clone();
        let upstream = self.subscribe(move |value| downstream.update(transform(value)));
        derived.link_upstream(upstream);
        derived
    }

    /// Derive an observable that republishes whatever the observable returned
    /// by `transform` produces.
    ///
    /// Only the inner observable for the latest source value is followed.
    /// When the source updates again, the previous inner subscription is torn
    /// down, and anything it would still emit is discarded.
    pub fn flat_map<U, F>(&self, transform: F) -> Observable<U>
    where
        U: Clone + Send + 'static,
        F: Fn(T) -> Observable<U> + Send + Sync + 'static,
    {
        let derived = Observable::new();
        let downstream = derived.clone();
        let generation = Arc::new(AtomicU64::new(0));
        let current_inner: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let upstream = self.subscribe(move |value| {
            let this_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

            let previous = current_inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(previous) = previous {
                previous.unsubscribe();
                InnerSubscriptionSuperseded {
                    observable_id: downstream.id(),
                    generation: this_generation,
                }
                .log();
            }

            let inner = transform(value);
            let target = downstream.clone();
            let latest = Arc::clone(&generation);
            let subscription = inner.subscribe(move |inner_value| {
                if latest.load(Ordering::SeqCst) == this_generation {
                    target.update(inner_value);
                }
            });

            let mut slot = current_inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if generation.load(Ordering::SeqCst) == this_generation {
                *slot = Some(subscription);
            } else {
                // A newer source value raced past this one.
                subscription.unsubscribe();
            }
        });

        derived.link_upstream(upstream);
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn collect<T: Clone + Send + 'static>(observable: &Observable<T>) -> Arc<Mutex<Vec<T>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        observable.subscribe(move |value| sink.lock().unwrap().push(value));
        seen
    }

    fn greet(name: &str) -> String {
        format!("Hello {name}")
    }

    #[test]
    fn test_map_transforms_updates() {
        let source = Observable::<i32>::new();
        let seen = collect(&source.map(|v| v * 10));

        source.update(1);
        source.update(2);

        assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
    }

    #[test]
    fn test_map_chain_composes() {
        let source = Observable::<i32>::new();
        let seen = collect(&source.map(|v| v + 1).map(|v| v * 2));

        source.update(4);

        assert_eq!(*seen.lock().unwrap(), vec![10]);
    }

    #[test]
    fn test_map_on_valued_source_starts_with_value() {
        let mapped = Observable::with_value("World").map(greet);

        let seen = collect(&mapped);

        assert_eq!(mapped.value().as_deref(), Some("Hello World"));
        assert_eq!(*seen.lock().unwrap(), vec!["Hello World".to_string()]);
    }

    #[test]
    fn test_map_built_during_update_tracks_source() {
        for _ in 0..2000 {
            let source = Observable::with_value(0u32);
            let barrier = Arc::new(std::sync::Barrier::new(2));

            let producer = {
                let source = source.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    source.update(1);
                })
            };
            barrier.wait();
            let mapped = source.map(|v| v);
            producer.join().unwrap();

            assert_eq!(mapped.value(), source.value());
        }
    }

    #[test]
    fn test_temporary_chain_stays_alive_through_source() {
        let source = Observable::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        source
            .map(|v| v + 1)
            .map(|v| v.to_string())
            .subscribe(move |v| sink.lock().unwrap().push(v));
        source.update(1);

        assert_eq!(*seen.lock().unwrap(), vec!["2".to_string()]);
    }

    #[test]
    fn test_detach_stops_propagation() {
        let source = Observable::<i32>::new();
        let mapped = source.map(|v| v * 2);
        let seen = collect(&mapped);

        source.update(1);
        assert_eq!(mapped.detach(), 1);
        assert_eq!(mapped.detach(), 0);
        source.update(2);

        assert_eq!(*seen.lock().unwrap(), vec![2]);
        assert_eq!(source.subscriber_count(), 0);
        assert_eq!(mapped.value(), Some(2));
    }

    #[test]
    fn test_flat_map_waits_for_inner_value() {
        let source = Observable::<String>::new();
        let result = source.flat_map(|name| {
            let later = Observable::new();
            let producer = later.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                producer.update(format!("Late hello to {name}"));
            });
            later
        });
        let (tx, rx) = std::sync::mpsc::channel();
        result.subscribe(move |text| tx.send(text).unwrap());

        source.update("World".to_string());
        assert_eq!(result.value(), None);

        let text = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(text, "Late hello to World");
    }

    #[test]
    fn test_flat_map_with_ready_inner_is_synchronous() {
        let result = Observable::with_value(3).flat_map(|v| Observable::with_value(v * 3));

        assert_eq!(result.value(), Some(9));
    }

    #[test]
    fn test_flat_map_ignores_superseded_inner() {
        let inners: Arc<Mutex<Vec<Observable<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let registry = Arc::clone(&inners);
        let source = Observable::<u32>::new();
        let result = source.flat_map(move |_| {
            let inner = Observable::new();
            registry.lock().unwrap().push(inner.clone());
            inner
        });
        let seen = collect(&result);

        source.update(1);
        source.update(2);
        let (first, second) = {
            let inners = inners.lock().unwrap();
            (inners[0].clone(), inners[1].clone())
        };

        first.update("stale".to_string());
        second.update("fresh".to_string());

        assert_eq!(*seen.lock().unwrap(), vec!["fresh".to_string()]);
        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);
    }
}
