// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operators that move notifications in time or onto another execution lane.
//!
//! None of these block the updating thread: each one hands a closure to a
//! [`Scheduler`] and returns immediately.

use crate::observability::messages::observable::{DelayedEmissionDropped, PendingEmissionCancelled};
use crate::observability::messages::StructuredLog;
use crate::observable::Observable;
use crate::traits::{ScheduledWork, Scheduler};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Values waiting out a `delay`, oldest first.
struct DelayLine<T> {
    pending: Mutex<VecDeque<T>>,
    // Held across pop + publish so two timers firing together cannot
    // reorder their emissions.
    emitting: Mutex<()>,
}

impl<T> DelayLine<T> {
    fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            emitting: Mutex::new(()),
        }
    }

    fn push(&self, value: T) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(value);
    }

    fn pop(&self) -> Option<T> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// One scheduled emission out of a [`DelayLine`].
///
/// Each pushed value is matched by exactly one slot, and each slot takes
/// exactly one value off the line: it publishes it when the lane runs the
/// work, and discards it when the lane drops the work unrun.
struct DelaySlot<T: Clone + Send + 'static> {
    line: Arc<DelayLine<T>>,
    target: Observable<T>,
    fired: bool,
}

impl<T> DelaySlot<T>
where
    T: Clone + Send + 'static,
{
    fn fire(mut self) {
        self.fired = true;
        let _emitting = self
            .line
            .emitting
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Whichever timer fires emits the oldest pending value; its own
        // value's deadline is never earlier than that one's.
        if let Some(value) = self.line.pop() {
            self.target.update(value);
        }
    }
}

impl<T: Clone + Send + 'static> Drop for DelaySlot<T> {
    fn drop(&mut self) {
        if !self.fired {
            self.line.pop();
            DelayedEmissionDropped {
                observable_id: self.target.id(),
                still_pending: self.line.len(),
            }
            .log();
        }
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + 'static,
{
    /// Republish every value `delay` after it was received.
    ///
    /// Nothing is cancelled: each value gets its own timer on `scheduler`,
    /// and values leave in the order they arrived. A value is only lost if
    /// the scheduler drops its work unrun, e.g. after `MainQueue::shutdown`.
    pub fn delay(&self, delay: Duration, scheduler: &Arc<dyn Scheduler>) -> Observable<T> {
        let derived = Observable::new();
        let downstream = derived.clone();
        let scheduler = Arc::clone(scheduler);
        let line = Arc::new(DelayLine::new());

        let upstream = self.subscribe(move |value| {
            line.push(value);
            let slot = DelaySlot {
                line: Arc::clone(&line),
                target: downstream.clone(),
                fired: false,
            };
            // Never cancelled, so the handle is not kept.
            let _ = scheduler.schedule_after(delay, Box::new(move || slot.fire()));
        });

        derived.link_upstream(upstream);
        derived
    }

    /// Republish only the latest value, once `window` passes without a newer one.
    ///
    /// Each upstream value cancels the pending emission and schedules a new
    /// one on `scheduler`.
    pub fn debounce(&self, window: Duration, scheduler: &Arc<dyn Scheduler>) -> Observable<T> {
        let derived = Observable::new();
        let downstream = derived.clone();
        let scheduler = Arc::clone(scheduler);
        let generation = Arc::new(AtomicU64::new(0));
        let pending: Mutex<Option<ScheduledWork>> = Mutex::new(None);

        let upstream = self.subscribe(move |value| {
            let this_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
            let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = pending.take() {
                previous.cancel();
                PendingEmissionCancelled {
                    observable_id: downstream.id(),
                    generation: this_generation - 1,
                }
                .log();
            }

            let latest = Arc::clone(&generation);
            let target = downstream.clone();
            *pending = Some(scheduler.schedule_after(
                window,
                Box::new(move || {
                    // The timer may already be past its sleep when cancelled.
                    if latest.load(Ordering::SeqCst) == this_generation {
                        target.update(value);
                    }
                }),
            ));
        });

        derived.link_upstream(upstream);
        derived
    }

    /// Republish every value on `scheduler` instead of the updating thread.
    ///
    /// ```no_run
    /// use the_observable::config::{Config, RuntimeBuilder};
    /// use the_observable::{Observable, Queue};
    ///
    /// fn expensive_search(term: String) -> Vec<String> {
    ///     vec![format!("Result for {term}")]
    /// }
    ///
    /// let schedulers = RuntimeBuilder::from_config(&Config::default()).unwrap();
    /// let search = Observable::<String>::new();
    /// search
    ///     .hop_to(&schedulers.get(Queue::Background))
    ///     .map(expensive_search)
    ///     .hop_to(&schedulers.get(Queue::Main))
    ///     .subscribe(|results| println!("{results:?}"));
    ///
    /// search.update("kitten gifs".to_string());
    /// ```
    pub fn hop_to(&self, scheduler: &Arc<dyn Scheduler>) -> Observable<T> {
        let derived = Observable::new();
        let downstream = derived.clone();
        let scheduler = Arc::clone(scheduler);

        let upstream = self.subscribe(move |value| {
            let target = downstream.clone();
            scheduler.schedule(Box::new(move || target.update(value)));
        });

        derived.link_upstream(upstream);
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RuntimeBuilder};
    use crate::scheduler::Schedulers;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    fn schedulers() -> Schedulers {
        RuntimeBuilder::from_config(&Config::default()).unwrap()
    }

    /// Drain everything that arrives within `window`.
    fn drain<T>(rx: &mpsc::Receiver<T>, window: Duration) -> Vec<T> {
        let deadline = Instant::now() + window;
        let mut values = Vec::new();
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match rx.recv_timeout(remaining) {
                Ok(value) => values.push(value),
                Err(_) => break,
            }
        }
        values
    }

    #[test]
    fn test_delay_waits_and_drops_nothing() {
        let schedulers = schedulers();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        source
            .delay(Duration::from_millis(100), &schedulers.main())
            .subscribe(move |value| tx.send((value, Instant::now())).unwrap());

        let sent_at = Instant::now();
        source.update(1);
        source.update(2);
        assert!(rx.try_recv().is_err());

        let received = drain(&rx, Duration::from_millis(600));
        let values: Vec<u32> = received.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, vec![1, 2]);
        for (_, at) in received {
            assert!(at.duration_since(sent_at) >= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_delay_preserves_order_on_background() {
        let schedulers = schedulers();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        source
            .delay(Duration::from_millis(30), &schedulers.background())
            .subscribe(move |value| tx.send(value).unwrap());

        for i in 0..20 {
            source.update(i);
        }

        let values = drain(&rx, Duration::from_millis(500));
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    /// Holds work until the test runs it; drops everything while closed.
    #[derive(Default)]
    struct HeldLane {
        closed: std::sync::atomic::AtomicBool,
        held: Mutex<Vec<crate::traits::Work>>,
    }

    impl HeldLane {
        fn run_held(&self) {
            let held = std::mem::take(&mut *self.held.lock().unwrap());
            for work in held {
                work();
            }
        }
    }

    impl Scheduler for HeldLane {
        fn name(&self) -> &str {
            "held"
        }

        fn schedule(&self, work: crate::traits::Work) {
            if !self.closed.load(Ordering::SeqCst) {
                self.held.lock().unwrap().push(work);
            }
        }

        fn schedule_after(&self, _delay: Duration, work: crate::traits::Work) -> ScheduledWork {
            self.schedule(work);
            ScheduledWork::new()
        }
    }

    #[test]
    fn test_delay_discards_values_whose_work_was_dropped() {
        let lane = Arc::new(HeldLane::default());
        let scheduler: Arc<dyn Scheduler> = lane.clone();
        let source = Observable::<u32>::new();
        let delayed = source.delay(Duration::from_millis(10), &scheduler);

        lane.closed.store(true, Ordering::SeqCst);
        source.update(1);
        source.update(2);
        lane.closed.store(false, Ordering::SeqCst);
        source.update(3);
        lane.run_held();

        assert_eq!(delayed.value(), Some(3));
    }

    #[test]
    fn test_delay_slot_takes_exactly_one_value() {
        let line = Arc::new(DelayLine::new());
        let target = Observable::<u32>::new();
        let slot = |line: &Arc<DelayLine<u32>>| DelaySlot {
            line: Arc::clone(line),
            target: target.clone(),
            fired: false,
        };

        line.push(1);
        line.push(2);
        let dropped = slot(&line);
        let fired = slot(&line);

        drop(dropped);
        assert_eq!(line.len(), 1);
        fired.fire();
        assert_eq!(line.len(), 0);
        assert_eq!(target.value(), Some(2));
    }

    #[test]
    fn test_delay_after_main_queue_shutdown_emits_nothing() {
        let schedulers = schedulers();
        schedulers.main_queue().shutdown();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        let delayed = source.delay(Duration::from_millis(20), &schedulers.main());
        delayed.subscribe(move |value| tx.send(value).unwrap());

        for i in 0..5 {
            source.update(i);
        }

        assert!(drain(&rx, Duration::from_millis(200)).is_empty());
        assert_eq!(delayed.value(), None);
    }

    #[test]
    fn test_debounce_emits_only_last_value() {
        let schedulers = schedulers();
        let search_term = Observable::with_value("gif".to_string());
        let (tx, rx) = mpsc::channel();
        search_term
            .debounce(Duration::from_millis(150), &schedulers.main())
            .subscribe(move |text| tx.send(text).unwrap());

        search_term.update("gif c".to_string());
        search_term.update("gif ca".to_string());
        search_term.update("gif cat".to_string());

        let emitted = drain(&rx, Duration::from_millis(600));
        assert_eq!(emitted, vec!["gif cat".to_string()]);
    }

    #[test]
    fn test_debounce_emits_again_after_quiet_period() {
        let schedulers = schedulers();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        source
            .debounce(Duration::from_millis(50), &schedulers.background())
            .subscribe(move |value| tx.send(value).unwrap());

        source.update(1);
        thread::sleep(Duration::from_millis(250));
        source.update(2);

        let emitted = drain(&rx, Duration::from_millis(400));
        assert_eq!(emitted, vec![1, 2]);
    }

    #[test]
    fn test_hop_to_background_leaves_calling_thread() {
        let schedulers = schedulers();
        let caller = thread::current().id();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        source
            .hop_to(&schedulers.background())
            .subscribe(move |value| tx.send((value, thread::current().id())).unwrap());

        source.update(5);

        let (value, worker) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(value, 5);
        assert_ne!(worker, caller);
    }

    #[test]
    fn test_hop_to_main_preserves_order() {
        let schedulers = schedulers();
        let source = Observable::<u32>::new();
        let (tx, rx) = mpsc::channel();
        let main_queue = Arc::clone(schedulers.main_queue());
        source
            .hop_to(&schedulers.main())
            .subscribe(move |value| tx.send((value, main_queue.is_current())).unwrap());

        for i in 0..10 {
            source.update(i);
        }

        let received = drain(&rx, Duration::from_millis(300));
        assert_eq!(
            received,
            (0..10).map(|i| (i, true)).collect::<Vec<_>>()
        );
    }
}
