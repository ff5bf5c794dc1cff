// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for execution lanes and timers.
//!
//! This module contains message types for logging events related to:
//! * Lane startup and shutdown
//! * Work dispatch and delayed work
//! * Work rejected by a closed lane

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// An execution lane came up.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_observable::observability::messages::scheduler::QueueStarted;
///
/// let msg = QueueStarted {
///     queue: "background",
///     worker_threads: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct QueueStarted<'a> {
    pub queue: &'a str,
    pub worker_threads: usize,
}

impl Display for QueueStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue '{}' started with {} worker thread(s)",
            self.queue, self.worker_threads
        )
    }
}

impl StructuredLog for QueueStarted<'_> {
    fn log(&self) {
        tracing::info!(
            queue = self.queue,
            worker_threads = self.worker_threads,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "queue_started",
            span_name = name,
            queue = self.queue,
            worker_threads = self.worker_threads,
        )
    }
}

/// An execution lane drained and stopped.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct QueueStopped<'a> {
    pub queue: &'a str,
    pub executed: u64,
}

impl Display for QueueStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue '{}' stopped after executing {} work item(s)",
            self.queue, self.executed
        )
    }
}

impl StructuredLog for QueueStopped<'_> {
    fn log(&self) {
        tracing::debug!(
            queue = self.queue,
            executed = self.executed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "queue_stopped",
            span_name = name,
            queue = self.queue,
            executed = self.executed,
        )
    }
}

/// A unit of work is being dispatched onto a lane.
///
/// # Log Level
/// `trace!` - High-volume bookkeeping; the span wraps the work itself
pub struct WorkDispatched<'a> {
    pub queue: &'a str,
}

impl Display for WorkDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatching work on queue '{}'", self.queue)
    }
}

impl StructuredLog for WorkDispatched<'_> {
    fn log(&self) {
        tracing::trace!(queue = self.queue, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("work", span_name = name, queue = self.queue)
    }
}

/// A unit of work was scheduled to run after a delay.
///
/// # Log Level
/// `trace!` - High-volume bookkeeping
///
/// # Example
/// ```
/// use the_observable::observability::messages::scheduler::WorkDelayed;
/// use std::time::Duration;
///
/// let msg = WorkDelayed {
///     queue: "main",
///     delay: Duration::from_millis(800),
/// };
///
/// assert_eq!(msg.to_string(), "Scheduled work on queue 'main' after 800ms");
/// ```
pub struct WorkDelayed<'a> {
    pub queue: &'a str,
    pub delay: Duration,
}

impl Display for WorkDelayed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduled work on queue '{}' after {:?}",
            self.queue, self.delay
        )
    }
}

impl StructuredLog for WorkDelayed<'_> {
    fn log(&self) {
        tracing::trace!(
            queue = self.queue,
            delay_ms = self.delay.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "work_delayed",
            span_name = name,
            queue = self.queue,
            delay = ?self.delay,
        )
    }
}

/// A delayed unit of work was cancelled before its timer fired.
///
/// # Log Level
/// `trace!` - High-volume bookkeeping
pub struct DelayedWorkCancelled<'a> {
    pub queue: &'a str,
}

impl Display for DelayedWorkCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Delayed work on queue '{}' cancelled", self.queue)
    }
}

impl StructuredLog for DelayedWorkCancelled<'_> {
    fn log(&self) {
        tracing::trace!(queue = self.queue, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("delayed_work_cancelled", span_name = name, queue = self.queue)
    }
}

/// Work was submitted to a lane that has already shut down.
///
/// # Log Level
/// `warn!` - Dropped work the caller probably expected to run
pub struct WorkRejected<'a> {
    pub queue: &'a str,
}

impl Display for WorkRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue '{}' is closed; work dropped", self.queue)
    }
}

impl StructuredLog for WorkRejected<'_> {
    fn log(&self) {
        tracing::warn!(queue = self.queue, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("work_rejected", span_name = name, queue = self.queue)
    }
}
