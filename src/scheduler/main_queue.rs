// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::SchedulerError;
use crate::observability::messages::scheduler::{
    QueueStarted, QueueStopped, WorkDispatched, WorkRejected,
};
use crate::observability::messages::StructuredLog;
use crate::scheduler::spawn_timer;
use crate::traits::{ScheduledWork, Scheduler, Work};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Serial execution lane running on one dedicated OS thread.
///
/// This plays the role of a UI main loop: every piece of work runs on the
/// same named thread, one at a time, in submission order. Delayed work waits
/// on a tokio timer and is then appended to the lane, so it queues behind
/// anything already submitted.
pub struct MainQueue {
    lane: Arc<Lane>,
    thread_id: ThreadId,
    thread: Mutex<Option<JoinHandle<()>>>,
    timers: Handle,
}

/// Sending half of the lane, shared with timer tasks.
struct Lane {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Work>>>,
}

impl Lane {
    fn enqueue(&self, work: Work) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let delivered = match sender.as_ref() {
            Some(sender) => sender.send(work).is_ok(),
            None => false,
        };
        if !delivered {
            WorkRejected { queue: &self.name }.log();
        }
    }

    fn close(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

impl MainQueue {
    /// Start the lane's thread. `timers` drives delayed work.
    pub fn spawn(name: impl Into<String>, timers: Handle) -> Result<Self, SchedulerError> {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Work>();

        let thread_name = name.clone();
        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let mut executed = 0u64;
                while let Some(work) = receiver.blocking_recv() {
                    let span = WorkDispatched { queue: &thread_name }.span("main");
                    let _entered = span.enter();
                    work();
                    executed += 1;
                }
                QueueStopped {
                    queue: &thread_name,
                    executed,
                }
                .log();
            })
            .map_err(|source| SchedulerError::ThreadSpawn {
                name: name.clone(),
                source,
            })?;

        QueueStarted {
            queue: &name,
            worker_threads: 1,
        }
        .log();

        Ok(Self {
            thread_id: thread.thread().id(),
            thread: Mutex::new(Some(thread)),
            lane: Arc::new(Lane {
                name,
                sender: Mutex::new(Some(sender)),
            }),
            timers,
        })
    }

    /// True when called from the lane's own thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Stop accepting work and wait for already-queued work to finish.
    ///
    /// Idempotent. When called from the lane's own thread the join is skipped
    /// and the thread exits after the current item.
    pub fn shutdown(&self) {
        if !self.lane.close() {
            return;
        }
        if self.is_current() {
            return;
        }
        let thread = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(thread) = thread {
            if thread.join().is_err() {
                tracing::error!(queue = %self.lane.name, "Queue thread panicked");
            }
        }
    }
}

impl Scheduler for MainQueue {
    fn name(&self) -> &str {
        &self.lane.name
    }

    fn schedule(&self, work: Work) {
        WorkDispatched {
            queue: &self.lane.name,
        }
        .log();
        self.lane.enqueue(work);
    }

    fn schedule_after(&self, delay: Duration, work: Work) -> ScheduledWork {
        let scheduled = ScheduledWork::new();
        let lane = Arc::clone(&self.lane);
        spawn_timer(
            &self.timers,
            &self.lane.name,
            delay,
            scheduled.token(),
            move || lane.enqueue(work),
        );
        scheduled
    }
}

impl Drop for MainQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MainQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainQueue")
            .field("name", &self.lane.name)
            .field("thread_id", &self.thread_id)
            .finish()
    }
}
