// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::scheduler::WorkDispatched;
use crate::observability::messages::StructuredLog;
use crate::scheduler::spawn_timer;
use crate::traits::{ScheduledWork, Scheduler, Work};
use std::time::Duration;
use tokio::runtime::Handle;

/// Parallel execution lane backed by a tokio runtime.
///
/// Work runs on the runtime's blocking pool so that expensive synchronous
/// transforms never stall the async workers driving the timers. No ordering
/// is guaranteed between two pieces of work submitted here.
#[derive(Debug, Clone)]
pub struct BackgroundScheduler {
    name: String,
    handle: Handle,
}

impl BackgroundScheduler {
    pub fn new(name: impl Into<String>, handle: Handle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    /// Runtime handle this lane submits to
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    fn dispatch(handle: &Handle, queue: &str, work: Work) {
        let span = WorkDispatched { queue }.span("background");
        handle.spawn_blocking(move || {
            let _entered = span.enter();
            work()
        });
    }
}

impl Scheduler for BackgroundScheduler {
    fn name(&self) -> &str {
        &self.name
    }

    fn schedule(&self, work: Work) {
        WorkDispatched { queue: &self.name }.log();
        Self::dispatch(&self.handle, &self.name, work);
    }

    fn schedule_after(&self, delay: Duration, work: Work) -> ScheduledWork {
        let scheduled = ScheduledWork::new();
        let handle = self.handle.clone();
        let name = self.name.clone();
        spawn_timer(&self.handle, &self.name, delay, scheduled.token(), move || {
            Self::dispatch(&handle, &name, work)
        });
        scheduled
    }
}
