// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::SchedulerOptions;
use crate::errors::SchedulerError;
use crate::observability::messages::scheduler::QueueStarted;
use crate::observability::messages::StructuredLog;
use crate::scheduler::{BackgroundScheduler, MainQueue};
use crate::traits::Scheduler;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};

/// Selector for one of the two standard execution lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// Serial lane on a dedicated thread, the stand-in for a UI main loop
    Main,
    /// Parallel lane for expensive work
    Background,
}

/// The standard pair of execution lanes, plus the runtime that drives them
/// when this registry built it.
///
/// When the registry owns its runtime, dropping it shuts the runtime down in
/// the background, so a `Schedulers` may be dropped from inside async code.
pub struct Schedulers {
    main: Arc<MainQueue>,
    background: Arc<BackgroundScheduler>,
    runtime: Option<Runtime>,
}

impl Schedulers {
    /// Build a dedicated multi-threaded runtime and both lanes on top of it.
    pub fn build(options: &SchedulerOptions) -> Result<Self, SchedulerError> {
        let worker_threads = options.get_worker_threads();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name(options.get_thread_name())
            .enable_all()
            .build()
            .map_err(SchedulerError::RuntimeBuild)?;

        let mut schedulers = Self::with_handle(options, runtime.handle().clone())?;
        schedulers.runtime = Some(runtime);

        QueueStarted {
            queue: options.get_background_queue_name(),
            worker_threads,
        }
        .log();
        Ok(schedulers)
    }

    /// Build both lanes on a runtime the caller already owns.
    pub fn with_handle(options: &SchedulerOptions, handle: Handle) -> Result<Self, SchedulerError> {
        let main = MainQueue::spawn(options.get_main_queue_name(), handle.clone())?;
        let background = BackgroundScheduler::new(options.get_background_queue_name(), handle);
        Ok(Self {
            main: Arc::new(main),
            background: Arc::new(background),
            runtime: None,
        })
    }

    /// Build both lanes with default names on an existing runtime.
    pub fn from_handle(handle: Handle) -> Result<Self, SchedulerError> {
        Self::with_handle(&SchedulerOptions::default(), handle)
    }

    pub fn main(&self) -> Arc<dyn Scheduler> {
        self.main.clone()
    }

    pub fn background(&self) -> Arc<dyn Scheduler> {
        self.background.clone()
    }

    /// Resolve a lane selector.
    pub fn get(&self, queue: Queue) -> Arc<dyn Scheduler> {
        match queue {
            Queue::Main => self.main(),
            Queue::Background => self.background(),
        }
    }

    /// The main lane with its concrete type, for `is_current` checks.
    pub fn main_queue(&self) -> &Arc<MainQueue> {
        &self.main
    }

    /// Handle of the runtime driving timers and background work.
    pub fn handle(&self) -> &Handle {
        self.background.handle()
    }
}

impl Drop for Schedulers {
    fn drop(&mut self) {
        self.main.shutdown();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for Schedulers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedulers")
            .field("main", &self.main.name())
            .field("background", &self.background.name())
            .field("owns_runtime", &self.runtime.is_some())
            .finish()
    }
}
