// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution lanes that the time and queue operators schedule onto.
//!
//! * [`BackgroundScheduler`] - parallel lane on a tokio runtime's blocking pool
//! * [`MainQueue`] - serial FIFO lane on one dedicated, named OS thread
//! * [`Schedulers`] - registry resolving a [`Queue`] selector to a lane
//!
//! Both lanes implement delayed work the same way: a tokio timer task sleeps
//! for the delay while racing the work's cancellation token, and only hands
//! the work to the lane if the sleep wins.

mod background;
mod main_queue;
mod registry;


pub use background::BackgroundScheduler;
pub use main_queue::MainQueue;
pub use registry::{Queue, Schedulers};

use crate::observability::messages::scheduler::{DelayedWorkCancelled, WorkDelayed};
use crate::observability::messages::StructuredLog;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Spawn a timer task that calls `on_fire` after `delay` unless `token` is
/// cancelled first.
pub(crate) fn spawn_timer<F>(
    handle: &Handle,
    queue: &str,
    delay: Duration,
    token: CancellationToken,
    on_fire: F,
) where
    F: FnOnce() + Send + 'static,
{
    WorkDelayed { queue, delay }.log();
    let queue = queue.to_string();
    handle.spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                DelayedWorkCancelled { queue: &queue }.log();
            }
            _ = tokio::time::sleep(delay) => on_fire(),
        }
    });
}
