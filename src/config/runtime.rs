// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;
use crate::errors::SchedulerError;
use crate::scheduler::Schedulers;
use tokio::runtime::Handle;

/// Builds the execution lanes described by a [`Config`].
///
/// # Examples
///
/// ```
/// use the_observable::config::{Config, RuntimeBuilder};
/// use the_observable::Queue;
///
/// let schedulers = RuntimeBuilder::from_config(&Config::default()).unwrap();
///
/// assert_eq!(schedulers.get(Queue::Main).name(), "main");
/// assert_eq!(schedulers.get(Queue::Background).name(), "background");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build lanes on a dedicated runtime owned by the returned registry.
    pub fn from_config(cfg: &Config) -> Result<Schedulers, SchedulerError> {
        Schedulers::build(&cfg.scheduler)
    }

    /// Build lanes on a runtime the caller already runs.
    pub fn from_config_with_handle(
        cfg: &Config,
        handle: Handle,
    ) -> Result<Schedulers, SchedulerError> {
        Schedulers::with_handle(&cfg.scheduler, handle)
    }
}
