// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while standing up the execution contexts.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The tokio runtime backing the background lane failed to build.
    #[error("Failed to build background runtime: {0}")]
    RuntimeBuild(#[source] std::io::Error),

    /// The dedicated thread for a serial lane could not be spawned.
    #[error("Failed to spawn thread for '{name}' queue: {source}")]
    ThreadSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
