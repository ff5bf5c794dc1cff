// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // runtime config + lane builder
pub mod errors;        // error handling
pub mod observability;
pub mod observable;    // Observable core + combinators
pub mod scheduler;     // execution lanes
pub mod traits;        // scheduler abstraction

pub use observable::{Observable, ObservableOptions, Subscription};
pub use scheduler::{Queue, Schedulers};
pub use traits::{ScheduledWork, Scheduler, Work};
