// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic event emitted by the crate is a message struct with a
//! `Display` implementation, so the wording lives in one place instead of
//! being scattered across the combinators and schedulers as magic strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::observable` - subscription registry and combinator events
//! * `messages::scheduler` - execution lane lifecycle and timer events
//!
//! # Usage
//!
//! ```rust
//! use the_observable::observability::messages::scheduler::WorkRejected;
//! use the_observable::observability::messages::StructuredLog;
//!
//! let msg = WorkRejected { queue: "main" };
//! msg.log();
//! ```

pub mod messages;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "the_observable=info";

/// Install a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything, and an
/// already-installed global subscriber (e.g. from a host application) is left
/// in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .try_init();
    });
}
