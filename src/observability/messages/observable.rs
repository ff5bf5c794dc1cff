// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the observable core and its combinators.
//!
//! This module contains message types for logging events related to:
//! * Subscriber registration and removal
//! * `flat_map` inner subscription supersession
//! * `debounce` pending emission cancellation
//! * `delay` emissions dropped by a lane that rejected them

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A callback was added to an observable's subscriber registry.
///
/// # Log Level
/// `trace!` - High-volume bookkeeping
///
/// # Example
/// ```
/// use the_observable::observability::messages::observable::SubscriptionAdded;
///
/// let msg = SubscriptionAdded {
///     observable_id: 7,
///     subscription_id: 2,
///     subscriber_count: 3,
/// };
///
/// tracing::trace!("{}", msg);
/// ```
pub struct SubscriptionAdded {
    pub observable_id: u64,
    pub subscription_id: u64,
    pub subscriber_count: usize,
}

impl Display for SubscriptionAdded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observable #{} registered subscription {} ({} subscribers)",
            self.observable_id, self.subscription_id, self.subscriber_count
        )
    }
}

impl StructuredLog for SubscriptionAdded {
    fn log(&self) {
        tracing::trace!(
            observable_id = self.observable_id,
            subscription_id = self.subscription_id,
            subscriber_count = self.subscriber_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "subscription_added",
            span_name = name,
            observable_id = self.observable_id,
            subscription_id = self.subscription_id,
        )
    }
}

/// A callback was removed from an observable's subscriber registry.
///
/// # Log Level
/// `trace!` - High-volume bookkeeping
pub struct SubscriptionRemoved {
    pub observable_id: u64,
    pub subscription_id: u64,
    pub subscriber_count: usize,
}

impl Display for SubscriptionRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observable #{} removed subscription {} ({} subscribers left)",
            self.observable_id, self.subscription_id, self.subscriber_count
        )
    }
}

impl StructuredLog for SubscriptionRemoved {
    fn log(&self) {
        tracing::trace!(
            observable_id = self.observable_id,
            subscription_id = self.subscription_id,
            subscriber_count = self.subscriber_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "subscription_removed",
            span_name = name,
            observable_id = self.observable_id,
            subscription_id = self.subscription_id,
        )
    }
}

/// A newer source value replaced the inner observable of a `flat_map`.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use the_observable::observability::messages::observable::InnerSubscriptionSuperseded;
///
/// let msg = InnerSubscriptionSuperseded {
///     observable_id: 4,
///     generation: 2,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Observable #4 superseded its inner subscription (generation 2)"
/// );
/// ```
pub struct InnerSubscriptionSuperseded {
    pub observable_id: u64,
    pub generation: u64,
}

impl Display for InnerSubscriptionSuperseded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observable #{} superseded its inner subscription (generation {})",
            self.observable_id, self.generation
        )
    }
}

impl StructuredLog for InnerSubscriptionSuperseded {
    fn log(&self) {
        tracing::debug!(
            observable_id = self.observable_id,
            generation = self.generation,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "inner_subscription_superseded",
            span_name = name,
            observable_id = self.observable_id,
            generation = self.generation,
        )
    }
}

/// A debounced emission was cancelled because a newer value arrived.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct PendingEmissionCancelled {
    pub observable_id: u64,
    pub generation: u64,
}

impl Display for PendingEmissionCancelled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observable #{} cancelled pending emission (generation {})",
            self.observable_id, self.generation
        )
    }
}

impl StructuredLog for PendingEmissionCancelled {
    fn log(&self) {
        tracing::debug!(
            observable_id = self.observable_id,
            generation = self.generation,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pending_emission_cancelled",
            span_name = name,
            observable_id = self.observable_id,
            generation = self.generation,
        )
    }
}

/// A lane dropped a `delay` emission without running it, so its value was
/// discarded.
///
/// # Log Level
/// `warn!` - The scheduler is closed or its runtime has shut down
///
/// # Example
/// ```
/// use the_observable::observability::messages::observable::DelayedEmissionDropped;
///
/// let msg = DelayedEmissionDropped {
///     observable_id: 9,
///     still_pending: 0,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Observable #9 dropped a delayed emission (0 still pending)"
/// );
/// ```
pub struct DelayedEmissionDropped {
    pub observable_id: u64,
    pub still_pending: usize,
}

impl Display for DelayedEmissionDropped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observable #{} dropped a delayed emission ({} still pending)",
            self.observable_id, self.still_pending
        )
    }
}

impl StructuredLog for DelayedEmissionDropped {
    fn log(&self) {
        tracing::warn!(
            observable_id = self.observable_id,
            still_pending = self.still_pending,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delayed_emission_dropped",
            span_name = name,
            observable_id = self.observable_id,
        )
    }
}
