// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::observable::SubscriptionRemoved;
use crate::observability::messages::StructuredLog;
use std::fmt;
use std::sync::Weak;

/// Type-erased view of an observable's subscriber registry.
pub(crate) trait Registry: Send + Sync {
    /// Remove a callback, returning the remaining subscriber count if it was
    /// registered.
    fn remove(&self, subscription_id: u64) -> Option<usize>;

    fn contains(&self, subscription_id: u64) -> bool;
}

/// Token for one registered callback.
///
/// Holds only a weak reference to the observable, so it never keeps the
/// observable alive. Dropping the token leaves the callback registered.
#[derive(Clone)]
pub struct Subscription {
    observable_id: u64,
    id: u64,
    registry: Weak<dyn Registry>,
}

impl Subscription {
    pub(crate) fn new(observable_id: u64, id: u64, registry: Weak<dyn Registry>) -> Self {
        Self {
            observable_id,
            id,
            registry,
        }
    }

    /// Deregister the callback.
    ///
    /// Returns `true` if this call removed it, `false` if it was already gone
    /// or the observable no longer exists. A notification already in flight
    /// on another thread may still reach the callback once.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        match registry.remove(self.id) {
            Some(subscriber_count) => {
                SubscriptionRemoved {
                    observable_id: self.observable_id,
                    subscription_id: self.id,
                    subscriber_count,
                }
                .log();
                true
            }
            None => false,
        }
    }

    /// Whether the callback is still registered on a live observable.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.contains(self.id))
            .unwrap_or(false)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identifier of the observable this subscription belongs to.
    pub fn observable_id(&self) -> u64 {
        self.observable_id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("observable_id", &self.observable_id)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
