use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A unit of work handed to a scheduler.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a piece of delayed work that has not necessarily run yet.
///
/// Cancelling after the work started has no effect on that run. Clones share
/// the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct ScheduledWork {
    token: CancellationToken,
}

impl ScheduledWork {
    /// Create a handle in the not-cancelled state
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Prevent the work from running if its timer has not fired yet
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token that timer tasks race their sleep against
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// A named execution context that runs work now or after a delay.
///
/// Implementations must never run submitted work inline on the caller's
/// thread: `schedule` returns before the work executes.
pub trait Scheduler: Send + Sync {
    /// Name of the execution lane, used for logging.
    fn name(&self) -> &str;

    /// Run `work` on this context as soon as possible.
    fn schedule(&self, work: Work);

    /// Run `work` on this context once `delay` has elapsed, unless the
    /// returned handle is cancelled first.
    fn schedule_after(&self, delay: Duration, work: Work) -> ScheduledWork;
}
