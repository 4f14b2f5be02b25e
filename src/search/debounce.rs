//! Trailing-edge debounce.
//!
//! A single optional deadline. Every `touch` pushes it out to `now + delay`;
//! the caller awaits [`Debouncer::wait`] and fires once the deadline passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the timer from now.
    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Future resolving at the current deadline. Pends forever when idle.
    pub fn wait(&self) -> impl Future<Output = ()> + use<> {
        let deadline = self.deadline;
        async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_touch_restarts_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(!debouncer.is_armed());

        let start = Instant::now();
        debouncer.touch();
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.touch();

        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(400))
        );
        debouncer.wait().await;
        assert!(Instant::now() >= start + Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms() {
        let mut debouncer = Debouncer::default();
        debouncer.touch();
        debouncer.cancel();
        assert!(!debouncer.is_armed());

        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.wait()).await;
        assert!(fired.is_err());
    }
}
