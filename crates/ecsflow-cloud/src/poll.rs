//! Bounded status polling
//!
//! After a create or delete the console waits for the instance to settle by
//! re-querying its status a fixed number of times. A failed query does not
//! end the loop; only a terminal observation or running out of attempts does.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before every attempt
    pub interval: Duration,
    /// Attempts before giving up; 0 is treated as 1
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 6,
        }
    }
}

impl PollConfig {
    pub fn from_secs(interval_secs: u64, max_attempts: u32) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            max_attempts,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// What one probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// Terminal state reached
    Ready(T),
    /// Not there yet; carries the observation when the query succeeded
    Pending(Option<T>),
}

/// Final result of a poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Reached(T),
    Exhausted { attempts: u32, last: Option<T> },
}

impl<T> PollOutcome<T> {
    pub fn is_reached(&self) -> bool {
        matches!(self, PollOutcome::Reached(_))
    }
}

/// Run `probe` until it reports [`Probe::Ready`] or attempts run out
///
/// `on_attempt` sees the 1-based attempt number and each observation, so the
/// caller can report progress.
pub async fn poll_until<T, F, Fut, A>(
    config: &PollConfig,
    mut probe: F,
    mut on_attempt: A,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Probe<T>>,
    A: FnMut(u32, &Probe<T>),
{
    let attempts = config.attempts();
    let mut last = None;

    for attempt in 1..=attempts {
        sleep(config.interval).await;

        let observed = probe().await;
        on_attempt(attempt, &observed);
        tracing::debug!(attempt, attempts, "poll attempt finished");

        match observed {
            Probe::Ready(value) => return PollOutcome::Reached(value),
            Probe::Pending(Some(value)) => last = Some(value),
            Probe::Pending(None) => {}
        }
    }

    PollOutcome::Exhausted { attempts, last }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 6);
        assert_eq!(PollConfig::from_secs(3, 0).attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaches_terminal_state() {
        let calls = AtomicU32::new(0);
        let mut seen = Vec::new();

        let outcome = poll_until(
            &PollConfig::default(),
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 3 {
                    Probe::Ready("Running")
                } else {
                    Probe::Pending(Some("Starting"))
                }
            },
            |attempt, _| seen.push(attempt),
        )
        .await;

        assert_eq!(outcome, PollOutcome::Reached("Running"));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_and_keeps_last_observation() {
        let calls = AtomicU32::new(0);

        let outcome = poll_until(
            &PollConfig::from_secs(10, 4),
            || async {
                // Failed queries in between do not clear the last observation
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Probe::Pending(Some("Pending")),
                    _ => Probe::Pending(None::<&str>),
                }
            },
            |_, _| {},
        )
        .await;

        assert_eq!(
            outcome,
            PollOutcome::Exhausted {
                attempts: 4,
                last: Some("Pending")
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_before_first_attempt() {
        let start = tokio::time::Instant::now();

        let outcome = poll_until(
            &PollConfig::from_secs(10, 6),
            || async { Probe::Ready(()) },
            |_, _| {},
        )
        .await;

        assert!(outcome.is_reached());
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
