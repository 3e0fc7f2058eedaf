//! Input debouncing for search terms.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

/// Collapses bursts of values into the last value of each burst.
///
/// A value is released once no newer value has arrived for the whole quiet
/// period, or as soon as the input closes.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::Receiver<T>,
    period: Duration,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer over the given input.
    #[must_use]
    pub const fn new(input: mpsc::Receiver<T>, period: Duration) -> Self {
        Self { input, period }
    }

    /// Returns the quiet period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Waits for the next settled value. Returns `None` once the input is
    /// closed and drained.
    ///
    /// Not cancel safe: a value received before cancellation is lost. Use
    /// [`spawn`](Self::spawn) when the output is polled inside `select!`.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.input.recv().await?;

        loop {
            tokio::select! {
                next = self.input.recv() => match next {
                    Some(value) => {
                        trace!("debounce restarted");
                        latest = value;
                    }
                    None => return Some(latest),
                },
                () = tokio::time::sleep(self.period) => return Some(latest),
            }
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Runs the debouncer on a task and returns the settled values.
    pub fn spawn(mut self, capacity: usize) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        tokio::spawn(async move {
            while let Some(value) = self.next().await {
                if tx.send(value).await.is_err() {
                    break;
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const PERIOD: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_last_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(rx, PERIOD);

        for term in ["p", "pe", "pet"] {
            tx.send(term.to_string()).await.unwrap();
        }

        let start = Instant::now();
        assert_eq!(debouncer.next().await.as_deref(), Some("pet"));
        assert!(start.elapsed() >= PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_yield_each() {
        let (tx, rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(rx, PERIOD);

        tx.send(1).await.unwrap();
        assert_eq!(debouncer.next().await, Some(1));

        tx.send(2).await.unwrap();
        assert_eq!(debouncer.next().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_within_period_restarts_timer() {
        let (tx, rx) = mpsc::channel(8);
        let debouncer = Debouncer::new(rx, PERIOD);
        let mut settled = debouncer.spawn(4);

        let start = Instant::now();
        tx.send("a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send("ab").await.unwrap();

        assert_eq!(settled.recv().await, Some("ab"));
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_flushes_pending_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(rx, PERIOD);

        tx.send("last").await.unwrap();
        drop(tx);

        let start = Instant::now();
        assert_eq!(debouncer.next().await, Some("last"));
        assert!(start.elapsed() < PERIOD);
        assert_eq!(debouncer.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_output_closes_with_input() {
        let (tx, rx) = mpsc::channel::<u32>(8);
        let mut settled = Debouncer::new(rx, PERIOD).spawn(1);
        drop(tx);
        assert_eq!(settled.recv().await, None);
    }

    #[test]
    fn test_period_accessor() {
        let (_tx, rx) = mpsc::channel::<u32>(1);
        assert_eq!(Debouncer::new(rx, PERIOD).period(), PERIOD);
    }
}
