//! Fixed-period tick pacing for game loops.

use std::time::Duration;

use tokio::time::Instant;

/// Executes code in ticks.
///
/// Each [`tick`](Ticker::tick) sleeps until the next period boundary
/// (measured from the previous tick, so a slow iteration does not drift the
/// schedule further than it must) and resolves to the elapsed time since the
/// last tick.
///
/// # Examples
///
/// ```ignore
/// let mut ticker = Ticker::new(Duration::from_millis(30));
/// loop {
///     let delta = ticker.tick().await;
///     update(delta);
/// }
/// ```
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last: Instant,
}

impl Ticker {
    /// Create a ticker with the given period. The first tick completes one
    /// period from now.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick, returning the elapsed time since the
    /// previous one.
    pub async fn tick(&mut self) -> Duration {
        tokio::time::sleep_until(self.last + self.period).await;
        let now = Instant::now();
        let delta = now - self.last;
        self.last = now;
        delta
    }
}

// ===========================================================================
// Tests
// ===========================================================================
