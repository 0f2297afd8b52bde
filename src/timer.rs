//! Countdown ticks for a running quiz.
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic tick source with an explicit cancel handle.
///
/// Once cancelled it never fires again; a new quiz attempt starts a new
/// countdown.
pub struct Countdown {
    interval: Option<Interval>,
}

impl Countdown {
    /// Starts ticking every `period`, the first tick one period from now.
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self {
            interval: Some(interval),
        }
    }

    /// Waits for the next tick. Pending forever after `cancel`.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub fn cancel(&mut self) {
        self.interval = None;
    }
}
