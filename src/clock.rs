//! Simulation clock
//!
//! A fixed-period scheduler driven by the host. The host feeds elapsed wall
//! time; the clock reports when a tick is due. Tests advance it by hand.

use std::time::Duration;

/// Fixed-period tick scheduler
#[derive(Debug, Clone)]
pub struct SimClock {
    period: Duration,
    accumulator: Duration,
    running: bool,
    ticks: u64,
}

impl SimClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
            running: false,
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks fired since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.accumulator = Duration::ZERO;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = Duration::ZERO;
    }

    /// Follow the game phase: run only while the round is running
    pub fn set_running(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Feed elapsed wall time. Returns true if a tick is due.
    ///
    /// At most one tick fires per call; a late host does not get a burst of
    /// catch-up ticks.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }
        self.accumulator += elapsed;
        if self.accumulator < self.period {
            return false;
        }
        // Drop the backlog
        self.accumulator = if self.accumulator >= self.period * 2 {
            Duration::ZERO
        } else {
            self.accumulator - self.period
        };
        self.ticks += 1;
        true
    }

    /// Wall time until the next tick is due
    pub fn until_next(&self) -> Duration {
        self.period.saturating_sub(self.accumulator)
    }
}
