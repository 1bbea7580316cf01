//! Wall-clock latency measurement

use std::time::Instant;

use crate::error::{Error, Result};

/// Round to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Measures one interval in milliseconds.
///
/// Uses a monotonic clock, so the result is never negative.
#[derive(Debug, Default)]
pub struct LatencyTimer {
    started: Option<Instant>,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Milliseconds since [`start`](Self::start), rounded to two decimals
    pub fn stop(&self) -> Result<f64> {
        let started = self
            .started
            .ok_or_else(|| Error::internal("latency timer stopped before it was started"))?;
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        Ok(round_to(elapsed, 2))
    }
}
