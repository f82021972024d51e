use std::fmt::{Display, Formatter};

/// Collects record timestamps between two rate-calculation ticks.
#[derive(Debug, Clone, Default)]
pub struct RateEstimator {
    samples: Vec<i64>,
}

impl RateEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one timestamp in epoch milliseconds.
    pub fn sample(&mut self, timestamp_ms: i64) {
        self.samples.push(timestamp_ms);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Throughput over the current window, without clearing it.
    pub fn compute(&self) -> u64 {
        throughput(&self.samples)
    }

    /// Throughput over the current window; the window starts over.
    pub fn take(&mut self) -> u64 {
        let rate = self.compute();
        self.samples.clear();
        rate
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Records per second over the span the samples cover.
///
/// With fewer than two samples the raw count is reported.
pub fn throughput(samples_ms: &[i64]) -> u64 {
    if samples_ms.len() < 2 {
        return samples_ms.len() as u64;
    }

    let (min, max) = samples_ms
        .iter()
        .fold((i64::MAX, i64::MIN), |(lo, hi), &t| (lo.min(t), hi.max(t)));

    let span_secs = max.div_euclid(1000) - min.div_euclid(1000) + 1;
    samples_ms.len() as u64 / span_secs as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReport {
    pub per_second: u64,
    /// Events currently held by the replay log.
    pub logged_events: usize,
}

impl Display for RateReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} messages/s ({} events logged)",
            self.per_second, self.logged_events
        )
    }
}
