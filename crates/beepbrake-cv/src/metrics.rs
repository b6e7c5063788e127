//! Named counters and latency timers
//!
//! `FrameMetrics` is the stock `Instrumentation` sink: it aggregates what the
//! pipeline reports and exposes a serializable snapshot for logs.

use crate::traits::Instrumentation;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

#[derive(Debug, Default)]
struct Timer {
    started: Option<Instant>,
    count: u64,
    total: Duration,
    last: Duration,
}

impl Timer {
    fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        let nanos = self.total.as_nanos() / u128::from(self.count);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }
}

#[derive(Debug, Default)]
struct Registry {
    counters: HashMap<&'static str, u64>,
    timers: HashMap<&'static str, Timer>,
}

/// Thread-safe metrics recorder
#[derive(Debug)]
pub struct FrameMetrics {
    registry: Mutex<Registry>,
    started_at: Instant,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            started_at: Instant::now(),
        }
    }

    pub fn count(&self, id: &str) -> u64 {
        self.registry.lock().counters.get(id).copied().unwrap_or(0)
    }

    /// Number of completed start/stop pairs for `id`
    pub fn timer_count(&self, id: &str) -> u64 {
        self.registry.lock().timers.get(id).map_or(0, |timer| timer.count)
    }

    /// Mean duration of the completed pairs for `id`
    pub fn mean_duration(&self, id: &str) -> Option<Duration> {
        let registry = self.registry.lock();
        registry.timers.get(id)?.mean()
    }

    /// Rate of `id` increments since creation
    pub fn rate(&self, id: &str) -> f64 {
        per_second(self.count(id), self.started_at.elapsed())
    }

    pub fn summary(&self) -> MetricsSummary {
        let registry = self.registry.lock();
        let elapsed = self.started_at.elapsed();
        let counters = registry
            .counters
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect();
        let rates = registry
            .counters
            .iter()
            .map(|(id, value)| (id.to_string(), per_second(*value, elapsed)))
            .collect();
        let timers = registry
            .timers
            .iter()
            .map(|(id, timer)| {
                let summary = TimerSummary {
                    count: timer.count,
                    total_us: micros(timer.total),
                    last_us: micros(timer.last),
                    mean_us: timer.mean().map_or(0, micros),
                };
                (id.to_string(), summary)
            })
            .collect();

        MetricsSummary {
            counters,
            rates,
            timers,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.01 { count as f64 / secs } else { 0.0 }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Instrumentation for FrameMetrics {
    fn start_timer(&self, id: &'static str) {
        let mut registry = self.registry.lock();
        let timer = registry.timers.entry(id).or_default();
        if timer.started.replace(Instant::now()).is_some() {
            warn!(timer = id, "timer restarted before it was stopped");
        }
    }

    fn stop_timer(&self, id: &'static str) {
        let mut registry = self.registry.lock();
        let Some(timer) = registry.timers.get_mut(id) else {
            warn!(timer = id, "stop for a timer that was never started");
            return;
        };
        let Some(started) = timer.started.take() else {
            warn!(timer = id, "stop for a timer that is not running");
            return;
        };

        let elapsed = started.elapsed();
        timer.count += 1;
        timer.total += elapsed;
        timer.last = elapsed;
        trace!(timer = id, elapsed_us = micros(elapsed), "timer stopped");
    }

    fn increment_count(&self, id: &'static str) {
        *self.registry.lock().counters.entry(id).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSummary {
    pub count: u64,
    pub total_us: u64,
    pub last_us: u64,
    pub mean_us: u64,
}

/// Point-in-time copy of every counter and timer
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub counters: BTreeMap<String, u64>,
    /// Counter increments per second since the recorder was created
    pub rates: BTreeMap<String, f64>,
    pub timers: BTreeMap<String, TimerSummary>,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = FrameMetrics::new();
        metrics.increment_count("frames");
        metrics.increment_count("frames");

        assert_eq!(metrics.count("frames"), 2);
        assert_eq!(metrics.count("other"), 0);
    }

    #[test]
    fn test_timer_pairs() {
        let metrics = FrameMetrics::new();
        metrics.start_timer("work");
        metrics.stop_timer("work");
        metrics.start_timer("work");
        metrics.stop_timer("work");

        assert_eq!(metrics.timer_count("work"), 2);
        assert!(metrics.mean_duration("work").is_some());
    }

    #[test]
    fn test_unmatched_stop_is_ignored() {
        let metrics = FrameMetrics::new();
        metrics.stop_timer("work");
        metrics.start_timer("work");
        metrics.stop_timer("work");
        metrics.stop_timer("work");

        assert_eq!(metrics.timer_count("work"), 1);
    }

    #[test]
    fn test_mean_survives_huge_counts() {
        let timer = Timer {
            started: None,
            count: 1 << 32,
            total: Duration::from_secs(1 << 32),
            last: Duration::from_secs(1),
        };

        assert_eq!(timer.mean(), Some(Duration::from_secs(1)));
        assert_eq!(Timer::default().mean(), None);
    }

    #[test]
    fn test_rate() {
        assert_eq!(per_second(30, Duration::from_secs(2)), 15.0);
        assert_eq!(per_second(30, Duration::ZERO), 0.0);

        let metrics = FrameMetrics::new();
        metrics.increment_count("frames");
        assert!(metrics.rate("frames") >= 0.0);
        assert_eq!(metrics.rate("other"), 0.0);
    }

    #[test]
    fn test_summary_serializes() -> crate::Result<()> {
        let metrics = FrameMetrics::new();
        metrics.increment_count("frames");
        metrics.start_timer("work");
        metrics.stop_timer("work");

        let json = serde_json::to_value(metrics.summary())?;

        assert_eq!(json["counters"]["frames"], 1);
        assert_eq!(json["timers"]["work"]["count"], 1);
        assert!(json["rates"]["frames"].is_number());
        Ok(())
    }
}
