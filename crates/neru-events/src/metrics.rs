//! Pluggable metrics sink (§1: "observed via a pluggable counter/gauge/histogram sink").
//!
//! Generalizes the no-op-by-default hooks pattern: the core never assumes a
//! concrete backend is wired up, so every call site can unconditionally record
//! against whatever sink the caller constructed it with.

/// Counter/gauge/histogram sink implemented by an external metrics backend.
///
/// All methods take `&self` and must not block or panic; a slow or failing
/// metrics backend must never affect navigation latency.
pub trait MetricsSink: Send + Sync + 'static {
    fn counter(&self, _name: &'static str, _value: u64) {}
    fn gauge(&self, _name: &'static str, _value: f64) {}
    fn histogram(&self, _name: &'static str, _value_ms: f64) {}
}

/// Default sink used when no backend is configured.
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingSink {
        counters: AtomicU64,
    }

    impl MetricsSink for CountingSink {
        fn counter(&self, _name: &'static str, value: u64) {
            self.counters.fetch_add(value, Ordering::Relaxed);
        }
    }

    #[test]
    fn noop_sink_accepts_all_calls() {
        let sink = NoopMetricsSink;
        sink.counter("hints.generated", 3);
        sink.gauge("grid.cache_size", 4.0);
        sink.histogram("render.diff_ms", 1.2);
    }

    #[test]
    fn custom_sink_observes_counters() {
        let sink = CountingSink {
            counters: AtomicU64::new(0),
        };
        sink.counter("hints.generated", 3);
        sink.counter("hints.generated", 2);
        assert_eq!(sink.counters.load(Ordering::Relaxed), 5);
    }
}
