// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via
// [`set_match_metrics`]; every `LenientMatcher` then reports latency and
// outcome for each public operation, and the matcher constructor reports
// engines that failed to build.
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;

use crate::types::{LocaleKey, MatchOperation};

/// Metrics observer for matcher operations.
pub trait MatchMetrics: Send + Sync {
    /// Record one call. `matched` is true when the operation found a match
    /// (or, for [`MatchOperation::AllIgnorable`], returned true).
    fn record_match(&self, op: MatchOperation, latency: Duration, matched: bool);

    /// Record a matcher whose engine could not be built.
    fn record_degraded(&self, _key: &LocaleKey, _reason: &str) {}
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global matcher metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

/// Timer for one operation, present only while a recorder is installed.
pub(crate) struct MetricsSpan {
    recorder: Arc<dyn MatchMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record(self, op: MatchOperation, matched: bool) {
        self.recorder.record_match(op, self.start.elapsed(), matched);
    }
}
