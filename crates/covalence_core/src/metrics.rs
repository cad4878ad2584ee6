//! Counters and structured logging shared by the engines.
//!
//! Engines record domain events (bonds formed, refusals, reactions) here so an
//! external monitor can poll totals without taking any engine lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const BONDS_FORMED: &str = "bonds_formed";
pub const BONDS_REFUSED: &str = "bonds_refused";
pub const BONDS_BROKEN: &str = "bonds_broken";
pub const BONDS_STRAINED: &str = "bonds_strained";
pub const SPONTANEOUS_BREAKS: &str = "spontaneous_breaks";
pub const CLUSTERS_ASSEMBLED: &str = "clusters_assembled";
pub const CLUSTERS_REFUSED: &str = "clusters_refused";
pub const CLUSTERS_DISSOCIATED: &str = "clusters_dissociated";
pub const REACTIONS_SUCCEEDED: &str = "reactions_succeeded";
pub const REACTIONS_FAILED: &str = "reactions_failed";

/// Named event counters.
pub struct Metrics {
    pub counters: Mutex<BTreeMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, amount: u64) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Copies every counter into a plain map.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect()
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs every counter at info level.
    pub fn log_summary(&self) {
        for (name, value) in self.snapshot() {
            tracing::info!(counter = %name, value = value, "Engine counter");
        }
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honors `RUST_LOG` when set, otherwise logs at `default_level`. Output goes
/// to stderr so stdout stays free for reports.
pub fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
