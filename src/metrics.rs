//! Run Metrics
//!
//! Row counters, lookup counters and load timing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector shared by loaders, stores and matrix builders
#[derive(Debug)]
pub struct Metrics {
    /// Rows parsed from vector files
    rows_read: AtomicU64,
    /// Rows accepted into a table
    rows_kept: AtomicU64,
    /// Rows rejected by a label filter
    rows_dropped: AtomicU64,

    /// Similarity lookups performed
    lookups: AtomicU64,
    /// Lookups that produced a missing cell
    missing: AtomicU64,

    /// Load timing
    loads: AtomicU64,
    load_time_sum_ms: AtomicU64,
    load_time_max_ms: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            rows_read: AtomicU64::new(0),
            rows_kept: AtomicU64::new(0),
            rows_dropped: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            missing: AtomicU64::new(0),
            loads: AtomicU64::new(0),
            load_time_sum_ms: AtomicU64::new(0),
            load_time_max_ms: AtomicU64::new(0),
        }
    }

    /// Record one parsed row and whether the loader kept it
    pub fn record_row(&self, kept: bool) {
        self.rows_read.fetch_add(1, Ordering::Relaxed);
        if kept {
            self.rows_kept.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rows_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one similarity lookup
    pub fn record_lookup(&self, missing: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if missing {
            self.missing.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed table load
    pub fn record_load(&self, elapsed: Duration) {
        let ms = elapsed.as_millis() as u64;
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.load_time_sum_ms.fetch_add(ms, Ordering::Relaxed);

        // Update max (atomic max)
        let mut current_max = self.load_time_max_ms.load(Ordering::Relaxed);
        while ms > current_max {
            match self.load_time_max_ms.compare_exchange_weak(
                current_max,
                ms,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(c) => current_max = c,
            }
        }
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read.load(Ordering::Relaxed)
    }

    pub fn rows_kept(&self) -> u64 {
        self.rows_kept.load(Ordering::Relaxed)
    }

    pub fn rows_dropped(&self) -> u64 {
        self.rows_dropped.load(Ordering::Relaxed)
    }

    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn missing(&self) -> u64 {
        self.missing.load(Ordering::Relaxed)
    }

    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Get average load time in milliseconds
    pub fn avg_load_ms(&self) -> f64 {
        let count = self.loads();
        if count == 0 {
            return 0.0;
        }
        self.load_time_sum_ms.load(Ordering::Relaxed) as f64 / count as f64
    }

    /// Get max load time in milliseconds
    pub fn max_load_ms(&self) -> u64 {
        self.load_time_max_ms.load(Ordering::Relaxed)
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        format!(
            "Rows: read={}, kept={}, dropped={} | Lookups: {} ({} missing) | Load (ms): avg={:.1}, max={}",
            self.rows_read(),
            self.rows_kept(),
            self.rows_dropped(),
            self.lookups(),
            self.missing(),
            self.avg_load_ms(),
            self.max_load_ms()
        )
    }
}
