use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected during a run, shared across the per-nation workers
#[derive(Debug, Default)]
pub struct ExtractionStats {
    pub nations_scanned: AtomicU64,
    pub nations_missing: AtomicU64,
    pub vehicles_extracted: AtomicU64,
    pub records_skipped: AtomicU64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_nations_scanned(&self) {
        self.nations_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_nations_missing(&self) {
        self.nations_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_vehicles(&self, count: u64) {
        self.vehicles_extracted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_records_skipped(&self, count: u64) {
        self.records_skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn nations_scanned(&self) -> u64 {
        self.nations_scanned.load(Ordering::Relaxed)
    }

    pub fn nations_missing(&self) -> u64 {
        self.nations_missing.load(Ordering::Relaxed)
    }

    pub fn vehicles(&self) -> u64 {
        self.vehicles_extracted.load(Ordering::Relaxed)
    }

    pub fn records_skipped(&self) -> u64 {
        self.records_skipped.load(Ordering::Relaxed)
    }
}
