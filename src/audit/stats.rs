// src/audit/stats.rs
// =============================================================================
// Run counters.
//
// Inspections on a page complete in any order, so every counter is an atomic
// and is only ever incremented. After the run a StatsSnapshot is taken for
// reporting.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct RunStatistics {
    total_images_checked: AtomicUsize,
    images_with_known_size: AtomicUsize,
    oversized_images_found: AtomicUsize,
    broken_images_found: AtomicUsize,
    pages_scanned: AtomicUsize,
    pages_skipped: AtomicUsize,
}

/// Plain copy of the counters, taken once the run is done
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_images_checked: usize,
    pub images_with_known_size: usize,
    pub oversized_images_found: usize,
    pub broken_images_found: usize,
    pub pages_scanned: usize,
    pub pages_skipped: usize,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_image_checked(&self) {
        self.total_images_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_known_size(&self) {
        self.images_with_known_size.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_oversized(&self) {
        self.oversized_images_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broken(&self) {
        self.broken_images_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_scanned(&self) {
        self.pages_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_skipped(&self) {
        self.pages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_images_checked: self.total_images_checked.load(Ordering::Relaxed),
            images_with_known_size: self.images_with_known_size.load(Ordering::Relaxed),
            oversized_images_found: self.oversized_images_found.load(Ordering::Relaxed),
            broken_images_found: self.broken_images_found.load(Ordering::Relaxed),
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            pages_skipped: self.pages_skipped.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Images that were checked and raised no issue
    pub fn images_ok(&self) -> usize {
        self.total_images_checked
            .saturating_sub(self.oversized_images_found + self.broken_images_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let stats = Arc::new(RunStatistics::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                tokio::spawn(async move {
                    for _ in 0..1000 {
                        stats.record_image_checked();
                        stats.record_known_size();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_images_checked, 8000);
        assert_eq!(snapshot.images_with_known_size, 8000);
    }

    #[test]
    fn test_images_ok() {
        let stats = RunStatistics::new();
        for _ in 0..5 {
            stats.record_image_checked();
        }
        stats.record_broken();
        stats.record_oversized();

        assert_eq!(stats.snapshot().images_ok(), 3);
    }
}
