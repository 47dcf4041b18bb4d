use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Batch progress tracking shared across worker threads.
pub struct BatchProcessor {
    pub total_files: usize,
    pub processed_count: AtomicUsize,
    pub start_time: Instant,
}

impl BatchProcessor {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            processed_count: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    /// Increment processed count and return current count
    pub fn increment(&self) -> usize {
        self.processed_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get current progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_files == 0 {
            1.0
        } else {
            (self.processed_count.load(Ordering::Relaxed) as f64) / (self.total_files as f64)
        }
    }

    /// Get estimated time remaining
    pub fn eta(&self) -> Option<Duration> {
        let processed = self.processed_count.load(Ordering::Relaxed);
        if processed == 0 {
            return None;
        }

        let elapsed = self.start_time.elapsed();
        let remaining = self.total_files - processed;

        if remaining == 0 {
            return Some(Duration::new(0, 0));
        }

        let time_per_item = elapsed / processed as u32;
        Some(time_per_item * remaining as u32)
    }

    /// Get processing speed (items per second)
    #[allow(dead_code)]
    pub fn items_per_second(&self) -> f64 {
        let processed = self.processed_count.load(Ordering::Relaxed);
        if processed == 0 {
            return 0.0;
        }

        let elapsed_secs = self.start_time.elapsed().as_secs_f64();
        if elapsed_secs == 0.0 {
            return 0.0;
        }

        processed as f64 / elapsed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts() {
        let processor = BatchProcessor::new(4);
        assert_eq!(processor.progress(), 0.0);
        assert_eq!(processor.eta(), None);

        assert_eq!(processor.increment(), 1);
        assert_eq!(processor.increment(), 2);
        assert_eq!(processor.progress(), 0.5);
        assert!(processor.eta().is_some());
    }

    #[test]
    fn test_empty_batch_is_complete() {
        let processor = BatchProcessor::new(0);
        assert_eq!(processor.progress(), 1.0);
    }

    #[test]
    fn test_eta_zero_when_done() {
        let processor = BatchProcessor::new(2);
        processor.increment();
        processor.increment();
        assert_eq!(processor.eta(), Some(Duration::new(0, 0)));
    }
}
