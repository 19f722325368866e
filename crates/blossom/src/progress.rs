//! Upload progress reporting
//!
//! Progress is measured as bytes handed to the HTTP writer, rounded to whole
//! percentages. Reported values never decrease, and `finish` closes the
//! sequence at 100 before the upload resolves successfully.

use std::sync::{Arc, Mutex};

/// Callback receiving whole-number percentages (0..=100).
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

struct ProgressState {
    total: u64,
    sent: u64,
    last_reported: Option<u8>,
}

/// Shared, clone-able progress tracker for one upload.
#[derive(Clone)]
pub struct ProgressReporter {
    state: Arc<Mutex<ProgressState>>,
    on_progress: Option<ProgressFn>,
}

impl ProgressReporter {
    pub fn new(total: u64, on_progress: Option<ProgressFn>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProgressState {
                total,
                sent: 0,
                last_reported: None,
            })),
            on_progress,
        }
    }

    /// Record bytes written and report the new percentage if it advanced.
    pub fn record(&self, bytes: u64) {
        let Some(on_progress) = &self.on_progress else {
            return;
        };
        if let Ok(mut state) = self.state.lock() {
            state.sent = state.sent.saturating_add(bytes);
            if state.total == 0 {
                return;
            }
            let percent = ((state.sent.min(state.total) * 100) / state.total) as u8;
            if state.last_reported.map_or(true, |last| percent > last) {
                state.last_reported = Some(percent);
                on_progress(percent);
            }
        }
    }

    /// Report 100 unless already reported.
    pub fn finish(&self) {
        let Some(on_progress) = &self.on_progress else {
            return;
        };
        if let Ok(mut state) = self.state.lock()
            && state.last_reported != Some(100)
        {
            state.last_reported = Some(100);
            on_progress(100);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting() -> (ProgressFn, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, seen)
    }

    #[test]
    fn test_monotonic_and_terminates_at_100() {
        let (callback, seen) = collecting();
        let reporter = ProgressReporter::new(200, Some(callback));

        reporter.record(50);
        reporter.record(50);
        reporter.record(100);
        reporter.finish();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![25, 50, 100]);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_finish_is_idempotent() {
        let (callback, seen) = collecting();
        let reporter = ProgressReporter::new(10, Some(callback));

        reporter.record(10);
        reporter.finish();
        reporter.finish();

        assert_eq!(seen.lock().unwrap().clone(), vec![100]);
    }

    #[test]
    fn test_small_increments_do_not_repeat_percentages() {
        let (callback, seen) = collecting();
        let reporter = ProgressReporter::new(1000, Some(callback));

        for _ in 0..1000 {
            reporter.record(1);
        }

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 100);
        assert_eq!(*seen.first().unwrap(), 1);
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[test]
    fn test_zero_total_only_reports_finish() {
        let (callback, seen) = collecting();
        let reporter = ProgressReporter::new(0, Some(callback));

        reporter.record(0);
        reporter.finish();

        assert_eq!(seen.lock().unwrap().clone(), vec![100]);
    }

    #[test]
    fn test_no_callback_is_a_no_op() {
        let reporter = ProgressReporter::new(10, None);
        reporter.record(10);
        reporter.finish();
    }
}
